/*!
 * End-to-end document translation tests over an in-process provider
 */

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Result;
use tempfile::TempDir;

use docxlate::app_config::Config;
use docxlate::app_controller::Controller;
use docxlate::document::{Package, XmlTree, locate_spans};
use docxlate::providers::mock::MockProvider;

use crate::common;

fn test_config() -> Config {
    let mut config = Config::default();
    config.source_language = "en".to_string();
    config.target_language = "es".to_string();
    config
}

fn write_input(dir: &TempDir, bytes: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join("input.docx");
    std::fs::write(&path, bytes).expect("write test input");
    path
}

fn part_text(package: &Package, name: &str) -> String {
    let part = package
        .parts()
        .iter()
        .find(|p| p.name == name)
        .unwrap_or_else(|| panic!("part '{}' not found", name));
    String::from_utf8(part.bytes.clone()).expect("part is UTF-8")
}

#[tokio::test]
async fn test_run_withRepeatedString_shouldTranslateBodyAndFooterWithOneCall() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, &common::sample_package("Hello world", "Hello world"));
    let output = dir.path().join("output.docx");

    let provider = Arc::new(MockProvider::with_translations([(
        "Hello world",
        "Hola mundo",
    )]));
    let controller = Controller::with_provider(test_config(), provider.clone());
    let summary = controller.run(&input, &output, false).await?;

    // Body and footer share one cache entry and one provider call
    assert_eq!(provider.call_count(), 1);
    assert_eq!(summary.unique_strings, 1);
    assert_eq!(summary.spans_translated, 2);
    assert_eq!(summary.parts_rewritten, 2);

    let package = Package::open(&std::fs::read(&output)?)?;
    assert!(part_text(&package, "word/document.xml").contains("Hola mundo"));
    assert!(part_text(&package, "word/footer1.xml").contains("Hola mundo"));
    Ok(())
}

#[tokio::test]
async fn test_run_withPreservedContent_shouldLeavePartBytesUntouched() -> Result<()> {
    let dir = TempDir::new()?;
    let input_bytes = common::sample_package("contact@example.com", "12,345");
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.docx");

    let provider = Arc::new(MockProvider::working());
    let controller = Controller::with_provider(test_config(), provider.clone());
    let summary = controller.run(&input, &output, false).await?;

    assert_eq!(provider.call_count(), 0);
    assert_eq!(summary.spans_preserved, 2);
    assert_eq!(summary.parts_rewritten, 0);

    // Untouched parts carry their exact original bytes
    let original = Package::open(&input_bytes)?;
    let translated = Package::open(&std::fs::read(&output)?)?;
    for (a, b) in original.parts().iter().zip(translated.parts()) {
        assert_eq!(a.bytes, b.bytes);
    }
    Ok(())
}

#[tokio::test]
async fn test_run_withEmailRun_shouldTranslateNeighborsOnly() -> Result<()> {
    let dir = TempDir::new()?;
    let body = format!(
        "{}{}",
        common::paragraph("Write to us"),
        common::paragraph("Email: a@b.com")
    );
    let document = common::document_xml(&body);
    let input_bytes = common::build_package(&[("word/document.xml", &document)]);
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.docx");

    let provider = Arc::new(MockProvider::with_translations([(
        "Write to us",
        "Escribenos",
    )]));
    let controller = Controller::with_provider(test_config(), provider.clone());
    let summary = controller.run(&input, &output, false).await?;

    assert_eq!(provider.call_count(), 1);
    assert_eq!(summary.spans_preserved, 1);

    let package = Package::open(&std::fs::read(&output)?)?;
    let text = part_text(&package, "word/document.xml");
    assert!(text.contains("Escribenos"));
    assert!(text.contains("<w:t>Email: a@b.com</w:t>"));
    Ok(())
}

#[tokio::test]
async fn test_run_withFailingProvider_shouldProduceValidUntranslatedOutput() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, &common::sample_package("Hello world", "Goodbye"));
    let output = dir.path().join("output.docx");

    let controller =
        Controller::with_provider(test_config(), Arc::new(MockProvider::failing()));
    let summary = controller.run(&input, &output, false).await?;

    assert_eq!(summary.spans_translated, 0);
    assert_eq!(summary.spans_failed, 2);

    // Output still opens and keeps the original text
    let package = Package::open(&std::fs::read(&output)?)?;
    assert!(part_text(&package, "word/document.xml").contains("Hello world"));
    Ok(())
}

#[tokio::test]
async fn test_run_withPartialFailure_shouldTranslateTheRest() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, &common::sample_package("Hello world", "Goodbye"));
    let output = dir.path().join("output.docx");

    let provider = Arc::new(
        MockProvider::with_translations([("Hello world", "Hola mundo")]).fail_on("Goodbye"),
    );
    let controller = Controller::with_provider(test_config(), provider);
    let summary = controller.run(&input, &output, false).await?;

    assert_eq!(summary.spans_translated, 1);
    assert_eq!(summary.spans_failed, 1);

    let package = Package::open(&std::fs::read(&output)?)?;
    assert!(part_text(&package, "word/document.xml").contains("Hola mundo"));
    assert!(part_text(&package, "word/footer1.xml").contains("Goodbye"));
    Ok(())
}

#[tokio::test]
async fn test_run_withMalformedPart_shouldFailWithoutWritingOutput() -> Result<()> {
    let dir = TempDir::new()?;
    let bytes = common::build_package(&[(
        "word/document.xml",
        "<w:document><w:body><w:p>unclosed",
    )]);
    let input = write_input(&dir, &bytes);
    let output = dir.path().join("output.docx");

    let controller =
        Controller::with_provider(test_config(), Arc::new(MockProvider::working()));
    let result = controller.run(&input, &output, false).await;

    assert!(result.is_err());
    assert!(!output.exists());
    Ok(())
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldRefuseWithoutForce() -> Result<()> {
    let dir = TempDir::new()?;
    let input = write_input(&dir, &common::sample_package("Hello world", "Goodbye"));
    let output = dir.path().join("output.docx");
    std::fs::write(&output, b"already here")?;

    let controller =
        Controller::with_provider(test_config(), Arc::new(MockProvider::working()));

    let refused = controller.run(&input, &output, false).await;
    assert!(refused.is_err());
    assert_eq!(std::fs::read(&output)?, b"already here");

    // Force overwrite replaces the stale file
    let summary = controller.run(&input, &output, true).await?;
    assert_eq!(summary.parts_processed, 2);
    assert!(Package::open(&std::fs::read(&output)?).is_ok());
    Ok(())
}

#[tokio::test]
async fn test_run_withTranslation_shouldPreserveDocumentStructure() -> Result<()> {
    let dir = TempDir::new()?;
    let input_bytes = common::sample_package("Hello world", "Goodbye");
    let input = write_input(&dir, &input_bytes);
    let output = dir.path().join("output.docx");

    let controller =
        Controller::with_provider(test_config(), Arc::new(MockProvider::working()));
    controller.run(&input, &output, false).await?;

    let original = Package::open(&input_bytes)?;
    let translated = Package::open(&std::fs::read(&output)?)?;
    assert_eq!(original.len(), translated.len());

    let containers: HashSet<String> = ["w:t".to_string()].into_iter().collect();
    for index in original.text_bearing_indices() {
        let before = XmlTree::parse(&original.part(index).bytes)?;
        let after = XmlTree::parse(&translated.part(index).bytes)?;
        assert_eq!(before.element_count(), after.element_count());
        assert_eq!(
            locate_spans(&before, &containers).len(),
            locate_spans(&after, &containers).len()
        );
    }
    Ok(())
}
