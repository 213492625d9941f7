/*!
 * Tests for the text span locator
 */

use std::collections::HashSet;

use docxlate::document::{XmlTree, locate_spans};

use crate::common;

fn containers(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn test_locate_spans_withMultipleRuns_shouldReturnDocumentOrder() {
    let body = format!(
        "{}{}{}",
        common::paragraph("First"),
        common::paragraph("Second"),
        common::paragraph("Third")
    );
    let source = common::document_xml(&body);
    let tree = XmlTree::parse(source.as_bytes()).unwrap();

    let spans = locate_spans(&tree, &containers(&["w:t"]));
    let contents: Vec<&str> = spans.iter().map(|s| s.content.as_str()).collect();
    assert_eq!(contents, vec!["First", "Second", "Third"]);
}

#[test]
fn test_locate_spans_withStructuralText_shouldExcludeByAncestorTag() {
    // Field instructions and relationship ids hold text but are not runs
    let body = "<w:p><w:r><w:instrText>PAGEREF _Toc1</w:instrText></w:r>\
                <w:r><w:t>Visible prose</w:t></w:r></w:p>";
    let source = common::document_xml(body);
    let tree = XmlTree::parse(source.as_bytes()).unwrap();

    let spans = locate_spans(&tree, &containers(&["w:t"]));
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].content, "Visible prose");
}

#[test]
fn test_locate_spans_withPreserveSpaceAncestor_shouldInheritFlag() {
    let body = "<w:p xml:space=\"preserve\"><w:r><w:t> padded </w:t></w:r></w:p>\
                <w:p><w:r><w:t>plain</w:t></w:r></w:p>";
    let source = common::document_xml(body);
    let tree = XmlTree::parse(source.as_bytes()).unwrap();

    let spans = locate_spans(&tree, &containers(&["w:t"]));
    assert_eq!(spans.len(), 2);
    assert!(spans[0].preserve_space);
    assert!(!spans[1].preserve_space);
}

#[test]
fn test_locate_spans_withConfiguredContainers_shouldHonorTheSet() {
    let body = "<w:p><w:r><w:t>run text</w:t></w:r>\
                <w:r><x:cell>cell text</x:cell></w:r></w:p>";
    let source = common::document_xml(body);
    let tree = XmlTree::parse(source.as_bytes()).unwrap();

    let both = locate_spans(&tree, &containers(&["w:t", "x:cell"]));
    assert_eq!(both.len(), 2);

    let only_cells = locate_spans(&tree, &containers(&["x:cell"]));
    assert_eq!(only_cells.len(), 1);
    assert_eq!(only_cells[0].content, "cell text");
}

#[test]
fn test_locate_spans_withNoTextRuns_shouldReturnEmpty() {
    let source = common::document_xml("<w:p><w:r><w:br/></w:r></w:p>");
    let tree = XmlTree::parse(source.as_bytes()).unwrap();

    let spans = locate_spans(&tree, &containers(&["w:t"]));
    assert!(spans.is_empty());
}

#[test]
fn test_locate_spans_withFreshTree_shouldLeaveVerdictUnset() {
    let source = common::document_xml(&common::paragraph("Hello"));
    let tree = XmlTree::parse(source.as_bytes()).unwrap();

    let spans = locate_spans(&tree, &containers(&["w:t"]));
    assert_eq!(spans.len(), 1);
    assert!(spans[0].verdict.is_none());
    assert!(spans[0].replacement.is_none());
}
