use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::document::{Package, Span, XmlTree, locate_spans};
use crate::errors::OutputError;
use crate::language_utils;
use crate::providers::Provider;
use crate::providers::google::GoogleTranslate;
use crate::translation::{
    Classifier, Dispatcher, TranslationCache, Verdict, assign_replacements, reinject,
};

// @module: Application controller for document translation

/// End-of-run accounting, surfaced to the caller and the logs.
///
/// Provider failures never abort the run; they are counted here so
/// nothing is silently swallowed.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    /// Text-bearing parts parsed
    pub parts_processed: usize,
    /// Parts whose bytes were rewritten
    pub parts_rewritten: usize,
    /// Spans located across all parts
    pub spans_total: usize,
    /// Spans classified ELIGIBLE
    pub spans_eligible: usize,
    /// Spans classified PRESERVE
    pub spans_preserved: usize,
    /// Spans that received a replacement
    pub spans_translated: usize,
    /// Eligible spans left untranslated due to provider failures
    pub spans_failed: usize,
    /// Unique normalized strings dispatched
    pub unique_strings: usize,
    /// Provider invocations made
    pub provider_calls: usize,
}

impl RunSummary {
    /// Generate a human-readable summary of the run
    pub fn summary(&self) -> String {
        format!(
            "Translation Summary:\n\
             Parts processed: {}\n\
             Parts rewritten: {}\n\
             Spans located: {}\n\
             Spans eligible: {}\n\
             Spans preserved: {}\n\
             Spans translated: {}\n\
             Spans failed: {}\n\
             Unique strings: {}\n\
             Provider calls: {}",
            self.parts_processed,
            self.parts_rewritten,
            self.spans_total,
            self.spans_eligible,
            self.spans_preserved,
            self.spans_translated,
            self.spans_failed,
            self.unique_strings,
            self.provider_calls
        )
    }
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Translation provider
    provider: Arc<dyn Provider>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        let provider: Arc<dyn Provider> = Arc::new(GoogleTranslate::new_with_config(
            config.provider.endpoint.clone(),
            config.provider.retry_count,
            config.provider.retry_backoff_ms,
            config.provider.rate_limit,
        ));
        Ok(Self { config, provider })
    }

    /// Create a controller over an explicit provider (used by tests)
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self { config, provider }
    }

    /// Run one document-processing pass.
    ///
    /// The document is either fully reassembled (possibly with some spans
    /// untranslated due to provider failures) or the operation fails
    /// before any output file is written. Partial output never exists.
    pub async fn run(
        &self,
        input_file: &Path,
        output_file: &Path,
        force_overwrite: bool,
    ) -> Result<RunSummary> {
        let start_time = std::time::Instant::now();

        if output_file.exists() && !force_overwrite {
            return Err(
                OutputError::AlreadyExists(output_file.display().to_string()).into(),
            );
        }

        info!(
            "Translating {:?} ({} -> {})",
            input_file,
            language_utils::get_language_name(&self.config.source_language)
                .unwrap_or_else(|| self.config.source_language.clone()),
            language_utils::get_language_name(&self.config.target_language)
                .unwrap_or_else(|| self.config.target_language.clone())
        );

        let bytes = std::fs::read(input_file)
            .with_context(|| format!("Failed to read input file: {:?}", input_file))?;

        let mut package = Package::open(&bytes)
            .with_context(|| format!("Failed to open container: {:?}", input_file))?;

        let classifier = Classifier::new(
            &self.config.classifier.preserve_patterns,
            self.config.classifier.min_translatable_len,
        )?;
        let text_containers: HashSet<String> = self
            .config
            .classifier
            .text_containers
            .iter()
            .cloned()
            .collect();

        // Parse and classify every text-bearing part before any dispatch,
        // so malformed XML aborts the run with nothing written
        let mut summary = RunSummary::default();
        let mut worklist: Vec<(usize, XmlTree, Vec<Span>)> = Vec::new();
        for index in package.text_bearing_indices() {
            let part = package.part(index);
            let tree = XmlTree::parse(&part.bytes)
                .with_context(|| format!("Failed to parse part '{}'", part.name))?;

            let mut spans = locate_spans(&tree, &text_containers);
            classifier.classify_spans(&mut spans);

            let eligible = spans
                .iter()
                .filter(|s| s.verdict == Some(Verdict::Eligible))
                .count();
            debug!(
                "Part '{}': {} spans, {} eligible",
                part.name,
                spans.len(),
                eligible
            );

            summary.spans_total += spans.len();
            summary.spans_eligible += eligible;
            worklist.push((index, tree, spans));
        }
        summary.parts_processed = worklist.len();
        summary.spans_preserved = summary.spans_total - summary.spans_eligible;

        // One cache per run, shared across all parts so repeated phrases
        // in header, body and footer resolve to one provider call
        let cache = TranslationCache::new();
        let dispatcher = Dispatcher::new(
            self.provider.clone(),
            self.config.provider.concurrent_requests,
            Duration::from_secs(self.config.provider.timeout_secs),
        );

        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} strings",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        let progress = progress_bar.clone();

        let report = {
            let eligible_sources = worklist.iter().flat_map(|(_, _, spans)| {
                spans
                    .iter()
                    .filter(|s| s.verdict == Some(Verdict::Eligible))
                    .map(|s| s.content.as_str())
            });

            dispatcher
                .resolve(
                    &cache,
                    eligible_sources,
                    &self.config.source_language,
                    &self.config.target_language,
                    move |current, total| {
                        progress.set_length(total as u64);
                        progress.set_position(current as u64);
                    },
                )
                .await
        };
        progress_bar.finish_and_clear();

        summary.unique_strings = report.unique_strings;
        summary.provider_calls = report.provider_calls;
        if report.failed_strings > 0 {
            warn!(
                "{} unique string(s) failed to translate and were left unchanged",
                report.failed_strings
            );
        }

        // Reinject and repack; untouched parts keep their exact bytes
        for (index, tree, spans) in worklist.iter_mut() {
            let (translated, failed) = assign_replacements(
                &cache,
                spans,
                &self.config.source_language,
                &self.config.target_language,
            );
            summary.spans_translated += translated;
            summary.spans_failed += failed;

            reinject(tree, spans)?;
            if tree.is_mutated() {
                package.replace_bytes(*index, tree.serialize());
                summary.parts_rewritten += 1;
            }
        }

        let output_bytes = package.write()?;
        if let Some(parent) = output_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| OutputError::Unwritable(e.to_string()))?;
            }
        }
        std::fs::write(output_file, output_bytes)
            .map_err(|e| OutputError::Unwritable(format!("{:?}: {}", output_file, e)))?;

        info!(
            "Completed in {:.2}s\n{}",
            start_time.elapsed().as_secs_f64(),
            summary.summary()
        );

        Ok(summary)
    }
}
