/*!
 * Translation dispatch.
 *
 * Takes the full ordered list of eligible spans for one document (all
 * text-bearing parts together, so repeated phrases in header, body and
 * footer share one provider call), deduplicates them by normalized
 * source text and resolves each unique string against the provider with
 * bounded concurrency. Results land in the run cache keyed by string,
 * not by arrival order, so the result-to-span mapping is deterministic
 * no matter how dispatch interleaves.
 */

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::warn;
use tokio::sync::Semaphore;

use crate::document::Span;
use crate::providers::Provider;
use crate::translation::cache::{CacheEntry, TranslationCache, normalize};
use crate::translation::classifier::Verdict;

/// Dispatcher resolving unique source strings against the provider
pub struct Dispatcher {
    /// The provider to call
    provider: Arc<dyn Provider>,
    /// Maximum number of concurrent outstanding requests
    max_concurrent_requests: usize,
    /// Per-request timeout; an elapsed request degrades to a failure
    /// for that cache key without blocking the rest
    request_timeout: Duration,
}

/// Outcome of one dispatch pass
#[derive(Debug, Default, Clone)]
pub struct DispatchReport {
    /// Unique normalized strings sent to the provider
    pub unique_strings: usize,
    /// Provider invocations made (one per unique string)
    pub provider_calls: usize,
    /// Unique strings that ended in failure
    pub failed_strings: usize,
}

impl Dispatcher {
    /// Create a dispatcher over the given provider
    pub fn new(
        provider: Arc<dyn Provider>,
        max_concurrent_requests: usize,
        request_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            max_concurrent_requests: max_concurrent_requests.max(1),
            request_timeout,
        }
    }

    /// Resolve every unique eligible source string into the cache.
    ///
    /// Unique keys are partitioned up front, so there is at most one
    /// in-flight request per key. All requests are joined before this
    /// returns; reinjection must only run against a fully resolved cache.
    pub async fn resolve<'a>(
        &self,
        cache: &TranslationCache,
        sources: impl IntoIterator<Item = &'a str>,
        source_language: &str,
        target_language: &str,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> DispatchReport {
        // Deduplicate in first-seen (document) order
        let mut seen = HashSet::new();
        let mut keys = Vec::new();
        for content in sources {
            let key = normalize(content);
            if key.is_empty() {
                continue;
            }
            if seen.insert(key.to_string())
                && cache.get(key, source_language, target_language).is_none()
            {
                keys.push(key.to_string());
            }
        }

        let total = keys.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));

        let results: Vec<(String, Result<String, crate::errors::ProviderError>)> =
            stream::iter(keys)
                .map(|key| {
                    let provider = self.provider.clone();
                    let semaphore = semaphore.clone();
                    let completed = completed.clone();
                    let progress_callback = progress_callback.clone();
                    let source_language = source_language.to_string();
                    let target_language = target_language.to_string();
                    let request_timeout = self.request_timeout;

                    async move {
                        let _permit =
                            semaphore.acquire().await.expect("semaphore never closed");

                        let result = match tokio::time::timeout(
                            request_timeout,
                            provider.translate(&key, &source_language, &target_language),
                        )
                        .await
                        {
                            Ok(result) => result,
                            Err(_) => Err(crate::errors::ProviderError::Timeout(
                                request_timeout.as_secs(),
                            )),
                        };

                        let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                        progress_callback(current, total);

                        (key, result)
                    }
                })
                .buffer_unordered(self.max_concurrent_requests)
                .collect()
                .await;

        let provider_calls = results.len();
        let mut failed_strings = 0;
        for (key, result) in results {
            match result {
                Ok(translation) => {
                    cache.store(&key, source_language, target_language, &translation);
                }
                Err(e) => {
                    // Failure degrades to a no-op for the affected spans
                    // but is recorded for the end-of-run summary
                    warn!("Translation failed for '{}': {}", key, e);
                    cache.store_failure(&key, source_language, target_language);
                    failed_strings += 1;
                }
            }
        }

        DispatchReport {
            unique_strings: total,
            provider_calls,
            failed_strings,
        }
    }
}

/// Distribute resolved cache entries back onto the spans.
///
/// Every eligible span sharing a normalized source string receives the
/// identical replacement. Surrounding whitespace stripped during
/// normalization is re-applied around the translation so node content
/// keeps its original padding. Returns (translated, failed) span counts.
pub fn assign_replacements(
    cache: &TranslationCache,
    spans: &mut [Span],
    source_language: &str,
    target_language: &str,
) -> (usize, usize) {
    let mut translated = 0;
    let mut failed = 0;

    for span in spans.iter_mut() {
        if span.verdict != Some(Verdict::Eligible) {
            continue;
        }
        let key = normalize(&span.content);
        if key.is_empty() {
            continue;
        }
        match cache.get(key, source_language, target_language) {
            Some(CacheEntry::Translated(translation)) => {
                span.replacement = Some(rehydrate(&span.content, &translation));
                translated += 1;
            }
            Some(CacheEntry::Failed) | None => {
                failed += 1;
            }
        }
    }

    (translated, failed)
}

/// Re-apply the original surrounding whitespace around a translation
fn rehydrate(original: &str, translated: &str) -> String {
    let leading_len = original.len() - original.trim_start().len();
    let trailing_start = original.trim_end().len();
    format!(
        "{}{}{}",
        &original[..leading_len],
        translated,
        &original[trailing_start..]
    )
}
