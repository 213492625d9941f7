/*!
 * Run-scoped translation cache.
 *
 * Deduplicates provider calls within a single document-processing run.
 * The cache is a value created per run and passed into the dispatcher
 * and reinjection pass, never ambient state, so concurrent runs over
 * different documents cannot leak entries into each other. Entries are
 * write-once: the first result recorded for a key is final, which gives
 * every span sharing a normalized source string an identical replacement.
 *
 * Identical strings in different contexts share one entry by design;
 * this mirrors the source behavior and is a known simplification.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use parking_lot::RwLock;

/// Cache key combining normalized source text and the language pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    /// Normalized (whitespace-trimmed) source text
    source_text: String,
    /// Source language code
    source_language: String,
    /// Target language code
    target_language: String,
}

impl CacheKey {
    fn new(source_text: &str, source_language: &str, target_language: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
        }
    }
}

/// Outcome recorded for one unique source string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    /// The provider returned a replacement
    Translated(String),
    /// The provider failed or timed out; affected spans keep their
    /// original content
    Failed,
}

/// Normalize span content into its cache-key form.
///
/// Only surrounding whitespace is trimmed; case and internal punctuation
/// are preserved.
pub fn normalize(text: &str) -> &str {
    text.trim()
}

/// Translation cache for one document-processing run
pub struct TranslationCache {
    /// Internal cache storage
    entries: Arc<RwLock<HashMap<CacheKey, CacheEntry>>>,
}

impl TranslationCache {
    /// Create an empty cache for a new run
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Look up the recorded outcome for a normalized source string
    pub fn get(
        &self,
        source_text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Option<CacheEntry> {
        let key = CacheKey::new(source_text, source_language, target_language);
        self.entries.read().get(&key).cloned()
    }

    /// Record a successful translation.
    ///
    /// The first entry recorded for a key is final; later writes for the
    /// same key are ignored.
    pub fn store(
        &self,
        source_text: &str,
        source_language: &str,
        target_language: &str,
        translation: &str,
    ) {
        let key = CacheKey::new(source_text, source_language, target_language);
        let mut entries = self.entries.write();
        entries
            .entry(key)
            .or_insert_with(|| CacheEntry::Translated(translation.to_string()));

        debug!(
            "Cached translation for '{}' ({} -> {})",
            truncate_text(source_text, 30),
            source_language,
            target_language
        );
    }

    /// Record a failed translation for a key, unless an outcome exists
    pub fn store_failure(
        &self,
        source_text: &str,
        source_language: &str,
        target_language: &str,
    ) {
        let key = CacheKey::new(source_text, source_language, target_language);
        let mut entries = self.entries.write();
        entries.entry(key).or_insert(CacheEntry::Failed);

        debug!(
            "Recorded translation failure for '{}' ({} -> {})",
            truncate_text(source_text, 30),
            source_language,
            target_language
        );
    }

    /// Number of unique keys resolved so far
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when no key has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Count of keys that ended in failure
    pub fn failed_count(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|e| matches!(e, CacheEntry::Failed))
            .count()
    }
}

impl Default for TranslationCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TranslationCache {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

/// Truncate text to a maximum length with ellipsis
fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_length).collect::<String>())
    }
}
