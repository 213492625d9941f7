/*!
 * Mock provider implementation for testing.
 *
 * This module provides a deterministic in-process provider:
 * - `MockProvider::working()` - uppercases the source text
 * - `MockProvider::with_translations(..)` - answers from a fixed map
 * - `MockProvider::failing()` - always fails
 * - `fail_on(..)` - fails for selected source strings only
 * - `with_delay(..)` - simulates a slow endpoint for timeout tests
 */

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Mock provider for testing dispatcher and pipeline behavior
pub struct MockProvider {
    /// Fixed source -> replacement mapping
    translations: HashMap<String, String>,
    /// Source strings that always fail
    failing_texts: HashSet<String>,
    /// Whether every call fails
    fail_all: bool,
    /// Simulated response delay
    delay: Option<Duration>,
    /// Number of translate calls made
    call_count: AtomicUsize,
}

impl MockProvider {
    /// A provider that always succeeds, uppercasing the input
    pub fn working() -> Self {
        Self {
            translations: HashMap::new(),
            failing_texts: HashSet::new(),
            fail_all: false,
            delay: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// A provider that answers from a fixed map and uppercases anything
    /// not in the map
    pub fn with_translations<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut provider = Self::working();
        provider.translations = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        provider
    }

    /// A provider that fails every call
    pub fn failing() -> Self {
        let mut provider = Self::working();
        provider.fail_all = true;
        provider
    }

    /// Make the provider fail for one specific source string
    pub fn fail_on(mut self, text: impl Into<String>) -> Self {
        self.failing_texts.insert(text.into());
        self
    }

    /// Delay every response by the given duration
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of translate calls made so far
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        _source_language: &str,
        _target_language: &str,
    ) -> Result<String, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail_all {
            return Err(ProviderError::RequestFailed(
                "mock provider configured to fail".to_string(),
            ));
        }
        if self.failing_texts.contains(text) {
            return Err(ProviderError::RequestFailed(format!(
                "mock provider configured to fail for '{}'",
                text
            )));
        }

        match self.translations.get(text) {
            Some(translation) => Ok(translation.clone()),
            None => Ok(text.to_uppercase()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
