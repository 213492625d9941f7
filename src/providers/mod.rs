/*!
 * Provider implementations for the external translation capability.
 *
 * This module contains the client implementations the dispatcher calls:
 * - Google: the free Google web-translate endpoint
 * - Mock: deterministic in-process provider for tests
 */

use async_trait::async_trait;

use crate::errors::ProviderError;

/// Common trait for translation providers.
///
/// This is the core's only interface to the external translation
/// capability: one source string and a language pair in, a replacement
/// string or a provider error out. Rate limiting, quota and quality are
/// the implementation's concern.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Translate a single unit of source text.
    ///
    /// # Arguments
    /// * `text` - The source text to translate
    /// * `source_language` - Source language code, or `auto` for detection
    /// * `target_language` - Target language code
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The replacement text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Human-readable provider name for logs and summaries
    fn name(&self) -> &'static str;
}

pub mod google;
pub mod mock;
