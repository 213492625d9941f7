/*!
 * Google web-translate client.
 *
 * Talks to the free `translate_a/single` endpoint that the unofficial
 * Google translate clients use. Requests carry the full source string;
 * the response is a nested JSON array whose first element lists the
 * translated segments.
 */

use std::time::Duration;

use log::error;
use reqwest::Client;
use url::Url;

use crate::errors::ProviderError;

/// Default endpoint of the web-translate API
pub const DEFAULT_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

/// Google translate client with retry and rate limiting
pub struct GoogleTranslate {
    /// Endpoint URL of the translate API
    endpoint: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
}

impl GoogleTranslate {
    /// Create a new client with default retry settings
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::new_with_config(endpoint, 3, 1000, None)
    }

    /// Create a new client with retry and rate limit configuration
    pub fn new_with_config(
        endpoint: impl Into<String>,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        let endpoint = endpoint.into();
        let endpoint = if endpoint.is_empty() {
            DEFAULT_ENDPOINT.to_string()
        } else {
            endpoint
        };

        Self {
            endpoint,
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
        }
    }

    /// Translate one string with retry and exponential backoff
    pub async fn translate_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let url = self
            .request_url(text, source_language, target_language)
            .map_err(|e| ProviderError::RequestFailed(e.to_string()))?;

        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            // Space out retries when a rate limit is configured
            if let Some(rate_limit) = self.rate_limit {
                if attempt > 0 {
                    let delay_ms = 60_000 / rate_limit as u64;
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
            }

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body = response.text().await.map_err(|e| {
                            ProviderError::RequestFailed(format!(
                                "failed to read response body: {}",
                                e
                            ))
                        })?;
                        return extract_translation(&body);
                    } else if status.as_u16() == 429 {
                        last_error = Some(ProviderError::RateLimitExceeded(format!(
                            "endpoint returned 429 on attempt {}",
                            attempt + 1
                        )));
                        error!(
                            "Translate endpoint rate limited - attempt {}/{}",
                            attempt + 1,
                            self.max_retries + 1
                        );
                    } else if status.is_server_error() {
                        // Server error - can retry
                        last_error = Some(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message: response.text().await.unwrap_or_default(),
                        });
                        error!(
                            "Translate endpoint error ({}) - attempt {}/{}",
                            status,
                            attempt + 1,
                            self.max_retries + 1
                        );
                    } else {
                        // Client error - don't retry
                        let message = response.text().await.unwrap_or_default();
                        error!("Translate endpoint error ({}): {}", status, message);
                        return Err(ProviderError::ApiError {
                            status_code: status.as_u16(),
                            message,
                        });
                    }
                }
                Err(e) => {
                    // Network error - can retry
                    last_error = Some(ProviderError::RequestFailed(e.to_string()));
                    error!(
                        "Translate endpoint network error: {} - attempt {}/{}",
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ProviderError::RequestFailed(format!(
                "request failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    fn request_url(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Url, url::ParseError> {
        Url::parse_with_params(
            &self.endpoint,
            &[
                ("client", "gtx"),
                ("dt", "t"),
                ("sl", source_language),
                ("tl", target_language),
                ("q", text),
            ],
        )
    }
}

#[async_trait::async_trait]
impl super::Provider for GoogleTranslate {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        self.translate_text(text, source_language, target_language)
            .await
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Pull the translated text out of the endpoint's nested-array response.
///
/// The body looks like `[[["Hola mundo","Hello world",..],..],..]`:
/// element 0 is a list of segments whose first field is the translated
/// piece. Segments are concatenated in order.
pub fn extract_translation(body: &str) -> Result<String, ProviderError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| ProviderError::ParseError(format!("response is not JSON: {}", e)))?;

    let segments = value
        .get(0)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProviderError::ParseError("missing segment list".to_string()))?;

    let mut translated = String::new();
    for segment in segments {
        if let Some(piece) = segment.get(0).and_then(|v| v.as_str()) {
            translated.push_str(piece);
        }
    }

    if translated.is_empty() {
        return Err(ProviderError::ParseError(
            "response contained no translated segments".to_string(),
        ));
    }

    Ok(translated)
}
