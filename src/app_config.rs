use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::language_utils;
use crate::translation::Classifier;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code, or "auto" for detection
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Translation provider config
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Classifier config
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Free Google web-translate endpoint
    #[default]
    Google,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
        }
    }
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Provider type identifier
    #[serde(rename = "type", default)]
    pub kind: ProviderKind,

    /// Service URL; empty selects the provider's default endpoint
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// Max concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry attempts per request
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds for retry delays
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Rate limit (requests per minute)
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Google,
            endpoint: String::new(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit: None,
        }
    }
}

/// Classifier configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ClassifierConfig {
    /// Extra regex patterns whose matches are preserved untouched,
    /// extending the built-in number rule (e.g. invoice codes)
    #[serde(default)]
    pub preserve_patterns: Vec<String>,

    /// Content shorter than this is never sent for translation
    #[serde(default = "default_min_translatable_len")]
    pub min_translatable_len: usize,

    /// Element names recognized as runs of text
    #[serde(default = "default_text_containers")]
    pub text_containers: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            preserve_patterns: Vec::new(),
            min_translatable_len: default_min_translatable_len(),
            text_containers: default_text_containers(),
        }
    }
}

/// Log level setting
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: default_target_language(),
            provider: ProviderConfig::default(),
            classifier: ClassifierConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate the configuration after loading and overriding
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_tag(&self.source_language, true)?;
        language_utils::validate_language_tag(&self.target_language, false)?;

        if self.provider.concurrent_requests == 0 {
            return Err(anyhow!("provider.concurrent_requests must be at least 1"));
        }
        if self.provider.timeout_secs == 0 {
            return Err(anyhow!("provider.timeout_secs must be at least 1"));
        }
        if self.classifier.text_containers.is_empty() {
            return Err(anyhow!("classifier.text_containers cannot be empty"));
        }

        // Surface bad preserve patterns at load time, not mid-run
        Classifier::new(
            &self.classifier.preserve_patterns,
            self.classifier.min_translatable_len,
        )?;

        Ok(())
    }
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "es".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_min_translatable_len() -> usize {
    2
}

fn default_text_containers() -> Vec<String> {
    vec!["w:t".to_string()]
}
