/*!
 * Language tag utilities.
 *
 * Recognized tags are two-letter ISO 639-1 codes, optionally
 * region-qualified (`es`, `zh-cn`). The special tag `auto` requests
 * source-language detection from the provider and is only valid as a
 * source language.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// The pseudo-tag requesting provider-side language detection
pub const AUTO: &str = "auto";

/// Validate a language tag.
///
/// `allow_auto` permits the `auto` pseudo-tag (source side only).
pub fn validate_language_tag(tag: &str, allow_auto: bool) -> Result<()> {
    let tag = tag.trim();
    if tag.is_empty() {
        return Err(anyhow!("Language tag cannot be empty"));
    }
    if tag.eq_ignore_ascii_case(AUTO) {
        if allow_auto {
            return Ok(());
        }
        return Err(anyhow!("'auto' is only valid as a source language"));
    }

    let mut parts = tag.splitn(2, '-');
    let primary = parts.next().unwrap_or_default();
    if primary.len() != 2 || Language::from_639_1(&primary.to_lowercase()).is_none() {
        return Err(anyhow!("Unrecognized language code: '{}'", tag));
    }

    if let Some(region) = parts.next() {
        let valid = (2..=3).contains(&region.len())
            && region.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(anyhow!("Invalid region qualifier in language tag: '{}'", tag));
        }
    }

    Ok(())
}

/// English name for a tag's primary language, for logs
pub fn get_language_name(tag: &str) -> Option<String> {
    if tag.eq_ignore_ascii_case(AUTO) {
        return Some("auto-detect".to_string());
    }
    let primary = tag.split('-').next()?;
    Language::from_639_1(&primary.to_lowercase()).map(|l| l.to_name().to_string())
}

/// Whether two tags refer to the same primary language
pub fn language_codes_match(a: &str, b: &str) -> bool {
    let primary = |t: &str| t.split('-').next().unwrap_or_default().to_lowercase();
    primary(a) == primary(b)
}
