/*!
 * Span classification.
 *
 * Decides per span whether its content is sent to the translation
 * provider (ELIGIBLE) or left untouched (PRESERVE). The rules form an
 * explicit ordered list evaluated first-match-wins, so precedence is
 * testable in isolation. This is a deliberately conservative pattern
 * check, not semantic understanding: anything that does not match a
 * clear leave-untouched pattern is assumed to be prose.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::document::Span;

/// Classifier verdict for one span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Send the content to the translation provider
    Eligible,
    /// Leave the content exactly as parsed
    Preserve,
}

// Local-part @ domain, domain containing at least one dot; matched
// anywhere in the content, so "Email: a@b.com" is kept whole
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\s@]+@[^\s@]+\.[^\s@]+").expect("email pattern is valid"));

// Scheme-qualified URI or a bare www. prefix, matched anywhere
static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:[A-Za-z][A-Za-z0-9+.-]*://\S+|\bwww\.\S+)").expect("url pattern is valid")
});

/// Ordered rule list deciding ELIGIBLE vs. PRESERVE
pub struct Classifier {
    /// Extra preserve patterns from configuration (e.g. invoice codes)
    extra_preserve: Vec<Regex>,
    /// Content shorter than this is never sent for translation
    min_translatable_len: usize,
}

impl Classifier {
    /// Build a classifier from configured extras.
    ///
    /// Fails when a configured pattern does not compile.
    pub fn new(preserve_patterns: &[String], min_translatable_len: usize) -> anyhow::Result<Self> {
        let extra_preserve = preserve_patterns
            .iter()
            .map(|p| {
                Regex::new(p)
                    .map_err(|e| anyhow::anyhow!("invalid preserve pattern '{}': {}", p, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self {
            extra_preserve,
            min_translatable_len,
        })
    }

    /// Classify one span's content. Rules are evaluated in order and the
    /// first match wins:
    ///
    /// 1. contains an email address -> PRESERVE
    /// 2. contains a URL/URI -> PRESERVE
    /// 3. no alphabetic letter at all (numbers, currency, dates) -> PRESERVE
    /// 4. configured extra preserve patterns -> PRESERVE
    /// 5. empty, whitespace-only or below the minimum length -> PRESERVE
    /// 6. otherwise -> ELIGIBLE
    pub fn classify(&self, content: &str) -> Verdict {
        let trimmed = content.trim();

        if EMAIL_RE.is_match(trimmed) {
            return Verdict::Preserve;
        }
        if URL_RE.is_match(trimmed) {
            return Verdict::Preserve;
        }
        if !trimmed.chars().any(|c| c.is_alphabetic()) {
            return Verdict::Preserve;
        }
        if self.extra_preserve.iter().any(|re| re.is_match(trimmed)) {
            return Verdict::Preserve;
        }
        if trimmed.chars().count() < self.min_translatable_len {
            return Verdict::Preserve;
        }

        Verdict::Eligible
    }

    /// Annotate every span in place with its verdict
    pub fn classify_spans(&self, spans: &mut [Span]) {
        for span in spans.iter_mut() {
            span.verdict = Some(self.classify(&span.content));
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            extra_preserve: Vec::new(),
            min_translatable_len: 2,
        }
    }
}
