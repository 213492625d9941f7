/*!
 * Tests for translation dispatch and replacement assignment
 */

use std::sync::Arc;
use std::time::Duration;

use docxlate::document::Span;
use docxlate::providers::mock::MockProvider;
use docxlate::translation::{
    CacheEntry, Dispatcher, TranslationCache, Verdict, assign_replacements,
};

fn eligible_span(node: usize, content: &str) -> Span {
    Span {
        node,
        content: content.to_string(),
        preserve_space: false,
        verdict: Some(Verdict::Eligible),
        replacement: None,
    }
}

#[tokio::test]
async fn test_resolve_withRepeatedStrings_shouldCallProviderOncePerUniqueKey() {
    let provider = Arc::new(MockProvider::working());
    let dispatcher = Dispatcher::new(provider.clone(), 4, Duration::from_secs(5));
    let cache = TranslationCache::new();

    let sources = vec!["Hello world", "Hello world", "  Hello world  ", "Goodbye"];
    let report = dispatcher
        .resolve(&cache, sources, "en", "es", |_, _| {})
        .await;

    assert_eq!(report.unique_strings, 2);
    assert_eq!(report.provider_calls, 2);
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn test_resolve_withWorkingProvider_shouldPopulateCache() {
    let provider = Arc::new(MockProvider::with_translations([(
        "Hello world",
        "Hola mundo",
    )]));
    let dispatcher = Dispatcher::new(provider, 4, Duration::from_secs(5));
    let cache = TranslationCache::new();

    dispatcher
        .resolve(&cache, vec!["Hello world"], "en", "es", |_, _| {})
        .await;

    assert_eq!(
        cache.get("Hello world", "en", "es"),
        Some(CacheEntry::Translated("Hola mundo".to_string()))
    );
}

#[tokio::test]
async fn test_resolve_withPartialFailures_shouldIsolateFailedKeys() {
    let provider = Arc::new(MockProvider::working().fail_on("Broken"));
    let dispatcher = Dispatcher::new(provider, 4, Duration::from_secs(5));
    let cache = TranslationCache::new();

    let report = dispatcher
        .resolve(&cache, vec!["Fine", "Broken"], "en", "es", |_, _| {})
        .await;

    assert_eq!(report.failed_strings, 1);
    assert_eq!(
        cache.get("Fine", "en", "es"),
        Some(CacheEntry::Translated("FINE".to_string()))
    );
    assert_eq!(cache.get("Broken", "en", "es"), Some(CacheEntry::Failed));
}

#[tokio::test]
async fn test_resolve_withSlowProvider_shouldTimeOutAsFailure() {
    let provider = Arc::new(MockProvider::working().with_delay(Duration::from_secs(5)));
    let dispatcher = Dispatcher::new(provider, 2, Duration::from_millis(50));
    let cache = TranslationCache::new();

    let report = dispatcher
        .resolve(&cache, vec!["Hello world"], "en", "es", |_, _| {})
        .await;

    assert_eq!(report.failed_strings, 1);
    assert_eq!(
        cache.get("Hello world", "en", "es"),
        Some(CacheEntry::Failed)
    );
}

#[tokio::test]
async fn test_resolve_withCachedKeys_shouldSkipProvider() {
    let provider = Arc::new(MockProvider::working());
    let dispatcher = Dispatcher::new(provider.clone(), 4, Duration::from_secs(5));
    let cache = TranslationCache::new();
    cache.store("Hello world", "en", "es", "Hola mundo");

    let report = dispatcher
        .resolve(&cache, vec!["Hello world"], "en", "es", |_, _| {})
        .await;

    assert_eq!(report.unique_strings, 0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_resolve_withProgressCallback_shouldReportCompletion() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let provider = Arc::new(MockProvider::working());
    let dispatcher = Dispatcher::new(provider, 2, Duration::from_secs(5));
    let cache = TranslationCache::new();

    let max_seen = Arc::new(AtomicUsize::new(0));
    let observer = max_seen.clone();
    dispatcher
        .resolve(
            &cache,
            vec!["one fish", "two fish", "red fish"],
            "en",
            "es",
            move |current, total| {
                assert_eq!(total, 3);
                observer.fetch_max(current, Ordering::SeqCst);
            },
        )
        .await;

    assert_eq!(max_seen.load(Ordering::SeqCst), 3);
}

#[test]
fn test_assign_replacements_withSharedString_shouldGiveIdenticalReplacement() {
    let cache = TranslationCache::new();
    cache.store("Hello world", "en", "es", "Hola mundo");

    let mut spans = vec![
        eligible_span(1, "Hello world"),
        eligible_span(2, "Hello world"),
    ];
    let (translated, failed) = assign_replacements(&cache, &mut spans, "en", "es");

    assert_eq!(translated, 2);
    assert_eq!(failed, 0);
    assert_eq!(spans[0].replacement.as_deref(), Some("Hola mundo"));
    assert_eq!(spans[0].replacement, spans[1].replacement);
}

#[test]
fn test_assign_replacements_withPaddedContent_shouldRehydrateWhitespace() {
    let cache = TranslationCache::new();
    cache.store("Hello world", "en", "es", "Hola mundo");

    let mut spans = vec![eligible_span(1, "  Hello world ")];
    let (translated, _) = assign_replacements(&cache, &mut spans, "en", "es");

    assert_eq!(translated, 1);
    assert_eq!(spans[0].replacement.as_deref(), Some("  Hola mundo "));
}

#[test]
fn test_assign_replacements_withPreservedSpan_shouldSkipIt() {
    let cache = TranslationCache::new();
    cache.store("12,345", "en", "es", "should never apply");

    let mut spans = vec![Span {
        node: 1,
        content: "12,345".to_string(),
        preserve_space: false,
        verdict: Some(Verdict::Preserve),
        replacement: None,
    }];
    let (translated, failed) = assign_replacements(&cache, &mut spans, "en", "es");

    assert_eq!(translated, 0);
    assert_eq!(failed, 0);
    assert!(spans[0].replacement.is_none());
}

#[test]
fn test_assign_replacements_withFailedKey_shouldLeaveSpanUntouched() {
    let cache = TranslationCache::new();
    cache.store_failure("Hello world", "en", "es");

    let mut spans = vec![eligible_span(1, "Hello world")];
    let (translated, failed) = assign_replacements(&cache, &mut spans, "en", "es");

    assert_eq!(translated, 0);
    assert_eq!(failed, 1);
    assert!(spans[0].replacement.is_none());
}
