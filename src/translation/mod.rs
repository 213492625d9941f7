/*!
 * Translation pipeline stages.
 *
 * - `classifier`: ordered ELIGIBLE/PRESERVE rules over span content
 * - `cache`: run-scoped deduplication of provider calls
 * - `dispatcher`: bounded-concurrency resolution of unique strings
 * - `reinjector`: total write-back pass into the document model
 */

pub mod cache;
pub mod classifier;
pub mod dispatcher;
pub mod reinjector;

pub use cache::{CacheEntry, TranslationCache, normalize};
pub use classifier::{Classifier, Verdict};
pub use dispatcher::{DispatchReport, Dispatcher, assign_replacements};
pub use reinjector::{ReinjectStats, reinject};
