/*!
 * # docxlate - structure-preserving document translation
 *
 * A Rust library for translating ZIP-packaged XML documents (DOCX class)
 * while keeping every non-text artifact untouched.
 *
 * ## Features
 *
 * - Open ZIP-based compound documents and preserve part ordering
 * - Parse XML parts into an arena tree with byte-exact round-trip
 * - Locate translatable spans by ancestor tag, in document order
 * - Classify spans with an ordered ELIGIBLE/PRESERVE rule list
 * - Deduplicate provider calls per unique string and language pair
 * - Reinject replacements into the exact originating nodes
 * - Repack a valid document that opens in the same class of viewer
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Container codec, XML model and span locator
 * - `translation`: Classification, caching, dispatch and reinjection
 * - `providers`: Clients for the external translation capability
 * - `app_controller`: Main application controller
 * - `language_utils`: Language tag utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, RunSummary};
pub use document::{Package, Span, XmlTree, locate_spans};
pub use errors::{AppError, ContainerError, OutputError, ProviderError, XmlError};
pub use translation::{Classifier, Dispatcher, TranslationCache, Verdict};
