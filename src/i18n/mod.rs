//! Path translation between canonical and localized forms.
//!
//! # Architecture
//!
//! - `tree`: nested segment translations per locale, and their inversion
//! - `matcher`: rewrites a path segment by segment against a tree
//! - `cache`: lazily built forward and reverse trees per locale
//! - `locale`: the leading `/<locale>` segment and its policy
//! - `active`: the locale active for the current task
//! - `metrics`: cache observability
//!
//! # Example
//!
//! ```
//! use localized_routes::i18n::{SegmentMatcher, TranslationTree};
//! use serde_json::json;
//!
//! let tree = TranslationTree::from_value(&json!({
//!     "products": { "_": "produtos", "latest": { "_": "novidades" } }
//! }));
//!
//! assert_eq!(SegmentMatcher::new(&tree).rewrite("/products/latest"), "/produtos/novidades");
//! assert_eq!(SegmentMatcher::new(&tree.invert()).rewrite("/produtos/novidades"), "/products/latest");
//! ```

mod active;
mod cache;
mod locale;
mod matcher;
mod metrics;
mod tree;

pub use active::{active_locale, sync_with_active_locale, with_active_locale};
pub use cache::{TreeCache, URL_KEY};
pub use locale::{LocaleGate, LocaleSettings};
pub use matcher::{MatchResult, SegmentMatcher};
pub use metrics::{CacheMetrics, MetricsReport};
pub use tree::{TranslationTree, OWN_NAME_KEY};
