//! Localized URL paths.
//!
//! Translates path segments between their canonical form and per-locale
//! forms, and handles a leading `/<locale>` segment. Recognition maps
//! `/pt-PT/produtos/novidades` to locale `pt-PT` and the canonical path
//! `/products/latest`; generation does the reverse.
//!
//! ```
//! use localized_routes::catalog::MemoryCatalog;
//! use localized_routes::i18n::LocaleSettings;
//! use localized_routes::routing::RouteTranslator;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let catalog = MemoryCatalog::new().with_locale(
//!     "es",
//!     json!({ "url": { "products": { "_": "productos", "latest": { "_": "recientes" } } } }),
//! );
//! let translator = RouteTranslator::new(Arc::new(catalog), LocaleSettings::new(["en", "es"], "en"));
//!
//! assert_eq!(translator.generate("/products/latest", Some("es")), "/es/productos/recientes");
//! assert_eq!(translator.recognize("/es/productos/recientes").path, "/products/latest");
//! ```

pub mod catalog;
pub mod config;
pub mod i18n;
pub mod routing;
pub mod server;
