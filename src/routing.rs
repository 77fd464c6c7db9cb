//! Recognition and generation hooks for a host router.
//!
//! On recognition the locale prefix is stripped and localized segments are
//! mapped back to canonical ones before the host matches routes. On
//! generation the host builds a canonical path which is then localized and
//! prefixed.

use crate::catalog::Catalog;
use crate::i18n::{LocaleGate, LocaleSettings, MetricsReport, SegmentMatcher, TreeCache};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Route parameters exchanged with the host router.
pub type RouteParams = HashMap<String, String>;

/// Parameter carrying the locale.
pub const LOCALE_PARAM: &str = "locale";

/// Outcome of recognizing an incoming path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recognized {
    /// Locale taken from the path prefix, if there was one
    pub locale: Option<String>,

    /// Canonical path for the host router
    pub path: String,
}

/// Translates paths in both directions for one catalog.
pub struct RouteTranslator {
    gate: LocaleGate,
    cache: TreeCache,
}

impl RouteTranslator {
    pub fn new(catalog: Arc<dyn Catalog>, settings: LocaleSettings) -> Self {
        Self {
            gate: LocaleGate::new(settings),
            cache: TreeCache::new(catalog),
        }
    }

    /// Translator covering every locale in the catalog.
    pub fn with_catalog_locales(catalog: Arc<dyn Catalog>, default_locale: &str) -> Self {
        let settings = LocaleSettings::from_catalog(catalog.as_ref(), default_locale);
        Self::new(catalog, settings)
    }

    pub fn gate(&self) -> &LocaleGate {
        &self.gate
    }

    /// Localize a canonical path for `locale` (no prefix handling).
    pub fn translate(&self, path: &str, locale: &str) -> String {
        let tree = self.cache.forward(locale);
        if tree.is_empty() {
            return path.to_string();
        }
        SegmentMatcher::new(&tree).rewrite(path)
    }

    /// Map a path localized for `locale` back to canonical form (no prefix
    /// handling).
    pub fn untranslate(&self, path: &str, locale: &str) -> String {
        let tree = self.cache.reverse(locale);
        if tree.is_empty() {
            return path.to_string();
        }
        SegmentMatcher::new(&tree).rewrite(path)
    }

    /// Strip the locale prefix and canonicalize the rest of `path`.
    ///
    /// Without a prefix the path is read in the default locale.
    pub fn recognize(&self, path: &str) -> Recognized {
        let (locale, rest) = self.gate.extract(path);
        let lookup = locale.as_deref().unwrap_or(self.gate.default_locale());
        let canonical = self.untranslate(&rest, lookup);
        debug!(
            "Recognized '{}' as '{}' (locale: {:?})",
            path, canonical, locale
        );

        Recognized {
            locale,
            path: canonical,
        }
    }

    /// Recognition hook: `next` matches the canonical path, and the extracted
    /// locale is added to its params.
    pub fn on_recognize<E, F>(&self, path: &str, next: F) -> Result<RouteParams, E>
    where
        F: FnOnce(&str) -> Result<RouteParams, E>,
    {
        let recognized = self.recognize(path);
        let mut params = next(&recognized.path)?;
        if let Some(locale) = recognized.locale {
            params.insert(LOCALE_PARAM.to_string(), locale);
        }
        Ok(params)
    }

    /// Localize a canonical path generated by the host.
    ///
    /// `locale` falls back to the active locale; an unconfigured locale leaves
    /// the path untouched. A query string or fragment is carried over as-is.
    pub fn generate(&self, path: &str, locale: Option<&str>) -> String {
        let Some(locale) = self.gate.resolve(locale) else {
            return path.to_string();
        };

        let split = path.find(['?', '#']).unwrap_or(path.len());
        let (route, suffix) = path.split_at(split);

        let mut localized = self.translate(route, &locale);
        if self.gate.should_prepend(&locale) {
            localized = LocaleGate::prepend(&localized, &locale);
        }
        localized.push_str(suffix);
        localized
    }

    /// Generation hook: the `locale` param is removed before `next` builds
    /// the canonical path, which is then localized.
    pub fn on_generate<E, F>(&self, mut params: RouteParams, next: F) -> Result<String, E>
    where
        F: FnOnce(&RouteParams) -> Result<String, E>,
    {
        let locale = params.remove(LOCALE_PARAM);
        let path = next(&params)?;
        Ok(self.generate(&path, locale.as_deref()))
    }

    pub fn cache_metrics(&self) -> MetricsReport {
        self.cache.metrics().report()
    }

    /// Drop cached trees so the next lookup rebuilds them from the catalog.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use crate::i18n::sync_with_active_locale;
    use serde_json::json;

    fn catalog() -> Arc<dyn Catalog> {
        Arc::new(
            MemoryCatalog::new()
                .with_locale(
                    "pt-PT",
                    json!({ "url": {
                        "products": { "_": "produtos", "latest": { "_": "novidades" } }
                    } }),
                )
                .with_locale(
                    "es",
                    json!({ "url": {
                        "products": { "_": "productos", "latest": { "_": "recientes" } }
                    } }),
                )
                .with_locale("en", json!({})),
        )
    }

    fn translator() -> RouteTranslator {
        RouteTranslator::new(catalog(), LocaleSettings::new(["pt-PT", "es", "en"], "pt-PT"))
    }

    // ==================== Recognition Tests ====================

    #[test]
    fn test_recognize_with_prefix() {
        let recognized = translator().recognize("/pt-PT/produtos/novidades");
        assert_eq!(recognized.locale.as_deref(), Some("pt-PT"));
        assert_eq!(recognized.path, "/products/latest");
    }

    #[test]
    fn test_recognize_canonical_with_prefix() {
        let recognized = translator().recognize("/pt-PT/products/latest");
        assert_eq!(recognized.locale.as_deref(), Some("pt-PT"));
        assert_eq!(recognized.path, "/products/latest");
    }

    #[test]
    fn test_recognize_without_prefix_uses_default_locale() {
        let recognized = translator().recognize("/produtos/novidades");
        assert_eq!(recognized.locale, None);
        assert_eq!(recognized.path, "/products/latest");
    }

    #[test]
    fn test_recognize_locale_without_catalog_is_identity() {
        let recognized = translator().recognize("/en/produtos");
        assert_eq!(recognized.locale.as_deref(), Some("en"));
        assert_eq!(recognized.path, "/produtos");
    }

    #[test]
    fn test_on_recognize_attaches_locale() {
        let params = translator()
            .on_recognize("/es/productos/recientes", |path| {
                assert_eq!(path, "/products/latest");
                Ok::<_, String>(RouteParams::from([(
                    "controller".to_string(),
                    "products".to_string(),
                )]))
            })
            .expect("recognized");
        assert_eq!(params.get(LOCALE_PARAM).map(String::as_str), Some("es"));
        assert_eq!(params.get("controller").map(String::as_str), Some("products"));
    }

    #[test]
    fn test_on_recognize_without_prefix_adds_no_locale() {
        let params = translator()
            .on_recognize("/produtos", |_| Ok::<_, String>(RouteParams::new()))
            .expect("recognized");
        assert!(!params.contains_key(LOCALE_PARAM));
    }

    #[test]
    fn test_on_recognize_propagates_error() {
        let result = translator().on_recognize("/es/missing", |path| {
            Err::<RouteParams, _>(format!("no route for {}", path))
        });
        assert_eq!(result.unwrap_err(), "no route for /missing");
    }

    // ==================== Generation Tests ====================

    #[test]
    fn test_generate_explicit_locale() {
        assert_eq!(
            translator().generate("/products/latest", Some("es")),
            "/es/productos/recientes"
        );
    }

    #[test]
    fn test_generate_default_locale_from_fallback() {
        assert_eq!(
            translator().generate("/products/latest", None),
            "/pt-PT/produtos/novidades"
        );
    }

    #[test]
    fn test_generate_uses_active_locale() {
        let path = sync_with_active_locale(Some("es".to_string()), || {
            translator().generate("/products", None)
        });
        assert_eq!(path, "/es/productos");
    }

    #[test]
    fn test_generate_unconfigured_locale_is_untouched() {
        assert_eq!(
            translator().generate("/products/latest", Some("fr")),
            "/products/latest"
        );
    }

    #[test]
    fn test_generate_suppresses_default_prefix() {
        let translator = RouteTranslator::new(
            catalog(),
            LocaleSettings::new(["pt-PT", "es"], "pt-PT").with_include_default_locale_in_path(false),
        );
        assert_eq!(
            translator.generate("/products/latest", Some("pt-PT")),
            "/produtos/novidades"
        );
        assert_eq!(
            translator.generate("/products/latest", Some("es")),
            "/es/productos/recientes"
        );
    }

    #[test]
    fn test_generate_keeps_query_and_fragment() {
        assert_eq!(
            translator().generate("/products/latest?page=2#top", Some("es")),
            "/es/productos/recientes?page=2#top"
        );
        assert_eq!(translator().generate("/?q=1", Some("es")), "/es?q=1");
    }

    #[test]
    fn test_generate_root() {
        assert_eq!(translator().generate("/", Some("es")), "/es");
    }

    #[test]
    fn test_on_generate_removes_locale_param() {
        let path = translator()
            .on_generate(
                RouteParams::from([
                    (LOCALE_PARAM.to_string(), "es".to_string()),
                    ("id".to_string(), "7".to_string()),
                ]),
                |params| {
                    assert!(!params.contains_key(LOCALE_PARAM));
                    Ok::<_, String>(format!("/products/{}", params["id"]))
                },
            )
            .expect("generated");
        assert_eq!(path, "/es/productos/7");
    }

    // ==================== Translation Tests ====================

    #[test]
    fn test_translate_untranslate_round_trip() {
        let translator = translator();
        for path in ["/products", "/products/latest", "/products/other", "/about/latest"] {
            let localized = translator.translate(path, "pt-PT");
            assert_eq!(translator.untranslate(&localized, "pt-PT"), path);
        }
    }

    #[test]
    fn test_empty_catalog_is_identity() {
        let translator = translator();
        assert_eq!(translator.translate("/products/latest", "en"), "/products/latest");
        assert_eq!(translator.untranslate("/products/latest", "en"), "/products/latest");
    }

    #[test]
    fn test_with_catalog_locales() {
        let translator = RouteTranslator::with_catalog_locales(catalog(), "en");
        assert_eq!(translator.gate().settings().locales(), ["en", "es", "pt-PT"]);
    }

    #[test]
    fn test_cache_metrics_and_clear() {
        let translator = translator();
        translator.translate("/products", "es");
        translator.translate("/products", "es");
        assert_eq!(translator.cache_metrics().trees_built, 1);
        assert_eq!(translator.cache_metrics().cache_hits, 1);

        translator.clear_cache();
        translator.translate("/products", "es");
        assert_eq!(translator.cache_metrics().trees_built, 2);
    }
}
