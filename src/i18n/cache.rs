//! Lazily populated translation tree cache.
//!
//! Trees are built from the catalog the first time a locale is used and kept
//! for the life of the cache. Catalogs are assumed not to change while the
//! cache is alive; call [`TreeCache::clear`] after reloading one.

use super::metrics::CacheMetrics;
use super::tree::TranslationTree;
use crate::catalog::Catalog;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

/// Catalog key holding URL translations.
pub const URL_KEY: &str = "url";

type TreeMap = RwLock<HashMap<String, Arc<TranslationTree>>>;

/// Forward and reverse translation trees per locale.
pub struct TreeCache {
    catalog: Arc<dyn Catalog>,
    forward: TreeMap,
    reverse: TreeMap,
    metrics: CacheMetrics,
}

impl TreeCache {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self {
            catalog,
            forward: RwLock::new(HashMap::new()),
            reverse: RwLock::new(HashMap::new()),
            metrics: CacheMetrics::new(),
        }
    }

    /// Tree mapping canonical segments to `locale`'s segments.
    pub fn forward(&self, locale: &str) -> Arc<TranslationTree> {
        self.get_or_build(&self.forward, locale, || {
            self.catalog
                .resolve(locale, URL_KEY)
                .map(|value| TranslationTree::from_value(&value))
                .unwrap_or_default()
        })
    }

    /// Tree mapping `locale`'s segments back to canonical segments.
    pub fn reverse(&self, locale: &str) -> Arc<TranslationTree> {
        self.get_or_build(&self.reverse, locale, || self.forward(locale).invert())
    }

    /// Drop every cached tree.
    pub fn clear(&self) {
        self.forward
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.reverse
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    fn get_or_build(
        &self,
        map: &TreeMap,
        locale: &str,
        build: impl FnOnce() -> TranslationTree,
    ) -> Arc<TranslationTree> {
        if let Some(tree) = map
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(locale)
        {
            self.metrics.record_hit();
            return Arc::clone(tree);
        }
        self.metrics.record_miss();

        // Built outside the lock; a concurrent build of the same locale
        // produces an equal tree and the first insert wins.
        let tree = Arc::new(build());
        let mut guard = map.write().unwrap_or_else(PoisonError::into_inner);
        let entry = guard.entry(locale.to_string()).or_insert_with(|| {
            self.metrics.record_build();
            debug!("Built translation tree for locale '{}'", locale);
            tree
        });
        Arc::clone(entry)
    }
}
