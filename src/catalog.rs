//! Translation catalogs.
//!
//! A catalog resolves a locale and a dotted key path (`"url"`,
//! `"url.products"`) to a nested JSON value. Route translation only ever asks
//! for the `url` key.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Source of nested translations per locale.
pub trait Catalog: Send + Sync {
    /// Resolve `key` (dot-separated) for `locale`. `None` when either is absent.
    fn resolve(&self, locale: &str, key: &str) -> Option<Value>;

    /// All locales this catalog has data for, in order.
    fn locales(&self) -> Vec<String>;
}

/// Errors raised while loading a catalog from disk.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON from '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid catalog '{0}': root must be an object")]
    NotAnObject(PathBuf),

    #[error("invalid catalog file name: {0}")]
    InvalidFileName(PathBuf),
}

/// In-memory catalog, keyed by locale.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    locales: BTreeMap<String, Map<String, Value>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the translations for a locale. Non-object values register an
    /// empty locale.
    pub fn with_locale(mut self, locale: impl Into<String>, translations: Value) -> Self {
        let map = match translations {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.locales.insert(locale.into(), map);
        self
    }
}

impl Catalog for MemoryCatalog {
    fn resolve(&self, locale: &str, key: &str) -> Option<Value> {
        lookup(self.locales.get(locale)?, key)
    }

    fn locales(&self) -> Vec<String> {
        self.locales.keys().cloned().collect()
    }
}

/// Catalog loaded from a directory of `<locale>.json` files.
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    inner: MemoryCatalog,
}

impl JsonCatalog {
    /// Load every `*.json` file in `dir`; the file stem names the locale
    /// (`pt-PT.json` -> `pt-PT`). Other files are ignored.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        if !dir.is_dir() {
            return Err(CatalogError::DirectoryNotFound(dir.to_path_buf()));
        }

        let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut inner = MemoryCatalog::new();
        for entry in entries {
            let path = entry
                .map_err(|source| CatalogError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();

            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let locale = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .ok_or_else(|| CatalogError::InvalidFileName(path.clone()))?
                .to_string();

            let translations = load_file(&path)?;
            debug!("Loaded catalog for locale '{}' from {}", locale, path.display());
            inner = inner.with_locale(locale, Value::Object(translations));
        }

        info!(
            "Loaded {} catalog locale(s) from {}",
            inner.locales.len(),
            dir.display()
        );
        Ok(Self { inner })
    }
}

impl Catalog for JsonCatalog {
    fn resolve(&self, locale: &str, key: &str) -> Option<Value> {
        self.inner.resolve(locale, key)
    }

    fn locales(&self) -> Vec<String> {
        self.inner.locales()
    }
}

fn load_file(path: &Path) -> Result<Map<String, Value>, CatalogError> {
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let json: Value = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    match json {
        Value::Object(map) => Ok(map),
        _ => Err(CatalogError::NotAnObject(path.to_path_buf())),
    }
}

fn lookup(root: &Map<String, Value>, key: &str) -> Option<Value> {
    let mut parts = key.split('.');
    let mut value = root.get(parts.next()?)?;
    for part in parts {
        value = value.as_object()?.get(part)?;
    }
    Some(value.clone())
}
