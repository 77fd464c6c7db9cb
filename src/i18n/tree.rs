//! Translation trees: nested path-segment translations for one locale.
//!
//! A catalog describes URL translations as nested objects where the reserved
//! `_` key holds the translated name of the enclosing segment:
//!
//! ```json
//! { "products": { "_": "produtos", "latest": { "_": "novidades" } } }
//! ```
//!
//! Here `/products/latest` localizes to `/produtos/novidades`. The `_`
//! convention only exists at the catalog boundary; inside the crate it becomes
//! `TranslationTree::own_name`.

use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Catalog key holding a node's own translated name.
pub const OWN_NAME_KEY: &str = "_";

/// One level of a translation tree.
///
/// The same type serves both directions: a forward tree is keyed by canonical
/// segments and names localized segments, a reverse tree (see
/// [`TranslationTree::invert`]) is keyed by localized segments and names
/// canonical ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationTree {
    /// Translated name of this node itself (the catalog's `_` entry)
    own_name: Option<String>,

    /// Child segments in key order
    children: BTreeMap<String, TranslationTree>,
}

impl TranslationTree {
    /// Create an empty tree. Matching against it is the identity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from the catalog's nested `url` mapping.
    ///
    /// Non-object input yields an empty tree. Scalar `_` values are
    /// stringified; scalar values under any other key produce a child without
    /// an own name, which passes through unchanged in both directions.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::new();
        };

        let mut tree = Self::new();
        for (key, child) in map {
            if key == OWN_NAME_KEY {
                tree.own_name = scalar_to_string(child);
                continue;
            }
            let node = match child {
                Value::Object(_) => Self::from_value(child),
                Value::String(_) | Value::Number(_) | Value::Bool(_) => Self::new(),
                Value::Null | Value::Array(_) => continue,
            };
            tree.children.insert(key.clone(), node);
        }
        tree
    }

    /// Set this node's own translated name.
    pub fn with_own_name(mut self, name: impl Into<String>) -> Self {
        self.own_name = Some(name.into());
        self
    }

    /// Add (or replace) a child segment.
    pub fn with_child(mut self, key: impl Into<String>, child: TranslationTree) -> Self {
        self.children.insert(key.into(), child);
        self
    }

    /// This node's own translated name, if any.
    pub fn own_name(&self) -> Option<&str> {
        self.own_name.as_deref()
    }

    /// Look up a direct child by segment.
    pub fn child(&self, key: &str) -> Option<&TranslationTree> {
        self.children.get(key)
    }

    /// Whether the tree translates nothing at all.
    pub fn is_empty(&self) -> bool {
        self.own_name.is_none() && self.children.is_empty()
    }

    /// Build the reverse tree (localized segment -> canonical segment).
    ///
    /// Children without an own name are skipped: they have no localized form
    /// to be recognized by. When two sibling keys share a localized name, the
    /// later key in key order wins and the collision is logged.
    pub fn invert(&self) -> TranslationTree {
        let mut reverse = TranslationTree::new();
        for (canonical, child) in &self.children {
            let Some(localized) = child.own_name() else {
                continue;
            };

            let inverted = child.invert().with_own_name(canonical.clone());
            if let Some(previous) = reverse.children.insert(localized.to_string(), inverted) {
                warn!(
                    "Segments '{}' and '{}' both translate to '{}'; keeping '{}'",
                    previous.own_name().unwrap_or_default(),
                    canonical,
                    localized,
                    canonical
                );
            }
        }
        reverse
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
