//! Locale prefix handling: the leading `/<locale>` path segment.
//!
//! The gate knows the configured locales and the default locale. It strips
//! the prefix from incoming paths, resolves the locale for outgoing links and
//! decides whether generated links carry the prefix.

use super::active::active_locale;
use crate::catalog::Catalog;
use regex::Regex;
use tracing::warn;

/// Locale configuration exposed to the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleSettings {
    /// Valid locale identifiers, in order, without duplicates
    locales: Vec<String>,

    /// Locale used when a path carries no prefix
    default_locale: String,

    /// Whether generated paths in the default locale carry its prefix
    include_default_locale_in_path: bool,
}

impl LocaleSettings {
    /// Create settings for the given locales. Duplicates are dropped, keeping
    /// the first occurrence.
    pub fn new<I, S>(locales: I, default_locale: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for locale in locales {
            let locale = locale.into();
            if !unique.contains(&locale) {
                unique.push(locale);
            }
        }

        Self {
            locales: unique,
            default_locale: default_locale.into(),
            include_default_locale_in_path: true,
        }
    }

    /// Settings covering every locale the catalog knows.
    pub fn from_catalog(catalog: &dyn Catalog, default_locale: impl Into<String>) -> Self {
        Self::new(catalog.locales(), default_locale)
    }

    pub fn with_include_default_locale_in_path(mut self, include: bool) -> Self {
        self.include_default_locale_in_path = include;
        self
    }

    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn include_default_locale_in_path(&self) -> bool {
        self.include_default_locale_in_path
    }
}

/// Extracts, validates and prepends locale prefixes.
#[derive(Debug, Clone)]
pub struct LocaleGate {
    settings: LocaleSettings,

    /// `^/(l1|l2|...)(?:/|$)`, absent when no locales are configured
    prefix_regex: Option<Regex>,
}

impl LocaleGate {
    pub fn new(settings: LocaleSettings) -> Self {
        if !settings.locales.contains(&settings.default_locale) {
            warn!(
                "Default locale '{}' is not among the configured locales {:?}",
                settings.default_locale, settings.locales
            );
        }

        Self {
            prefix_regex: build_prefix_regex(&settings.locales),
            settings,
        }
    }

    pub fn settings(&self) -> &LocaleSettings {
        &self.settings
    }

    pub fn default_locale(&self) -> &str {
        &self.settings.default_locale
    }

    /// Whether `locale` is one of the configured locales.
    pub fn is_configured(&self, locale: &str) -> bool {
        self.settings.locales.iter().any(|l| l == locale)
    }

    /// Split a leading locale segment off `path`.
    ///
    /// Returns the locale and the remaining path (`/` when nothing follows the
    /// locale), or `None` and the unchanged path.
    pub fn extract(&self, path: &str) -> (Option<String>, String) {
        let Some(captures) = self.prefix_regex.as_ref().and_then(|re| re.captures(path)) else {
            return (None, path.to_string());
        };
        let Some(locale) = captures.get(1) else {
            return (None, path.to_string());
        };

        let rest = &path[locale.end()..];
        let rest = if rest.is_empty() { "/" } else { rest };
        (Some(locale.as_str().to_string()), rest.to_string())
    }

    /// Resolve the locale for link generation.
    ///
    /// An explicit locale wins, then the task's active locale, then the
    /// default locale. Locales outside the configured set resolve to `None`.
    pub fn resolve(&self, requested: Option<&str>) -> Option<String> {
        let locale = match requested {
            Some(locale) => locale.to_string(),
            None => active_locale().unwrap_or_else(|| self.settings.default_locale.clone()),
        };
        self.is_configured(&locale).then_some(locale)
    }

    /// Whether generated paths for `locale` carry the locale prefix.
    pub fn should_prepend(&self, locale: &str) -> bool {
        self.settings.include_default_locale_in_path || locale != self.settings.default_locale
    }

    /// Put `locale` in front of `path`.
    pub fn prepend(path: &str, locale: &str) -> String {
        if path.is_empty() || path == "/" {
            format!("/{}", locale)
        } else {
            format!("/{}{}", locale, path)
        }
    }
}

fn build_prefix_regex(locales: &[String]) -> Option<Regex> {
    if locales.is_empty() {
        return None;
    }

    let alternation = locales
        .iter()
        .map(|locale| regex::escape(locale))
        .collect::<Vec<_>>()
        .join("|");

    match Regex::new(&format!("^/({})(?:/|$)", alternation)) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Failed to compile locale prefix pattern: {}", e);
            None
        }
    }
}
