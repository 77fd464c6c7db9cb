use anyhow::{bail, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    // Catalog
    pub catalog_dir: String,

    // Locales (empty means every locale in the catalog)
    pub locales: Vec<String>,
    pub default_locale: String,
    pub include_default_locale_in_path: bool,

    // Server
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Catalog
            catalog_dir: std::env::var("CATALOG_DIR").unwrap_or_else(|_| "locales".to_string()),

            // Locales
            locales: std::env::var("LOCALES")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            default_locale: std::env::var("DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
            include_default_locale_in_path: match std::env::var("INCLUDE_DEFAULT_LOCALE_IN_PATH") {
                Ok(v) => parse_bool(&v).context("Invalid INCLUDE_DEFAULT_LOCALE_IN_PATH")?,
                Err(_) => true,
            },

            // Server
            port: match std::env::var("PORT") {
                Ok(v) => v.trim().parse().context("Invalid PORT")?,
                Err(_) => 8080,
            },
        })
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}
