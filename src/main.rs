use anyhow::{Context, Result};
use localized_routes::catalog::{Catalog, JsonCatalog};
use localized_routes::config::Config;
use localized_routes::i18n::LocaleSettings;
use localized_routes::routing::RouteTranslator;
use localized_routes::server::{self, AppState};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when absent)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("localized_routes=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;

    let catalog: Arc<dyn Catalog> = Arc::new(
        JsonCatalog::load_dir(Path::new(&config.catalog_dir))
            .with_context(|| format!("Failed to load catalog from {}", config.catalog_dir))?,
    );

    let locales = if config.locales.is_empty() {
        catalog.locales()
    } else {
        config.locales.clone()
    };
    info!(
        "Serving locales {:?} (default: {})",
        locales, config.default_locale
    );

    let settings = LocaleSettings::new(locales, config.default_locale.as_str())
        .with_include_default_locale_in_path(config.include_default_locale_in_path);
    let translator = RouteTranslator::new(catalog, settings);

    server::serve(AppState::new(translator), config.port).await
}
