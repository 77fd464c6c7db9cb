//! HTTP adapter: localizes incoming request paths before routing.
//!
//! The middleware runs in front of the route table, so handlers are written
//! against canonical paths only (`/products/latest`) while clients may use
//! any localized form (`/pt-PT/produtos/novidades`). The path is
//! percent-decoded before recognition and the canonical path re-encoded, so
//! non-ASCII segments round-trip through links built by `generate`.

use crate::i18n::with_active_locale;
use crate::routing::RouteTranslator;
use anyhow::{Context, Result};
use axum::extract::{Request, State};
use axum::http::uri::{PathAndQuery, Uri};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Extension, Json, Router};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

/// Bytes escaped when writing a decoded path back into a URI.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Shared state for the middleware and handlers.
#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<RouteTranslator>,
}

impl AppState {
    pub fn new(translator: RouteTranslator) -> Self {
        Self {
            translator: Arc::new(translator),
        }
    }
}

/// Locale taken from the request path prefix, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLocale(pub Option<String>);

/// Rewrite the request URI to its canonical path and record the locale.
///
/// The rest of the chain runs with the request's locale active, so handlers
/// can generate links without passing a locale.
pub async fn localize_request(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let path = decode_path(request.uri().path());
    let recognized = state.translator.recognize(&path);

    if recognized.path != path {
        match canonical_uri(request.uri(), &recognized.path) {
            Ok(uri) => {
                debug!("Rewrote {} to {}", request.uri(), uri);
                *request.uri_mut() = uri;
            }
            Err(e) => warn!("Keeping original URI {}: {:#}", request.uri(), e),
        }
    }

    request
        .extensions_mut()
        .insert(RequestLocale(recognized.locale.clone()));
    with_active_locale(recognized.locale, next.run(request)).await
}

/// Percent-decode a request path. Paths that do not decode to UTF-8 are kept
/// as they arrived.
fn decode_path(raw: &str) -> String {
    match percent_decode_str(raw).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn canonical_uri(uri: &Uri, path: &str) -> Result<Uri> {
    let path = utf8_percent_encode(path, PATH_SEGMENT);
    let path_and_query = match uri.query() {
        Some(query) => format!("{}?{}", path, query),
        None => path.to_string(),
    };

    let mut parts = uri.clone().into_parts();
    parts.path_and_query =
        Some(PathAndQuery::try_from(path_and_query).context("Invalid canonical path")?);
    Uri::from_parts(parts).context("Failed to rebuild URI")
}

/// Build the demo application.
///
/// Routes live in a fallback service so the localizing middleware sees the
/// request before any route is matched.
pub fn app(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(home))
        .route("/products", get(products))
        .route("/products/latest", get(latest_products))
        .route("/metrics", get(metrics))
        .with_state(state.clone());

    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(state, localize_request))
        .layer(TraceLayer::new_for_http())
}

/// Serve the demo application on `port`.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Listening on {}", addr);
    axum::serve(listener, app(state))
        .await
        .context("Server error")
}

/// JSON body returned by the demo pages.
#[derive(Debug, Serialize)]
pub struct PageResponse {
    /// Canonical name of the page
    pub page: &'static str,

    /// Locale from the request prefix
    pub locale: Option<String>,

    /// Localized links to the other pages, by canonical path
    pub links: BTreeMap<String, String>,
}

fn page(state: &AppState, name: &'static str, locale: RequestLocale) -> Json<PageResponse> {
    let links = ["/", "/products", "/products/latest"]
        .into_iter()
        .map(|path| {
            let localized = state.translator.generate(path, None);
            (path.to_string(), localized)
        })
        .collect();

    Json(PageResponse {
        page: name,
        locale: locale.0,
        links,
    })
}

async fn home(
    State(state): State<AppState>,
    Extension(locale): Extension<RequestLocale>,
) -> Json<PageResponse> {
    page(&state, "home", locale)
}

async fn products(
    State(state): State<AppState>,
    Extension(locale): Extension<RequestLocale>,
) -> Json<PageResponse> {
    page(&state, "products", locale)
}

async fn latest_products(
    State(state): State<AppState>,
    Extension(locale): Extension<RequestLocale>,
) -> Json<PageResponse> {
    page(&state, "latest_products", locale)
}

async fn metrics(State(state): State<AppState>) -> Json<crate::i18n::MetricsReport> {
    Json(state.translator.cache_metrics())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_uri_keeps_query() {
        let uri: Uri = "/es/productos?page=2".parse().expect("uri");
        let rewritten = canonical_uri(&uri, "/products").expect("rewrite");
        assert_eq!(rewritten.path(), "/products");
        assert_eq!(rewritten.query(), Some("page=2"));
    }

    #[test]
    fn test_canonical_uri_absolute_form() {
        let uri: Uri = "http://localhost:8080/es/productos".parse().expect("uri");
        let rewritten = canonical_uri(&uri, "/products").expect("rewrite");
        assert_eq!(rewritten.to_string(), "http://localhost:8080/products");
    }

    #[test]
    fn test_canonical_uri_encodes_path() {
        let uri: Uri = "/pt-PT/produ%C3%A7%C3%B5es?q=a%20b".parse().expect("uri");
        let rewritten = canonical_uri(&uri, "/produções/50% off").expect("rewrite");
        assert_eq!(rewritten.path(), "/produ%C3%A7%C3%B5es/50%25%20off");
        assert_eq!(rewritten.query(), Some("q=a%20b"));
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/pt-PT/produ%C3%A7%C3%B5es"), "/pt-PT/produções");
        assert_eq!(decode_path("/plain/path"), "/plain/path");
        assert_eq!(decode_path("/bad%FF"), "/bad%FF");
    }
}
