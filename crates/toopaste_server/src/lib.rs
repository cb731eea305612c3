//! HTTP server wiring for Toopaste (routes, handlers, and shared state).

/// Webhook announcer for new pastes.
pub mod announce;
/// Admin basic auth.
pub mod auth;
/// HTTP error mapping for handlers.
pub mod error;
/// HTTP handlers for paste and metadata endpoints.
pub mod handlers;
/// Background removal of expired pastes.
pub mod sweeper;

pub use announce::WebhookAnnouncer;
pub use toopaste_core::{
    config, db, models, AppError, Config, Database, PasteStore, DEFAULT_PORT,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use toopaste_core::announce::{Announcer, NoopAnnouncer};
use toopaste_core::delivery::DeliveryResolver;
use toopaste_core::registry::LanguageRegistry;
use toopaste_core::render::{Renderer, SyntectRenderer};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'; base-uri 'self'; form-action 'self'";

/// Shared state passed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PasteStore>,
    pub config: Arc<Config>,
    pub delivery: DeliveryResolver,
    pub announcer: Arc<dyn Announcer>,
}

impl AppState {
    /// Construct shared application state with syntect rendering and the
    /// announcer selected by `config.announce_url`.
    pub fn new(config: Config, db: Database) -> Self {
        let announcer = announcer_for_config(&config);
        Self::with_announcer(config, db, announcer)
    }

    /// Construct shared application state with a caller-provided announcer.
    pub fn with_announcer(config: Config, db: Database, announcer: Arc<dyn Announcer>) -> Self {
        let renderer = SyntectRenderer::load_defaults();
        let registry = renderer.registry();
        Self::from_parts(config, db, Arc::new(renderer), registry, announcer)
    }

    /// Construct shared application state from explicit collaborators.
    pub fn from_parts(
        config: Config,
        db: Database,
        renderer: Arc<dyn Renderer>,
        registry: LanguageRegistry,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        let registry = Arc::new(registry);
        let delivery =
            DeliveryResolver::new(registry.clone(), renderer, config.default_theme.clone());
        Self {
            store: Arc::new(PasteStore::new(db, registry)),
            config: Arc::new(config),
            delivery,
            announcer,
        }
    }
}

/// Pick the webhook announcer when configured, otherwise a no-op.
pub fn announcer_for_config(config: &Config) -> Arc<dyn Announcer> {
    match config.announce_url.as_deref() {
        Some(url) => match WebhookAnnouncer::new(url) {
            Ok(announcer) => {
                tracing::info!("Announcing new pastes to {}", url);
                Arc::new(announcer)
            }
            Err(err) => {
                tracing::error!("Announcements disabled: webhook client failed: {}", err);
                Arc::new(NoopAnnouncer)
            }
        },
        None => Arc::new(NoopAnnouncer),
    }
}

/// Create the application router with all routes and middleware.
///
/// # Panics
/// Panics if static header values fail to parse (should not happen).
pub fn create_app(state: AppState, allow_public_access: bool) -> Router {
    let cors_port = state.config.port;
    create_app_with_cors_port(state, allow_public_access, cors_port)
}

/// Resolve the listener address from env var overrides and security policy.
///
/// # Returns
/// A validated socket address that enforces loopback when public access is disabled.
pub fn resolve_bind_address(config: &Config, allow_public_access: bool) -> SocketAddr {
    let default_bind = SocketAddr::from(([127, 0, 0, 1], config.port));
    let requested = match std::env::var("BIND") {
        Ok(value) => match value.trim().parse::<SocketAddr>() {
            Ok(addr) => addr,
            Err(err) => {
                tracing::warn!(
                    "Invalid BIND='{}': {}. Falling back to {}",
                    value,
                    err,
                    default_bind
                );
                default_bind
            }
        },
        Err(_) => default_bind,
    };

    if allow_public_access || requested.ip().is_loopback() {
        return requested;
    }

    tracing::warn!(
        "Non-loopback bind {} requested without ALLOW_PUBLIC_ACCESS; forcing 127.0.0.1",
        requested
    );
    SocketAddr::from(([127, 0, 0, 1], requested.port()))
}

fn create_app_with_cors_port(state: AppState, allow_public_access: bool, cors_port: u16) -> Router {
    let methods = [Method::GET, Method::POST, Method::DELETE];
    let cors = if allow_public_access {
        CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(tower_http::cors::Any)
    } else {
        CorsLayer::new()
            .allow_origin([
                format!("http://localhost:{}", cors_port).parse().unwrap(),
                format!("http://127.0.0.1:{}", cors_port).parse().unwrap(),
            ])
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
    };

    let body_limit = state.config.max_body_size;

    Router::new()
        .route(
            "/",
            get(handlers::meta::index).post(handlers::paste::create_paste_form),
        )
        // API routes
        .route("/api/paste", post(handlers::paste::create_paste))
        .route("/api/paste/:id", get(handlers::paste::get_paste))
        .route("/api/pastes", get(handlers::paste::list_pastes))
        .route("/api/languages", get(handlers::meta::list_languages))
        .route("/api/themes", get(handlers::meta::list_themes))
        // Paste delivery
        .route("/raw/:id", get(handlers::paste::raw_paste))
        .route("/download/:id", get(handlers::paste::download_paste))
        .route(
            "/:id",
            get(handlers::paste::show_paste).delete(handlers::paste::delete_paste),
        )
        .with_state(state)
        .layer(
            tower::ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors)
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_SECURITY_POLICY,
                    HeaderValue::from_static(CONTENT_SECURITY_POLICY),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_FRAME_OPTIONS,
                    HeaderValue::from_static("DENY"),
                )),
        )
}

fn listener_cors_port(listener: &tokio::net::TcpListener, fallback_port: u16) -> u16 {
    listener
        .local_addr()
        .map(|addr| addr.port())
        .unwrap_or(fallback_port)
}

/// Run the Axum server with graceful shutdown support.
///
/// # Errors
/// Returns any I/O error produced by `axum::serve`.
pub async fn serve_router(
    listener: tokio::net::TcpListener,
    state: AppState,
    allow_public_access: bool,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<(), std::io::Error> {
    let cors_port = listener_cors_port(&listener, state.config.port);
    let app = create_app_with_cors_port(state, allow_public_access, cors_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
