//! HTTP surface for the notepad service.
//!
//! # Responsibility
//! - Route the notes REST API and the single-page UI.
//! - Host one handler set over either connection style (`Hosting`).
//!
//! # Invariants
//! - Every failure leaves the handler as a JSON error body.
//! - Handler panics become `500 {"error": "Something went wrong!"}`.

pub mod config;
pub mod error;
pub mod handlers;
pub mod hosting;

pub use config::{AllowedOrigins, ConfigError, ServerConfig};
pub use error::{ApiError, NoteOperation};
pub use hosting::{Hosting, NoteStoreHandle, StoreCallError};

use axum::http::{header, Method};
use axum::routing::get;
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: NoteStoreHandle,
}

impl AppState {
    pub fn new(store: NoteStoreHandle) -> Self {
        Self { store }
    }
}

/// Builds the application router with CORS and panic handling.
pub fn build_router(state: AppState, allowed_origins: &AllowedOrigins) -> Router {
    Router::new()
        .route("/", get(handlers::api_status))
        .route("/api", get(handlers::api_status))
        .route("/app", get(handlers::index_page))
        .route(
            "/api/notes",
            get(handlers::list_notes).post(handlers::create_note),
        )
        .route(
            "/api/notes/:id",
            get(handlers::get_note)
                .put(handlers::update_note)
                .delete(handlers::delete_note),
        )
        .layer(CatchPanicLayer::custom(error::panic_response))
        .layer(cors_layer(allowed_origins))
        .with_state(state)
}

fn cors_layer(allowed_origins: &AllowedOrigins) -> CorsLayer {
    let origin = match allowed_origins {
        AllowedOrigins::Any => AllowOrigin::from(Any),
        AllowedOrigins::List(origins) => AllowOrigin::list(origins.iter().cloned()),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// Opens the store for the configured hosting style and serves until the
/// listener fails.
pub async fn serve(config: &ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = NoteStoreHandle::open(config.hosting, &config.db_path)?;
    let app = build_router(AppState::new(store), &config.allowed_origins);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=api status=ok addr={} hosting={} db_path={}",
        listener.local_addr()?,
        config.hosting.as_str(),
        config.db_path.display()
    );
    axum::serve(listener, app).await?;
    Ok(())
}
