//! Transport and concurrency layer for the multi-table Texas Hold'em
//! server: one actor per table, a registry keyed by opaque table id, a
//! drop-oldest fan-out for push snapshots, and the axum HTTP/WS control
//! surface in front of them. The rules themselves live in `holdem_engine`.

pub mod actor;
pub mod config;
pub mod error;
pub mod fanout;
pub mod http;
pub mod registry;
pub mod timeout;
pub mod ws;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use registry::Registry;

/// Shared state handed to every axum handler.
pub struct AppState {
    pub registry: Registry,
    pub config: ServerConfig,
}

/// Assembles the full router: the REST control surface plus the WS push
/// stream, both over the same `Registry`.
pub fn app(registry: Registry, config: ServerConfig) -> Router {
    let state = Arc::new(AppState { registry, config });
    Router::new()
        .merge(http::routes())
        .merge(ws::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
