//! HTTP gateway hosting the tool catalogue.
//!
//! Serves:
//! - `GET  /api/status`     — liveness probe
//! - `GET  /api/health`     — version, uptime, tool/session counts
//! - `GET  /api/tools`      — the tool catalogue
//! - `POST /api/tools/call` — invoke a tool by name
//!
//! When an API token is configured, every `/api` route requires it
//! (Bearer header or `?token=`).

mod auth;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};

use crate::api::ApiClient;
use crate::session::SessionStore;
use crate::tools::ToolRegistry;

/// Shared state injected into axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ToolRegistry>,
    pub api: Arc<ApiClient>,
    pub sessions: SessionStore,
    pub api_token: Option<String>,
}

/// Handle returned by [`start_gateway`].
pub struct Gateway {
    /// Server task handle.
    pub handle: JoinHandle<()>,
    /// The address the server is actually listening on.
    pub addr: SocketAddr,
}

/// Start the gateway HTTP server on `addr`.
pub async fn start_gateway(addr: SocketAddr, state: AppState) -> std::io::Result<Gateway> {
    if state.api_token.is_some() {
        info!("API authentication enabled (LEADLINE_API_TOKEN set)");
    } else {
        warn!("API authentication disabled (LEADLINE_API_TOKEN not set)");
    }

    let _ = handlers::health::STARTUP_TIME.set(std::time::Instant::now());

    let api_router = Router::new()
        .route("/status", get(handlers::health::status_handler))
        .route("/health", get(handlers::health::api_health))
        .route("/tools", get(handlers::tools::api_tools_list))
        .route("/tools/call", post(handlers::tools::api_tools_call))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    let app = Router::new()
        .nest("/api", api_router)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("gateway server error: {e}");
        }
    });

    info!(%bound_addr, "gateway started");

    Ok(Gateway {
        handle,
        addr: bound_addr,
    })
}
