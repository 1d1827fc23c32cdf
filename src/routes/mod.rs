//! Rutas de la API
//!
//! Este módulo arma el router completo con sus capas.

pub mod auth_routes;
pub mod usuario_routes;

use axum::{extract::DefaultBodyLimit, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

pub use auth_routes::create_auth_router;
pub use usuario_routes::create_usuario_router;

pub fn create_app(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.config.max_payload_size);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/usuario", create_usuario_router())
        .nest("/api", create_auth_router())
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "seguridad",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
