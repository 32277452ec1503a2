use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::app::AppState;

/// GET / - Service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Marketplace API",
            "version": version,
            "description": "Products and comments with owner-only mutation",
            "endpoints": {
                "health": "/health (public)",
                "products": "/api/products[/:id] (public read, owner write)",
                "my_products": "/api/products/my (caller)",
                "comments": "/api/comments/:product_id (caller), /api/comments/:comment_id (owner delete)",
                "users": "/api/users/sync, /api/users/me (caller)",
            }
        }
    }))
}

/// GET /health - Liveness plus a storage ping
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();
    let backend = state.gateway.backend_name();

    match state.gateway.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "storage": backend
                }
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed on {} storage: {}", backend, e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "storage unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "storage": backend
                    }
                })),
            )
        }
    }
}
