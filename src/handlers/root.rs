use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    Json(json!({
        "name": "Metadata Catalog API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "properties": "/properties/ (GET public, POST auth), /properties/id/:id (GET public, PUT/DELETE auth)",
            "ctrl_voc": "/ctrl_voc/ (GET public, POST auth), /ctrl_voc/id/:id (GET public, PUT/DELETE auth)",
            "health": "/health",
        }
    }))
}

/// GET /health - store connectivity
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let checks = async {
        state.properties.ping().await?;
        state.vocabularies.ping().await
    };

    match checks.await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                })),
            )
        }
    }
}
