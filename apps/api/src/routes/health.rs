use axum::Json;
use serde_json::{json, Value};

/// GET /api/health
/// Liveness check with a fixed payload.
pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
