use axum::Json;
use serde_json::{json, Value};

/// GET /
/// Describes how to use the API.
pub async fn root_info_handler() -> Json<Value> {
    Json(json!({
        "message": "Assignment Helper API",
        "documentation": "Send POST requests to /api with 'question' parameter and optional file attachments",
        "example": "POST /api with multipart/form-data including 'question' field and optional 'file' field",
        "healthCheck": "GET /api/health for API status"
    }))
}

/// GET /api
/// Reminds callers that answering requires a POST.
pub async fn api_info_handler() -> Json<Value> {
    Json(json!({
        "message": "This endpoint requires a POST request",
        "usage": "Send a POST request with 'question' as a parameter and optional file attachments",
        "example": {
            "curl": "curl -X POST 'http://localhost:3000/api/' -H 'Content-Type: multipart/form-data' -F 'question=Your question here' -F 'file=@yourfile.zip'",
            "response": {
                "answer": "The answer to your question"
            }
        }
    }))
}
