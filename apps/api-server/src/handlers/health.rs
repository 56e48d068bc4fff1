//! Health check endpoint.

use actix_web::{HttpResponse, Responder};
use serde_json::json;

/// Liveness probe. Does not touch the database.
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "service": "quill-api",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
