use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::services::UserService;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    /// "up" ou "down", conforme o ping no MongoDB
    pub store: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service and store are healthy", body = HealthResponse),
        (status = 503, description = "Store unreachable", body = HealthResponse)
    )
)]
pub async fn health_check(service: web::Data<UserService>) -> impl Responder {
    let store_up = match service.check_store().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("⚠️  Health check: {}", e);
            false
        }
    };

    let response = HealthResponse {
        status: if store_up { "healthy" } else { "degraded" }.to_string(),
        service: "users-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        store: if store_up { "up" } else { "down" }.to_string(),
    };

    if store_up {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
