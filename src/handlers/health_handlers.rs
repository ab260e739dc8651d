use actix_web::{HttpResponse, web};
use chrono::Utc;

use crate::errors::ApiError;
use crate::state::app_state::AppState;

/// Liveness probe. Does not touch the database.
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "Server is running",
        "timestamp": Utc::now(),
    }))
}

pub async fn db_health_check(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    // Perform a simple ping operation to check the database connection
    match state.run(state.store.ping()).await {
        Ok(()) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "database": "connected",
        }))),
        Err(e) => {
            log::error!("Database health check failed: {}", e);
            Err(ApiError::Unavailable("Database connection failed"))
        }
    }
}
