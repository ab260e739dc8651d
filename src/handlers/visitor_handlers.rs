use actix_web::{HttpRequest, HttpResponse, Result, web};

use crate::db::StoreError;
use crate::errors::ApiError;
use crate::models::visitor::VisitorRecord;
use crate::state::app_state::AppState;
use crate::structs::visitor::{
    CountResponse, IncrementResponse, RecentVisit, ResetResponse, StatsResponse,
};
use crate::utils::client_ip::client_ip;

const RECENT_VISITS_LIMIT: i64 = 10;

/// Get the current unique visitor count
pub async fn get_visitor_count(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let count = app_state
        .run(app_state.store.read_counter())
        .await
        .map_err(|e| ApiError::storage("Error fetching visitor count", e))?;

    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// Record a visit and count the caller if their IP has not been seen before
pub async fn increment_visitor_count(
    app_state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let store = &app_state.store;
    let ip = client_ip(&req);
    let now = chrono::Utc::now().timestamp_millis();

    let existing = app_state
        .run(store.find_visitor(&ip))
        .await
        .map_err(|e| ApiError::storage("Error incrementing visitor count", e))?;

    let is_new_visitor = match existing {
        Some(_) => false,
        None => match app_state
            .run(store.insert_visitor(&VisitorRecord::new(ip.clone(), now)))
            .await
        {
            Ok(()) => true,
            // Another request for the same IP won the insert
            Err(StoreError::DuplicateKey) => false,
            Err(e) => return Err(ApiError::storage("Error incrementing visitor count", e)),
        },
    };

    // Only a confirmed insert moves the aggregate
    let count = if is_new_visitor {
        match app_state.run(store.increment_counter(now)).await {
            Ok(count) => count,
            Err(e) => {
                // Drop the uncounted record so the next request counts this IP
                if let Err(undo) = app_state.run(store.delete_visitor(&ip)).await {
                    log::error!("Failed to roll back uncounted visitor: {}", undo);
                }
                return Err(ApiError::storage("Error incrementing visitor count", e));
            }
        }
    } else {
        let repeat = match app_state.run(store.record_repeat_visit(&ip, now)).await {
            Ok(()) => app_state.run(store.read_counter()).await,
            Err(e) => Err(e),
        };
        repeat.map_err(|e| ApiError::storage("Error incrementing visitor count", e))?
    };

    if is_new_visitor {
        log::info!("New unique visitor, total now {}", count);
    }

    Ok(HttpResponse::Ok().json(IncrementResponse {
        count,
        is_new_visitor,
        message: if is_new_visitor {
            "New visitor counted"
        } else {
            "Welcome back"
        },
    }))
}

/// Diagnostic view of the visitor data. IP addresses are never included.
pub async fn get_visitor_stats(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = &app_state.store;
    let storage_error = |e| ApiError::storage("Error fetching visitor stats", e);

    let total_unique_visitors = app_state
        .run(store.count_visitors())
        .await
        .map_err(storage_error)?;
    let counter_value = app_state
        .run(store.read_counter())
        .await
        .map_err(storage_error)?;
    let recent = app_state
        .run(store.recent_visitors(RECENT_VISITS_LIMIT))
        .await
        .map_err(storage_error)?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        total_unique_visitors,
        counter_value,
        recent_visits: recent.into_iter().map(RecentVisit::from).collect(),
    }))
}

/// Forget every visitor and zero the counter (for testing purposes)
pub async fn reset_visitor_count(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = &app_state.store;
    let storage_error = |e| ApiError::storage("Error resetting visitor count", e);

    // Records go first: a failure part way leaves a counter that a retry zeroes
    let cleared_visitors = app_state
        .run(store.delete_all_visitors())
        .await
        .map_err(storage_error)?;
    app_state
        .run(store.reset_counter(chrono::Utc::now().timestamp_millis()))
        .await
        .map_err(storage_error)?;

    log::warn!("Visitor data reset, {} visitor records cleared", cleared_visitors);

    Ok(HttpResponse::Ok().json(ResetResponse {
        message: "Visitor count reset successfully",
        cleared_visitors,
    }))
}
