use actix_web::{HttpResponse, Result, web};
use validator::Validate;

use crate::errors::ApiError;
use crate::models::suggestion::Suggestion;
use crate::state::app_state::AppState;
use crate::structs::suggestion::{
    SubmitResponse, SuggestionListResponse, SuggestionRequest, SuggestionResponse, first_message,
};

/// Store a visitor's suggestion
pub async fn create_suggestion(
    app_state: web::Data<AppState>,
    web::Json(req): web::Json<SuggestionRequest>,
) -> Result<HttpResponse, ApiError> {
    if let Err(errors) = req.validate() {
        return Err(ApiError::Validation(first_message(&errors)));
    }

    let suggestion = Suggestion::new(req.name, req.email, &req.suggestion);
    let stored = app_state
        .run(app_state.store.insert_suggestion(suggestion))
        .await
        .map_err(|e| ApiError::storage("Error saving suggestion", e))?;

    log::info!("Suggestion received from {}", stored.name);

    Ok(HttpResponse::Created().json(SubmitResponse {
        success: true,
        message: "Suggestion submitted successfully",
        data: SuggestionResponse::from(stored),
    }))
}

/// List every suggestion, newest first
pub async fn get_all_suggestions(app_state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let suggestions = app_state
        .run(app_state.store.list_suggestions())
        .await
        .map_err(|e| ApiError::storage("Error fetching suggestions", e))?;

    let suggestions: Vec<SuggestionResponse> = suggestions
        .into_iter()
        .map(SuggestionResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(SuggestionListResponse {
        count: suggestions.len(),
        suggestions,
    }))
}
