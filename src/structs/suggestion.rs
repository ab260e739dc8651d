use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::suggestion::Suggestion;

#[derive(Deserialize, Validate)]
pub struct SuggestionRequest {
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 254, message = "Email must be at most 254 characters"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(
        custom(function = "not_blank"),
        length(max = 5000, message = "Suggestion must be at most 5000 characters")
    )]
    pub suggestion: String,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(
            ValidationError::new("blank").with_message("Suggestion text is required".into()),
        );
    }
    Ok(())
}

/// First human-readable message out of a validation failure.
pub fn first_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    // Report the suggestion text before attribution fields
    fields.sort_by_key(|(field, _)| *field != "suggestion");

    fields
        .iter()
        .flat_map(|(_, errs)| errs.iter())
        .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid suggestion".to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub suggestion: String,
    pub created_at: i64,
}

impl From<Suggestion> for SuggestionResponse {
    fn from(suggestion: Suggestion) -> Self {
        Self {
            id: suggestion.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: suggestion.name,
            email: suggestion.email,
            suggestion: suggestion.suggestion,
            created_at: suggestion.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: SuggestionResponse,
}

#[derive(Serialize)]
pub struct SuggestionListResponse {
    pub count: usize,
    pub suggestions: Vec<SuggestionResponse>,
}
