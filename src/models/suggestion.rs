use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAME: &str = "Anonymous";
pub const DEFAULT_EMAIL: &str = "Not provided";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Suggestion {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub suggestion: String,
    pub created_at: i64,
}

impl Suggestion {
    /// Builds a record from raw form input: text is trimmed and blank
    /// attribution falls back to the defaults.
    pub fn new(name: Option<String>, email: Option<String>, suggestion: &str) -> Self {
        Self {
            id: None,
            name: or_default(name, DEFAULT_NAME),
            email: or_default(email, DEFAULT_EMAIL),
            suggestion: suggestion.trim().to_string(),
            created_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
