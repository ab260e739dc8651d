use serde::{Deserialize, Serialize};

/// `_id` of the single aggregate counter document.
pub const UNIQUE_VISITORS: &str = "unique_visitors";

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VisitorCounter {
    #[serde(rename = "_id")]
    pub name: String,
    #[serde(default)]
    pub count: i64,
    pub last_updated: i64,
}

impl VisitorCounter {
    pub fn new(count: i64, now: i64) -> Self {
        Self {
            name: UNIQUE_VISITORS.to_string(),
            count,
            last_updated: now,
        }
    }
}
