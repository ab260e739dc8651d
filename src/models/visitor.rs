use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VisitorRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub ip: String,       // Unique per visitor (indexed)
    pub first_seen: i64,  // Timestamp in milliseconds
    pub last_seen: i64,   // Timestamp in milliseconds
    pub visit_count: i64, // Total requests seen from this IP
}

impl VisitorRecord {
    pub fn new(ip: String, now: i64) -> Self {
        Self {
            id: None,
            ip,
            first_seen: now,
            last_seen: now,
            visit_count: 1,
        }
    }

    pub fn record_visit(&mut self, now: i64) {
        self.last_seen = now;
        self.visit_count += 1;
    }
}
