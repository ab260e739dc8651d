use serde::Serialize;

use crate::models::visitor::VisitorRecord;

#[derive(Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncrementResponse {
    pub count: i64,
    pub is_new_visitor: bool,
    pub message: &'static str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetResponse {
    pub message: &'static str,
    pub cleared_visitors: u64,
}

/// A visitor as shown in stats. Carries no IP address.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentVisit {
    pub first_visit: i64,
    pub last_visit: i64,
    pub visit_count: i64,
}

impl From<VisitorRecord> for RecentVisit {
    fn from(visitor: VisitorRecord) -> Self {
        Self {
            first_visit: visitor.first_seen,
            last_visit: visitor.last_seen,
            visit_count: visitor.visit_count,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_unique_visitors: u64,
    pub counter_value: i64,
    pub recent_visits: Vec<RecentVisit>,
}
