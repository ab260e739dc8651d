pub mod memory;
pub mod mongodb;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::suggestion::Suggestion;
use crate::models::visitor::VisitorRecord;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("duplicate key")]
    DuplicateKey,

    #[error("storage call timed out after {0:?}")]
    Timeout(Duration),

    #[error("database error: {0}")]
    Database(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the API needs. Implemented over MongoDB for the
/// server and in memory for tests.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    async fn ping(&self) -> StoreResult<()>;

    async fn find_visitor(&self, ip: &str) -> StoreResult<Option<VisitorRecord>>;

    /// Inserts a first-seen visitor. Fails with `DuplicateKey` if the IP is
    /// already recorded.
    async fn insert_visitor(&self, visitor: &VisitorRecord) -> StoreResult<()>;

    /// Removes one visitor record. Returns whether it existed.
    async fn delete_visitor(&self, ip: &str) -> StoreResult<bool>;

    /// Sets `last_seen` and bumps `visit_count` for an existing visitor.
    async fn record_repeat_visit(&self, ip: &str, now: i64) -> StoreResult<()>;

    async fn count_visitors(&self) -> StoreResult<u64>;

    /// Most recently seen visitors first.
    async fn recent_visitors(&self, limit: i64) -> StoreResult<Vec<VisitorRecord>>;

    /// Atomically adds one to the aggregate counter, creating it if absent,
    /// and returns the new value.
    async fn increment_counter(&self, now: i64) -> StoreResult<i64>;

    /// Current aggregate value, 0 if the counter was never created.
    async fn read_counter(&self) -> StoreResult<i64>;

    /// Removes every visitor record and returns how many were removed.
    async fn delete_all_visitors(&self) -> StoreResult<u64>;

    /// Sets the aggregate counter to zero, creating it if absent.
    async fn reset_counter(&self, now: i64) -> StoreResult<()>;

    async fn insert_suggestion(&self, suggestion: Suggestion) -> StoreResult<Suggestion>;

    /// Newest first.
    async fn list_suggestions(&self) -> StoreResult<Vec<Suggestion>>;
}

/// Runs a storage call with an upper bound on how long it may take.
pub async fn bounded<T, F>(limit: Duration, call: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| StoreError::Timeout(limit))?
}
