use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{AllowedOrigins, Config, StoreBackend};
use crate::db::memory::MemoryStore;
use crate::db::{Store, StoreError, StoreResult};
use crate::models::suggestion::Suggestion;
use crate::models::visitor::VisitorRecord;
use crate::state::app_state::AppState;

/// Builds the full route table around the given `AppState`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .configure($crate::routes::init_routes),
        )
        .await
    };
}

pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 5000,
        store_backend: StoreBackend::Memory,
        mongodb_uri: "mongodb://localhost:27017/portfolio-test".to_string(),
        mongodb_db: None,
        api_url: "http://localhost:5000/api".to_string(),
        allowed_origins: AllowedOrigins::Any,
        admin_token: None,
        storage_timeout: Duration::from_secs(2),
    }
}

pub fn test_state(store: Arc<dyn Store>) -> AppState {
    AppState::new(store, test_config())
}

pub fn test_state_with_admin_token(store: Arc<dyn Store>, token: &str) -> AppState {
    let mut config = test_config();
    config.admin_token = Some(token.to_string());
    AppState::new(store, config)
}

/// A store whose every call fails, as if the database were unreachable.
pub struct FailingStore;

fn unavailable<T>() -> StoreResult<T> {
    Err(StoreError::Database("connection refused".to_string()))
}

#[async_trait]
impl Store for FailingStore {
    async fn ping(&self) -> StoreResult<()> {
        unavailable()
    }

    async fn find_visitor(&self, _ip: &str) -> StoreResult<Option<VisitorRecord>> {
        unavailable()
    }

    async fn insert_visitor(&self, _visitor: &VisitorRecord) -> StoreResult<()> {
        unavailable()
    }

    async fn delete_visitor(&self, _ip: &str) -> StoreResult<bool> {
        unavailable()
    }

    async fn record_repeat_visit(&self, _ip: &str, _now: i64) -> StoreResult<()> {
        unavailable()
    }

    async fn count_visitors(&self) -> StoreResult<u64> {
        unavailable()
    }

    async fn recent_visitors(&self, _limit: i64) -> StoreResult<Vec<VisitorRecord>> {
        unavailable()
    }

    async fn increment_counter(&self, _now: i64) -> StoreResult<i64> {
        unavailable()
    }

    async fn read_counter(&self) -> StoreResult<i64> {
        unavailable()
    }

    async fn delete_all_visitors(&self) -> StoreResult<u64> {
        unavailable()
    }

    async fn reset_counter(&self, _now: i64) -> StoreResult<()> {
        unavailable()
    }

    async fn insert_suggestion(&self, _suggestion: Suggestion) -> StoreResult<Suggestion> {
        unavailable()
    }

    async fn list_suggestions(&self) -> StoreResult<Vec<Suggestion>> {
        unavailable()
    }
}

/// Memory store whose visitor lookups always miss, so every request for a
/// known IP goes on to race the unique constraint.
#[derive(Default)]
pub struct StaleReadStore {
    inner: MemoryStore,
}

#[async_trait]
impl Store for StaleReadStore {
    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }

    async fn find_visitor(&self, _ip: &str) -> StoreResult<Option<VisitorRecord>> {
        tokio::task::yield_now().await;
        Ok(None)
    }

    async fn insert_visitor(&self, visitor: &VisitorRecord) -> StoreResult<()> {
        self.inner.insert_visitor(visitor).await
    }

    async fn delete_visitor(&self, ip: &str) -> StoreResult<bool> {
        self.inner.delete_visitor(ip).await
    }

    async fn record_repeat_visit(&self, ip: &str, now: i64) -> StoreResult<()> {
        self.inner.record_repeat_visit(ip, now).await
    }

    async fn count_visitors(&self) -> StoreResult<u64> {
        self.inner.count_visitors().await
    }

    async fn recent_visitors(&self, limit: i64) -> StoreResult<Vec<VisitorRecord>> {
        self.inner.recent_visitors(limit).await
    }

    async fn increment_counter(&self, now: i64) -> StoreResult<i64> {
        self.inner.increment_counter(now).await
    }

    async fn read_counter(&self) -> StoreResult<i64> {
        self.inner.read_counter().await
    }

    async fn delete_all_visitors(&self) -> StoreResult<u64> {
        self.inner.delete_all_visitors().await
    }

    async fn reset_counter(&self, now: i64) -> StoreResult<()> {
        self.inner.reset_counter(now).await
    }

    async fn insert_suggestion(&self, suggestion: Suggestion) -> StoreResult<Suggestion> {
        self.inner.insert_suggestion(suggestion).await
    }

    async fn list_suggestions(&self) -> StoreResult<Vec<Suggestion>> {
        self.inner.list_suggestions().await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreCall {
    IncrementCounter,
    DeleteAllVisitors,
}

/// Memory store where one chosen call fails the first time it is made.
pub struct FlakyStore {
    inner: MemoryStore,
    fails: StoreCall,
    tripped: AtomicBool,
}

impl FlakyStore {
    pub fn failing_once(fails: StoreCall) -> Self {
        Self {
            inner: MemoryStore::new(),
            fails,
            tripped: AtomicBool::new(false),
        }
    }

    fn trip(&self, call: StoreCall) -> StoreResult<()> {
        if call == self.fails && !self.tripped.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Database("connection reset".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for FlakyStore {
    async fn ping(&self) -> StoreResult<()> {
        self.inner.ping().await
    }

    async fn find_visitor(&self, ip: &str) -> StoreResult<Option<VisitorRecord>> {
        self.inner.find_visitor(ip).await
    }

    async fn insert_visitor(&self, visitor: &VisitorRecord) -> StoreResult<()> {
        self.inner.insert_visitor(visitor).await
    }

    async fn delete_visitor(&self, ip: &str) -> StoreResult<bool> {
        self.inner.delete_visitor(ip).await
    }

    async fn record_repeat_visit(&self, ip: &str, now: i64) -> StoreResult<()> {
        self.inner.record_repeat_visit(ip, now).await
    }

    async fn count_visitors(&self) -> StoreResult<u64> {
        self.inner.count_visitors().await
    }

    async fn recent_visitors(&self, limit: i64) -> StoreResult<Vec<VisitorRecord>> {
        self.inner.recent_visitors(limit).await
    }

    async fn increment_counter(&self, now: i64) -> StoreResult<i64> {
        self.trip(StoreCall::IncrementCounter)?;
        self.inner.increment_counter(now).await
    }

    async fn read_counter(&self) -> StoreResult<i64> {
        self.inner.read_counter().await
    }

    async fn delete_all_visitors(&self) -> StoreResult<u64> {
        self.trip(StoreCall::DeleteAllVisitors)?;
        self.inner.delete_all_visitors().await
    }

    async fn reset_counter(&self, now: i64) -> StoreResult<()> {
        self.inner.reset_counter(now).await
    }

    async fn insert_suggestion(&self, suggestion: Suggestion) -> StoreResult<Suggestion> {
        self.inner.insert_suggestion(suggestion).await
    }

    async fn list_suggestions(&self) -> StoreResult<Vec<Suggestion>> {
        self.inner.list_suggestions().await
    }
}
