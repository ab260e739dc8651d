use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::db::{Store, StoreResult, bounded};

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self { store, config }
    }

    pub fn storage_timeout(&self) -> Duration {
        self.config.storage_timeout
    }

    /// Awaits a storage call, failing it once the configured timeout elapses.
    pub async fn run<T, F>(&self, call: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        bounded(self.storage_timeout(), call).await
    }
}
