use std::collections::HashMap;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

use super::{Store, StoreError, StoreResult};
use crate::models::counter::VisitorCounter;
use crate::models::suggestion::Suggestion;
use crate::models::visitor::VisitorRecord;

#[derive(Default)]
struct Collections {
    visitors: HashMap<String, VisitorRecord>,
    counter: Option<VisitorCounter>,
    suggestions: Vec<Suggestion>,
}

/// In-process store with the same semantics as the MongoDB one: unique
/// visitor IPs, an upserted counter and newest-first suggestions.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_visitor(&self, ip: &str) -> StoreResult<Option<VisitorRecord>> {
        Ok(self.inner.lock().await.visitors.get(ip).cloned())
    }

    async fn insert_visitor(&self, visitor: &VisitorRecord) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        if inner.visitors.contains_key(&visitor.ip) {
            return Err(StoreError::DuplicateKey);
        }
        let mut stored = visitor.clone();
        stored.id = Some(ObjectId::new());
        inner.visitors.insert(stored.ip.clone(), stored);
        Ok(())
    }

    async fn delete_visitor(&self, ip: &str) -> StoreResult<bool> {
        Ok(self.inner.lock().await.visitors.remove(ip).is_some())
    }

    async fn record_repeat_visit(&self, ip: &str, now: i64) -> StoreResult<()> {
        if let Some(visitor) = self.inner.lock().await.visitors.get_mut(ip) {
            visitor.record_visit(now);
        }
        Ok(())
    }

    async fn count_visitors(&self) -> StoreResult<u64> {
        Ok(self.inner.lock().await.visitors.len() as u64)
    }

    async fn recent_visitors(&self, limit: i64) -> StoreResult<Vec<VisitorRecord>> {
        let inner = self.inner.lock().await;
        let mut visitors: Vec<VisitorRecord> = inner.visitors.values().cloned().collect();
        visitors.sort_by(|a, b| b.last_seen.cmp(&a.last_seen));
        visitors.truncate(limit.max(0) as usize);
        Ok(visitors)
    }

    async fn increment_counter(&self, now: i64) -> StoreResult<i64> {
        let mut inner = self.inner.lock().await;
        let counter = inner
            .counter
            .get_or_insert_with(|| VisitorCounter::new(0, now));
        counter.count += 1;
        counter.last_updated = now;
        Ok(counter.count)
    }

    async fn read_counter(&self) -> StoreResult<i64> {
        Ok(self
            .inner
            .lock()
            .await
            .counter
            .as_ref()
            .map(|c| c.count)
            .unwrap_or(0))
    }

    async fn delete_all_visitors(&self) -> StoreResult<u64> {
        let mut inner = self.inner.lock().await;
        let cleared = inner.visitors.len() as u64;
        inner.visitors.clear();
        Ok(cleared)
    }

    async fn reset_counter(&self, now: i64) -> StoreResult<()> {
        self.inner.lock().await.counter = Some(VisitorCounter::new(0, now));
        Ok(())
    }

    async fn insert_suggestion(&self, mut suggestion: Suggestion) -> StoreResult<Suggestion> {
        suggestion.id = Some(ObjectId::new());
        self.inner.lock().await.suggestions.push(suggestion.clone());
        Ok(suggestion)
    }

    async fn list_suggestions(&self) -> StoreResult<Vec<Suggestion>> {
        let inner = self.inner.lock().await;
        // Reverse insertion order first so equal timestamps still come out newest first
        let mut suggestions: Vec<Suggestion> = inner.suggestions.iter().rev().cloned().collect();
        suggestions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(suggestions)
    }
}
