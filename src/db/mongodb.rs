use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use super::{Store, StoreError, StoreResult};
use crate::config::Config;
use crate::models::counter::{UNIQUE_VISITORS, VisitorCounter};
use crate::models::suggestion::Suggestion;
use crate::models::visitor::VisitorRecord;

const DEFAULT_DATABASE: &str = "portfolio";
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Connects to MongoDB, checks the connection and makes sure the indexes
/// the visitor dedup relies on exist.
pub async fn get_database(config: &Config) -> Result<Database> {
    let mut options = ClientOptions::parse(&config.mongodb_uri)
        .await
        .context("Invalid MONGODB_URI")?;
    options.app_name = Some("portfolio-api".to_string());
    options.server_selection_timeout = Some(config.storage_timeout);
    options.connect_timeout = Some(config.storage_timeout);

    let db_name = config
        .mongodb_db
        .clone()
        .or_else(|| options.default_database.clone())
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

    let client = Client::with_options(options).context("Failed to build MongoDB client")?;
    let db = client.database(&db_name);

    db.run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB ping failed")?;
    ensure_indexes(&db).await?;

    log::info!("Connected to MongoDB database '{}'", db_name);
    Ok(db)
}

async fn ensure_indexes(db: &Database) -> Result<()> {
    let unique_ip = IndexModel::builder()
        .keys(doc! { "ip": 1 })
        .options(IndexOptions::builder().unique(true).build())
        .build();
    db.collection::<VisitorRecord>("visitors")
        .create_index(unique_ip)
        .await
        .context("Failed to create unique index on visitors.ip")?;

    let newest_first = IndexModel::builder()
        .keys(doc! { "created_at": -1 })
        .build();
    db.collection::<Suggestion>("suggestions")
        .create_index(newest_first)
        .await
        .context("Failed to create index on suggestions.created_at")?;

    Ok(())
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

impl From<MongoError> for StoreError {
    fn from(err: MongoError) -> Self {
        if is_duplicate_key(&err) {
            StoreError::DuplicateKey
        } else {
            StoreError::Database(err.to_string())
        }
    }
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn visitors(&self) -> Collection<VisitorRecord> {
        self.db.collection("visitors")
    }

    fn counters(&self) -> Collection<VisitorCounter> {
        self.db.collection("counters")
    }

    fn suggestions(&self) -> Collection<Suggestion> {
        self.db.collection("suggestions")
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn ping(&self) -> StoreResult<()> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find_visitor(&self, ip: &str) -> StoreResult<Option<VisitorRecord>> {
        Ok(self.visitors().find_one(doc! { "ip": ip }).await?)
    }

    async fn insert_visitor(&self, visitor: &VisitorRecord) -> StoreResult<()> {
        self.visitors().insert_one(visitor).await?;
        Ok(())
    }

    async fn delete_visitor(&self, ip: &str) -> StoreResult<bool> {
        let result = self.visitors().delete_one(doc! { "ip": ip }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn record_repeat_visit(&self, ip: &str, now: i64) -> StoreResult<()> {
        self.visitors()
            .update_one(
                doc! { "ip": ip },
                doc! {
                    "$set": { "last_seen": now },
                    "$inc": { "visit_count": 1_i64 },
                },
            )
            .await?;
        Ok(())
    }

    async fn count_visitors(&self) -> StoreResult<u64> {
        Ok(self.visitors().count_documents(doc! {}).await?)
    }

    async fn recent_visitors(&self, limit: i64) -> StoreResult<Vec<VisitorRecord>> {
        let visitors = self
            .visitors()
            .find(doc! {})
            .sort(doc! { "last_seen": -1 })
            .limit(limit)
            .await?
            .try_collect::<Vec<VisitorRecord>>()
            .await?;
        Ok(visitors)
    }

    async fn increment_counter(&self, now: i64) -> StoreResult<i64> {
        // Single upsert with $inc so concurrent first-time visitors never lose an update
        let counter = self
            .counters()
            .find_one_and_update(
                doc! { "_id": UNIQUE_VISITORS },
                doc! {
                    "$inc": { "count": 1_i64 },
                    "$set": { "last_updated": now },
                },
            )
            .upsert(true)
            .return_document(ReturnDocument::After)
            .await?;

        Ok(counter.map(|c| c.count).unwrap_or(1))
    }

    async fn read_counter(&self) -> StoreResult<i64> {
        let counter = self
            .counters()
            .find_one(doc! { "_id": UNIQUE_VISITORS })
            .await?;
        Ok(counter.map(|c| c.count).unwrap_or(0))
    }

    async fn delete_all_visitors(&self) -> StoreResult<u64> {
        let deleted = self.visitors().delete_many(doc! {}).await?;
        Ok(deleted.deleted_count)
    }

    async fn reset_counter(&self, now: i64) -> StoreResult<()> {
        self.counters()
            .update_one(
                doc! { "_id": UNIQUE_VISITORS },
                doc! { "$set": { "count": 0_i64, "last_updated": now } },
            )
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn insert_suggestion(&self, mut suggestion: Suggestion) -> StoreResult<Suggestion> {
        let result = self.suggestions().insert_one(&suggestion).await?;
        suggestion.id = result.inserted_id.as_object_id();
        Ok(suggestion)
    }

    async fn list_suggestions(&self) -> StoreResult<Vec<Suggestion>> {
        let suggestions = self
            .suggestions()
            .find(doc! {})
            .sort(doc! { "created_at": -1, "_id": -1 })
            .await?
            .try_collect::<Vec<Suggestion>>()
            .await?;
        Ok(suggestions)
    }
}
