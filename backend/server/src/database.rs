//! # Document store
//!
//! Every collection is a bag of JSON documents keyed by id.
//!
//! ## Redis
//! - One hash per collection: `<namespace>:<collection>`
//! - Hash field is the document id, value is the JSON text
//! - Single document reads/writes are O(1) `HGET`/`HSET`/`HDEL`
//! - Listing a collection is one `HGETALL`, filtering happens in the service
//!
//! Collections are small (one community's posts, comments, groups...), so
//! scanning a whole hash for a derived query is cheaper than keeping secondary
//! indexes in sync.
//!
//! ## Memory
//! Same contract held in a map, used by tests and `STORE_BACKEND=memory`.
use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::Duration,
};

use async_trait::async_trait;
use redis::{
    AsyncCommands, Client,
    aio::{ConnectionManager, ConnectionManagerConfig},
};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::{Config, StoreBackend};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Document encoding error: {0}")]
    Codec(#[from] serde_json::Error),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// All documents of a collection, ordered by id.
    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Whether a document was removed.
    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError>;

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError>;
}

pub async fn init_store(config: &Config) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.store_backend {
        StoreBackend::Redis => {
            info!("Connecting to redis at {}", config.redis_url);

            let store = RedisStore::connect(&config.redis_url, &config.store_namespace).await?;

            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Using in-memory document store");

            Ok(Arc::new(MemoryStore::default()))
        }
    }
}

pub struct RedisStore {
    connection: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    pub async fn connect(redis_url: &str, namespace: &str) -> Result<Self, StoreError> {
        let config = ConnectionManagerConfig::new()
            .set_number_of_retries(1)
            .set_connection_timeout(Duration::from_millis(500));

        let client = Client::open(redis_url)?;
        let connection = client.get_connection_manager_with_config(config).await?;

        Ok(Self {
            connection,
            namespace: namespace.to_string(),
        })
    }

    fn key(&self, collection: &str) -> String {
        format!("{}:{collection}", self.namespace)
    }
}

#[async_trait]
impl DocumentStore for RedisStore {
    fn backend_tag(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: Option<String> = connection.hget(self.key(collection), id).await?;

        Ok(raw.map(|text| serde_json::from_str(&text)).transpose()?)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let mut connection = self.connection.clone();
        let raw: BTreeMap<String, String> = connection.hgetall(self.key(collection)).await?;

        raw.values()
            .map(|text| serde_json::from_str(text).map_err(StoreError::from))
            .collect()
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let text = serde_json::to_string(&document)?;
        let _: () = connection.hset(self.key(collection), id, text).await?;

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();
        let removed: usize = connection.hdel(self.key(collection), id).await?;

        Ok(removed > 0)
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        let mut connection = self.connection.clone();

        Ok(connection.hexists(self.key(collection), id).await?)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Value>>>,
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .map(|documents| documents.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn put(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .write()
            .await
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    async fn exists(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .collections
            .read()
            .await
            .get(collection)
            .is_some_and(|documents| documents.contains_key(id)))
    }
}
