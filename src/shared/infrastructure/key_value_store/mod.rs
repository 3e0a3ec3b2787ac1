// Port for the persistent key-value table drafts are written to.
//
// Purpose
// - Describe the storage capability the core needs, without implementing it.
//
// Responsibilities
// - Values are opaque JSON; callers filter keys and decode values themselves.
// - Each operation is atomic per key. Nothing stronger is promised.
//
// Testing guidance
// - Use the in memory implementation; toggle it offline to exercise failure paths.

pub mod in_memory;
pub mod json_file;

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store offline")]
    Offline,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Every key in the store, in key order.
    async fn get_all(&self) -> Result<BTreeMap<String, Value>, StoreError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Removes every key, including ones this crate never wrote.
    async fn clear(&self) -> Result<(), StoreError>;
}
