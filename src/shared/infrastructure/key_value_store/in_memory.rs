use crate::shared::infrastructure::key_value_store::{KeyValueStore, StoreError};
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, Value>>,
    is_offline: bool,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            entries: RwLock::new(entries.into_iter().collect()),
            is_offline: false,
        }
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.is_offline {
            return Err(StoreError::Offline);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        self.ensure_online()?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn get_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        self.ensure_online()?;
        Ok(self.entries.read().await.clone())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.ensure_online()?;
        self.entries.write().await.clear();
        Ok(())
    }
}
