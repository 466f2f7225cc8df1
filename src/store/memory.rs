use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::AppError;

use super::RecordStore;

#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn read_raw(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.collections.get(name).map(|entry| entry.value().clone()))
    }

    async fn write_raw(&self, name: &str, bytes: &[u8]) -> Result<(), AppError> {
        self.collections.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}
