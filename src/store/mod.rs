//! Named record collections behind a storage-agnostic seam.
//!
//! A collection is persisted as a wrapper object holding one array, e.g.
//! `{"reservations": [...]}`. Backends only move bytes; the typed layer in
//! this module owns the wrapper shape and the "absent means empty" rule.

mod file;
mod locks;
mod memory;

pub use file::JsonFileStore;
pub use locks::CollectionLocks;
pub use memory::MemoryStore;

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::AppError;
use crate::models::order::TemporaryOrder;
use crate::models::reservation::Reservation;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Raw collection content, or `None` when nothing has been written yet.
    async fn read_raw(&self, name: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Replaces the whole collection. Readers never see a partial write.
    async fn write_raw(&self, name: &str, bytes: &[u8]) -> Result<(), AppError>;
}

/// Typed handle for one collection: its storage name and wrapper key.
pub struct Collection<T> {
    pub name: &'static str,
    pub key: &'static str,
    _record: PhantomData<fn() -> T>,
}

impl<T> Collection<T> {
    pub const fn new(name: &'static str, key: &'static str) -> Self {
        Self {
            name,
            key,
            _record: PhantomData,
        }
    }
}

pub const RESERVATIONS: Collection<Reservation> = Collection::new("reservations", "reservations");
pub const TEMP_ORDERS: Collection<TemporaryOrder> = Collection::new("temp-orders", "tempOrders");

pub async fn read_records<T>(
    store: &dyn RecordStore,
    collection: &Collection<T>,
) -> Result<Vec<T>, AppError>
where
    T: DeserializeOwned,
{
    let Some(bytes) = store.read_raw(collection.name).await? else {
        return Ok(Vec::new());
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_slice(&bytes).map_err(|err| {
        AppError::Storage(format!("collection {} is not valid JSON: {err}", collection.name))
    })?;

    let records = match document {
        Value::Object(mut wrapper) => match wrapper.remove(collection.key) {
            Some(records @ Value::Array(_)) => records,
            _ => {
                warn!(
                    collection = collection.name,
                    key = collection.key,
                    "unexpected collection shape; treating as empty"
                );
                return Ok(Vec::new());
            }
        },
        _ => {
            warn!(
                collection = collection.name,
                "collection is not a wrapper object; treating as empty"
            );
            return Ok(Vec::new());
        }
    };

    serde_json::from_value(records).map_err(|err| {
        AppError::Storage(format!("collection {} holds malformed records: {err}", collection.name))
    })
}

pub async fn write_records<T>(
    store: &dyn RecordStore,
    collection: &Collection<T>,
    records: &[T],
) -> Result<(), AppError>
where
    T: Serialize,
{
    let records = serde_json::to_value(records).map_err(|err| {
        AppError::Storage(format!("failed to encode {}: {err}", collection.name))
    })?;

    let mut wrapper = Map::new();
    wrapper.insert(collection.key.to_string(), records);

    let bytes = serde_json::to_vec_pretty(&Value::Object(wrapper)).map_err(|err| {
        AppError::Storage(format!("failed to encode {}: {err}", collection.name))
    })?;

    store.write_raw(collection.name, &bytes).await
}
