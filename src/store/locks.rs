use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per collection name.
///
/// Holders may take several locks, but always temp-orders before
/// reservations.
#[derive(Default)]
pub struct CollectionLocks {
    locks: DashMap<&'static str, Arc<Mutex<()>>>,
}

impl CollectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, name: &'static str) -> OwnedMutexGuard<()> {
        let mutex = self.locks.entry(name).or_default().value().clone();
        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::CollectionLocks;

    #[tokio::test]
    async fn same_collection_is_serialized() {
        let locks = Arc::new(CollectionLocks::new());
        let guard = locks.lock("reservations").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock("reservations").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!contender.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), contender)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn different_collections_do_not_block_each_other() {
        let locks = CollectionLocks::new();
        let _reservations = locks.lock("reservations").await;
        let _orders = tokio::time::timeout(Duration::from_secs(1), locks.lock("temp-orders"))
            .await
            .unwrap();
    }
}
