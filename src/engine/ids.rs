use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Hands out millisecond-timestamp order ids that never repeat within the
/// process, even when several orders arrive in the same millisecond.
#[derive(Debug, Default)]
pub struct OrderIdGenerator {
    last: AtomicI64,
}

impl OrderIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let mut previous = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(previous + 1);
            match self.last.compare_exchange_weak(
                previous,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate.to_string(),
                Err(actual) => previous = actual,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use super::OrderIdGenerator;

    #[test]
    fn ids_are_strictly_increasing() {
        let ids = OrderIdGenerator::new();
        let first: i64 = ids.next_id().parse().unwrap();
        let second: i64 = ids.next_id().parse().unwrap();
        let third: i64 = ids.next_id().parse().unwrap();

        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn concurrent_callers_never_collide() {
        let ids = Arc::new(OrderIdGenerator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate order id");
            }
        }
        assert_eq!(seen.len(), 1000);
    }
}
