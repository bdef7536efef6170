//! Per-vehicle exclusive scopes
//!
//! Every "read gallery → compute position → write" sequence runs while
//! holding the vehicle's guard, so two requests against the same vehicle
//! never allocate from the same snapshot. Different vehicles never contend.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct VehicleLocks {
    inner: Arc<DashMap<i64, Arc<Mutex<()>>>>,
}

impl VehicleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one vehicle's gallery.
    pub async fn acquire(&self, vehicle_id: i64) -> VehicleGuard {
        // Clone the Arc out so the shard lock is released before awaiting
        let mutex = self.inner.entry(vehicle_id).or_default().clone();
        let guard = mutex.lock_owned().await;
        VehicleGuard {
            vehicle_id,
            locks: self.inner.clone(),
            _guard: guard,
        }
    }

    /// Number of vehicles with a live lock entry
    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.len()
    }

    #[cfg(test)]
    fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Held for the duration of a gallery mutation; released on drop.
pub struct VehicleGuard {
    vehicle_id: i64,
    locks: Arc<DashMap<i64, Arc<Mutex<()>>>>,
    _guard: OwnedMutexGuard<()>,
}

impl VehicleGuard {
    pub fn vehicle_id(&self) -> i64 {
        self.vehicle_id
    }
}

impl Drop for VehicleGuard {
    fn drop(&mut self) {
        // Map entry + our guard = 2; anything above means someone is waiting
        self.locks
            .remove_if(&self.vehicle_id, |_, mutex| Arc::strong_count(mutex) <= 2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn same_vehicle_is_serialized() {
        let locks = VehicleLocks::new();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let locks = locks.clone();
            let inside = inside.clone();
            let max_inside = max_inside.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(1).await;
                let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                max_inside.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn different_vehicles_do_not_block() {
        let locks = VehicleLocks::new();
        let a = locks.acquire(1).await;
        let b = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2))
            .await
            .expect("vehicle 2 must not wait on vehicle 1");
        assert_eq!(a.vehicle_id(), 1);
        assert_eq!(b.vehicle_id(), 2);
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn entry_removed_after_release() {
        let locks = VehicleLocks::new();
        {
            let _guard = locks.acquire(42).await;
            assert_eq!(locks.len(), 1);
        }
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn waiter_keeps_entry_alive() {
        let locks = VehicleLocks::new();
        let first = locks.acquire(7).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(7).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(first);
        // Entry survived the first release because the waiter held a clone
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }
}
