//! ==============================================================================
//! store.rs - bounded telemetry store
//! ==============================================================================
//!
//! purpose:
//!     holds the latest reading and a capped, chronological history of
//!     readings. computes statistics on demand over the retained window.
//!
//! relationships:
//!     - written by: api.rs (POST /update) and poller.rs (sensor cycle)
//!     - read by: api.rs (json endpoints) and dashboard.rs (html)
//!
//! invariants:
//!     - history.len() <= capacity; oldest readings are evicted first
//!     - current == history.back() at all times (both empty or both set)
//!
//! we use arc<rwlock<>> so the handle can be cloned into the router state
//! and the poll task; the current/history pair lives behind one lock so a
//! reader never observes half of an update.
//!
//! ==============================================================================

use crate::domain::{Reading, Snapshot, Statistics};

use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_CAPACITY: usize = 100;

struct Inner {
    current: Option<Reading>,
    history: VecDeque<Reading>,
}

#[derive(Clone)]
pub struct TelemetryStore {
    capacity: usize,
    inner: Arc<RwLock<Inner>>,
}

impl Default for TelemetryStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TelemetryStore {
    /// create an empty store; a capacity of 0 is clamped to 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            inner: Arc::new(RwLock::new(Inner {
                current: None,
                history: VecDeque::with_capacity(capacity),
            })),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// append a reading, evicting the oldest ones past capacity
    ///
    /// no plausibility checks: negative, zero and absurd values are all kept.
    pub async fn record(&self, value: f64, timestamp: DateTime<Utc>) -> Reading {
        let reading = Reading::new(value, timestamp);
        let mut inner = self.inner.write().await;
        inner.history.push_back(reading);
        while inner.history.len() > self.capacity {
            inner.history.pop_front();
        }
        inner.current = Some(reading);
        reading
    }

    pub async fn latest(&self) -> Option<Reading> {
        self.inner.read().await.current
    }

    /// last `min(k, len)` readings, oldest first
    pub async fn recent(&self, k: usize) -> Vec<Reading> {
        let inner = self.inner.read().await;
        let skip = inner.history.len().saturating_sub(k);
        inner.history.iter().skip(skip).copied().collect()
    }

    pub async fn statistics(&self) -> Statistics {
        let inner = self.inner.read().await;
        Statistics::from_values(inner.history.iter().map(|r| r.value))
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.history.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.history.is_empty()
    }

    pub async fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().await;
        Snapshot {
            current: inner.current,
            history: inner.history.iter().copied().collect(),
            statistics: Statistics::from_values(inner.history.iter().map(|r| r.value)),
        }
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.history.clear();
        inner.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_empty_store_has_no_data() {
        let store = TelemetryStore::default();
        assert!(store.latest().await.is_none());
        assert!(store.recent(10).await.is_empty());
        assert!(store.statistics().await.is_empty());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_two_readings() {
        let store = TelemetryStore::new(100);
        store.record(20.0, t(1)).await;
        store.record(22.5, t(2)).await;

        let latest = store.latest().await.unwrap();
        assert_eq!(latest.value, 22.5);
        assert_eq!(latest.timestamp, t(2));

        let stats = store.statistics().await;
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, Some(20.0));
        assert_eq!(stats.max, Some(22.5));
        assert_eq!(stats.average, Some(21.25));
    }

    #[tokio::test]
    async fn test_eviction_keeps_most_recent() {
        let store = TelemetryStore::new(100);
        for i in 1..=105 {
            store.record(i as f64, t(i)).await;
        }

        assert_eq!(store.len().await, 100);
        assert_eq!(store.statistics().await.count, 100);

        let history = store.recent(usize::MAX).await;
        let values: Vec<f64> = history.iter().map(|r| r.value).collect();
        let expected: Vec<f64> = (6..=105).map(|i| i as f64).collect();
        assert_eq!(values, expected);
        assert_eq!(store.latest().await, history.last().copied());
    }

    #[tokio::test]
    async fn test_length_is_min_of_calls_and_capacity() {
        for capacity in [1, 3, 50] {
            for calls in [0usize, 1, 2, 3, 4, 49, 50, 51, 120] {
                let store = TelemetryStore::new(capacity);
                let start = t(0);
                for i in 0..calls {
                    store.record(i as f64, start + Duration::seconds(i as i64)).await;
                }

                let history = store.recent(usize::MAX).await;
                assert_eq!(history.len(), calls.min(capacity));
                let first = calls.saturating_sub(capacity);
                for (offset, r) in history.iter().enumerate() {
                    assert_eq!(r.value, (first + offset) as f64);
                }
                assert_eq!(store.latest().await, history.last().copied());
            }
        }
    }

    #[tokio::test]
    async fn test_recent_is_bounded_and_stable() {
        let store = TelemetryStore::new(10);
        for i in 0..5 {
            store.record(i as f64, t(i)).await;
        }

        let last_two = store.recent(2).await;
        assert_eq!(last_two.iter().map(|r| r.value).collect::<Vec<_>>(), vec![3.0, 4.0]);
        assert_eq!(store.recent(2).await, last_two);
        assert_eq!(store.recent(50).await.len(), 5);
        assert!(store.recent(0).await.is_empty());
        assert_eq!(store.len().await, 5);
    }

    #[tokio::test]
    async fn test_statistics_bounds_hold() {
        let store = TelemetryStore::new(20);
        for (i, v) in [3.5, -1.0, 0.0, 18.25, 7.0, 7.0, -12.5].into_iter().enumerate() {
            store.record(v, t(i as i64)).await;
        }

        let stats = store.statistics().await;
        let (min, max, avg) = (stats.min.unwrap(), stats.max.unwrap(), stats.average.unwrap());
        assert_eq!(stats.count, store.len().await);
        assert!(min <= avg && avg <= max);
        assert_eq!(min, -12.5);
        assert_eq!(max, 18.25);
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let store = TelemetryStore::new(5);
        store.record(21.0, t(0)).await;
        store.clear().await;
        store.clear().await;

        assert!(store.latest().await.is_none());
        assert_eq!(store.statistics().await, Statistics::default());
        assert!(store.snapshot().await.history.is_empty());

        store.record(19.0, t(1)).await;
        assert_eq!(store.latest().await.map(|r| r.value), Some(19.0));
    }

    #[tokio::test]
    async fn test_zero_capacity_clamped() {
        let store = TelemetryStore::new(0);
        assert_eq!(store.capacity(), 1);
        store.record(1.0, t(0)).await;
        store.record(2.0, t(1)).await;
        assert_eq!(store.recent(10).await.len(), 1);
        assert_eq!(store.latest().await.map(|r| r.value), Some(2.0));
    }

    #[tokio::test]
    async fn test_snapshot_is_consistent() {
        let store = TelemetryStore::new(3);
        for i in 0..4 {
            store.record(10.0 + i as f64, t(i)).await;
        }

        let snap = store.snapshot().await;
        assert_eq!(snap.history.len(), 3);
        assert_eq!(snap.current, snap.history.last().copied());
        assert_eq!(snap.statistics.count, 3);
        assert_eq!(snap.statistics.min, Some(11.0));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = TelemetryStore::new(10);
        let writer = store.clone();
        writer.record(30.0, t(0)).await;
        assert_eq!(store.latest().await.map(|r| r.value), Some(30.0));
    }
}
