use chrono::{DateTime, Utc};
use serde::Serialize;

/// a single temperature reading
/// immutable once created: the store only ever swaps which readings it holds
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    /// temperature in celsius
    pub value: f64,
    /// instant of capture (sensor) or receipt (http)
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(value: f64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }
}

/// derived statistics over the retained history
/// min/max/average are `None` when there is no data
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Statistics {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub average: Option<f64>,
}

impl Statistics {
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }

        if count == 0 {
            return Self::default();
        }

        Self {
            count,
            min: Some(min),
            max: Some(max),
            average: Some(sum / count as f64),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// consistent view of the whole store, taken under one lock
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub current: Option<Reading>,
    /// chronological order, oldest first
    pub history: Vec<Reading>,
    pub statistics: Statistics,
}
