//! Typed accumulation of per-step info metrics.
//!
//! Environments report `(scope, name) -> value` pairs each step. The
//! accumulator keeps the full per-step series per key and sums it when the
//! episode ends.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a metric by its scope (usually an agent) and name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MetricKey {
    pub scope: String,
    pub name: String,
}

impl MetricKey {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.scope, self.name)
    }
}

/// Per-step series for every metric seen during one episode.
#[derive(Debug, Clone, Default)]
pub struct MetricAccumulator {
    series: BTreeMap<MetricKey, Vec<f64>>,
}

impl MetricAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one step's value for `key`.
    pub fn record(&mut self, key: &MetricKey, value: f64) {
        match self.series.get_mut(key) {
            Some(values) => values.push(value),
            None => {
                self.series.insert(key.clone(), vec![value]);
            }
        }
    }

    /// Returns the per-step series for `key`.
    pub fn series(&self, key: &MetricKey) -> Option<&[f64]> {
        self.series.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Sums each series, producing the end-of-episode metrics.
    pub fn totals(&self) -> BTreeMap<MetricKey, f64> {
        self.series
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().sum()))
            .collect()
    }
}
