use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A category's value for one month: either a single figure or a
/// breakdown keyed by sub-category id.
///
/// Serialized untagged, so stored data reads as either `45000` or
/// `{ groceries: 30000, restaurants: 15000 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryAmount {
    Flat(f64),
    Breakdown(BTreeMap<String, f64>),
}

impl CategoryAmount {
    /// Build a breakdown from `(sub_id, value)` pairs.
    pub fn breakdown<K, I>(items: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        CategoryAmount::Breakdown(items.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Flat value as-is, or the sum of the breakdown (0 when empty).
    pub fn total(&self) -> f64 {
        match self {
            CategoryAmount::Flat(value) => *value,
            CategoryAmount::Breakdown(items) => items.values().sum(),
        }
    }

    /// Value of one sub-item. A flat amount has no sub-items and yields 0.
    pub fn sub_amount(&self, subcategory_id: &str) -> f64 {
        match self {
            CategoryAmount::Flat(_) => 0.0,
            CategoryAmount::Breakdown(items) => items.get(subcategory_id).copied().unwrap_or(0.0),
        }
    }

    /// True when every component is finite and non-negative.
    pub fn is_valid(&self) -> bool {
        let valid = |v: &f64| v.is_finite() && *v >= 0.0;
        match self {
            CategoryAmount::Flat(value) => valid(value),
            CategoryAmount::Breakdown(items) => items.values().all(valid),
        }
    }
}

impl Default for CategoryAmount {
    fn default() -> Self {
        CategoryAmount::Flat(0.0)
    }
}

impl From<f64> for CategoryAmount {
    fn from(value: f64) -> Self {
        CategoryAmount::Flat(value)
    }
}
