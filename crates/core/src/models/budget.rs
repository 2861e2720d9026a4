use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

use super::amount::CategoryAmount;
use super::month::Month;

/// A value that takes effect from `start_month` onward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry<T> {
    pub start_month: Month,
    pub amount: T,
}

/// Effective-dated values, ascending by `start_month`, one entry per month.
///
/// `resolve` trusts the ordering and never sorts. Every insertion goes
/// through `upsert`, including deserialization, so stored lists that are
/// out of order or repeat a month are normalized on load (later entries win).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct History<T> {
    entries: Vec<HistoryEntry<T>>,
}

impl<T> Default for History<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for History<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<HistoryEntry<T>>::deserialize(deserializer)?;
        Ok(Self::from_entries(
            entries.into_iter().map(|e| (e.start_month, e.amount)),
        ))
    }
}

impl<T> History<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(start_month, amount)` pairs through `upsert`.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Month, T)>,
    {
        let mut history = Self::new();
        for (month, amount) in entries {
            history.upsert(month, amount);
        }
        history
    }

    /// Replace the amount at `start_month`, or insert a new entry in order.
    pub fn upsert(&mut self, start_month: Month, amount: T) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.start_month == start_month) {
            entry.amount = amount;
            return;
        }
        self.entries.push(HistoryEntry {
            start_month,
            amount,
        });
        self.entries.sort_by(|a, b| a.start_month.cmp(&b.start_month));
    }

    /// Remove the entry starting at `start_month`. Returns its amount.
    pub fn remove(&mut self, start_month: &Month) -> Option<T> {
        let idx = self.entries.iter().position(|e| &e.start_month == start_month)?;
        Some(self.entries.remove(idx).amount)
    }

    /// Amount of the last entry whose `start_month <= month`.
    ///
    /// The scan stops at the first later entry.
    pub fn resolve(&self, month: &Month) -> Option<&T> {
        self.entry_at(month).map(|e| &e.amount)
    }

    /// `start_month` of the entry `resolve` would pick.
    pub fn latest_start_at_or_before(&self, month: &Month) -> Option<&Month> {
        self.entry_at(month).map(|e| &e.start_month)
    }

    fn entry_at(&self, month: &Month) -> Option<&HistoryEntry<T>> {
        let mut found = None;
        for entry in &self.entries {
            if entry.start_month > *month {
                break;
            }
            found = Some(entry);
        }
        found
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Salary, per-category budgets and per-account allocations over time.
///
/// The single-value fields predate the histories and serve as fallbacks
/// when a history has nothing for the requested month.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_salary: Option<f64>,

    #[serde(default)]
    pub salary_history: History<f64>,

    /// Legacy flat budgets by expense category id.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub expense: BTreeMap<String, CategoryAmount>,

    #[serde(default)]
    pub expense_history: BTreeMap<String, History<CategoryAmount>>,

    /// Legacy flat allocations by account id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_allocations: Option<BTreeMap<String, f64>>,

    #[serde(default)]
    pub allocation_history: BTreeMap<String, History<f64>>,
}
