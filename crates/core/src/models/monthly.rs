use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::amount::CategoryAmount;
use super::category::EntryKind;
use super::month::Month;

/// An explicit, user-entered movement between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: String,
    pub to: String,
    /// Always positive.
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transfer {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Everything recorded for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyData {
    pub month: Month,
    #[serde(default)]
    pub income: BTreeMap<String, CategoryAmount>,
    #[serde(default)]
    pub expense: BTreeMap<String, CategoryAmount>,
    #[serde(default)]
    pub transfers: Vec<Transfer>,
}

impl MonthlyData {
    /// An empty record for `month`.
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            income: BTreeMap::new(),
            expense: BTreeMap::new(),
            transfers: Vec::new(),
        }
    }

    pub fn entries(&self, kind: EntryKind) -> &BTreeMap<String, CategoryAmount> {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expense,
        }
    }

    pub fn entries_mut(&mut self, kind: EntryKind) -> &mut BTreeMap<String, CategoryAmount> {
        match kind {
            EntryKind::Income => &mut self.income,
            EntryKind::Expense => &mut self.expense,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_empty() && self.expense.is_empty() && self.transfers.is_empty()
    }
}
