use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::amount::CategoryAmount;
use super::category::EntryKind;

fn enabled_by_default() -> bool {
    true
}

/// A fixed monthly income or expense, written into a month on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recurring {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub category_id: String,
    pub amount: CategoryAmount,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Recurring {
    pub fn new(
        name: impl Into<String>,
        kind: EntryKind,
        category_id: impl Into<String>,
        amount: CategoryAmount,
    ) -> Self {
        Self {
            id: generate_id("rec"),
            name: name.into(),
            kind,
            category_id: category_id.into(),
            amount,
            enabled: true,
            note: None,
        }
    }
}

/// A fixed monthly transfer between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurringTransfer {
    pub id: String,
    pub name: String,
    pub from: String,
    pub to: String,
    pub amount: f64,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RecurringTransfer {
    pub fn new(
        name: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: generate_id("rtr"),
            name: name.into(),
            from: from.into(),
            to: to.into(),
            amount,
            enabled: true,
            note: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recurrings {
    #[serde(default)]
    pub items: Vec<Recurring>,
    #[serde(default)]
    pub transfers: Vec<RecurringTransfer>,
}

fn generate_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}
