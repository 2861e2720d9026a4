use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::category::EntryKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Bank,
    Credit,
    Cash,
    Investment,
    /// Sinking fund swept into savings once a year.
    Pool,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::Bank => write!(f, "bank"),
            AccountType::Credit => write!(f, "credit"),
            AccountType::Cash => write!(f, "cash"),
            AccountType::Investment => write!(f, "investment"),
            AccountType::Pool => write!(f, "pool"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub initial_balance: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
}

fn default_color() -> String {
    "#6B7280".to_string()
}

fn default_currency() -> String {
    "JPY".to_string()
}

impl Account {
    pub fn new(id: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            account_type,
            color: default_color(),
            initial_balance: 0.0,
            currency: default_currency(),
            is_default: false,
        }
    }

    pub fn with_initial_balance(mut self, initial_balance: f64) -> Self {
        self.initial_balance = initial_balance;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }
}

/// Per-category routing override. Income uses `to_account`,
/// expense uses `from_account`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account: Option<String>,
}

impl FlowRule {
    pub fn deposit_to(account_id: impl Into<String>) -> Self {
        Self {
            from_account: None,
            to_account: Some(account_id.into()),
        }
    }

    pub fn draw_from(account_id: impl Into<String>) -> Self {
        Self {
            from_account: Some(account_id.into()),
            to_account: None,
        }
    }
}

/// Flow rules keyed by category id, kept separately per side.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowRules {
    #[serde(default)]
    pub income: BTreeMap<String, FlowRule>,
    #[serde(default)]
    pub expense: BTreeMap<String, FlowRule>,
}

impl FlowRules {
    pub fn of(&self, kind: EntryKind) -> &BTreeMap<String, FlowRule> {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expense,
        }
    }

    pub fn of_mut(&mut self, kind: EntryKind) -> &mut BTreeMap<String, FlowRule> {
        match kind {
            EntryKind::Income => &mut self.income,
            EntryKind::Expense => &mut self.expense,
        }
    }
}

pub const DEFAULT_PRIMARY_ACCOUNT: &str = "account";
pub const DEFAULT_SAVINGS_ACCOUNT: &str = "save";
pub const DEFAULT_POOL_ACCOUNT: &str = "pool";

/// Account ids that carry behaviour in the balance projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRoles {
    /// Default source/target for income and expense; settled monthly.
    pub primary: String,
    /// Absorbs the monthly settlement and the pool reset.
    pub savings: String,
    /// Reset into savings once a year.
    pub pool: String,
}

impl Default for AccountRoles {
    fn default() -> Self {
        Self {
            primary: DEFAULT_PRIMARY_ACCOUNT.to_string(),
            savings: DEFAULT_SAVINGS_ACCOUNT.to_string(),
            pool: DEFAULT_POOL_ACCOUNT.to_string(),
        }
    }
}

impl AccountRoles {
    /// Point `primary` at the account flagged `is_default`. Without a flag
    /// the current primary is kept if it exists, else the first account is
    /// used.
    pub fn sync_primary(&mut self, accounts: &[Account]) {
        if let Some(account) = accounts.iter().find(|a| a.is_default) {
            self.primary = account.id.clone();
        } else if !accounts.iter().any(|a| a.id == self.primary) {
            if let Some(first) = accounts.first() {
                self.primary = first.id.clone();
            }
        }
    }
}
