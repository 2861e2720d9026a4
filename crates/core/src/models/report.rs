use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::month::Month;

/// Running balance per account id.
pub type Balances = BTreeMap<String, f64>;

/// Month filter for period aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Period {
    All,
    Year { year: i32 },
    /// Inclusive on both ends.
    Range { start: Month, end: Month },
}

impl Period {
    pub fn contains(&self, month: &Month) -> bool {
        match self {
            Period::All => true,
            Period::Year { year } => month.year() == *year,
            Period::Range { start, end } => start <= month && month <= end,
        }
    }
}

/// Income/expense totals over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
    /// income − expense
    pub balance: f64,
    /// Stored months that fell inside the period, ascending.
    pub months: Vec<Month>,
}

/// One row of a per-month income/expense series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub month: Month,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

/// Account balances as of the end of `month`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub month: Month,
    pub balances: Balances,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PoolResetDirection {
    PoolToSave,
    SaveToPool,
}

/// Preview of the annual pool sweep for a reset month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolReset {
    /// Absolute pre-reset pool balance.
    pub amount: f64,
    pub direction: PoolResetDirection,
}

/// Budget against actual spend for one expense category in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetStatus {
    pub category_id: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub over_budget: bool,
}

/// Resolved budget figures for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub month: Month,
    pub salary: f64,
    pub total_budgeted_expense: f64,
    pub allocations: BTreeMap<String, f64>,
    pub total_allocations: f64,
    /// May be negative when over-allocated.
    pub unallocated: f64,
    pub settings_effective_date: Option<Month>,
}

/// What `apply_recurrings` wrote into a month.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedRecurrings {
    pub entries: usize,
    pub transfers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SankeyNodeKind {
    Income,
    Expense,
    Account,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyNode {
    pub id: String,
    pub name: String,
    pub kind: SankeyNodeKind,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SankeyData {
    pub nodes: Vec<SankeyNode>,
    pub links: Vec<SankeyLink>,
}

/// One end of an account flow arrow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "type", content = "id")]
pub enum FlowEndpoint {
    Income,
    Expense,
    Account(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    Income,
    Transfer,
    Expense,
    Settlement,
    PoolReset,
}

/// A single money movement within a month, explicit or derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountFlow {
    pub from: FlowEndpoint,
    pub to: FlowEndpoint,
    pub amount: f64,
    pub kind: FlowKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
