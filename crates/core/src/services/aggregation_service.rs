use std::collections::BTreeMap;

use crate::models::category::EntryKind;
use crate::models::ledger::Ledger;
use crate::models::month::Month;
use crate::models::report::{MonthlySummary, Period, PeriodTotals};
use crate::services::flow_service::FlowService;

/// Sums a month's income and expense records.
///
/// A month with no stored record behaves as an empty one: every total is 0.
pub struct AggregationService {
    flow_service: FlowService,
}

impl AggregationService {
    pub fn new() -> Self {
        Self {
            flow_service: FlowService::new(),
        }
    }

    /// Sum of every entry on one side of a month.
    pub fn total(&self, ledger: &Ledger, kind: EntryKind, month: &Month) -> f64 {
        ledger
            .month(month)
            .map(|data| data.entries(kind).values().map(|a| a.total()).sum())
            .unwrap_or(0.0)
    }

    pub fn total_income(&self, ledger: &Ledger, month: &Month) -> f64 {
        self.total(ledger, EntryKind::Income, month)
    }

    pub fn total_expense(&self, ledger: &Ledger, month: &Month) -> f64 {
        self.total(ledger, EntryKind::Expense, month)
    }

    /// Total of one category in one month, 0 if absent.
    pub fn category_total(&self, ledger: &Ledger, kind: EntryKind, category_id: &str, month: &Month) -> f64 {
        ledger
            .month(month)
            .and_then(|data| data.entries(kind).get(category_id))
            .map(|a| a.total())
            .unwrap_or(0.0)
    }

    /// Breakdown value of one sub-category. Flat entries yield 0.
    pub fn subcategory_total(
        &self,
        ledger: &Ledger,
        kind: EntryKind,
        category_id: &str,
        subcategory_id: &str,
        month: &Month,
    ) -> f64 {
        ledger
            .month(month)
            .and_then(|data| data.entries(kind).get(category_id))
            .map(|a| a.sub_amount(subcategory_id))
            .unwrap_or(0.0)
    }

    /// Sum of entries whose flow rule routes them to/from `account_id`.
    pub fn account_filtered_total(&self, ledger: &Ledger, month: &Month, kind: EntryKind, account_id: &str) -> f64 {
        let Some(data) = ledger.month(month) else {
            return 0.0;
        };
        data.entries(kind)
            .iter()
            .filter(|(category_id, _)| self.flow_service.account_for(ledger, kind, category_id) == account_id)
            .map(|(_, amount)| amount.total())
            .sum()
    }

    /// Routed totals for every account that received or paid something.
    pub fn totals_by_account(&self, ledger: &Ledger, month: &Month, kind: EntryKind) -> BTreeMap<String, f64> {
        let mut totals = BTreeMap::new();
        if let Some(data) = ledger.month(month) {
            for (category_id, amount) in data.entries(kind) {
                let account = self.flow_service.account_for(ledger, kind, category_id);
                *totals.entry(account.to_string()).or_insert(0.0) += amount.total();
            }
        }
        totals
    }

    /// Income routed to the primary account minus expense paid from it.
    ///
    /// Entries routed elsewhere by a flow rule are excluded; this is the
    /// amount swept to or from savings at month end (before transfers).
    pub fn monthly_balance(&self, ledger: &Ledger, month: &Month) -> f64 {
        let primary = ledger.settings.roles.primary.as_str();
        self.account_filtered_total(ledger, month, EntryKind::Income, primary)
            - self.account_filtered_total(ledger, month, EntryKind::Expense, primary)
    }

    /// Income, expense and balance across every stored month in `period`.
    pub fn period_totals(&self, ledger: &Ledger, period: &Period) -> PeriodTotals {
        let mut income = 0.0;
        let mut expense = 0.0;
        let mut months = Vec::new();

        for month in ledger.stored_months().filter(|m| period.contains(m)) {
            income += self.total_income(ledger, month);
            expense += self.total_expense(ledger, month);
            months.push(month.clone());
        }

        PeriodTotals {
            income,
            expense,
            balance: income - expense,
            months,
        }
    }

    /// One summary row per stored month in `period`, ascending.
    pub fn monthly_series(&self, ledger: &Ledger, period: &Period) -> Vec<MonthlySummary> {
        ledger
            .stored_months()
            .filter(|m| period.contains(m))
            .map(|month| {
                let income = self.total_income(ledger, month);
                let expense = self.total_expense(ledger, month);
                MonthlySummary {
                    month: month.clone(),
                    income,
                    expense,
                    balance: income - expense,
                }
            })
            .collect()
    }
}

impl Default for AggregationService {
    fn default() -> Self {
        Self::new()
    }
}
