use std::collections::BTreeMap;

use crate::models::amount::CategoryAmount;
use crate::models::category::{active_categories, EntryKind};
use crate::models::ledger::Ledger;
use crate::models::month::Month;
use crate::models::report::{BudgetStatus, BudgetSummary};
use crate::services::aggregation_service::AggregationService;

/// Resolves salary, category budgets and account allocations for a month
/// from their effective-dated histories.
///
/// Independent of the balance projection. Pure business logic, no I/O.
pub struct BudgetService {
    aggregation_service: AggregationService,
}

impl BudgetService {
    pub fn new() -> Self {
        Self {
            aggregation_service: AggregationService::new(),
        }
    }

    // ── Resolution ──────────────────────────────────────────────────

    /// Salary history at `month`, else the legacy base salary, else 0.
    pub fn resolved_salary(&self, ledger: &Ledger, month: &Month) -> f64 {
        let budget = &ledger.budget;
        budget
            .salary_history
            .resolve(month)
            .copied()
            .or(budget.base_salary)
            .unwrap_or(0.0)
    }

    /// Budget amount for a category at `month`: its history first, then
    /// the legacy flat map.
    pub fn resolved_category_amount<'a>(
        &self,
        ledger: &'a Ledger,
        category_id: &str,
        month: &Month,
    ) -> Option<&'a CategoryAmount> {
        let budget = &ledger.budget;
        budget
            .expense_history
            .get(category_id)
            .and_then(|history| history.resolve(month))
            .or_else(|| budget.expense.get(category_id))
    }

    pub fn resolved_category_budget(&self, ledger: &Ledger, category_id: &str, month: &Month) -> f64 {
        self.resolved_category_amount(ledger, category_id, month)
            .map(CategoryAmount::total)
            .unwrap_or(0.0)
    }

    /// Sub-category budget; 0 when the resolved budget is a flat figure.
    pub fn resolved_subcategory_budget(
        &self,
        ledger: &Ledger,
        category_id: &str,
        subcategory_id: &str,
        month: &Month,
    ) -> f64 {
        self.resolved_category_amount(ledger, category_id, month)
            .map(|amount| amount.sub_amount(subcategory_id))
            .unwrap_or(0.0)
    }

    /// Positive allocations per account at `month`.
    ///
    /// The legacy flat map is used only when no account resolves at all.
    pub fn resolved_allocations(&self, ledger: &Ledger, month: &Month) -> BTreeMap<String, f64> {
        let budget = &ledger.budget;
        let resolved: BTreeMap<String, f64> = budget
            .allocation_history
            .iter()
            .filter_map(|(account_id, history)| {
                history
                    .resolve(month)
                    .copied()
                    .filter(|amount| *amount > 0.0)
                    .map(|amount| (account_id.clone(), amount))
            })
            .collect();

        match &budget.account_allocations {
            Some(legacy) if resolved.is_empty() => legacy.clone(),
            _ => resolved,
        }
    }

    pub fn total_allocations(&self, ledger: &Ledger, month: &Month) -> f64 {
        self.resolved_allocations(ledger, month).values().sum()
    }

    /// Sum of resolved budgets over every expense category.
    pub fn total_budgeted_expense(&self, ledger: &Ledger, month: &Month) -> f64 {
        ledger
            .categories
            .expense
            .iter()
            .map(|c| self.resolved_category_budget(ledger, &c.id, month))
            .sum()
    }

    /// Salary left after budgets and allocations. Negative when over-allocated.
    pub fn unallocated(&self, ledger: &Ledger, month: &Month) -> f64 {
        self.resolved_salary(ledger, month)
            - self.total_budgeted_expense(ledger, month)
            - self.total_allocations(ledger, month)
    }

    /// Latest `start_month <= month` across salary, expense and allocation
    /// histories.
    pub fn settings_effective_date(&self, ledger: &Ledger, month: &Month) -> Option<Month> {
        let budget = &ledger.budget;
        let salary = budget.salary_history.latest_start_at_or_before(month);
        let expense = budget
            .expense_history
            .values()
            .filter_map(|h| h.latest_start_at_or_before(month));
        let allocation = budget
            .allocation_history
            .values()
            .filter_map(|h| h.latest_start_at_or_before(month));

        salary.into_iter().chain(expense).chain(allocation).max().cloned()
    }

    /// Every resolved figure for `month` in one record.
    pub fn budget_summary(&self, ledger: &Ledger, month: &Month) -> BudgetSummary {
        let allocations = self.resolved_allocations(ledger, month);
        let total_allocations = allocations.values().sum();
        let salary = self.resolved_salary(ledger, month);
        let total_budgeted_expense = self.total_budgeted_expense(ledger, month);

        BudgetSummary {
            month: month.clone(),
            salary,
            total_budgeted_expense,
            allocations,
            total_allocations,
            unallocated: salary - total_budgeted_expense - total_allocations,
            settings_effective_date: self.settings_effective_date(ledger, month),
        }
    }

    /// Budget against actual spend for each expense category active in `month`.
    pub fn budget_status(&self, ledger: &Ledger, month: &Month) -> Vec<BudgetStatus> {
        active_categories(&ledger.categories.expense, month)
            .into_iter()
            .map(|category| {
                let budget = self.resolved_category_budget(ledger, &category.id, month);
                let spent = self
                    .aggregation_service
                    .category_total(ledger, EntryKind::Expense, &category.id, month);
                BudgetStatus {
                    category_id: category.id,
                    budget,
                    spent,
                    remaining: budget - spent,
                    over_budget: spent > budget,
                }
            })
            .collect()
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Salary effective from `month`.
    pub fn set_salary(&self, ledger: &mut Ledger, month: Month, amount: f64) {
        ledger.budget.salary_history.upsert(month, amount);
    }

    /// Category budget effective from `month`.
    pub fn set_category_budget(&self, ledger: &mut Ledger, category_id: &str, month: Month, amount: CategoryAmount) {
        ledger
            .budget
            .expense_history
            .entry(category_id.to_string())
            .or_default()
            .upsert(month, amount);
    }

    /// Set one sub-category's budget from `month`, keeping the other
    /// sub-items of the budget in effect at that month. A flat budget is
    /// replaced by a fresh breakdown.
    pub fn set_subcategory_budget(
        &self,
        ledger: &mut Ledger,
        category_id: &str,
        subcategory_id: &str,
        month: Month,
        amount: f64,
    ) {
        let mut items = match self.resolved_category_amount(ledger, category_id, &month) {
            Some(CategoryAmount::Breakdown(items)) => items.clone(),
            _ => BTreeMap::new(),
        };
        items.insert(subcategory_id.to_string(), amount);
        self.set_category_budget(ledger, category_id, month, CategoryAmount::Breakdown(items));
    }

    /// Allocation to `account_id` effective from `month`.
    pub fn set_allocation(&self, ledger: &mut Ledger, account_id: &str, month: Month, amount: f64) {
        ledger
            .budget
            .allocation_history
            .entry(account_id.to_string())
            .or_default()
            .upsert(month, amount);
    }
}

impl Default for BudgetService {
    fn default() -> Self {
        Self::new()
    }
}
