pub mod errors;
pub mod models;
pub mod services;

use std::collections::BTreeMap;

use models::{
    account::{Account, AccountRoles, FlowRule},
    amount::CategoryAmount,
    category::{active_categories, ActiveWindow, Category, CategoryKind, EntryKind},
    ledger::Ledger,
    month::Month,
    monthly::{MonthlyData, Transfer},
    recurring::{Recurring, RecurringTransfer},
    report::{
        AccountFlow, AppliedRecurrings, BalanceSnapshot, Balances, BudgetStatus, BudgetSummary,
        MonthlySummary, Period, PeriodTotals, PoolReset, SankeyData,
    },
    settings::Settings,
};
use services::{
    aggregation_service::AggregationService, balance_service::BalanceService,
    budget_service::BudgetService, flow_graph_service::FlowGraphService,
    recurring_service::RecurringService,
};
use tracing::info;

use errors::CoreError;

/// Main entry point for the household-ledger core library.
///
/// Owns the ledger data, validates every mutation and delegates all reads to
/// the pure services. Persisting the data is the caller's job: serialize
/// with `to_json` whenever `has_unsaved_changes` reports a mutation.
#[must_use]
pub struct HouseholdLedger {
    ledger: Ledger,
    aggregation_service: AggregationService,
    balance_service: BalanceService,
    budget_service: BudgetService,
    recurring_service: RecurringService,
    flow_graph_service: FlowGraphService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for HouseholdLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HouseholdLedger")
            .field("accounts", &self.ledger.accounts.len())
            .field("months", &self.ledger.months.len())
            .field("settings", &self.ledger.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl HouseholdLedger {
    /// A new ledger with starter categories and the three role accounts.
    pub fn create_new() -> Self {
        Self::build(Ledger::starter())
    }

    /// Wrap already-loaded ledger data.
    ///
    /// Rejects more than one `is_default` account, an out-of-range pool
    /// reset month and invalid stored amounts. The primary role follows the
    /// `is_default` account.
    pub fn from_ledger(mut ledger: Ledger) -> Result<Self, CoreError> {
        Self::validate_ledger(&ledger)?;
        ledger.settings.roles.sync_primary(&ledger.accounts);
        Ok(Self::build(ledger))
    }

    /// Load a ledger snapshot produced by `to_json`.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let ledger: Ledger = serde_json::from_str(json)?;
        info!(
            accounts = ledger.accounts.len(),
            months = ledger.months.len(),
            "loaded ledger snapshot"
        );
        Self::from_ledger(ledger)
    }

    /// Serialize the whole ledger as pretty JSON.
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.ledger)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    /// Serialize a single month record (empty if nothing is stored).
    pub fn export_month_json(&self, month: &Month) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.month_data(month))
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize month {month}: {e}")))
    }

    #[must_use]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns `true` if the ledger has been modified since load or `mark_saved`.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Clear the unsaved-changes flag after the caller has persisted the data.
    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ── Categories ──────────────────────────────────────────────────

    pub fn add_category(&mut self, kind: CategoryKind, category: Category) -> Result<(), CoreError> {
        if category.id.trim().is_empty() {
            return Err(CoreError::ValidationError("Category id must not be empty".into()));
        }
        if self.ledger.categories.find(kind, &category.id).is_some() {
            return Err(CoreError::DuplicateId(category.id));
        }
        Self::validate_window(&category.window)?;
        for sub in &category.subcategories {
            Self::validate_window(&sub.window)?;
        }
        self.ledger.categories.of_mut(kind).push(category);
        self.dirty = true;
        Ok(())
    }

    /// Set the active window of a category, or of one of its sub-categories
    /// when `subcategory_id` is given.
    pub fn update_category_window(
        &mut self,
        kind: CategoryKind,
        category_id: &str,
        subcategory_id: Option<&str>,
        window: ActiveWindow,
    ) -> Result<(), CoreError> {
        Self::validate_window(&window)?;
        let category = self
            .ledger
            .categories
            .of_mut(kind)
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;

        match subcategory_id {
            Some(sub_id) => {
                let sub = category
                    .subcategories
                    .iter_mut()
                    .find(|s| s.id == sub_id)
                    .ok_or_else(|| CoreError::CategoryNotFound(format!("{category_id}/{sub_id}")))?;
                sub.window = window;
            }
            None => category.window = window,
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove a category. Stored month entries for it are left untouched.
    pub fn remove_category(&mut self, kind: CategoryKind, category_id: &str) -> Result<Category, CoreError> {
        let categories = self.ledger.categories.of_mut(kind);
        let idx = categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))?;
        let removed = categories.remove(idx);
        self.dirty = true;
        Ok(removed)
    }

    /// Categories of `kind` active in `month`, with only active sub-categories.
    #[must_use]
    pub fn active_categories(&self, kind: CategoryKind, month: &Month) -> Vec<Category> {
        active_categories(self.ledger.categories.of(kind), month)
    }

    // ── Accounts & Flow Rules ───────────────────────────────────────

    pub fn add_account(&mut self, account: Account) -> Result<(), CoreError> {
        if account.id.trim().is_empty() {
            return Err(CoreError::ValidationError("Account id must not be empty".into()));
        }
        if self.ledger.has_account(&account.id) {
            return Err(CoreError::DuplicateId(account.id));
        }
        if account.is_default {
            if let Some(current) = self.ledger.accounts.iter().find(|a| a.is_default) {
                return Err(CoreError::ValidationError(format!(
                    "Account '{}' is already the default; change roles with set_roles",
                    current.id
                )));
            }
            self.ledger.settings.roles.primary = account.id.clone();
        }
        self.ledger.accounts.push(account);
        self.dirty = true;
        Ok(())
    }

    /// Remove an account. History that references it is kept; the
    /// projection skips those references from then on.
    pub fn remove_account(&mut self, account_id: &str) -> Result<Account, CoreError> {
        let idx = self
            .ledger
            .accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))?;
        let removed = self.ledger.accounts.remove(idx);
        self.dirty = true;
        Ok(removed)
    }

    /// Route a category's income to, or expense from, a specific account.
    pub fn set_flow_rule(&mut self, kind: EntryKind, category_id: &str, rule: FlowRule) -> Result<(), CoreError> {
        let target = match kind {
            EntryKind::Income => rule.to_account.as_deref(),
            EntryKind::Expense => rule.from_account.as_deref(),
        };
        if let Some(account_id) = target.filter(|id| !id.is_empty()) {
            self.require_account(account_id)?;
        }
        self.ledger
            .flow_rules
            .of_mut(kind)
            .insert(category_id.to_string(), rule);
        self.dirty = true;
        Ok(())
    }

    /// Drop a flow rule so the category falls back to the primary account.
    pub fn clear_flow_rule(&mut self, kind: EntryKind, category_id: &str) -> bool {
        let removed = self.ledger.flow_rules.of_mut(kind).remove(category_id).is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Replace the account roles. The primary must be an existing account
    /// and takes over the `is_default` flag.
    pub fn set_roles(&mut self, roles: AccountRoles) -> Result<(), CoreError> {
        self.require_account(&roles.primary)?;
        for account in &mut self.ledger.accounts {
            account.is_default = account.id == roles.primary;
        }
        self.ledger.settings.roles = roles;
        self.dirty = true;
        Ok(())
    }

    /// Month number (1–12) in which the pool account is swept into savings.
    pub fn set_pool_reset_month(&mut self, month_number: u32) -> Result<(), CoreError> {
        Self::validate_pool_reset_month(month_number)?;
        self.ledger.settings.pool_reset_month = month_number;
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.ledger.settings
    }

    // ── Monthly Records ─────────────────────────────────────────────

    /// The stored record for `month`, or an empty one.
    #[must_use]
    pub fn month_data(&self, month: &Month) -> MonthlyData {
        self.ledger
            .month(month)
            .cloned()
            .unwrap_or_else(|| MonthlyData::empty(month.clone()))
    }

    /// Write (or overwrite) a category's amount for a month.
    pub fn set_entry(
        &mut self,
        kind: EntryKind,
        month: &Month,
        category_id: &str,
        amount: CategoryAmount,
    ) -> Result<(), CoreError> {
        Self::validate_category_amount(&amount)?;
        if self.ledger.categories.find(kind.into(), category_id).is_none() {
            return Err(CoreError::CategoryNotFound(category_id.to_string()));
        }
        self.ledger
            .month_mut(month)
            .entries_mut(kind)
            .insert(category_id.to_string(), amount);
        self.dirty = true;
        Ok(())
    }

    pub fn remove_entry(&mut self, kind: EntryKind, month: &Month, category_id: &str) -> Option<CategoryAmount> {
        let removed = self
            .ledger
            .months
            .get_mut(month)
            .and_then(|data| data.entries_mut(kind).remove(category_id));
        if removed.is_some() {
            self.dirty = true;
        }
        removed
    }

    pub fn add_transfer(&mut self, month: &Month, transfer: Transfer) -> Result<(), CoreError> {
        self.validate_transfer(&transfer.from, &transfer.to, transfer.amount)?;
        self.ledger.month_mut(month).transfers.push(transfer);
        self.dirty = true;
        Ok(())
    }

    /// Remove the transfer at `index` within `month`.
    pub fn remove_transfer(&mut self, month: &Month, index: usize) -> Result<Transfer, CoreError> {
        let data = self
            .ledger
            .months
            .get_mut(month)
            .filter(|d| index < d.transfers.len())
            .ok_or_else(|| CoreError::TransferNotFound {
                month: month.to_string(),
                index,
            })?;
        let removed = data.transfers.remove(index);
        self.dirty = true;
        Ok(removed)
    }

    // ── Aggregates ──────────────────────────────────────────────────

    #[must_use]
    pub fn total_income(&self, month: &Month) -> f64 {
        self.aggregation_service.total_income(&self.ledger, month)
    }

    #[must_use]
    pub fn total_expense(&self, month: &Month) -> f64 {
        self.aggregation_service.total_expense(&self.ledger, month)
    }

    #[must_use]
    pub fn category_total(&self, kind: EntryKind, category_id: &str, month: &Month) -> f64 {
        self.aggregation_service
            .category_total(&self.ledger, kind, category_id, month)
    }

    #[must_use]
    pub fn subcategory_total(&self, kind: EntryKind, category_id: &str, subcategory_id: &str, month: &Month) -> f64 {
        self.aggregation_service
            .subcategory_total(&self.ledger, kind, category_id, subcategory_id, month)
    }

    #[must_use]
    pub fn account_filtered_total(&self, month: &Month, kind: EntryKind, account_id: &str) -> f64 {
        self.aggregation_service
            .account_filtered_total(&self.ledger, month, kind, account_id)
    }

    #[must_use]
    pub fn monthly_balance(&self, month: &Month) -> f64 {
        self.aggregation_service.monthly_balance(&self.ledger, month)
    }

    #[must_use]
    pub fn period_totals(&self, period: &Period) -> PeriodTotals {
        self.aggregation_service.period_totals(&self.ledger, period)
    }

    #[must_use]
    pub fn monthly_series(&self, period: &Period) -> Vec<MonthlySummary> {
        self.aggregation_service.monthly_series(&self.ledger, period)
    }

    // ── Balances ────────────────────────────────────────────────────

    #[must_use]
    pub fn all_balances(&self) -> Balances {
        self.balance_service.all_balances(&self.ledger)
    }

    #[must_use]
    pub fn balances_up_to(&self, month: &Month) -> Balances {
        self.balance_service.balances_up_to(&self.ledger, month)
    }

    #[must_use]
    pub fn balance_of(&self, account_id: &str, month: Option<&Month>) -> Option<f64> {
        self.balance_service.balance_of(&self.ledger, account_id, month)
    }

    #[must_use]
    pub fn balance_timeline(&self) -> Vec<BalanceSnapshot> {
        self.balance_service.balance_timeline(&self.ledger)
    }

    #[must_use]
    pub fn monthly_settlement(&self, month: &Month) -> f64 {
        self.balance_service.monthly_settlement(&self.ledger, month)
    }

    #[must_use]
    pub fn pool_yearly_reset(&self, month: &Month) -> Option<PoolReset> {
        self.balance_service.pool_yearly_reset(&self.ledger, month)
    }

    // ── Budgets ─────────────────────────────────────────────────────

    #[must_use]
    pub fn resolved_salary(&self, month: &Month) -> f64 {
        self.budget_service.resolved_salary(&self.ledger, month)
    }

    #[must_use]
    pub fn resolved_category_budget(&self, category_id: &str, month: &Month) -> f64 {
        self.budget_service
            .resolved_category_budget(&self.ledger, category_id, month)
    }

    #[must_use]
    pub fn resolved_subcategory_budget(&self, category_id: &str, subcategory_id: &str, month: &Month) -> f64 {
        self.budget_service
            .resolved_subcategory_budget(&self.ledger, category_id, subcategory_id, month)
    }

    #[must_use]
    pub fn resolved_allocations(&self, month: &Month) -> BTreeMap<String, f64> {
        self.budget_service.resolved_allocations(&self.ledger, month)
    }

    #[must_use]
    pub fn total_budgeted_expense(&self, month: &Month) -> f64 {
        self.budget_service.total_budgeted_expense(&self.ledger, month)
    }

    #[must_use]
    pub fn unallocated(&self, month: &Month) -> f64 {
        self.budget_service.unallocated(&self.ledger, month)
    }

    #[must_use]
    pub fn settings_effective_date(&self, month: &Month) -> Option<Month> {
        self.budget_service.settings_effective_date(&self.ledger, month)
    }

    #[must_use]
    pub fn budget_summary(&self, month: &Month) -> BudgetSummary {
        self.budget_service.budget_summary(&self.ledger, month)
    }

    #[must_use]
    pub fn budget_status(&self, month: &Month) -> Vec<BudgetStatus> {
        self.budget_service.budget_status(&self.ledger, month)
    }

    pub fn set_salary(&mut self, month: Month, amount: f64) -> Result<(), CoreError> {
        Self::validate_amount(amount)?;
        self.budget_service.set_salary(&mut self.ledger, month, amount);
        self.dirty = true;
        Ok(())
    }

    pub fn set_category_budget(&mut self, category_id: &str, month: Month, amount: CategoryAmount) -> Result<(), CoreError> {
        Self::validate_category_amount(&amount)?;
        self.require_category(CategoryKind::Expense, category_id)?;
        self.budget_service
            .set_category_budget(&mut self.ledger, category_id, month, amount);
        self.dirty = true;
        Ok(())
    }

    pub fn set_subcategory_budget(
        &mut self,
        category_id: &str,
        subcategory_id: &str,
        month: Month,
        amount: f64,
    ) -> Result<(), CoreError> {
        Self::validate_amount(amount)?;
        let category = self.require_category(CategoryKind::Expense, category_id)?;
        if !category.subcategories.iter().any(|s| s.id == subcategory_id) {
            return Err(CoreError::CategoryNotFound(format!("{category_id}/{subcategory_id}")));
        }
        self.budget_service
            .set_subcategory_budget(&mut self.ledger, category_id, subcategory_id, month, amount);
        self.dirty = true;
        Ok(())
    }

    pub fn set_allocation(&mut self, account_id: &str, month: Month, amount: f64) -> Result<(), CoreError> {
        Self::validate_amount(amount)?;
        self.require_account(account_id)?;
        self.budget_service
            .set_allocation(&mut self.ledger, account_id, month, amount);
        self.dirty = true;
        Ok(())
    }

    // ── Recurring Items ─────────────────────────────────────────────

    /// Register a recurring income/expense item. Returns its id.
    pub fn add_recurring(&mut self, recurring: Recurring) -> Result<String, CoreError> {
        Self::validate_category_amount(&recurring.amount)?;
        self.require_category(recurring.kind.into(), &recurring.category_id)?;
        if self.ledger.recurrings.items.iter().any(|r| r.id == recurring.id) {
            return Err(CoreError::DuplicateId(recurring.id));
        }
        let id = recurring.id.clone();
        self.ledger.recurrings.items.push(recurring);
        self.dirty = true;
        Ok(id)
    }

    /// Register a recurring transfer. Returns its id.
    pub fn add_recurring_transfer(&mut self, transfer: RecurringTransfer) -> Result<String, CoreError> {
        self.validate_transfer(&transfer.from, &transfer.to, transfer.amount)?;
        if self.ledger.recurrings.transfers.iter().any(|t| t.id == transfer.id) {
            return Err(CoreError::DuplicateId(transfer.id));
        }
        let id = transfer.id.clone();
        self.ledger.recurrings.transfers.push(transfer);
        self.dirty = true;
        Ok(id)
    }

    /// Enable or disable a recurring item or recurring transfer by id.
    pub fn set_recurring_enabled(&mut self, id: &str, enabled: bool) -> Result<(), CoreError> {
        let recurrings = &mut self.ledger.recurrings;
        if let Some(item) = recurrings.items.iter_mut().find(|r| r.id == id) {
            item.enabled = enabled;
        } else if let Some(transfer) = recurrings.transfers.iter_mut().find(|t| t.id == id) {
            transfer.enabled = enabled;
        } else {
            return Err(CoreError::RecurringNotFound(id.to_string()));
        }
        self.dirty = true;
        Ok(())
    }

    /// Remove a recurring item or recurring transfer by id.
    pub fn remove_recurring(&mut self, id: &str) -> Result<(), CoreError> {
        let recurrings = &mut self.ledger.recurrings;
        let before = recurrings.items.len() + recurrings.transfers.len();
        recurrings.items.retain(|r| r.id != id);
        recurrings.transfers.retain(|t| t.id != id);
        if recurrings.items.len() + recurrings.transfers.len() == before {
            return Err(CoreError::RecurringNotFound(id.to_string()));
        }
        self.dirty = true;
        Ok(())
    }

    /// Write every enabled recurring item into `month`.
    ///
    /// Entries are overwritten; transfers are appended on every call.
    pub fn apply_recurrings(&mut self, month: &Month) -> AppliedRecurrings {
        let applied = self.recurring_service.apply(&mut self.ledger, month);
        if applied.entries > 0 || applied.transfers > 0 {
            info!(
                month = %month,
                entries = applied.entries,
                transfers = applied.transfers,
                "applied recurring items"
            );
            self.dirty = true;
        }
        applied
    }

    // ── Flow Graphs ─────────────────────────────────────────────────

    #[must_use]
    pub fn sankey(&self, month: &Month) -> SankeyData {
        self.flow_graph_service.sankey(&self.ledger, month)
    }

    #[must_use]
    pub fn account_flows(&self, month: &Month) -> Vec<AccountFlow> {
        self.flow_graph_service.account_flows(&self.ledger, month)
    }

    // ── Internal ────────────────────────────────────────────────────

    fn require_account(&self, account_id: &str) -> Result<&Account, CoreError> {
        self.ledger
            .account(account_id)
            .ok_or_else(|| CoreError::AccountNotFound(account_id.to_string()))
    }

    fn require_category(&self, kind: CategoryKind, category_id: &str) -> Result<&Category, CoreError> {
        self.ledger
            .categories
            .find(kind, category_id)
            .ok_or_else(|| CoreError::CategoryNotFound(category_id.to_string()))
    }

    fn validate_amount(amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Amount must be a non-negative number, got {amount}"
            )));
        }
        Ok(())
    }

    fn validate_pool_reset_month(month_number: u32) -> Result<(), CoreError> {
        if !(1..=12).contains(&month_number) {
            return Err(CoreError::ValidationError(format!(
                "Pool reset month must be between 1 and 12, got {month_number}"
            )));
        }
        Ok(())
    }

    /// Checks applied to a whole ledger on load.
    fn validate_ledger(ledger: &Ledger) -> Result<(), CoreError> {
        let defaults: Vec<&str> = ledger
            .accounts
            .iter()
            .filter(|a| a.is_default)
            .map(|a| a.id.as_str())
            .collect();
        if defaults.len() > 1 {
            return Err(CoreError::ValidationError(format!(
                "Only one default account is allowed, found {}",
                defaults.join(", ")
            )));
        }
        Self::validate_pool_reset_month(ledger.settings.pool_reset_month)?;

        for (month, data) in &ledger.months {
            let mut entries = data.income.values().chain(data.expense.values());
            if entries.any(|amount| !amount.is_valid()) {
                return Err(CoreError::ValidationError(format!(
                    "Month {month} holds a negative or non-finite amount"
                )));
            }
            if data.transfers.iter().any(|t| !t.amount.is_finite() || t.amount <= 0.0) {
                return Err(CoreError::ValidationError(format!(
                    "Month {month} holds a transfer with a non-positive amount"
                )));
            }
        }
        Ok(())
    }

    fn validate_category_amount(amount: &CategoryAmount) -> Result<(), CoreError> {
        if !amount.is_valid() {
            return Err(CoreError::ValidationError(
                "Amounts must be non-negative numbers".into(),
            ));
        }
        Ok(())
    }

    fn validate_window(window: &ActiveWindow) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (&window.start_month, &window.end_month) {
            if start > end {
                return Err(CoreError::ValidationError(format!(
                    "Start month {start} is after end month {end}"
                )));
            }
        }
        Ok(())
    }

    fn validate_transfer(&self, from: &str, to: &str, amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::ValidationError("Transfer amount must be positive".into()));
        }
        if from == to {
            return Err(CoreError::ValidationError(format!(
                "Transfer source and destination are both '{from}'"
            )));
        }
        self.require_account(from)?;
        self.require_account(to)?;
        Ok(())
    }

    fn build(ledger: Ledger) -> Self {
        Self {
            ledger,
            aggregation_service: AggregationService::new(),
            balance_service: BalanceService::new(),
            budget_service: BudgetService::new(),
            recurring_service: RecurringService::new(),
            flow_graph_service: FlowGraphService::new(),
            dirty: false,
        }
    }
}
