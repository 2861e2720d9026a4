use std::collections::BTreeMap;

use crate::models::account::FlowRule;
use crate::models::category::EntryKind;
use crate::models::ledger::Ledger;

/// Maps a category to the account its money lands in (income) or leaves
/// from (expense).
pub struct FlowService;

impl FlowService {
    pub fn new() -> Self {
        Self
    }

    /// The rule's `to_account` for income or `from_account` for expense,
    /// falling back to `default_account` when absent or empty.
    pub fn resolve_account<'a>(
        &self,
        rules: &'a BTreeMap<String, FlowRule>,
        category_id: &str,
        kind: EntryKind,
        default_account: &'a str,
    ) -> &'a str {
        rules
            .get(category_id)
            .and_then(|rule| match kind {
                EntryKind::Income => rule.to_account.as_deref(),
                EntryKind::Expense => rule.from_account.as_deref(),
            })
            .filter(|id| !id.is_empty())
            .unwrap_or(default_account)
    }

    /// Account for `category_id` under the ledger's rules, defaulting to
    /// the primary role.
    pub fn account_for<'a>(&self, ledger: &'a Ledger, kind: EntryKind, category_id: &str) -> &'a str {
        self.resolve_account(
            ledger.flow_rules.of(kind),
            category_id,
            kind,
            &ledger.settings.roles.primary,
        )
    }
}

impl Default for FlowService {
    fn default() -> Self {
        Self::new()
    }
}
