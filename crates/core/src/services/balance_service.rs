use tracing::{debug, warn};

use crate::models::category::EntryKind;
use crate::models::ledger::Ledger;
use crate::models::month::Month;
use crate::models::monthly::{MonthlyData, Transfer};
use crate::models::report::{BalanceSnapshot, Balances, PoolReset, PoolResetDirection};
use crate::services::aggregation_service::AggregationService;
use crate::services::flow_service::FlowService;

/// Replays the monthly history in order to derive account balances.
///
/// Each stored month is applied in a fixed sequence:
/// 1. income entries credit their routed account
/// 2. expense entries debit their routed account
/// 3. explicit transfers move money between two tracked accounts
/// 4. the primary account's net for the month is settled into savings
/// 5. in the reset month, the pool balance is swept into savings
///
/// References to accounts that do not exist are skipped with a warning.
/// Every call replays from the initial balances, so the cost is
/// O(months × accounts); use `balance_timeline` for many months at once.
pub struct BalanceService {
    aggregation_service: AggregationService,
    flow_service: FlowService,
}

impl BalanceService {
    pub fn new() -> Self {
        Self {
            aggregation_service: AggregationService::new(),
            flow_service: FlowService::new(),
        }
    }

    /// Balances after replaying every stored month.
    pub fn all_balances(&self, ledger: &Ledger) -> Balances {
        self.replay(ledger, None, None)
    }

    /// Balances after replaying every stored month up to and including `month`.
    pub fn balances_up_to(&self, ledger: &Ledger, month: &Month) -> Balances {
        self.replay(ledger, Some(month), None)
    }

    /// Balance of one account, as of `month` or after all months.
    pub fn balance_of(&self, ledger: &Ledger, account_id: &str, month: Option<&Month>) -> Option<f64> {
        let balances = match month {
            Some(m) => self.balances_up_to(ledger, m),
            None => self.all_balances(ledger),
        };
        balances.get(account_id).copied()
    }

    /// One snapshot per stored month, computed in a single pass.
    pub fn balance_timeline(&self, ledger: &Ledger) -> Vec<BalanceSnapshot> {
        let mut balances = self.initial_balances(ledger);
        let mut timeline = Vec::with_capacity(ledger.months.len());

        for (month, data) in &ledger.months {
            self.apply_month(ledger, &mut balances, month, data, true);
            timeline.push(BalanceSnapshot {
                month: month.clone(),
                balances: balances.clone(),
            });
        }

        timeline
    }

    /// Amount moved from primary into savings at the end of `month`
    /// (negative when savings covers a primary deficit).
    ///
    /// Equals `monthly_balance` minus applied transfers out of primary
    /// plus applied transfers into primary.
    pub fn monthly_settlement(&self, ledger: &Ledger, month: &Month) -> f64 {
        match ledger.month(month) {
            Some(data) => self.settlement_amount(ledger, month, data),
            None => 0.0,
        }
    }

    /// True when `month` is the configured pool reset month.
    pub fn is_reset_month(&self, ledger: &Ledger, month: &Month) -> bool {
        month.month_number() == ledger.settings.pool_reset_month
    }

    /// Pre-reset pool balance for a reset month.
    ///
    /// Replays through `month` without that month's pool sweep. `None` when
    /// `month` is not a reset month, has no stored record (the replay only
    /// sweeps stored months), the pool or savings account is missing, or the
    /// pool balance is exactly zero.
    pub fn pool_yearly_reset(&self, ledger: &Ledger, month: &Month) -> Option<PoolReset> {
        let roles = &ledger.settings.roles;
        if !self.is_reset_month(ledger, month)
            || ledger.month(month).is_none()
            || !ledger.has_account(&roles.pool)
            || !ledger.has_account(&roles.savings)
        {
            return None;
        }

        let balances = self.replay(ledger, Some(month), Some(month));
        let pool_balance = balances.get(&roles.pool).copied().unwrap_or(0.0);
        if pool_balance == 0.0 {
            return None;
        }

        Some(PoolReset {
            amount: pool_balance.abs(),
            direction: if pool_balance > 0.0 {
                PoolResetDirection::PoolToSave
            } else {
                PoolResetDirection::SaveToPool
            },
        })
    }

    // ── Internal ────────────────────────────────────────────────────

    fn initial_balances(&self, ledger: &Ledger) -> Balances {
        ledger
            .accounts
            .iter()
            .map(|a| (a.id.clone(), a.initial_balance))
            .collect()
    }

    fn replay(&self, ledger: &Ledger, up_to: Option<&Month>, skip_reset_at: Option<&Month>) -> Balances {
        let mut balances = self.initial_balances(ledger);

        for (month, data) in &ledger.months {
            if matches!(up_to, Some(limit) if month > limit) {
                break;
            }
            let apply_reset = skip_reset_at != Some(month);
            self.apply_month(ledger, &mut balances, month, data, apply_reset);
        }

        balances
    }

    fn apply_month(
        &self,
        ledger: &Ledger,
        balances: &mut Balances,
        month: &Month,
        data: &MonthlyData,
        apply_reset: bool,
    ) {
        // 1–2. Income and expense
        for kind in [EntryKind::Income, EntryKind::Expense] {
            for (category_id, amount) in data.entries(kind) {
                let account = self.flow_service.account_for(ledger, kind, category_id);
                match balances.get_mut(account) {
                    Some(balance) => match kind {
                        EntryKind::Income => *balance += amount.total(),
                        EntryKind::Expense => *balance -= amount.total(),
                    },
                    None => warn!(
                        month = %month,
                        %kind,
                        category = %category_id,
                        account,
                        "entry routed to unknown account; skipped"
                    ),
                }
            }
        }

        // 3. Explicit transfers
        for transfer in &data.transfers {
            if !Self::transfer_applies(ledger, transfer) {
                warn!(
                    month = %month,
                    from = %transfer.from,
                    to = %transfer.to,
                    "transfer references unknown account; skipped"
                );
                continue;
            }
            if let Some(from) = balances.get_mut(&transfer.from) {
                *from -= transfer.amount;
            }
            if let Some(to) = balances.get_mut(&transfer.to) {
                *to += transfer.amount;
            }
        }

        let roles = &ledger.settings.roles;

        // 4. Month-end settlement between primary and savings
        if balances.contains_key(&roles.primary) && balances.contains_key(&roles.savings) {
            let net = self.settlement_amount(ledger, month, data);
            if let Some(savings) = balances.get_mut(&roles.savings) {
                *savings += net;
            }
            if let Some(primary) = balances.get_mut(&roles.primary) {
                *primary -= net;
            }
            debug!(month = %month, net, "settled primary account into savings");
        }

        // 5. Annual pool reset
        if apply_reset
            && self.is_reset_month(ledger, month)
            && balances.contains_key(&roles.pool)
            && balances.contains_key(&roles.savings)
        {
            let pool_balance = balances.insert(roles.pool.clone(), 0.0).unwrap_or(0.0);
            if let Some(savings) = balances.get_mut(&roles.savings) {
                *savings += pool_balance;
            }
            debug!(month = %month, pool_balance, "swept pool account into savings");
        }
    }

    fn settlement_amount(&self, ledger: &Ledger, month: &Month, data: &MonthlyData) -> f64 {
        let primary = ledger.settings.roles.primary.as_str();
        let mut net = self.aggregation_service.monthly_balance(ledger, month);

        for transfer in data.transfers.iter().filter(|t| Self::transfer_applies(ledger, t)) {
            if transfer.from == primary {
                net -= transfer.amount;
            }
            if transfer.to == primary {
                net += transfer.amount;
            }
        }

        net
    }

    /// Transfers move money only when both ends are tracked accounts.
    fn transfer_applies(ledger: &Ledger, transfer: &Transfer) -> bool {
        ledger.has_account(&transfer.from) && ledger.has_account(&transfer.to)
    }
}

impl Default for BalanceService {
    fn default() -> Self {
        Self::new()
    }
}
