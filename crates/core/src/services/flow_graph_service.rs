use crate::models::category::{Category, EntryKind};
use crate::models::ledger::Ledger;
use crate::models::month::Month;
use crate::models::report::{
    AccountFlow, FlowEndpoint, FlowKind, PoolResetDirection, SankeyData, SankeyLink, SankeyNode,
    SankeyNodeKind,
};
use crate::services::aggregation_service::AggregationService;
use crate::services::balance_service::BalanceService;
use crate::services::flow_service::FlowService;

/// Builds graph-shaped views of one month's money movement.
///
/// The core computes every node and edge; a frontend only lays them out.
pub struct FlowGraphService {
    aggregation_service: AggregationService,
    balance_service: BalanceService,
    flow_service: FlowService,
}

impl FlowGraphService {
    pub fn new() -> Self {
        Self {
            aggregation_service: AggregationService::new(),
            balance_service: BalanceService::new(),
            flow_service: FlowService::new(),
        }
    }

    /// Sankey nodes and links: income category → account → expense
    /// category, plus account → account for transfers.
    ///
    /// Non-positive amounts produce no link and unlinked nodes are dropped.
    pub fn sankey(&self, ledger: &Ledger, month: &Month) -> SankeyData {
        let Some(data) = ledger.month(month) else {
            return SankeyData::default();
        };

        let mut nodes = Vec::new();
        nodes.extend(Self::category_nodes(&ledger.categories.income, "income", SankeyNodeKind::Income));
        nodes.extend(ledger.accounts.iter().map(|a| SankeyNode {
            id: format!("account-{}", a.id),
            name: a.name.clone(),
            kind: SankeyNodeKind::Account,
            color: a.color.clone(),
        }));
        nodes.extend(Self::category_nodes(&ledger.categories.expense, "expense", SankeyNodeKind::Expense));

        let mut links: Vec<SankeyLink> = Vec::new();

        for (category_id, amount) in &data.income {
            let total = amount.total();
            if total <= 0.0 {
                continue;
            }
            let account = self.flow_service.account_for(ledger, EntryKind::Income, category_id);
            Self::add_link(&mut links, format!("income-{category_id}"), format!("account-{account}"), total);
        }

        for (category_id, amount) in &data.expense {
            let total = amount.total();
            if total <= 0.0 {
                continue;
            }
            let account = self.flow_service.account_for(ledger, EntryKind::Expense, category_id);
            Self::add_link(&mut links, format!("account-{account}"), format!("expense-{category_id}"), total);
        }

        for transfer in data.transfers.iter().filter(|t| t.amount > 0.0) {
            Self::add_link(
                &mut links,
                format!("account-{}", transfer.from),
                format!("account-{}", transfer.to),
                transfer.amount,
            );
        }

        links.retain(|l| l.value > 0.0);
        nodes.retain(|n| links.iter().any(|l| l.source == n.id || l.target == n.id));

        SankeyData { nodes, links }
    }

    /// Every movement touching a tracked account in `month`, including the
    /// derived settlement and pool reset.
    pub fn account_flows(&self, ledger: &Ledger, month: &Month) -> Vec<AccountFlow> {
        let mut flows = Vec::new();

        let income = self
            .aggregation_service
            .totals_by_account(ledger, month, EntryKind::Income);
        for (account_id, amount) in income {
            if amount > 0.0 && ledger.has_account(&account_id) {
                flows.push(AccountFlow {
                    from: FlowEndpoint::Income,
                    to: FlowEndpoint::Account(account_id),
                    amount,
                    kind: FlowKind::Income,
                    note: None,
                });
            }
        }

        if let Some(data) = ledger.month(month) {
            for transfer in &data.transfers {
                if ledger.has_account(&transfer.from) && ledger.has_account(&transfer.to) {
                    flows.push(AccountFlow {
                        from: FlowEndpoint::Account(transfer.from.clone()),
                        to: FlowEndpoint::Account(transfer.to.clone()),
                        amount: transfer.amount,
                        kind: FlowKind::Transfer,
                        note: transfer.note.clone(),
                    });
                }
            }
        }

        let expense = self
            .aggregation_service
            .totals_by_account(ledger, month, EntryKind::Expense);
        for (account_id, amount) in expense {
            if amount > 0.0 && ledger.has_account(&account_id) {
                flows.push(AccountFlow {
                    from: FlowEndpoint::Account(account_id),
                    to: FlowEndpoint::Expense,
                    amount,
                    kind: FlowKind::Expense,
                    note: None,
                });
            }
        }

        let roles = &ledger.settings.roles;
        let primary = FlowEndpoint::Account(roles.primary.clone());
        let savings = FlowEndpoint::Account(roles.savings.clone());
        let pool = FlowEndpoint::Account(roles.pool.clone());

        if ledger.has_account(&roles.primary) && ledger.has_account(&roles.savings) {
            let settlement = self.balance_service.monthly_settlement(ledger, month);
            if settlement != 0.0 {
                let (from, to) = if settlement > 0.0 {
                    (primary, savings.clone())
                } else {
                    (savings.clone(), primary)
                };
                flows.push(AccountFlow {
                    from,
                    to,
                    amount: settlement.abs(),
                    kind: FlowKind::Settlement,
                    note: None,
                });
            }
        }

        if let Some(reset) = self.balance_service.pool_yearly_reset(ledger, month) {
            let (from, to) = match reset.direction {
                PoolResetDirection::PoolToSave => (pool, savings),
                PoolResetDirection::SaveToPool => (savings, pool),
            };
            flows.push(AccountFlow {
                from,
                to,
                amount: reset.amount,
                kind: FlowKind::PoolReset,
                note: None,
            });
        }

        flows
    }

    fn category_nodes<'a>(
        categories: &'a [Category],
        prefix: &'a str,
        kind: SankeyNodeKind,
    ) -> impl Iterator<Item = SankeyNode> + 'a {
        categories.iter().map(move |c| SankeyNode {
            id: format!("{prefix}-{}", c.id),
            name: c.name.clone(),
            kind,
            color: c.color.clone(),
        })
    }

    fn add_link(links: &mut Vec<SankeyLink>, source: String, target: String, value: f64) {
        match links.iter_mut().find(|l| l.source == source && l.target == target) {
            Some(link) => link.value += value,
            None => links.push(SankeyLink { source, target, value }),
        }
    }
}

impl Default for FlowGraphService {
    fn default() -> Self {
        Self::new()
    }
}
