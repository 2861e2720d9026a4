use crate::models::ledger::Ledger;
use crate::models::month::Month;
use crate::models::monthly::Transfer;
use crate::models::report::AppliedRecurrings;

/// Writes enabled recurring items into a month.
pub struct RecurringService;

impl RecurringService {
    pub fn new() -> Self {
        Self
    }

    /// Apply every enabled recurring item and transfer to `month`.
    ///
    /// Income/expense items overwrite the month's entry for their category,
    /// so re-applying them is harmless. Transfers are appended and will be
    /// duplicated if applied twice.
    pub fn apply(&self, ledger: &mut Ledger, month: &Month) -> AppliedRecurrings {
        let items: Vec<_> = ledger
            .recurrings
            .items
            .iter()
            .filter(|r| r.enabled)
            .map(|r| (r.kind, r.category_id.clone(), r.amount.clone()))
            .collect();
        let transfers: Vec<Transfer> = ledger
            .recurrings
            .transfers
            .iter()
            .filter(|t| t.enabled)
            .map(|t| Transfer {
                from: t.from.clone(),
                to: t.to.clone(),
                amount: t.amount,
                note: t.note.clone().or_else(|| Some(t.name.clone())),
            })
            .collect();

        let applied = AppliedRecurrings {
            entries: items.len(),
            transfers: transfers.len(),
        };
        if applied.entries == 0 && applied.transfers == 0 {
            return applied;
        }

        let data = ledger.month_mut(month);
        for (kind, category_id, amount) in items {
            data.entries_mut(kind).insert(category_id, amount);
        }
        data.transfers.extend(transfers);

        applied
    }
}

impl Default for RecurringService {
    fn default() -> Self {
        Self::new()
    }
}
