use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::account::{Account, AccountType, FlowRules};
use super::budget::BudgetTemplate;
use super::category::{Categories, Category, Subcategory};
use super::month::Month;
use super::monthly::MonthlyData;
use super::recurring::Recurrings;
use super::settings::Settings;

/// The main data container: configuration plus the full monthly history.
///
/// Services only ever read it; `HouseholdLedger` is the one writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ledger {
    #[serde(default)]
    pub categories: Categories,

    #[serde(default)]
    pub accounts: Vec<Account>,

    #[serde(default)]
    pub flow_rules: FlowRules,

    /// One record per month with any activity, ordered chronologically.
    #[serde(default)]
    pub months: BTreeMap<Month, MonthlyData>,

    #[serde(default)]
    pub budget: BudgetTemplate,

    #[serde(default)]
    pub recurrings: Recurrings,

    #[serde(default)]
    pub settings: Settings,
}

impl Ledger {
    /// Starter categories plus the primary, savings and pool accounts.
    pub fn starter() -> Self {
        let categories = Categories {
            income: vec![
                Category::new("salary", "Salary").with_subcategories(vec![
                    Subcategory::new("main_job", "Main job"),
                    Subcategory::new("side_job", "Side job"),
                ]),
                Category::new("investment", "Investment income").with_subcategories(vec![
                    Subcategory::new("dividends", "Dividends"),
                    Subcategory::new("interest", "Interest"),
                ]),
            ],
            expense: vec![
                Category::new("food", "Food").with_subcategories(vec![
                    Subcategory::new("groceries", "Groceries"),
                    Subcategory::new("restaurants", "Restaurants"),
                ]),
                Category::new("housing", "Housing").with_subcategories(vec![
                    Subcategory::new("rent", "Rent"),
                    Subcategory::new("utilities", "Utilities"),
                ]),
                Category::new("transportation", "Transportation").with_subcategories(vec![
                    Subcategory::new("train", "Train"),
                    Subcategory::new("gas", "Gas"),
                ]),
            ],
            transfer: vec![Category::new("transfer", "Transfer")],
        };

        let settings = Settings::default();
        let accounts = vec![
            Account::new(settings.roles.primary.clone(), "Checking", AccountType::Bank).as_default(),
            Account::new(settings.roles.savings.clone(), "Savings", AccountType::Bank),
            Account::new(settings.roles.pool.clone(), "Pool", AccountType::Pool),
        ];

        Self {
            categories,
            accounts,
            settings,
            ..Self::default()
        }
    }

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn has_account(&self, id: &str) -> bool {
        self.account(id).is_some()
    }

    /// Stored record for `month`, if any.
    pub fn month(&self, month: &Month) -> Option<&MonthlyData> {
        self.months.get(month)
    }

    /// Record for `month`, created empty on first access.
    pub fn month_mut(&mut self, month: &Month) -> &mut MonthlyData {
        self.months
            .entry(month.clone())
            .or_insert_with(|| MonthlyData::empty(month.clone()))
    }

    /// Stored months in ascending order.
    pub fn stored_months(&self) -> impl Iterator<Item = &Month> {
        self.months.keys()
    }
}
