use serde::{Deserialize, Serialize};

use super::month::Month;

/// Role a category plays in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
    /// Labels only; never carries amounts.
    Transfer,
}

impl std::fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryKind::Income => write!(f, "income"),
            CategoryKind::Expense => write!(f, "expense"),
            CategoryKind::Transfer => write!(f, "transfer"),
        }
    }
}

/// Side of a monthly record an amount lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income,
    Expense,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::Income => write!(f, "income"),
            EntryKind::Expense => write!(f, "expense"),
        }
    }
}

impl From<EntryKind> for CategoryKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Income => CategoryKind::Income,
            EntryKind::Expense => CategoryKind::Expense,
        }
    }
}

/// Inclusive month bounds. `None` leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveWindow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_month: Option<Month>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_month: Option<Month>,
}

impl ActiveWindow {
    pub fn new(start_month: Option<Month>, end_month: Option<Month>) -> Self {
        Self {
            start_month,
            end_month,
        }
    }

    /// Window that starts and ends in the same month.
    pub fn single(month: Month) -> Self {
        Self {
            start_month: Some(month.clone()),
            end_month: Some(month),
        }
    }

    pub fn contains(&self, month: &Month) -> bool {
        if matches!(&self.start_month, Some(start) if month < start) {
            return false;
        }
        if matches!(&self.end_month, Some(end) if month > end) {
            return false;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub window: ActiveWindow,
}

impl Subcategory {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            window: ActiveWindow::default(),
        }
    }

    pub fn is_active(&self, month: &Month) -> bool {
        self.window.contains(month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub subcategories: Vec<Subcategory>,
    #[serde(flatten)]
    pub window: ActiveWindow,
}

fn default_color() -> String {
    "#6B7280".to_string()
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: default_color(),
            subcategories: Vec::new(),
            window: ActiveWindow::default(),
        }
    }

    pub fn with_subcategories(mut self, subcategories: Vec<Subcategory>) -> Self {
        self.subcategories = subcategories;
        self
    }

    pub fn with_window(mut self, window: ActiveWindow) -> Self {
        self.window = window;
        self
    }

    pub fn is_active(&self, month: &Month) -> bool {
        self.window.contains(month)
    }

    /// Copy of this category keeping only the sub-categories active in `month`.
    pub fn active_view(&self, month: &Month) -> Category {
        Category {
            subcategories: self
                .subcategories
                .iter()
                .filter(|s| s.is_active(month))
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// Categories active in `month`, each with only its active sub-categories.
pub fn active_categories(categories: &[Category], month: &Month) -> Vec<Category> {
    categories
        .iter()
        .filter(|c| c.is_active(month))
        .map(|c| c.active_view(month))
        .collect()
}

/// Ordered category lists per role.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    #[serde(default)]
    pub income: Vec<Category>,
    #[serde(default)]
    pub expense: Vec<Category>,
    #[serde(default)]
    pub transfer: Vec<Category>,
}

impl Categories {
    pub fn of(&self, kind: CategoryKind) -> &[Category] {
        match kind {
            CategoryKind::Income => &self.income,
            CategoryKind::Expense => &self.expense,
            CategoryKind::Transfer => &self.transfer,
        }
    }

    pub fn of_mut(&mut self, kind: CategoryKind) -> &mut Vec<Category> {
        match kind {
            CategoryKind::Income => &mut self.income,
            CategoryKind::Expense => &mut self.expense,
            CategoryKind::Transfer => &mut self.transfer,
        }
    }

    pub fn find(&self, kind: CategoryKind, id: &str) -> Option<&Category> {
        self.of(kind).iter().find(|c| c.id == id)
    }
}
