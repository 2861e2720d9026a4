use serde::{Deserialize, Serialize};

use super::account::AccountRoles;

/// Calendar month in which the pool account is swept into savings.
pub const DEFAULT_POOL_RESET_MONTH: u32 = 3;

/// User-configurable settings, stored alongside the ledger data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Display currency (e.g., "JPY").
    pub currency: String,

    /// Display locale (e.g., "ja-JP").
    pub locale: String,

    /// Which account ids act as primary, savings and pool.
    pub roles: AccountRoles,

    /// Month number (1–12) that triggers the annual pool reset.
    pub pool_reset_month: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "JPY".to_string(),
            locale: "ja-JP".to_string(),
            roles: AccountRoles::default(),
            pool_reset_month: DEFAULT_POOL_RESET_MONTH,
        }
    }
}
