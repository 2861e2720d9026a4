use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A calendar month in `YYYY-MM` form.
///
/// The fixed width makes lexicographic order identical to chronological
/// order, so `Month` derives its ordering straight from the string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month(String);

impl Month {
    /// Parse and validate a `YYYY-MM` string.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let bytes = value.as_bytes();
        let digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);
        if bytes.len() != 7 || bytes[4] != b'-' || !digits(&bytes[..4]) || !digits(&bytes[5..]) {
            return Err(CoreError::InvalidMonth(value.to_string()));
        }
        NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
            .map_err(|_| CoreError::InvalidMonth(value.to_string()))?;
        Ok(Self(value.to_string()))
    }

    /// Build a month from its numeric parts.
    pub fn from_year_month(year: i32, month: u32) -> Result<Self, CoreError> {
        let date = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| CoreError::InvalidMonth(format!("{year}-{month}")))?;
        Self::parse(&date.format("%Y-%m").to_string())
    }

    /// The month containing today's date (UTC).
    pub fn current() -> Self {
        let today = Utc::now().date_naive();
        Self(format!("{:04}-{:02}", today.year(), today.month()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Year component.
    pub fn year(&self) -> i32 {
        self.0[..4].parse().unwrap_or_default()
    }

    /// Calendar month component (1–12).
    pub fn month_number(&self) -> u32 {
        self.0[5..].parse().unwrap_or_default()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Month {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.0
    }
}
