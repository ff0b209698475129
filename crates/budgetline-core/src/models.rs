//! Domain models for Budgetline

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Maximum length of a budget category name
pub const MAX_CATEGORY_NAME_LEN: usize = 100;

/// Maximum length of a payee name
pub const MAX_PAYEE_NAME_LEN: usize = 50;

/// Maximum length of an alias name
pub const MAX_ALIAS_NAME_LEN: usize = 50;

/// Round a currency amount to cents, halves away from zero
///
/// Rounds the shortest decimal form of `amount` (what `Display` prints), so
/// 1.005 rounds up to 1.01 while 1.004999999999 stays at 1.0. Values outside
/// the `Decimal` range are returned unchanged.
pub fn round_currency(amount: f64) -> f64 {
    Decimal::from_str(&amount.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(amount))
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(amount)
}

/// Whether a category plans money coming in or going out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    #[default]
    Expense,
}

impl CategoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown category type: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One historical slice of a named budget line
///
/// Records sharing a `name` describe how the budgeted amount changed over
/// time. Adding a record never creates an overlap, and a split closes the
/// slice in force before its effective date. `effective_to = None` marks an
/// open-ended slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    /// Optimistic concurrency token, bumped on every committed edit
    pub version: i64,
}

impl BudgetCategory {
    /// Whether this slice is in effect on `date`
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.effective_from <= date && self.effective_to.map_or(true, |to| date <= to)
    }

    /// Whether the date ranges of two slices share at least one day
    pub fn overlaps(&self, other: &BudgetCategory) -> bool {
        let self_ends_after = self
            .effective_to
            .map_or(true, |to| other.effective_from <= to);
        let other_ends_after = other
            .effective_to
            .map_or(true, |to| self.effective_from <= to);
        self_ends_after && other_ends_after
    }
}

/// A category to be added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBudgetCategory {
    pub name: String,
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub category_type: CategoryType,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub effective_to: Option<NaiveDate>,
}

/// Someone money is paid to or received from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payee {
    pub id: i64,
    pub name: String,
    pub effective_from: NaiveDate,
    /// The category record (not name) this payee is budgeted against
    pub budget_category_id: Option<i64>,
    pub version: i64,
}

/// A payee to be added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPayee {
    pub name: String,
    pub effective_from: NaiveDate,
    #[serde(default)]
    pub budget_category_id: Option<i64>,
}

/// An actual money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub amount: f64,
    pub payee_id: Option<i64>,
    /// Overrides the category implied by the payee
    pub override_category_id: Option<i64>,
    pub version: i64,
}

/// A transaction to be added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: f64,
    #[serde(default)]
    pub payee_id: Option<i64>,
    #[serde(default)]
    pub override_category_id: Option<i64>,
}

/// Maps a raw bank-statement string to a canonical payee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub id: i64,
    pub name: String,
    pub payee_id: i64,
    pub version: i64,
}

/// An alias to be added
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlias {
    pub name: String,
    pub payee_id: i64,
}

/// Row counts shown by `status`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreStats {
    pub categories: i64,
    pub payees: i64,
    pub transactions: i64,
    pub aliases: i64,
}
