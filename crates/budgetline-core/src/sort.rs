//! Typed sort keys for list operations
//!
//! Each entity has an enum of the fields it can be ordered by. Parsing an
//! unknown field name fails with [`Error::UnknownSortField`] instead of being
//! passed through to a query.

use std::cmp::Ordering;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::{Alias, BudgetCategory, Payee, Transaction};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(Error::UnknownSortField(format!("order '{}'", s))),
        }
    }
}

/// A field that records of type `T` can be ordered by
pub trait SortField<T>: Copy + FromStr<Err = Error> {
    fn compare(self, a: &T, b: &T) -> Ordering;
}

/// A parsed `field[:asc|desc]` sort expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec<F> {
    pub field: F,
    pub order: SortOrder,
}

impl<F> SortSpec<F> {
    pub fn new(field: F, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Order `records` in place; ties keep their store order
    pub fn apply<T>(&self, records: &mut [T])
    where
        F: SortField<T>,
    {
        let field = self.field;
        records.sort_by(|a, b| {
            let ordering = field.compare(a, b);
            match self.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
    }
}

impl<F: FromStr<Err = Error>> FromStr for SortSpec<F> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (field, order) = match s.split_once(':') {
            Some((field, order)) => (field, order.parse()?),
            None => (s, SortOrder::Asc),
        };
        Ok(Self {
            field: field.trim().parse()?,
            order,
        })
    }
}

/// Parse an optional sort expression, falling back to the default
pub fn parse_sort<F>(input: Option<&str>) -> Result<SortSpec<F>>
where
    F: FromStr<Err = Error> + Default,
{
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s.parse(),
        None => Ok(SortSpec::default()),
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Orders open-ended (None) dates after every closed one
fn cmp_end_date(a: Option<chrono::NaiveDate>, b: Option<chrono::NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategorySortField {
    Id,
    #[default]
    Name,
    Amount,
    Type,
    EffectiveFrom,
    EffectiveTo,
}

impl FromStr for CategorySortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "amount" => Ok(Self::Amount),
            "type" => Ok(Self::Type),
            "effective_from" | "from" => Ok(Self::EffectiveFrom),
            "effective_to" | "to" => Ok(Self::EffectiveTo),
            _ => Err(Error::UnknownSortField(s.to_string())),
        }
    }
}

impl SortField<BudgetCategory> for CategorySortField {
    fn compare(self, a: &BudgetCategory, b: &BudgetCategory) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a
                .name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then(a.effective_from.cmp(&b.effective_from)),
            Self::Amount => cmp_f64(a.amount, b.amount),
            Self::Type => a.category_type.as_str().cmp(b.category_type.as_str()),
            Self::EffectiveFrom => a.effective_from.cmp(&b.effective_from),
            Self::EffectiveTo => cmp_end_date(a.effective_to, b.effective_to),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayeeSortField {
    Id,
    #[default]
    Name,
    EffectiveFrom,
    Category,
}

impl FromStr for PayeeSortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "effective_from" | "from" => Ok(Self::EffectiveFrom),
            "category" | "budget_category_id" => Ok(Self::Category),
            _ => Err(Error::UnknownSortField(s.to_string())),
        }
    }
}

impl SortField<Payee> for PayeeSortField {
    fn compare(self, a: &Payee, b: &Payee) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::EffectiveFrom => a.effective_from.cmp(&b.effective_from),
            Self::Category => a.budget_category_id.cmp(&b.budget_category_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionSortField {
    Id,
    #[default]
    Date,
    Amount,
    Payee,
}

impl FromStr for TransactionSortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            "payee" | "payee_id" => Ok(Self::Payee),
            _ => Err(Error::UnknownSortField(s.to_string())),
        }
    }
}

impl SortField<Transaction> for TransactionSortField {
    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Date => a.date.cmp(&b.date).then(a.id.cmp(&b.id)),
            Self::Amount => cmp_f64(a.amount, b.amount),
            Self::Payee => a.payee_id.cmp(&b.payee_id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AliasSortField {
    Id,
    #[default]
    Name,
    Payee,
}

impl FromStr for AliasSortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "payee" | "payee_id" => Ok(Self::Payee),
            _ => Err(Error::UnknownSortField(s.to_string())),
        }
    }
}

impl SortField<Alias> for AliasSortField {
    fn compare(self, a: &Alias, b: &Alias) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            Self::Payee => a.payee_id.cmp(&b.payee_id),
        }
    }
}
