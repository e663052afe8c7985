//! Core expense domain types.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, category::CategoryId, database_id::ExpenseId};

/// A non-negative, finite amount of money.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Amount(f64);

impl Amount {
    /// Create a validated amount.
    ///
    /// # Errors
    ///
    /// Returns [Error::InvalidAmount] if `value` is negative, NaN or infinite.
    pub fn new(value: f64) -> Result<Self, Error> {
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidAmount(value));
        }

        Ok(Self(value))
    }

    /// The amount as a plain number.
    pub fn value(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for Amount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for f64 {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        self.0.to_sql()
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = f64::column_result(value)?;

        Amount::new(raw).map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Who an expense was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseType {
    /// Spent on oneself.
    Personal,
    /// Split with the household.
    Shared,
    /// Spent on one's spouse.
    #[serde(rename = "For spouse")]
    ForSpouse,
}

impl ExpenseType {
    /// Every expense type, in display order.
    pub const ALL: [ExpenseType; 3] = [
        ExpenseType::Personal,
        ExpenseType::Shared,
        ExpenseType::ForSpouse,
    ];

    /// The label shown to users and stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseType::Personal => "Personal",
            ExpenseType::Shared => "Shared",
            ExpenseType::ForSpouse => "For spouse",
        }
    }
}

impl Display for ExpenseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExpenseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExpenseType::ALL
            .into_iter()
            .find(|expense_type| expense_type.as_str() == s)
            .ok_or_else(|| Error::InvalidExpenseType(s.to_owned()))
    }
}

impl ToSql for ExpenseType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ExpenseType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: Error| FromSqlError::Other(Box::new(error)))
    }
}

/// A single recorded expense.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent.
    pub amount: Amount,
    /// When the money was spent.
    pub date: Date,
    /// The category the expense is filed under.
    pub category_id: CategoryId,
    /// Who the expense was for.
    pub expense_type: ExpenseType,
    /// A free-text note, may be empty.
    pub comment: String,
}

impl Expense {
    /// Start building a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability. The expense type
    /// defaults to [ExpenseType::Personal] and the comment to an empty string.
    pub fn build(amount: Amount, date: Date, category_id: CategoryId) -> ExpenseBuilder {
        ExpenseBuilder {
            amount,
            date,
            category_id,
            expense_type: ExpenseType::Personal,
            comment: String::new(),
        }
    }
}

/// The writable fields of an [Expense], used for both inserts and updates.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// How much was spent.
    pub amount: Amount,
    /// The day the money was spent.
    pub date: Date,
    /// The ID of the category the expense belongs to.
    pub category_id: CategoryId,
    /// Who the expense was for. Defaults to [ExpenseType::Personal].
    pub expense_type: ExpenseType,
    /// A free-text note, empty if there is none.
    pub comment: String,
}

impl ExpenseBuilder {
    /// Set who the expense was for.
    pub fn expense_type(mut self, expense_type: ExpenseType) -> Self {
        self.expense_type = expense_type;
        self
    }

    /// Set the free-text note.
    pub fn comment(mut self, comment: &str) -> Self {
        self.comment = comment.to_owned();
        self
    }

    pub(crate) fn finalize(self, id: ExpenseId) -> Expense {
        Expense {
            id,
            amount: self.amount,
            date: self.date,
            category_id: self.category_id,
            expense_type: self.expense_type,
            comment: self.comment,
        }
    }
}

/// An expense together with the display name of its category.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// How much was spent.
    pub amount: Amount,
    /// The day the money was spent.
    pub date: Date,
    /// The ID of the expense's category.
    pub category_id: CategoryId,
    /// The name of the expense's category at the time it was read.
    pub category_name: String,
    /// Who the expense was for.
    pub expense_type: ExpenseType,
    /// A free-text note, empty if there is none.
    pub comment: String,
}
