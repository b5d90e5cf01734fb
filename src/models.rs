use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::Serialize;

/// Whether money came in or went out. Stored as `INCOME` / `EXPENSE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            other => Err(format!("unknown transaction type '{other}' (expected income or expense)")),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// A validated transaction. `id` is `None` until the row has been inserted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub id: Option<i64>,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub notes: Option<String>,
}

/// Raw form input, possibly incomplete. Turned into a [`Transaction`] by
/// [`crate::service::validate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionDraft {
    pub id: Option<i64>,
    pub amount: f64,
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
    pub notes: Option<String>,
}

impl From<Transaction> for TransactionDraft {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            amount: t.amount,
            date: Some(t.date),
            category: Some(t.category),
            kind: Some(t.kind),
            notes: t.notes,
        }
    }
}

/// Optional predicates for a filtered listing. Unset fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub category: Option<String>,
    pub kind: Option<TransactionType>,
}

impl TransactionFilter {
    /// The category to match on, treating a blank entry as no filter.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none() && self.category().is_none() && self.kind.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
}

impl Summary {
    pub fn get(&self, name: &str) -> Option<f64> {
        match name {
            "income" => Some(self.income),
            "expense" => Some(self.expense),
            "balance" => Some(self.balance),
            _ => None,
        }
    }
}
