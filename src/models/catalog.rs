//! Transaction types and categories.
//!
//! Both are simple named lookups managed through their own CRUD endpoints
//! (`/trans-type` and `/trans-category`).

use serde::{Deserialize, Serialize};

/// Kind of transaction, e.g. "Income" or "Expense".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionType {
    pub id: String,
    pub name: String,
}

/// Category of a transaction, e.g. "Groceries".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionCategory {
    pub id: String,
    pub name: String,
}

/// Body for creating or renaming a type or category.
#[derive(Debug, Serialize)]
pub(crate) struct NameRequest<'a> {
    pub name: &'a str,
}
