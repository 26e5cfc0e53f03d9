//! Transaction data models and API request types.
//!
//! This module defines:
//! - `Transaction`: a transaction as returned by the API
//! - `CreateTransactionRequest`: body of `POST /transaction`
//! - `UpdateTransactionRequest`: partial body of `PATCH /transaction/{id}`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::{TransactionCategory, TransactionType};

/// A financial transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "9b2e...",
///   "amount": 150000,
///   "date": "2025-12-21",
///   "description": "Weekly groceries",
///   "type": { "id": "t2", "name": "Expense" },
///   "category": { "id": "c4", "name": "Groceries" },
///   "createdAt": "2025-12-21T16:00:00.000Z",
///   "updatedAt": "2025-12-21T16:00:00.000Z"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,

    /// Amount as sent by the API (a plain JSON number)
    pub amount: f64,

    /// Date of the transaction as entered by the user
    pub date: String,

    pub description: String,

    /// Expanded type, when the server includes the relation
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<TransactionType>,

    /// Expanded category, when the server includes the relation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TransactionCategory>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request to record a new transaction.
///
/// # JSON Example
///
/// ```json
/// {
///   "amount": 150000,
///   "typeId": "t2",
///   "categoryId": "c4",
///   "date": "2025-12-21",
///   "description": "Weekly groceries"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    pub amount: f64,
    pub type_id: String,
    pub category_id: String,
    pub date: String,
    pub description: String,
}

/// Partial update of a transaction.
///
/// Only fields that are `Some` are sent; the server leaves the rest alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl UpdateTransactionRequest {
    /// True when the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.type_id.is_none()
            && self.category_id.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}

/// Every field of a create request becomes part of the patch.
impl From<CreateTransactionRequest> for UpdateTransactionRequest {
    fn from(request: CreateTransactionRequest) -> Self {
        Self {
            amount: Some(request.amount),
            type_id: Some(request.type_id),
            category_id: Some(request.category_id),
            date: Some(request.date),
            description: Some(request.description),
        }
    }
}
