//! Error types for the finance API client.
//!
//! Two layers of errors live here:
//!
//! - [`ApiError`]: anything that can go wrong while talking to the remote API
//!   (transport, non-2xx status, bad JSON, token storage).
//! - [`OperationError`]: an `ApiError` paired with the user-facing message for
//!   the operation that failed. The message is the one the server sent, or a
//!   fixed fallback for that kind of operation.

use reqwest::StatusCode;
use serde_json::Value;

use crate::storage::StorageError;

/// Errors produced by the authenticated client and the services built on it.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Request could not be sent or the response could not be read
    /// (connection refused, timeout, TLS failure...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    ///
    /// `message` carries the server-provided `message` field when the body
    /// contained one.
    #[error("Request failed with status {status}")]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// Response body did not match the expected shape.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Persisted tokens could not be read or written.
    #[error("Token storage error: {0}")]
    Storage(#[from] StorageError),

    /// Endpoint path could not be joined onto the configured base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A 401 was received but there is no refresh token to exchange.
    #[error("No refresh token available")]
    MissingRefreshToken,
}

impl ApiError {
    /// Build a `Status` error from a failed response, pulling the server
    /// message out of the JSON body when there is one.
    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<Value>(&body).ok())
            .and_then(|body| extract_message(&body));

        ApiError::Status { status, message }
    }

    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status(),
            _ => None,
        }
    }

    /// True for a 401 Unauthorized answer.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// Message sent by the server, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

/// Pull `message` out of an error body.
///
/// The API sends either a single string or, for validation failures, a list
/// of strings. Lists are joined with `", "`.
fn extract_message(body: &Value) -> Option<String> {
    match body.get("message")? {
        Value::String(message) => Some(message.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// The user-level operations that report errors with a fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    Register,
    LoadCaptcha,
    Logout,
    FetchTransactions,
    FetchTransaction,
    CreateTransaction,
    UpdateTransaction,
    DeleteTransaction,
}

impl Operation {
    /// Message shown when the server did not provide one.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Operation::Login => "Login failed",
            Operation::Register => "Registration failed",
            Operation::LoadCaptcha => "Failed to load CAPTCHA. Please try again.",
            Operation::Logout => "Logout failed",
            Operation::FetchTransactions => "Failed to load transactions",
            Operation::FetchTransaction => "Failed to load transaction",
            Operation::CreateTransaction => "Failed to create transaction",
            Operation::UpdateTransaction => "Failed to update transaction",
            Operation::DeleteTransaction => "Failed to delete transaction",
        }
    }
}

/// A failed user-level operation.
///
/// `Display` prints the user-facing message; the underlying [`ApiError`] is
/// kept as the error source.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct OperationError {
    pub operation: Operation,
    pub message: String,
    #[source]
    pub source: ApiError,
}

impl OperationError {
    pub fn new(operation: Operation, source: ApiError) -> Self {
        // Only load captcha ignores the server message
        let message = match (operation, source.server_message()) {
            (Operation::LoadCaptcha, _) | (_, None) => operation.fallback_message().to_string(),
            (_, Some(message)) => message.to_string(),
        };

        Self {
            operation,
            message,
            source,
        }
    }
}
