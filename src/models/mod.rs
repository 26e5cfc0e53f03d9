//! Data models exchanged with the finance API.
//!
//! These are plain records. The server owns validation and consistency; the
//! client only (de)serializes them.

/// Users, credentials and captcha payloads
pub mod auth;
/// Transaction types and categories
pub mod catalog;
/// Paginated list envelope and query parameters
pub mod pagination;
/// Financial transactions
pub mod transaction;

pub use auth::{AuthResponse, Captcha, CaptchaResponse, LoginRequest, RegisterRequest, Role, User};
pub use catalog::{TransactionCategory, TransactionType};
pub use pagination::{CategoryParams, PageMeta, PaginatedResponse, PaginationParams};
pub use transaction::{CreateTransactionRequest, Transaction, UpdateTransactionRequest};
