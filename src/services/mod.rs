//! Typed wrappers over the finance API endpoints.
//!
//! Each service is a set of async functions taking the shared [`ApiClient`],
//! one per endpoint.
//!
//! [`ApiClient`]: crate::client::ApiClient

/// Login, registration, logout and captcha
pub mod auth_service;
/// Transaction type CRUD
pub mod trans_type_service;
/// Transaction category CRUD
pub mod trans_category_service;
/// Transaction CRUD
pub mod transaction_service;
