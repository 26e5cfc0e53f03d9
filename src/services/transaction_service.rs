//! Transaction service - CRUD over `/transaction`.

use crate::{
    client::{ApiClient, ApiRequest},
    error::ApiError,
    models::{
        CreateTransactionRequest, PaginatedResponse, PaginationParams, Transaction,
        UpdateTransactionRequest,
    },
};

/// List transactions, newest first as ordered by the server.
///
/// # Endpoint
///
/// `GET /transaction?page=&limit=`
///
/// With default params the server picks the page size.
pub async fn list(
    client: &ApiClient,
    params: &PaginationParams,
) -> Result<PaginatedResponse<Transaction>, ApiError> {
    client
        .execute(ApiRequest::get("/transaction").query(params)?)
        .await
}

/// Get a single transaction.
///
/// # Endpoint
///
/// `GET /transaction/{id}`
pub async fn get(client: &ApiClient, id: &str) -> Result<Transaction, ApiError> {
    client
        .execute(ApiRequest::get(format!("/transaction/{id}")))
        .await
}

/// Record a new transaction.
///
/// # Endpoint
///
/// `POST /transaction`
pub async fn create(
    client: &ApiClient,
    request: &CreateTransactionRequest,
) -> Result<Transaction, ApiError> {
    client
        .execute(ApiRequest::post("/transaction").json(request)?)
        .await
}

/// Patch a transaction. Only fields set in `request` are sent.
///
/// # Endpoint
///
/// `PATCH /transaction/{id}`
pub async fn update(
    client: &ApiClient,
    id: &str,
    request: &UpdateTransactionRequest,
) -> Result<Transaction, ApiError> {
    client
        .execute(ApiRequest::patch(format!("/transaction/{id}")).json(request)?)
        .await
}

/// Delete a transaction.
///
/// # Endpoint
///
/// `DELETE /transaction/{id}`
pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .execute_empty(ApiRequest::delete(format!("/transaction/{id}")))
        .await
}
