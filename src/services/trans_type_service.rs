//! Transaction type service - CRUD over `/trans-type`.

use crate::{
    client::{ApiClient, ApiRequest},
    error::ApiError,
    models::{PaginatedResponse, PaginationParams, TransactionType, catalog::NameRequest},
};

pub async fn list(
    client: &ApiClient,
    params: &PaginationParams,
) -> Result<PaginatedResponse<TransactionType>, ApiError> {
    client
        .execute(ApiRequest::get("/trans-type").query(params)?)
        .await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<TransactionType, ApiError> {
    client
        .execute(ApiRequest::get(format!("/trans-type/{id}")))
        .await
}

pub async fn create(client: &ApiClient, name: &str) -> Result<TransactionType, ApiError> {
    client
        .execute(ApiRequest::post("/trans-type").json(&NameRequest { name })?)
        .await
}

/// Rename a type.
pub async fn update(client: &ApiClient, id: &str, name: &str) -> Result<TransactionType, ApiError> {
    client
        .execute(ApiRequest::patch(format!("/trans-type/{id}")).json(&NameRequest { name })?)
        .await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .execute_empty(ApiRequest::delete(format!("/trans-type/{id}")))
        .await
}
