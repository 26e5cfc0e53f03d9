//! Transaction category service - CRUD over `/trans-category`.
//!
//! Listing can be narrowed to the categories of one transaction type with
//! [`CategoryParams::type_id`].

use crate::{
    client::{ApiClient, ApiRequest},
    error::ApiError,
    models::{CategoryParams, PaginatedResponse, TransactionCategory, catalog::NameRequest},
};

/// List categories.
///
/// # Endpoint
///
/// `GET /trans-category?page=&limit=&typeId=`
pub async fn list(
    client: &ApiClient,
    params: &CategoryParams,
) -> Result<PaginatedResponse<TransactionCategory>, ApiError> {
    client
        .execute(ApiRequest::get("/trans-category").query(params)?)
        .await
}

pub async fn get(client: &ApiClient, id: &str) -> Result<TransactionCategory, ApiError> {
    client
        .execute(ApiRequest::get(format!("/trans-category/{id}")))
        .await
}

pub async fn create(client: &ApiClient, name: &str) -> Result<TransactionCategory, ApiError> {
    client
        .execute(ApiRequest::post("/trans-category").json(&NameRequest { name })?)
        .await
}

pub async fn update(
    client: &ApiClient,
    id: &str,
    name: &str,
) -> Result<TransactionCategory, ApiError> {
    client
        .execute(ApiRequest::patch(format!("/trans-category/{id}")).json(&NameRequest { name })?)
        .await
}

pub async fn delete(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client
        .execute_empty(ApiRequest::delete(format!("/trans-category/{id}")))
        .await
}
