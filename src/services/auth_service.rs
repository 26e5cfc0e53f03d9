//! Auth service - login, registration, logout and captcha.
//!
//! All calls go through the authenticated [`ApiClient`]. Logging out also
//! clears the persisted tokens once the server has accepted the request.

use serde::Serialize;

use crate::{
    client::{ApiClient, ApiRequest},
    error::ApiError,
    models::{AuthResponse, Captcha, CaptchaResponse, LoginRequest, RegisterRequest},
};

#[derive(Serialize)]
struct LogoutRequest {
    refresh_token: Option<String>,
}

/// Log in with email, password and a solved captcha.
///
/// # Endpoint
///
/// `POST /auth/login`
///
/// Tokens are returned, not persisted; the session decides what to keep.
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    client
        .execute(ApiRequest::post("/auth/login").json(request)?)
        .await
}

/// Create an account.
///
/// # Endpoint
///
/// `POST /auth/register`
pub async fn register(
    client: &ApiClient,
    request: &RegisterRequest,
) -> Result<AuthResponse, ApiError> {
    client
        .execute(ApiRequest::post("/auth/register").json(request)?)
        .await
}

/// Revoke the current refresh token, then clear persisted tokens.
///
/// # Endpoint
///
/// `POST /auth/logout` with `{ "refresh_token": ... }`
///
/// # Errors
///
/// If the server call fails the tokens are left in place and the error is
/// returned.
pub async fn logout(client: &ApiClient) -> Result<(), ApiError> {
    let refresh_token = client.tokens().load()?.refresh_token;

    client
        .execute_empty(ApiRequest::post("/auth/logout").json(&LogoutRequest { refresh_token })?)
        .await?;

    client.tokens().clear()?;
    Ok(())
}

/// Revoke every session of the current user, then clear persisted tokens.
///
/// # Endpoint
///
/// `POST /auth/logout-all`
pub async fn logout_all(client: &ApiClient) -> Result<(), ApiError> {
    client
        .execute_empty(ApiRequest::post("/auth/logout-all"))
        .await?;

    client.tokens().clear()?;
    Ok(())
}

/// Fetch a new captcha challenge.
///
/// # Endpoint
///
/// `GET /captcha/generate`, unwrapped from its `data` envelope.
pub async fn generate_captcha(client: &ApiClient) -> Result<Captcha, ApiError> {
    let response: CaptchaResponse = client
        .execute(ApiRequest::get("/captcha/generate"))
        .await?;
    Ok(response.data)
}
