//! Authentication models.
//!
//! This module defines:
//! - `User`: the authenticated identity and its role
//! - `LoginRequest` / `RegisterRequest`: credentials plus the solved captcha
//! - `AuthResponse`: token pair and user returned by login/register
//! - `Captcha` / `CaptchaResponse`: captcha challenge data

use serde::{Deserialize, Serialize};

/// Access role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

/// An authenticated user.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "2f1c...",
///   "email": "budi@example.com",
///   "name": "Budi",
///   "role": "USER"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// Credentials for `POST /auth/login`.
///
/// The captcha must have been fetched from `GET /captcha/generate` first;
/// `captcha_id` identifies it and `captcha_text` is the user's answer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub captcha_id: String,
    pub captcha_text: String,
}

/// Body of `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub captcha_id: String,
    pub captcha_text: String,
}

/// Response of login and register.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

/// A captcha challenge.
///
/// `image_base64` is the rendered image, typically a `data:image/...` URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captcha {
    pub image_base64: String,
    pub captcha_id: String,
}

/// Envelope around [`Captcha`] returned by `GET /captcha/generate`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaResponse {
    pub message: String,
    pub status_code: u16,
    pub data: Captcha,
}
