//! Authenticated HTTP client for the finance API.
//!
//! Every request made through [`ApiClient`] goes through the same pipeline:
//!
//! 1. Read the persisted access token and, if there is one, send it as
//!    `Authorization: Bearer <token>`
//! 2. If the server answers 401, exchange the persisted refresh token for a
//!    new pair at `POST /auth/refresh` and persist it
//! 3. Reissue the original request once with the new access token
//! 4. If there is no refresh token or the exchange fails, clear the persisted
//!    tokens, call the [`LoginRedirect`] hook and return the original 401
//!
//! # Retry Guarantee
//!
//! A request is retried at most once. A 401 on the retried request is
//! returned to the caller as is.
//!
//! # Concurrent Refreshes
//!
//! Refreshes are serialized. When several requests fail with 401 at the same
//! time, the first one to take the refresh lock performs the exchange. The
//! others see that the stored access token no longer matches the one they
//! were rejected with and retry with the stored token instead of calling the
//! refresh endpoint again.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;
use url::Url;

use crate::config::Config;
use crate::error::ApiError;
use crate::storage::{TokenPair, TokenStore};

/// Endpoint used to exchange a refresh token for a new pair.
pub const REFRESH_PATH: &str = "/auth/refresh";

/// Called when the session can no longer be recovered and the user has to
/// log in again.
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Default hook: tells the user to log in again through the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogRedirect;

impl LoginRedirect for LogRedirect {
    fn redirect_to_login(&self) {
        tracing::warn!("Session expired, please log in again");
    }
}

/// A request that can be sent, and replayed after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append query parameters from any struct or map.
    ///
    /// `null` values are skipped so optional parameters can be left unset.
    pub fn query<Q: Serialize + ?Sized>(mut self, params: &Q) -> Result<Self, ApiError> {
        if let Value::Object(fields) = serde_json::to_value(params)? {
            for (key, value) in fields {
                let value = match value {
                    Value::Null => continue,
                    Value::String(s) => s,
                    other => other.to_string(),
                };
                self.query.push((key, value));
            }
        }
        Ok(self)
    }

    /// Set the JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    redirect: Arc<dyn LoginRedirect>,
    refresh_lock: Mutex<()>,
}

/// The authenticated API client.
///
/// Cheap to clone; clones share the HTTP connection pool, the token store and
/// the refresh lock.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for `base_url`.
    ///
    /// # Errors
    ///
    /// - `InvalidUrl`: `base_url` is not an absolute URL
    /// - `Http`: the underlying HTTP client could not be built
    pub fn new(
        base_url: &str,
        timeout: Duration,
        store: Arc<dyn TokenStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(base_url)?;
        // Keep any path prefix when joining endpoint paths onto it
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                store,
                redirect,
                refresh_lock: Mutex::new(()),
            }),
        })
    }

    /// Create a client from loaded configuration.
    pub fn from_config(
        config: &Config,
        store: Arc<dyn TokenStore>,
        redirect: Arc<dyn LoginRedirect>,
    ) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.request_timeout(), store, redirect)
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// The store holding the persisted tokens.
    pub fn tokens(&self) -> &dyn TokenStore {
        self.inner.store.as_ref()
    }

    /// Send `request` and decode the JSON response body.
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.dispatch(request).await?;
        let response = check_status(response).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Send `request` and discard the response body.
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<(), ApiError> {
        let response = self.dispatch(request).await?;
        check_status(response).await?;
        Ok(())
    }

    /// Send a request, recovering once from an expired access token.
    ///
    /// Returns the final response whatever its status; only transport,
    /// storage and unrecoverable 401 errors are returned as `Err`.
    async fn dispatch(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let access_token = self.inner.store.load()?.access_token;
        let response = self.send(&request, access_token.as_deref()).await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let rejected = ApiError::from_response(response).await;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            "request unauthorized, refreshing access token"
        );

        match self.refresh(access_token.as_deref()).await {
            // Single retry; its response goes back to the caller unchanged
            Ok(token) => self.send(&request, Some(&token)).await,
            Err(e) => {
                tracing::warn!(error = %e, "token refresh failed, ending session");
                self.expire_session();
                Err(rejected)
            }
        }
    }

    /// Send one attempt of `request` with the given bearer token.
    async fn send(&self, request: &ApiRequest, token: Option<&str>) -> Result<Response, ApiError> {
        let url = self.endpoint(&request.path)?;
        let mut builder = self.inner.http.request(request.method.clone(), url);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        Ok(builder.send().await?)
    }

    /// Obtain a usable access token after a 401.
    ///
    /// `rejected` is the access token the failed request was sent with.
    /// If another task already replaced it, the stored token is returned
    /// without calling the refresh endpoint.
    async fn refresh(&self, rejected: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.inner.refresh_lock.lock().await;

        let stored = self.inner.store.load()?;
        if let Some(current) = stored.access_token.as_deref() {
            if Some(current) != rejected {
                tracing::debug!("access token already refreshed by another request");
                return Ok(current.to_string());
            }
        }

        let refresh_token = stored.refresh_token.ok_or(ApiError::MissingRefreshToken)?;

        // Plain request: no bearer header, no interception
        let response = self
            .inner
            .http
            .post(self.endpoint(REFRESH_PATH)?)
            .json(&RefreshRequest {
                refresh_token: &refresh_token,
            })
            .send()
            .await?;
        let response = check_status(response).await?;
        let pair: TokenPair = serde_json::from_slice(&response.bytes().await?)?;

        self.inner.store.save(&pair)?;
        tracing::info!("access token refreshed");

        Ok(pair.access_token)
    }

    /// Hard logout: drop persisted tokens and send the user to login.
    fn expire_session(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::error!(error = %e, "failed to clear persisted tokens");
        }
        self.inner.redirect.redirect_to_login();
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }
}

/// Turn a non-success response into `ApiError::Status`.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ApiError::from_response(response).await)
    }
}
