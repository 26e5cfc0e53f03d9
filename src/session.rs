//! User session state.
//!
//! [`Session`] holds who is logged in, the captcha currently shown on the
//! login/register form and the last error message. It drives the auth
//! service and keeps the persisted tokens in step with the outcome.

use crate::{
    client::ApiClient,
    error::{ApiError, Operation, OperationError},
    models::{Captcha, LoginRequest, RegisterRequest, User},
    services::auth_service,
    storage::{StorageError, TokenPair},
};

#[derive(Debug)]
pub struct Session {
    client: ApiClient,
    current_user: Option<User>,
    captcha: Option<Captcha>,
    error: Option<String>,
}

impl Session {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            current_user: None,
            captcha: None,
            error: None,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// The user returned by the last successful login or registration.
    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    /// Captcha to show on the next login or register attempt.
    pub fn captcha(&self) -> Option<&Captcha> {
        self.captcha.as_ref()
    }

    /// Message of the last failed operation, cleared when a new one starts.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True if an access token is persisted.
    ///
    /// Says nothing about whether the server still accepts it.
    pub fn check_auth(&self) -> Result<bool, StorageError> {
        Ok(self.client.tokens().load()?.access_token.is_some())
    }

    /// Fetch a fresh captcha, replacing the current one.
    pub async fn load_captcha(&mut self) -> Result<&Captcha, OperationError> {
        let result = auth_service::generate_captcha(&self.client).await;
        match result {
            Ok(captcha) => Ok(&*self.captcha.insert(captcha)),
            Err(e) => {
                let error = OperationError::new(Operation::LoadCaptcha, e);
                self.error = Some(error.message.clone());
                Err(error)
            }
        }
    }

    /// Log in and persist the issued tokens.
    ///
    /// # Errors
    ///
    /// On failure the error message is recorded and a new captcha is loaded,
    /// since the server invalidates a captcha once it has been checked.
    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<User, OperationError> {
        self.error = None;

        let response = auth_service::login(&self.client, credentials).await;
        let result = match response {
            Ok(response) => {
                let tokens = TokenPair {
                    access_token: response.access_token,
                    refresh_token: response.refresh_token,
                };
                self.client
                    .tokens()
                    .save(&tokens)
                    .map(|()| response.user)
                    .map_err(ApiError::from)
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "logged in");
                self.current_user = Some(user.clone());
                Ok(user)
            }
            Err(e) => Err(self.fail_with_new_captcha(Operation::Login, e).await),
        }
    }

    /// Register a new account.
    ///
    /// Registration does not log the user in: no tokens are persisted, the
    /// user still has to log in afterwards.
    pub async fn register(&mut self, data: &RegisterRequest) -> Result<User, OperationError> {
        self.error = None;

        let result = auth_service::register(&self.client, data).await;
        match result {
            Ok(response) => {
                tracing::info!(user_id = %response.user.id, "registered");
                self.current_user = Some(response.user.clone());
                Ok(response.user)
            }
            Err(e) => Err(self.fail_with_new_captcha(Operation::Register, e).await),
        }
    }

    /// Log out of this session.
    ///
    /// A server failure is logged and otherwise ignored: the local session
    /// ends regardless.
    pub async fn logout(&mut self) {
        if let Err(e) = auth_service::logout(&self.client).await {
            tracing::error!(error = %e, "logout request failed");
        }
        self.end_local_session();
    }

    /// Log out of every session of this user.
    pub async fn logout_all(&mut self) {
        if let Err(e) = auth_service::logout_all(&self.client).await {
            tracing::error!(error = %e, "logout-all request failed");
        }
        self.end_local_session();
    }

    fn end_local_session(&mut self) {
        if let Err(e) = self.client.tokens().clear() {
            tracing::error!(error = %e, "failed to clear persisted tokens");
        }
        self.current_user = None;
    }

    async fn fail_with_new_captcha(
        &mut self,
        operation: Operation,
        source: ApiError,
    ) -> OperationError {
        let error = OperationError::new(operation, source);
        if let Err(e) = self.load_captcha().await {
            tracing::warn!(error = %e.source, "failed to reload captcha");
        }
        // The failed operation's message wins over a captcha failure
        self.error = Some(error.message.clone());
        error
    }
}
