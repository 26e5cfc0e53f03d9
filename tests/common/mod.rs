//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use finance_client::client::{ApiClient, LoginRedirect};
use finance_client::storage::{MemoryTokenStore, StoredTokens, TokenStore};
use serde_json::{Value, json};
use wiremock::{Match, MockServer, Request, ResponseTemplate};

/// Counts how often the client sent the user back to login.
#[derive(Debug, Default)]
pub struct RecordingRedirect {
    redirects: AtomicUsize,
}

impl RecordingRedirect {
    pub fn count(&self) -> usize {
        self.redirects.load(Ordering::SeqCst)
    }
}

impl LoginRedirect for RecordingRedirect {
    fn redirect_to_login(&self) {
        self.redirects.fetch_add(1, Ordering::SeqCst);
    }
}

pub struct TestClient {
    pub client: ApiClient,
    pub store: Arc<MemoryTokenStore>,
    pub redirect: Arc<RecordingRedirect>,
}

impl TestClient {
    pub fn tokens(&self) -> StoredTokens {
        self.store.load().unwrap()
    }
}

pub fn tokens(access: Option<&str>, refresh: Option<&str>) -> StoredTokens {
    StoredTokens {
        access_token: access.map(str::to_string),
        refresh_token: refresh.map(str::to_string),
    }
}

/// Client pointed at `server` with the given tokens already stored.
pub fn client_for(server: &MockServer, stored: StoredTokens) -> TestClient {
    let store = Arc::new(MemoryTokenStore::with_tokens(stored));
    let redirect = Arc::new(RecordingRedirect::default());
    let client = ApiClient::new(
        &server.uri(),
        Duration::from_secs(5),
        store.clone(),
        redirect.clone(),
    )
    .unwrap();

    TestClient {
        client,
        store,
        redirect,
    }
}

/// Matches requests sent without an Authorization header.
pub struct NoAuthHeader;

impl Match for NoAuthHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("authorization")
    }
}

pub fn unauthorized(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(401).set_body_json(json!({
        "message": message,
        "error": "Unauthorized",
        "statusCode": 401
    }))
}

pub fn token_pair(access: &str, refresh: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "access_token": access,
        "refresh_token": refresh
    }))
}

pub fn user_json() -> Value {
    json!({
        "id": "u-1",
        "email": "budi@example.com",
        "name": "Budi",
        "role": "USER"
    })
}

pub fn transaction_json(id: &str, description: &str) -> Value {
    json!({
        "id": id,
        "amount": 50000,
        "date": "2025-12-21",
        "description": description,
        "type": { "id": "t-2", "name": "Expense" },
        "category": { "id": "c-1", "name": "Food" },
        "createdAt": "2025-12-21T09:00:00.000Z",
        "updatedAt": "2025-12-21T09:00:00.000Z"
    })
}

pub fn page_json(data: Vec<Value>) -> Value {
    let total = data.len();
    json!({
        "data": data,
        "meta": { "page": 1, "limit": 10, "total": total, "totalPages": 1 }
    })
}
