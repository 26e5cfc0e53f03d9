//! Integration tests for login, registration and logout flows.

mod common;

use common::{client_for, token_pair, tokens, unauthorized, user_json};
use finance_client::Operation;
use finance_client::models::{LoginRequest, RegisterRequest, Role};
use finance_client::session::Session;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn credentials(captcha_text: &str) -> LoginRequest {
    LoginRequest {
        email: "budi@example.com".to_string(),
        password: "hunter22".to_string(),
        captcha_id: "c-1".to_string(),
        captcha_text: captcha_text.to_string(),
    }
}

fn captcha_response(id: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "message": "Captcha generated",
        "statusCode": 200,
        "data": { "imageBase64": "data:image/svg+xml;base64,PHN2Zz4=", "captchaId": id }
    }))
}

#[tokio::test]
async fn test_login_stores_tokens_and_returns_user() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({
            "email": "budi@example.com",
            "password": "hunter22",
            "captchaId": "c-1",
            "captchaText": "x7kq"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "user": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    assert!(!session.check_auth().unwrap());

    let user = session.login(&credentials("x7kq")).await.unwrap();

    assert_eq!(user.email, "budi@example.com");
    assert_eq!(user.role, Role::User);
    assert!(session.is_authenticated());
    assert!(session.check_auth().unwrap());
    assert_eq!(session.error(), None);
    assert_eq!(test.tokens(), tokens(Some("access-1"), Some("refresh-1")));
}

#[tokio::test]
async fn test_login_wrong_captcha_reports_message_and_reloads_captcha() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid captcha",
            "statusCode": 400
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/captcha/generate"))
        .respond_with(captcha_response("c-2"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    let err = session.login(&credentials("wrong")).await.unwrap_err();

    assert_eq!(err.operation, Operation::Login);
    assert_eq!(err.to_string(), "Invalid captcha");
    assert_eq!(session.error(), Some("Invalid captcha"));
    assert_eq!(session.captcha().unwrap().captcha_id, "c-2");
    assert!(!session.is_authenticated());
    assert_eq!(test.tokens(), tokens(None, None));
}

#[tokio::test]
async fn test_login_without_server_message_uses_fallback() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    // Captcha reload fails too; the login message must survive it
    Mock::given(method("GET"))
        .and(path("/captcha/generate"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    let err = session.login(&credentials("x7kq")).await.unwrap_err();

    assert_eq!(err.message, "Login failed");
    assert_eq!(session.error(), Some("Login failed"));
    assert!(session.captcha().is_none());
}

#[tokio::test]
async fn test_login_rejected_credentials_keep_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(unauthorized("Invalid email or password"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(token_pair("unused", "unused"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/captcha/generate"))
        .respond_with(captcha_response("c-3"))
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    let err = session.login(&credentials("x7kq")).await.unwrap_err();

    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(err.source.is_unauthorized());
}

#[tokio::test]
async fn test_register_does_not_store_tokens() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "access_token": "access-1",
            "refresh_token": "refresh-1",
            "user": user_json()
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    let user = session
        .register(&RegisterRequest {
            email: "budi@example.com".to_string(),
            password: "hunter22".to_string(),
            name: "Budi".to_string(),
            captcha_id: "c-1".to_string(),
            captcha_text: "x7kq".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.name, "Budi");
    assert_eq!(session.current_user(), Some(&user));
    assert_eq!(test.tokens(), tokens(None, None));
}

#[tokio::test]
async fn test_register_failure_uses_fallback_and_reloads_captcha() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/captcha/generate"))
        .respond_with(captcha_response("c-4"))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    let err = session
        .register(&RegisterRequest {
            email: "budi@example.com".to_string(),
            password: "hunter22".to_string(),
            name: "Budi".to_string(),
            captcha_id: "c-1".to_string(),
            captcha_text: "x7kq".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Registration failed");
    assert_eq!(session.captcha().unwrap().captcha_id, "c-4");
}

#[tokio::test]
async fn test_load_captcha_failure_sets_fallback() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(None, None));

    Mock::given(method("GET"))
        .and(path("/captcha/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    let err = session.load_captcha().await.unwrap_err();

    assert_eq!(err.operation, Operation::LoadCaptcha);
    assert_eq!(
        session.error(),
        Some("Failed to load CAPTCHA. Please try again.")
    );
}

#[tokio::test]
async fn test_logout_revokes_refresh_token_and_clears() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), Some("refresh-1")));

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .and(header("authorization", "Bearer access-1"))
        .and(body_json(json!({ "refresh_token": "refresh-1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    session.logout().await;

    assert!(!session.is_authenticated());
    assert!(!session.check_auth().unwrap());
    assert_eq!(test.tokens(), tokens(None, None));
}

#[tokio::test]
async fn test_logout_clears_locally_when_server_fails() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), Some("refresh-1")));

    Mock::given(method("POST"))
        .and(path("/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    session.logout().await;

    assert_eq!(test.tokens(), tokens(None, None));
    assert_eq!(test.redirect.count(), 0);
}

#[tokio::test]
async fn test_logout_all_clears_tokens() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), Some("refresh-1")));

    Mock::given(method("POST"))
        .and(path("/auth/logout-all"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut session = Session::new(test.client.clone());
    session.logout_all().await;

    assert_eq!(test.tokens(), tokens(None, None));
}
