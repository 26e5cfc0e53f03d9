//! Integration tests for the transaction type and category services.

mod common;

use common::{client_for, page_json, tokens};
use finance_client::models::{CategoryParams, PaginationParams};
use finance_client::services::{trans_category_service, trans_type_service};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn test_type_list_passes_pagination() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), None));

    Mock::given(method("GET"))
        .and(path("/trans-type"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![
            json!({ "id": "t-1", "name": "Income" }),
            json!({ "id": "t-2", "name": "Expense" }),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let page = trans_type_service::list(&test.client, &PaginationParams::page(2, 5))
        .await
        .unwrap();

    assert_eq!(page.data[1].name, "Expense");
    assert_eq!(page.meta.total, 2);
}

#[tokio::test]
async fn test_type_create_update_delete() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), None));

    Mock::given(method("POST"))
        .and(path("/trans-type"))
        .and(body_json(json!({ "name": "Savings" })))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "id": "t-3", "name": "Savings" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/trans-type/t-3"))
        .and(body_json(json!({ "name": "Investments" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "t-3", "name": "Investments" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/trans-type/t-3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": "t-3", "name": "Investments" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/trans-type/t-3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let created = trans_type_service::create(&test.client, "Savings").await.unwrap();
    let renamed = trans_type_service::update(&test.client, &created.id, "Investments")
        .await
        .unwrap();
    assert_eq!(renamed.name, "Investments");
    assert_eq!(
        trans_type_service::get(&test.client, "t-3").await.unwrap(),
        renamed
    );
    trans_type_service::delete(&test.client, "t-3").await.unwrap();
}

#[tokio::test]
async fn test_category_list_filters_by_type() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), None));

    Mock::given(method("GET"))
        .and(path("/trans-category"))
        .and(query_param("typeId", "t-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_json(vec![json!({
            "id": "c-1",
            "name": "Food"
        })])))
        .expect(1)
        .mount(&server)
        .await;

    let params = CategoryParams {
        type_id: Some("t-2".to_string()),
        ..Default::default()
    };
    let page = trans_category_service::list(&test.client, &params)
        .await
        .unwrap();

    assert_eq!(page.data[0].name, "Food");
    assert!(page.is_last_page());
}

#[tokio::test]
async fn test_category_not_found_carries_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    let test = client_for(&server, tokens(Some("access-1"), None));

    Mock::given(method("GET"))
        .and(path("/trans-category/c-404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Category not found",
            "statusCode": 404
        })))
        .mount(&server)
        .await;

    let err = trans_category_service::get(&test.client, "c-404")
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(reqwest::StatusCode::NOT_FOUND));
    assert_eq!(err.server_message(), Some("Category not found"));
}
