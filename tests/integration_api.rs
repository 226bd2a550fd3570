//! API Integration Tests

use axum::http::StatusCode;
use serde_json::json;

mod common;

use common::{create_account, get, json_request, keyed_post, send, send_raw, test_app};

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app().await;

    let (status, json) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "healthy" }));
}

// =========================================================================
// Accounts
// =========================================================================

#[tokio::test]
async fn test_create_and_get_account() {
    let (app, _) = test_app().await;

    let account_id = create_account(&app, "12345678900").await;
    assert!(account_id > 0);

    let (status, json) = send(&app, get(&format!("/accounts/{}", account_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["account_id"], account_id);
    assert_eq!(json["document_number"], "12345678900");
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_duplicate_document_number_conflicts() {
    let (app, _) = test_app().await;
    create_account(&app, "12345678900").await;

    let (status, json) = send(
        &app,
        json_request("POST", "/accounts", json!({ "document_number": "12345678900" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error_code"], "duplicate_document_number");
}

#[tokio::test]
async fn test_invalid_document_number() {
    let (app, _) = test_app().await;

    for body in [
        json!({ "document_number": "" }),
        json!({ "document_number": "1234" }),
        json!({ "document_number": "1234567890X" }),
        json!({}),
    ] {
        let (status, json) = send(&app, json_request("POST", "/accounts", body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error_code"], "invalid_document_number");
    }
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (app, _) = test_app().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/accounts")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, json) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_request");
}

#[tokio::test]
async fn test_get_account_errors() {
    let (app, _) = test_app().await;

    let (status, json) = send(&app, get("/accounts/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "account_not_found");

    for path in ["/accounts/0", "/accounts/-5", "/accounts/abc"] {
        let (status, json) = send(&app, get(path)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(json["error_code"], "invalid_account_id");
    }
}

#[tokio::test]
async fn test_versioned_prefix() {
    let (app, _) = test_app().await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/accounts",
            json!({ "document_number": "98765432100" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = json["account_id"].as_i64().unwrap();
    let (status, _) = send(&app, get(&format!("/accounts/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_correlation_id_echoed() {
    let (app, _) = test_app().await;
    let correlation_id = "6f1c2b3a-1d2e-4f50-8a9b-0c1d2e3f4a5b";

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/accounts/1")
        .header("X-Correlation-Id", correlation_id)
        .body(axum::body::Body::empty())
        .unwrap();

    let response = tower::util::ServiceExt::oneshot(app.clone(), request)
        .await
        .unwrap();
    assert_eq!(
        response.headers().get("X-Correlation-Id").unwrap(),
        correlation_id
    );

    // Generated when missing
    let response = tower::util::ServiceExt::oneshot(app, get("/accounts/1"))
        .await
        .unwrap();
    let generated = response.headers().get("X-Correlation-Id").unwrap();
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());
}

// =========================================================================
// Transactions
// =========================================================================

#[tokio::test]
async fn test_purchase_amount_is_negative() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    let (status, json) = send(
        &app,
        keyed_post(
            "/transactions",
            "purchase-1",
            json!({ "account_id": account_id, "operation_type_id": 1, "amount": 50.0 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["amount"], json!(-50.0));
    assert_eq!(json["account_id"], account_id);
    assert_eq!(json["operation_type_id"], 1);
    assert!(json["transaction_id"].as_i64().unwrap() > 0);
    assert!(json["event_date"].is_string());
}

#[tokio::test]
async fn test_credit_voucher_amount_is_positive() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    let (status, json) = send(
        &app,
        keyed_post(
            "/transactions",
            "voucher-1",
            json!({ "account_id": account_id, "operation_type_id": 4, "amount": -100.0 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["amount"], json!(100.0));
}

#[tokio::test]
async fn test_transaction_for_unknown_account() {
    let (app, _) = test_app().await;

    let (status, json) = send(
        &app,
        keyed_post(
            "/transactions",
            "missing-account",
            json!({ "account_id": 9999, "operation_type_id": 1, "amount": 10 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "account_not_found");
}

#[tokio::test]
async fn test_transaction_validation_errors() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    let cases = [
        (json!({ "account_id": 0, "operation_type_id": 1, "amount": 10 }), "invalid_account_id"),
        (
            json!({ "account_id": account_id, "operation_type_id": 5, "amount": 10 }),
            "invalid_operation_type",
        ),
        (json!({ "account_id": account_id, "operation_type_id": 1, "amount": 0 }), "zero_amount"),
        (json!({ "account_id": account_id, "operation_type_id": 1 }), "invalid_request"),
        (
            json!({ "account_id": account_id, "operation_type_id": 1, "amount": "ten" }),
            "invalid_request",
        ),
    ];

    for (i, (body, expected_code)) in cases.into_iter().enumerate() {
        let (status, json) = send(
            &app,
            keyed_post("/transactions", &format!("invalid-{}", i), body.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error_code"], expected_code, "{body}");
    }
}

#[tokio::test]
async fn test_transaction_requires_idempotency_key() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    let (status, json) = send(
        &app,
        json_request(
            "POST",
            "/transactions",
            json!({ "account_id": account_id, "operation_type_id": 1, "amount": 10 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "missing_header");
}

#[tokio::test]
async fn test_retried_transaction_is_replayed() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;
    let body = json!({ "account_id": account_id, "operation_type_id": 3, "amount": 20 });

    let (first_status, first) =
        send_raw(&app, keyed_post("/transactions", "retry-me", body.clone())).await;
    let (second_status, second) =
        send_raw(&app, keyed_post("/transactions", "retry-me", body)).await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::CREATED);
    assert_eq!(first, second);

    let (_, list) = send(&app, get(&format!("/accounts/{}/transactions", account_id))).await;
    assert_eq!(list["pagination"]["total"], 1);
}

#[tokio::test]
async fn test_failed_transaction_is_retryable() {
    let (app, _) = test_app().await;

    // Account does not exist yet: 404, not cached
    let body = json!({ "account_id": 1, "operation_type_id": 1, "amount": 10 });
    let (status, _) = send(&app, keyed_post("/transactions", "late-account", body.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(create_account(&app, "12345678900").await, 1);

    let (status, json) = send(&app, keyed_post("/transactions", "late-account", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["amount"], json!(-10.0));
}

// =========================================================================
// Listing
// =========================================================================

#[tokio::test]
async fn test_list_transactions() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    for (key, op, amount) in [("a", 1, 50.0), ("b", 4, 100.0)] {
        let (status, _) = send(
            &app,
            keyed_post(
                "/transactions",
                key,
                json!({ "account_id": account_id, "operation_type_id": op, "amount": amount }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, json) = send(
        &app,
        get(&format!("/accounts/{}/transactions?limit=10&offset=0", account_id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);
    assert_eq!(json["pagination"], json!({ "total": 2, "limit": 10, "offset": 0, "pages": 1 }));

    // Newest first
    assert_eq!(json["transactions"][0]["amount"], json!(100.0));
    assert_eq!(json["transactions"][1]["amount"], json!(-50.0));
}

#[tokio::test]
async fn test_list_transactions_defaults_and_paging() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    let (status, json) = send(&app, get(&format!("/accounts/{}/transactions", account_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"], json!({ "total": 0, "limit": 50, "offset": 0, "pages": 1 }));

    // Blank values fall back to defaults
    let (status, json) = send(
        &app,
        get(&format!("/accounts/{}/transactions?limit=&offset=", account_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["pagination"]["limit"], 50);
    assert_eq!(json["pagination"]["offset"], 0);

    for i in 0..3 {
        send(
            &app,
            keyed_post(
                "/transactions",
                &format!("page-{}", i),
                json!({ "account_id": account_id, "operation_type_id": 2, "amount": 1 }),
            ),
        )
        .await;
    }

    let (_, json) = send(
        &app,
        get(&format!("/accounts/{}/transactions?limit=2&offset=2", account_id)),
    )
    .await;
    assert_eq!(json["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["pages"], 2);
}

#[tokio::test]
async fn test_list_transactions_errors() {
    let (app, _) = test_app().await;
    let account_id = create_account(&app, "12345678900").await;

    let (status, json) = send(&app, get("/accounts/9999/transactions")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error_code"], "account_not_found");

    let (status, json) = send(&app, get("/accounts/abc/transactions")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error_code"], "invalid_account_id");

    for (query, code) in [
        ("limit=0", "invalid_limit"),
        ("limit=101", "invalid_limit"),
        ("limit=ten", "invalid_limit"),
        ("offset=-1", "invalid_offset"),
        ("offset=x", "invalid_offset"),
    ] {
        let (status, json) = send(
            &app,
            get(&format!("/accounts/{}/transactions?{}", account_id, query)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{query}");
        assert_eq!(json["error_code"], code, "{query}");
    }
}
