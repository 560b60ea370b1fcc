use reqwest::StatusCode;
use serde_json::json;

use securepay_core::services::{GatewayClient, Ledger};
use securepay_core::{create_app, AppState};

async fn setup_test_app(gateway_url: Option<String>) -> String {
    let state = AppState::new(Ledger::new(1_500), GatewayClient::new(gateway_url));
    let app = create_app(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], 0));
    let server = axum::Server::bind(&addr).serve(app.into_make_service());
    let actual_addr = server.local_addr();

    tokio::spawn(async move {
        server.await.unwrap();
    });

    format!("http://{}", actual_addr)
}

/// Gateway double that authorizes everything and leaves id assignment to the
/// ledger, so repeated submissions are deduped on phone+amount, not id.
async fn approving_gateway() -> (mockito::ServerGuard, mockito::Mock) {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/authorize")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "success"}"#)
        .create_async()
        .await;
    (server, mock)
}

fn payment(name: &str, phone: &str, card: &str, amount: f64) -> serde_json::Value {
    json!({
        "name": name,
        "phone_number": phone,
        "card_number": card,
        "amount": amount,
    })
}

#[tokio::test]
async fn health_reports_an_empty_ledger() {
    let base_url = setup_test_app(None).await;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", base_url)).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["ledger_size"], 0);
    assert_eq!(body["authorization"], "simulated");
}

#[tokio::test]
async fn valid_payment_is_recorded_and_normalized() {
    let (gateway, _mock) = approving_gateway().await;
    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha Rao", "(987) 654-3210", "4111111111111111", 250.5))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["duplicate"], false);

    let tx = &body["transaction"];
    assert_eq!(tx["card_number"], "4111 1111 1111 1111");
    assert_eq!(tx["card_type"], "Visa");
    assert_eq!(tx["phone_number"], "9876543210");
    assert_eq!(tx["status"], "success");
    assert_eq!(tx["card_hash"], "5ba8ea9d");
    assert!(tx["id"].as_str().unwrap() != "N/A");
    assert!(tx["timestamp"].is_string());
    assert_eq!(body["fraud"]["is_fraudulent"], false);

    let res = client
        .get(format!("{}/transactions", base_url))
        .send()
        .await
        .unwrap();
    let list: serde_json::Value = res.json().await.unwrap();
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_submission_is_rejected_without_touching_the_ledger() {
    let base_url = setup_test_app(None).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "41", 100.0))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("card_number"));

    let stats: serde_json::Value = client
        .get(format!("{}/transactions/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total"], 0);
}

#[tokio::test]
async fn duplicate_submission_is_suppressed() {
    let (gateway, _mock) = approving_gateway().await;
    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    let body = payment("Asha", "9876543210", "4111111111111111", 100.0);

    let first = client
        .post(format!("{}/payments", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = client
        .post(format!("{}/payments", base_url))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second_body: serde_json::Value = second.json().await.unwrap();
    assert_eq!(second_body["duplicate"], true);

    let stats: serde_json::Value = client
        .get(format!("{}/transactions/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total"], 1);
}

#[tokio::test]
async fn large_amounts_are_flagged() {
    let (gateway, _mock) = approving_gateway().await;
    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 15_000.0))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["fraud"]["is_fraudulent"], true);
    assert!(body["fraud"]["reasons"]
        .as_array()
        .unwrap()
        .contains(&json!("Amount exceeds ₹10,000")));
}

#[tokio::test]
async fn rapid_same_card_submissions_trip_the_velocity_rule() {
    let (gateway, _mock) = approving_gateway().await;
    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    // Different amounts so the duplicate window does not suppress the second.
    client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 100.0))
        .send()
        .await
        .unwrap();

    let second = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 200.0))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CREATED);

    let body: serde_json::Value = second.json().await.unwrap();
    assert!(body["fraud"]["reasons"]
        .as_array()
        .unwrap()
        .contains(&json!("Multiple transactions within a minute")));

    // Both entries are now flagged retroactively.
    let stats: serde_json::Value = client
        .get(format!("{}/transactions/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["fraudulent"], 2);
}

#[tokio::test]
async fn transactions_can_be_filtered_by_status() {
    let (gateway, _mock) = approving_gateway().await;
    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 100.0))
        .send()
        .await
        .unwrap();

    let successes: serde_json::Value = client
        .get(format!("{}/transactions?status=success", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(successes.as_array().unwrap().len(), 1);

    let failures: serde_json::Value = client
        .get(format!("{}/transactions?status=failed", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(failures.as_array().unwrap().len(), 0);

    let res = client
        .get(format!("{}/transactions?status=refunded", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_merges_remote_entries_without_replacing() {
    let (gateway, _mock) = approving_gateway().await;
    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    let recorded: serde_json::Value = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 100.0))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let local_id = recorded["transaction"]["id"].as_str().unwrap().to_string();

    let remote = json!([
        {
            "id": local_id,
            "name": "Asha",
            "phone_number": "9876543210",
            "card_number": "4111 1111 1111 1111",
            "card_type": "Visa",
            "amount": 100.0,
            "status": "success"
        },
        {
            "id": "srv-77",
            "name": "Vikram",
            "phone_number": "1112223334",
            "card_number": "5105 1051 0510 5100",
            "card_type": "Mastercard",
            "amount": 55.0,
            "status": "pending",
            "timestamp": "2026-08-20T10:00:00Z"
        }
    ]);

    let summary: serde_json::Value = client
        .post(format!("{}/transactions/refresh", base_url))
        .json(&remote)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(summary["received"], 2);
    assert_eq!(summary["inserted"], 1);

    let list: serde_json::Value = client
        .get(format!("{}/transactions", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn sparse_gateway_responses_get_safe_defaults() {
    let mut gateway = mockito::Server::new_async().await;
    let _mock = gateway
        .mock("POST", "/api/authorize")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 100.0))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    let tx = &body["transaction"];
    // Missing status degrades to failed, id is assigned locally, and the
    // fingerprint is computed from the card digits.
    assert_eq!(tx["status"], "failed");
    assert!(tx["id"].as_str().unwrap() != "N/A");
    assert_eq!(tx["card_hash"], "5ba8ea9d");
}

#[tokio::test]
async fn gateway_failures_map_to_bad_gateway() {
    let mut gateway = mockito::Server::new_async().await;
    let _mock = gateway
        .mock("POST", "/api/authorize")
        .with_status(500)
        .create_async()
        .await;

    let base_url = setup_test_app(Some(gateway.url())).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 100.0))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    let stats: serde_json::Value = client
        .get(format!("{}/transactions/stats", base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["total"], 0);
}

#[tokio::test]
async fn simulated_mode_records_a_transaction_end_to_end() {
    let base_url = setup_test_app(None).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/payments", base_url))
        .json(&payment("Asha", "9876543210", "4111111111111111", 100.0))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: serde_json::Value = res.json().await.unwrap();
    let status = body["transaction"]["status"].as_str().unwrap();
    assert!(["success", "pending", "failed"].contains(&status));
    assert!(body["transaction"]["id"].as_str().unwrap() != "N/A");
}
