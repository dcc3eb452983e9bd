// E2E Test 1: Classification endpoint
// Requires a running scamguard-rs instance with a trained model loaded.
// Override the target with SCAMGUARD_URL (default http://localhost:8000).

use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("SCAMGUARD_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

#[tokio::test]
async fn test_health() {
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Request failed");

    assert!(response.status().is_success(), "Health check should succeed");

    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["status"], "ok");
    assert!(body["model"].is_string(), "Should report the model dir");
}

#[tokio::test]
async fn test_classify_returns_one_of_two_labels() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/classify/", base_url()))
        .json(&json!({
            "text": "Hi, are we still on for lunch tomorrow at noon?"
        }))
        .send()
        .await
        .expect("Request failed");

    assert!(response.status().is_success(), "Classify should succeed");

    let body: Value = response.json().await.expect("Invalid JSON");
    let label = body["label"].as_str().expect("label must be a string");
    assert!(
        label == "SAFE" || label == "SCAM",
        "Unexpected label: {}",
        label
    );

    let score = body["score"].as_f64().expect("score must be a number");
    assert!((0.0..=1.0).contains(&score), "Score out of range: {}", score);

    let explanation = body["explanation"].as_str().expect("explanation must be a string");
    assert!(!explanation.is_empty(), "Explanation should not be empty");
}

#[tokio::test]
async fn test_classify_scam_phrase_scores_high() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/classify/", base_url()))
        .json(&json!({
            "text": "URGENT: Your account has been suspended. Verify your \
                     password immediately at http://secure-login.example.win \
                     or you will lose access forever. Act now!"
        }))
        .send()
        .await
        .expect("Request failed");

    assert!(response.status().is_success(), "Classify should succeed");

    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["label"], "SCAM", "Scam-style phrase should flag as SCAM");

    let score = body["score"].as_f64().expect("score must be a number");
    assert!(score > 0.5, "Predicted-class probability too low: {}", score);

    assert_eq!(body["explanation"], "Potential scam.");
}

#[tokio::test]
async fn test_classify_rejects_malformed_body() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/classify/", base_url()))
        .json(&json!({ "message": "wrong field name" }))
        .send()
        .await
        .expect("Request failed");

    assert!(
        response.status().is_client_error(),
        "Missing text field should be a client error"
    );
}
