// E2E Test 2: Blocklist management
// Requires a running scamguard-rs instance. Blocklist state is in-memory
// and shared across tests, so every test uses its own unique address.

use serde_json::{json, Value};

fn base_url() -> String {
    std::env::var("SCAMGUARD_URL").unwrap_or_else(|_| "http://localhost:8000".to_string())
}

fn unique_email(tag: &str) -> String {
    format!("{}-{}@example.com", tag, std::process::id())
}

async fn list_blocklist(client: &reqwest::Client) -> Vec<String> {
    let response = client
        .get(format!("{}/blocklist/", base_url()))
        .send()
        .await
        .expect("Request failed");

    assert!(response.status().is_success(), "List should succeed");
    response.json().await.expect("Invalid JSON")
}

#[tokio::test]
async fn test_add_twice_keeps_one_entry() {
    let client = reqwest::Client::new();
    let email = unique_email("dup");

    // Add the same address twice, with different casing
    for variant in [email.to_uppercase(), email.clone()] {
        let response = client
            .post(format!("{}/blocklist/add", base_url()))
            .json(&json!({ "email": variant }))
            .send()
            .await
            .expect("Request failed");

        assert!(response.status().is_success(), "Add should succeed");
        let body: Value = response.json().await.expect("Invalid JSON");
        assert_eq!(body["status"], "added");
    }

    let entries = list_blocklist(&client).await;
    let occurrences = entries.iter().filter(|e| **e == email).count();
    assert_eq!(occurrences, 1, "Duplicate adds must collapse to one entry");

    // Only the lowercase form is ever listed
    assert!(!entries.contains(&email.to_uppercase()));
}

#[tokio::test]
async fn test_remove_absent_entry_is_noop() {
    let client = reqwest::Client::new();
    let before = list_blocklist(&client).await;

    let response = client
        .post(format!("{}/blocklist/remove", base_url()))
        .json(&json!({ "email": unique_email("never-added") }))
        .send()
        .await
        .expect("Request failed");

    assert!(response.status().is_success(), "Remove of absent entry must not error");
    let body: Value = response.json().await.expect("Invalid JSON");
    assert_eq!(body["status"], "removed");

    let after = list_blocklist(&client).await;
    assert_eq!(before, after, "Blocklist should be unchanged");
}

#[tokio::test]
async fn test_add_then_remove_roundtrip() {
    let client = reqwest::Client::new();
    let email = unique_email("roundtrip");

    client
        .post(format!("{}/blocklist/add", base_url()))
        .json(&json!({ "email": email }))
        .send()
        .await
        .expect("Request failed");

    assert!(list_blocklist(&client).await.contains(&email));

    client
        .post(format!("{}/blocklist/remove", base_url()))
        .json(&json!({ "email": email.to_uppercase() }))
        .send()
        .await
        .expect("Request failed");

    assert!(
        !list_blocklist(&client).await.contains(&email),
        "Removal should be case-insensitive"
    );
}

#[tokio::test]
async fn test_malformed_address_rejected() {
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/blocklist/add", base_url()))
        .json(&json!({ "email": "definitely not an email" }))
        .send()
        .await
        .expect("Request failed");

    assert_eq!(
        response.status().as_u16(),
        422,
        "Malformed address should be rejected with a structured error"
    );

    let body: Value = response.json().await.expect("Invalid JSON");
    assert!(body["error"].is_string(), "Error body should carry a message");
}
