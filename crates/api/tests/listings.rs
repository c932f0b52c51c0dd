// SPDX-FileCopyrightText: 2025 Semiotic Labs
//
// SPDX-License-Identifier: Apache-2.0

//! Integration tests for the listing endpoints
//!
//! The server runs against an in-memory store that applies the same
//! exclusion rule as the production anti-join: a listing is active only if
//! its (contract address, token address, token id) key appears in neither
//! the sold nor the delisted fixture set.

use std::{net::SocketAddr, sync::Arc};

use api::{Server, ServerConfig, ShutdownConfig};
use async_trait::async_trait;
use axum::http::StatusCode;
use listings::{ListingError, ListingEvent, ListingStore};

type ListingKey = (String, Option<String>, Option<String>);

fn key_of(event: &ListingEvent) -> ListingKey {
    (
        event.contract_address.clone(),
        event.token_address.clone(),
        event.token_id.clone(),
    )
}

#[derive(Debug, Default)]
struct FixtureStore {
    listed: Vec<ListingEvent>,
    sold: Vec<ListingKey>,
    delisted: Vec<ListingKey>,
    unreachable: bool,
}

#[async_trait]
impl ListingStore for FixtureStore {
    async fn fetch_active(&self) -> Result<Vec<ListingEvent>, ListingError> {
        if self.unreachable {
            return Err(ListingError::from(sqlx::Error::PoolClosed));
        }
        Ok(self
            .listed
            .iter()
            .filter(|event| {
                let key = key_of(event);
                !self.sold.contains(&key) && !self.delisted.contains(&key)
            })
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), ListingError> {
        if self.unreachable {
            return Err(ListingError::from(sqlx::Error::PoolClosed));
        }
        Ok(())
    }
}

fn event(rindexer_id: i64, contract: &str, token_id: &str) -> ListingEvent {
    ListingEvent {
        rindexer_id,
        contract_address: contract.to_string(),
        token_address: Some("0x1111111111111111111111111111111111111111".to_string()),
        token_id: Some(token_id.to_string()),
        tx_hash: "0xfeed".to_string(),
        block_number: "1000".to_string(),
        block_hash: "0xabcd".to_string(),
        network: "ethereum".to_string(),
        tx_index: "0".to_string(),
        log_index: "0".to_string(),
        price: Some("1000000000000000000".to_string()),
    }
}

async fn spawn_server(store: FixtureStore) -> SocketAddr {
    let config = ServerConfig::for_testing();
    let shutdown_config = ShutdownConfig::default();
    let (addr, _) = Server::with_listing_store(config, shutdown_config, Arc::new(store))
        .expect("Failed to create server")
        .run_for_testing()
        .await
        .expect("Failed to start test server");
    addr
}

#[tokio::test]
async fn ping_returns_exact_payload() {
    let addr = spawn_server(FixtureStore::default()).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/ping"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .expect("content type")
        .to_str()
        .expect("header value");
    assert!(content_type.starts_with("application/json"));
    let body = response.text().await.expect("Failed to read response");
    assert_eq!(body, r#"{"status":"pong"}"#);
}

#[tokio::test]
async fn ping_succeeds_while_database_is_down() {
    let addr = spawn_server(FixtureStore {
        unreachable: true,
        ..FixtureStore::default()
    })
    .await;

    let response = reqwest::get(format!("http://{addr}/api/v1/ping"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.expect("body"),
        r#"{"status":"pong"}"#
    );
}

#[tokio::test]
async fn active_excludes_sold_and_delisted_keys() {
    let a = event(1, "0xaaa", "1");
    let b = event(2, "0xbbb", "2");
    let c = event(3, "0xccc", "3");
    let store = FixtureStore {
        sold: vec![key_of(&b)],
        delisted: vec![key_of(&c)],
        listed: vec![a.clone(), b, c],
        unreachable: false,
    };
    let addr = spawn_server(store).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/listing/active"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let active: Vec<ListingEvent> = response.json().await.expect("JSON array");
    assert_eq!(active, vec![a]);
}

#[tokio::test]
async fn no_active_listings_yields_empty_array() {
    let addr = spawn_server(FixtureStore::default()).await;

    let response = reqwest::get(format!("http://{addr}/api/v1/listing/active"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("body"), "[]");
}

#[tokio::test]
async fn unrecognized_state_is_rejected_without_a_query() {
    // An unreachable store proves the invalid path never touches it:
    // dispatching would produce a 500, not a 400.
    let addr = spawn_server(FixtureStore {
        unreachable: true,
        ..FixtureStore::default()
    })
    .await;

    for state in ["sold", "ACTIVE", "delisted"] {
        let response = reqwest::get(format!("http://{addr}/api/v1/listing/{state}"))
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json().await.expect("error envelope");
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains(state));
    }
}

#[tokio::test]
async fn store_failure_maps_to_500_envelope() {
    let addr = spawn_server(FixtureStore {
        listed: vec![event(1, "0xaaa", "1")],
        unreachable: true,
        ..FixtureStore::default()
    })
    .await;

    let response = reqwest::get(format!("http://{addr}/api/v1/listing/active"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.expect("error envelope");
    assert!(!body["error"].as_str().expect("error message").is_empty());
}

#[tokio::test]
async fn repeated_requests_return_identical_results() {
    let store = FixtureStore {
        listed: vec![event(1, "0xaaa", "1"), event(2, "0xbbb", "2")],
        ..FixtureStore::default()
    };
    let addr = spawn_server(store).await;

    let mut bodies = vec![];
    for _ in 0..3 {
        let response = reqwest::get(format!("http://{addr}/api/v1/listing/active"))
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(response.text().await.expect("body"));
    }
    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[1], bodies[2]);
}

#[tokio::test]
async fn health_reports_database_reachability() {
    let addr = spawn_server(FixtureStore::default()).await;

    let response = reqwest::get(format!("http://{addr}/health"))
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.expect("health report");
    assert_eq!(body["status"], "Up");
    assert_eq!(body["database"], "Up");
}
