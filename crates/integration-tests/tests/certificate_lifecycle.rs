//! Certificate ledger over the full router and in-memory store.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use axum::http::StatusCode;
use certdesk_integration_tests::TestApp;
use certdesk_server::Store;
use serde_json::{Value, json};

async fn app_with_ann() -> TestApp {
    let app = TestApp::new();
    let resp = app
        .post("/customer", &json!({"name": "Ann", "email": "ann@x.com"}))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    app
}

#[tokio::test]
async fn test_ann_scenario() {
    let app = TestApp::new();

    let resp = app
        .post("/customer", &json!({"name": "Ann", "email": "ann@x.com"}))
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);

    let resp = app
        .post("/customer", &json!({"name": "Ann", "email": "ann@x.com"}))
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .post(
            "/certificate",
            &json!({"email": "ann@x.com", "key": "k", "body": "b"}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::CREATED);
    let created = resp.json();
    assert_eq!(created["active"], false);
    let id = created["id"].as_str().unwrap().to_owned();

    let resp = app
        .put(&format!("/certificate/{id}"), &json!({"active": true}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app.get("/certificate/ann@x.com").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.json(),
        json!([{"id": id, "email": "ann@x.com", "key": "k", "body": "b", "active": true}])
    );
}

#[tokio::test]
async fn test_unknown_customer_inserts_nothing() {
    let app = TestApp::new();

    let resp = app
        .post(
            "/certificate",
            &json!({"email": "ghost@x.com", "key": "k", "body": "b", "active": true}),
        )
        .await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.body, "Customer does not exist.");
    assert!(app.store.certificates().is_empty().await);
}

#[tokio::test]
async fn test_generated_ids_are_unique() {
    let app = app_with_ann().await;

    let mut ids = HashSet::new();
    for n in 0..20 {
        let resp = app
            .post(
                "/certificate",
                &json!({"email": "ann@x.com", "key": format!("k{n}"), "body": "b"}),
            )
            .await;
        assert_eq!(resp.status, StatusCode::CREATED);
        assert!(ids.insert(resp.json()["id"].as_str().unwrap().to_owned()));
    }

    let listed = app.get("/certificate/ann@x.com").await.json();
    assert_eq!(listed.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_list_is_scoped_to_customer_in_insertion_order() {
    let app = app_with_ann().await;
    app.post("/customer", &json!({"name": "Bo", "email": "bo@x.com"}))
        .await;

    for (email, key) in [("ann@x.com", "a1"), ("bo@x.com", "b1"), ("ann@x.com", "a2")] {
        app.post(
            "/certificate",
            &json!({"email": email, "key": key, "body": "b"}),
        )
        .await;
    }

    let listed = app.get("/certificate/ann@x.com").await.json();
    let keys: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["key"].as_str())
        .collect();
    assert_eq!(keys, ["a1", "a2"]);
}

#[tokio::test]
async fn test_active_toggles_both_ways() {
    let app = app_with_ann().await;
    let created = app
        .post(
            "/certificate",
            &json!({"email": "ann@x.com", "key": "k", "body": "b", "active": true}),
        )
        .await
        .json();
    let uri = format!("/certificate/{}", created["id"].as_str().unwrap());
    assert_eq!(created["active"], true);

    for active in [false, true, false] {
        let resp = app.put(&uri, &json!({"active": active})).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body, "Successfully updated certificate.");

        let listed = app.get("/certificate/ann@x.com").await.json();
        assert_eq!(listed[0]["active"], Value::Bool(active));
    }
}

#[tokio::test]
async fn test_update_failures_are_not_found() {
    let app = app_with_ann().await;

    for id in [
        "not-an-id",
        "507f1f77bcf86cd799439011",
        "67e5504410b1426f9247bb680e5fe0c8",
        "67e55044-10b1-426f-9247-bb680e5fe0c8",
    ] {
        let resp = app
            .put(&format!("/certificate/{id}"), &json!({"active": true}))
            .await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "id {id}");
    }
    assert!(app.store.certificates().is_empty().await);
}

#[tokio::test]
async fn test_update_body_must_be_active_flag() {
    let app = app_with_ann().await;
    let created = app
        .post(
            "/certificate",
            &json!({"email": "ann@x.com", "key": "k", "body": "b"}),
        )
        .await
        .json();
    let uri = format!("/certificate/{}", created["id"].as_str().unwrap());

    for body in [json!({}), json!({"active": "yes"}), json!({"active": true, "body": "x"})] {
        let resp = app.put(&uri, &body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST, "body {body}");
    }

    let listed = app.get("/certificate/ann@x.com").await.json();
    assert_eq!(listed[0]["active"], false);
    assert_eq!(listed[0]["body"], "b");
}

#[tokio::test]
async fn test_malformed_id_wins_over_malformed_body() {
    let app = app_with_ann().await;

    for body in [json!({"active": true, "key": "x"}), json!({})] {
        let resp = app.put("/certificate/garbage", &body).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "body {body}");
        assert_eq!(resp.body, "Certificate not found.");
    }
}
