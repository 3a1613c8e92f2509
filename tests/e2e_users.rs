//! E2E tests for user operations (registration, login, password reset, directory)

mod common;

use common::TestServer;
use serde_json::Value;

#[tokio::test]
async fn test_register_user() {
    let server = TestServer::new().await;

    let response = server.register_user("alice").await;

    assert_eq!(response.status(), 201);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["username"], "alice");
    assert_eq!(json["email"], "alice@example.com");
    assert_eq!(json["contactNumber"], "555-0100");
    assert_ne!(json["password"], "hunter2");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let server = TestServer::new().await;

    assert_eq!(server.register_user("alice").await.status(), 201);
    let response = server.register_user("alice").await;

    assert_eq!(response.status(), 409);
    let json: Value = response.json().await.unwrap();
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_register_blank_username() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/tweets/register"))
        .json(&serde_json::json!({
            "username": "  ",
            "name": "Nobody",
            "email": "nobody@example.com",
            "contactNumber": "555-0100",
            "password": "hunter2"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
}

#[tokio::test]
async fn test_register_accepts_legacy_contact_field() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(&server.url("/tweets/register"))
        .json(&serde_json::json!({
            "username": "bob",
            "name": "Bob",
            "email": "bob@example.com",
            "contactNum": "555-0199",
            "password": "pw"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["contactNumber"], "555-0199");
}

#[tokio::test]
async fn test_login() {
    let server = TestServer::new().await;
    server.register_user("alice").await;

    let ok = server
        .client
        .post(&server.url("/tweets/login"))
        .json(&serde_json::json!({ "username": "alice", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(ok.status(), 200);
    let json: Value = ok.json().await.unwrap();
    assert_eq!(json["username"], "alice");

    let bad = server
        .client
        .post(&server.url("/tweets/login"))
        .json(&serde_json::json!({ "username": "alice", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad.status(), 401);

    let unknown = server
        .client
        .post(&server.url("/tweets/login"))
        .json(&serde_json::json!({ "username": "mallory", "password": "hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 401);
}

#[tokio::test]
async fn test_forgot_password() {
    let server = TestServer::new().await;
    server.register_user("alice").await;

    let response = server
        .client
        .put(&server.url("/tweets/alice/forgot"))
        .json(&serde_json::json!({ "newPassword": "s3cret", "contact": "555-0100" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // The new password is live
    let login = server
        .client
        .post(&server.url("/tweets/login"))
        .json(&serde_json::json!({ "username": "alice", "password": "s3cret" }))
        .send()
        .await
        .unwrap();
    assert_eq!(login.status(), 200);
}

#[tokio::test]
async fn test_forgot_password_wrong_contact() {
    let server = TestServer::new().await;
    server.register_user("alice").await;

    let response = server
        .client
        .put(&server.url("/tweets/alice/forgot"))
        .json(&serde_json::json!({ "newPassword": "s3cret", "contact": "000" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let unknown = server
        .client
        .put(&server.url("/tweets/mallory/forgot"))
        .json(&serde_json::json!({ "newPassword": "s3cret", "contact": "555-0100" }))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), 400);
}

#[tokio::test]
async fn test_get_all_users() {
    let server = TestServer::new().await;
    server.register_user("alice").await;
    server.register_user("bob").await;

    let response = server
        .client
        .get(&server.url("/tweets/users/all"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json: Vec<Value> = response.json().await.unwrap();
    assert_eq!(json.len(), 2);
    assert!(json.iter().all(|user| user["password"] != "hunter2"));
}

#[tokio::test]
async fn test_search_users() {
    let server = TestServer::new().await;
    server.register_user("alice").await;
    server.register_user("malice").await;
    server.register_user("bob").await;

    let response = server
        .client
        .get(&server.url("/tweets/user/search/lic"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json: Vec<Value> = response.json().await.unwrap();
    let names: Vec<&str> = json
        .iter()
        .map(|user| user["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["alice", "malice"]);

    let empty = server
        .client
        .get(&server.url("/tweets/user/search/zzz"))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), 200);
    let json: Vec<Value> = empty.json().await.unwrap();
    assert!(json.is_empty());
}
