//! Common test utilities for E2E tests

#![allow(dead_code)]

use serde_json::Value;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tweetapp::{AppState, config};

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
                domain: "test.example.com".to_string(),
                protocol: "https".to_string(),
                max_body_bytes: 64 * 1024,
            },
            database: config::DatabaseConfig {
                path: db_path,
                max_connections: 5,
            },
            logging: config::LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        };

        tweetapp::metrics::init_metrics();

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        let app = tweetapp::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register a user through the API
    pub async fn register_user(&self, username: &str) -> reqwest::Response {
        let body = serde_json::json!({
            "username": username,
            "name": format!("{username} Example"),
            "email": format!("{username}@example.com"),
            "contactNumber": "555-0100",
            "password": "hunter2"
        });

        self.client
            .post(self.url("/tweets/register"))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// Post a tweet and return the stored document
    pub async fn post_tweet(&self, username: &str, text: &str) -> Value {
        let response = self
            .client
            .post(self.url(&format!("/tweets/{username}/add")))
            .json(&serde_json::json!({ "tweetText": text }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        response.json().await.unwrap()
    }
}
