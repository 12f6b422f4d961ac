//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with mock bot, queue and storage backends injected, enabling end-to-end
//! testing without external infrastructure.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use vidrelay_core::{
    config::{CloudCredentials, PublicUrlConfig, QueueConfig, TelegramConfig},
    testing::{MockBotApi, MockObjectStorage, MockTaskQueue},
    BotApi, Config, Downloader, DownloaderSettings, ObjectStorage, Receiver, TaskQueue,
};
use vidrelay_server::state::AppState;

/// Re-export fixtures for test convenience
pub use vidrelay_core::testing::fixtures;

pub const TEST_DOMAIN: &str = "d5dtest.apigw.yandexcloud.net";

/// Test fixture for E2E testing with mock dependencies.
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_video_is_queued() {
///     let fixture = TestFixture::new();
///     let response = fixture.post("/api/v1/receiver", event_json).await;
///     assert_eq!(response.body["statusCode"], 200);
///     assert_eq!(fixture.queue.publish_count().await, 1);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock bot API - inspect sent messages, configure file lookups
    pub bot: Arc<MockBotApi>,
    /// Mock task queue - inspect published tasks
    pub queue: Arc<MockTaskQueue>,
    /// Mock object storage - inspect uploads
    pub storage: Arc<MockObjectStorage>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestFixture {
    pub fn new() -> Self {
        let bot = Arc::new(MockBotApi::new());
        let queue = Arc::new(MockTaskQueue::new());
        let storage = Arc::new(MockObjectStorage::new());

        let config = Config {
            telegram: TelegramConfig {
                token: "123:secret-token".to_string(),
                ..Default::default()
            },
            queue: QueueConfig {
                url: "https://message-queue.api.cloud.yandex.net/b1g/dj6/downloader".to_string(),
                ..Default::default()
            },
            credentials: CloudCredentials {
                access_key: "test-access-key".to_string(),
                secret_key: "test-secret-key".to_string(),
            },
            public: PublicUrlConfig {
                domain: TEST_DOMAIN.to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        let receiver = Arc::new(Receiver::new(
            Arc::clone(&bot) as Arc<dyn BotApi>,
            Arc::clone(&queue) as Arc<dyn TaskQueue>,
        ));
        let downloader = Arc::new(Downloader::new(
            Arc::clone(&bot) as Arc<dyn BotApi>,
            Arc::clone(&storage) as Arc<dyn ObjectStorage>,
            DownloaderSettings::from_config(&config),
        ));

        let state = Arc::new(AppState::new(config, receiver, downloader));
        let router = vidrelay_server::api::create_router(state);

        Self {
            router,
            bot,
            queue,
            storage,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, Body::empty(), "application/json")
            .await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Body::from(body.to_string()), "application/json")
            .await
    }

    /// Send a POST request with raw string body (for testing malformed payloads).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request("POST", path, Body::from(body.to_string()), "application/json")
            .await
    }

    /// Send a POST request with custom content type.
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        self.request("POST", path, Body::from(body.to_string()), content_type)
            .await
    }

    async fn request(
        &self,
        method: &str,
        path: &str,
        body: Body,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(body)
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let text = String::from_utf8_lossy(&body_bytes).into_owned();
        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body, text }
    }
}
