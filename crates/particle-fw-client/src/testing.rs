//! Test utilities for particle-fw-client
//!
//! Provides a throwaway HTTP server and a mock of the product firmware
//! endpoint that records what it receives.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use crate::client::FirmwareUploader;
use crate::config::{UploaderConfig, UploaderConfigBuilder};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub uploader: FirmwareUploader,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on an ephemeral local port
    ///
    /// `uploader` is preconfigured to talk to it.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use particle_fw_client::testing::{MockParticleApi, TestServer};
    ///
    /// let api = MockParticleApi::new();
    /// let server = TestServer::start(api.router()).await?;
    /// let result = server.uploader.upload(&request).await?;
    /// assert_eq!(api.requests().len(), 1);
    /// ```
    pub async fn start(router: Router) -> std::io::Result<Self> {
        Self::start_with_config(router, UploaderConfig::builder()).await
    }

    /// Serve `router`, building the uploader from `config` with its base URL
    /// replaced by the server's address
    pub async fn start_with_config(
        router: Router,
        config: UploaderConfigBuilder,
    ) -> std::io::Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let config = config.base_url(format!("http://{}", addr)).build();
        let uploader = FirmwareUploader::with_config(config).map_err(std::io::Error::other)?;

        Ok(Self {
            addr,
            uploader,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

// =============================================================================
// Mock Particle API
// =============================================================================

/// Canned answer of the mock endpoint
#[derive(Debug, Clone)]
pub struct MockResponse {
    pub status: StatusCode,
    pub body: String,
}

impl MockResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// `201 Created` with the given title and uploader
    pub fn created(title: &str, username: &str) -> Self {
        let body = serde_json::json!({
            "ok": true,
            "title": title,
            "uploaded_by": { "username": username },
        });
        Self::new(StatusCode::CREATED, body.to_string())
    }
}

/// One multipart part as received by the mock
#[derive(Debug, Clone)]
pub struct CapturedPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl CapturedPart {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// One firmware POST as received by the mock
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub product: String,
    pub headers: HeaderMap,
    pub parts: Vec<CapturedPart>,
}

impl CapturedRequest {
    /// Header value as a string, if present and valid UTF-8
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn part(&self, name: &str) -> Option<&CapturedPart> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Part names in the order they were sent
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|p| p.name.as_str()).collect()
    }
}

#[derive(Debug)]
struct MockState {
    default_response: MockResponse,
    per_product: Mutex<HashMap<String, MockResponse>>,
    requests: Mutex<Vec<CapturedRequest>>,
}

/// Mock of `POST /v1/products/{product}/firmware`
///
/// Answers `201 Created` unless a product has its own response configured,
/// and keeps every request it receives.
#[derive(Debug, Clone)]
pub struct MockParticleApi {
    state: Arc<MockState>,
}

impl Default for MockParticleApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockParticleApi {
    pub fn new() -> Self {
        Self::with_default(MockResponse::created("some title", "some username"))
    }

    /// Mock whose fallback answer is `response`
    pub fn with_default(response: MockResponse) -> Self {
        Self {
            state: Arc::new(MockState {
                default_response: response,
                per_product: Mutex::new(HashMap::new()),
                requests: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Answer requests for `product` with `response`
    pub fn respond_for(&self, product: impl Into<String>, response: MockResponse) -> &Self {
        self.state.per_product.lock().insert(product.into(), response);
        self
    }

    /// Everything received so far
    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/v1/products/{product}/firmware", post(upload_firmware))
            .with_state(self.clone())
    }

    fn response_for(&self, product: &str) -> MockResponse {
        self.state
            .per_product
            .lock()
            .get(product)
            .cloned()
            .unwrap_or_else(|| self.state.default_response.clone())
    }
}

async fn upload_firmware(
    State(api): State<MockParticleApi>,
    Path(product): Path<String>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut parts = Vec::new();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (e.status(), e.body_text()).into_response(),
        };
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        match field.bytes().await {
            Ok(data) => parts.push(CapturedPart {
                name,
                file_name,
                content_type,
                data,
            }),
            Err(e) => return (e.status(), e.body_text()).into_response(),
        }
    }

    api.state.requests.lock().push(CapturedRequest {
        product: product.clone(),
        headers,
        parts,
    });

    let response = api.response_for(&product);
    (
        response.status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response()
}
