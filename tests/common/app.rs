//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use colorsort::assets::AssetLoader;
use colorsort::server::{build_router, create_app_state, AppState};
use colorsort::services::{RenderCache, WalkService};

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub walks: Arc<WalkService>,
    pub render_cache: Arc<RenderCache>,
    // Keeps an external config file alive for the app's lifetime
    _config_dir: Option<TempDir>,
}

impl TestApp {
    /// Create a new test application using the embedded config
    pub fn new() -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None));
        Self::from_loader(asset_loader, None)
    }

    /// Create a test application from a YAML config written to a temp file
    pub fn with_config(yaml: &str) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, yaml).expect("Failed to write config");

        let asset_loader = Arc::new(AssetLoader::new(Some(path)));
        Self::from_loader(asset_loader, Some(dir))
    }

    fn from_loader(asset_loader: Arc<AssetLoader>, config_dir: Option<TempDir>) -> Self {
        // Create application state using shared server module
        let state = create_app_state(asset_loader).expect("Failed to create app state");

        // Keep references for test assertions
        let walks = state.walks.clone();
        let render_cache = state.render_cache.clone();

        // Build router using shared server module (same as production)
        let router = build_router(state);

        Self {
            router,
            walks,
            render_cache,
            _config_dir: config_dir,
        }
    }

    /// Create application state for custom router configuration
    pub fn create_state() -> AppState {
        let asset_loader = Arc::new(AssetLoader::new(None));
        create_app_state(asset_loader).expect("Failed to create app state")
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header value as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the PNG body into (width, height, rgb bytes)
    pub fn decode_png(&self) -> (u32, u32, Vec<u8>) {
        let decoder = png::Decoder::new(self.body.as_slice());
        let mut reader = decoder.read_info().expect("Invalid PNG header");
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).expect("Invalid PNG frame");
        buf.truncate(info.buffer_size());
        (info.width, info.height, buf)
    }

    /// Split an SSE body into (event, data) pairs
    pub fn sse_events(&self) -> Vec<(String, String)> {
        let text = self.text();
        let mut events = Vec::new();
        for block in text.split("\n\n") {
            let mut event = None;
            let mut data = Vec::new();
            for line in block.lines() {
                if let Some(name) = line.strip_prefix("event:") {
                    event = Some(name.trim().to_string());
                } else if let Some(value) = line.strip_prefix("data:") {
                    data.push(value.trim_start().to_string());
                }
            }
            if let Some(event) = event {
                events.push((event, data.join("\n")));
            }
        }
        events
    }
}
