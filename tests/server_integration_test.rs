//! Server integration tests that test the actual server behavior.
//!
//! These tests start a real TCP server and verify behavior that can only
//! be tested with actual network connections.

mod common;

use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use colorsort::assets::AssetLoader;
use colorsort::server::{build_router, create_app_state};
use common::{fixtures, TestApp};

/// Start a test server on an available port and return the port number.
async fn start_test_server() -> u16 {
    let asset_loader = Arc::new(AssetLoader::new(None));
    let state = create_app_state(asset_loader).expect("Failed to create app state");
    let app = build_router(state);

    // Bind to port 0 to get an available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let port = listener.local_addr().unwrap().port();

    // Spawn the server in the background
    tokio::spawn(async move {
        axum::serve(listener, app).await.ok();
    });

    // Give the server a moment to start
    tokio::time::sleep(tokio::time::Duration::from_millis(10)).await;

    port
}

/// Send a raw HTTP/1.1 request and read the response until the server closes
async fn raw_get(port: u16, path: &str) -> String {
    let mut stream = TcpStream::connect(format!("127.0.0.1:{}", port))
        .await
        .expect("Failed to connect");

    let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream
        .write_all(request.as_bytes())
        .await
        .expect("Failed to write request");

    let mut response = Vec::new();
    tokio::time::timeout(
        tokio::time::Duration::from_secs(10),
        stream.read_to_end(&mut response),
    )
    .await
    .expect("Timeout waiting for response")
    .expect("Failed to read response");

    String::from_utf8_lossy(&response).to_string()
}

#[tokio::test]
async fn test_health_over_tcp() {
    let port = start_test_server().await;

    let response = raw_get(port, "/health").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    assert!(response.ends_with("OK"));
}

#[tokio::test]
async fn test_stream_over_tcp() {
    let port = start_test_server().await;

    let response = raw_get(port, "/api/canvas/tiny/stream").await;
    assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
    for name in ["start", "paint", "done"] {
        assert!(
            response
                .lines()
                .any(|line| line.strip_prefix("event:").map(str::trim) == Some(name)),
            "missing {name} event"
        );
    }
}

#[tokio::test]
async fn test_nosniff_header_on_all_responses() {
    let app = TestApp::new();

    for path in ["/health", "/api/canvases", "/api/canvas/missing/image"] {
        let response = app.get(path).await;
        assert_eq!(
            response.header("x-content-type-options"),
            Some("nosniff"),
            "missing nosniff on {path}"
        );
    }
}

#[tokio::test]
async fn test_concurrent_renders_of_one_canvas() {
    let app = Arc::new(TestApp::with_config(fixtures::SMALL_CANVASES));

    let requests = (0..4u64).map(|seed| {
        let app = app.clone();
        tokio::spawn(async move {
            app.get(&format!("/api/canvas/square/image?seed={seed}"))
                .await
        })
    });

    for handle in requests {
        let response = handle.await.unwrap();
        common::assert_png(&response);
        let (_, _, rgb) = response.decode_png();
        common::assert_all_colors_distinct(&rgb, 64);
    }
    assert_eq!(app.render_cache.len().await, 4);
}

#[test]
fn test_empty_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "canvases: {}\n").unwrap();

    let result = create_app_state(Arc::new(AssetLoader::new(Some(path))));
    assert!(result.is_err());
}
