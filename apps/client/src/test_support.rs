//! Shared helpers for tests that talk to an in-process HTTP server.

use std::time::Duration;

use axum::Router;

use crate::config::Config;

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("test listener address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{addr}")
}

/// Default config pointed at `url`, with short timings so failure paths stay fast.
pub fn test_config(url: &str) -> Config {
    Config {
        api_url: url.to_string(),
        timeout: Duration::from_secs(5),
        image_timeout: Duration::from_secs(5),
        retry_delay: Duration::from_millis(10),
        ..Config::default()
    }
}
