//! API client: the single point of entry for every call to the platform backend.
//!
//! Feature services never touch reqwest directly; they go through `ApiClient`,
//! which routes each attempt through the `ErrorInterceptor`.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::errors::{ApiError, ErrorClass, RequestFailure, NO_RESPONSE_STATUS};
use crate::notifications::NotificationQueue;

pub mod assets;
pub mod interceptor;

pub use interceptor::ErrorInterceptor;

const JSON: &str = "application/json";

/// Everything needed to replay one attempt.
#[derive(Debug, Clone)]
struct RequestSpec {
    method: Method,
    url: Url,
    body: Option<Value>,
    timeout: Duration,
    accept: &'static str,
}

impl RequestSpec {
    fn label(&self) -> String {
        format!("{} {}", self.method, self.url.path())
    }
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    origin: Url,
    api_root: Url,
    timeout: Duration,
    interceptor: ErrorInterceptor,
}

impl ApiClient {
    pub fn new(config: &Config, notifications: NotificationQueue) -> Result<Self> {
        let origin = with_trailing_slash(&config.api_url)
            .with_context(|| format!("Invalid API URL '{}'", config.api_url))?;

        let prefix = config.api_prefix.trim_matches('/');
        let api_root = if prefix.is_empty() {
            origin.clone()
        } else {
            origin
                .join(&format!("{prefix}/"))
                .with_context(|| format!("Invalid API prefix '{}'", config.api_prefix))?
        };

        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            origin,
            api_root,
            timeout: config.timeout,
            interceptor: ErrorInterceptor::new(config.retry_delay, notifications),
        })
    }

    pub fn default_timeout(&self) -> Duration {
        self.timeout
    }

    /// Absolute URL of an API endpoint, e.g. `ats/analyze`.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        self.api_root
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::invalid_url(path, e))
    }

    /// Resolves a server-relative asset path (`/images/x.png`, `/resumes/x.pdf`)
    /// against the server origin. Absolute URLs pass through unchanged.
    pub fn asset_url(&self, path: &str) -> Result<Url, ApiError> {
        self.origin
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::invalid_url(path, e))
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.endpoint_url(path)?;
        self.send_json(Method::GET, url, None, self.timeout).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.post_with_timeout(path, body, self.timeout).await
    }

    /// POST with a per-call timeout override (image generation runs far longer than the rest).
    pub async fn post_with_timeout<B, R>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(path)?;
        let body = to_json(path, body)?;
        self.send_json(Method::POST, url, Some(body), timeout).await
    }

    /// POST with the arguments in the query string and no body.
    pub async fn post_query<R: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<R, ApiError> {
        let mut url = self.endpoint_url(path)?;
        url.query_pairs_mut().extend_pairs(params);
        self.send_json(Method::POST, url, None, self.timeout).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.endpoint_url(path)?;
        let body = to_json(path, body)?;
        self.send_json(Method::PUT, url, Some(body), self.timeout).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.endpoint_url(path)?;
        self.send_json(Method::DELETE, url, None, self.timeout).await
    }

    /// GET against the server origin rather than the API prefix (`/health`).
    pub async fn get_root<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let url = self.asset_url(path)?;
        self.send_json(Method::GET, url, None, self.timeout).await
    }

    /// Fetches a generated asset as raw bytes.
    pub async fn download(&self, path: &str) -> Result<Bytes, ApiError> {
        let spec = RequestSpec {
            method: Method::GET,
            url: self.asset_url(path)?,
            body: None,
            timeout: self.timeout,
            accept: "*/*",
        };
        let label = spec.label();
        self.interceptor
            .run(&label, || {
                let attempt = self.attempt(spec.clone());
                async move { attempt.await.map(|(_, bytes)| bytes) }
            })
            .await
    }

    async fn send_json<R: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
        timeout: Duration,
    ) -> Result<R, ApiError> {
        let spec = RequestSpec {
            method,
            url,
            body,
            timeout,
            accept: JSON,
        };
        let label = spec.label();
        let started = Instant::now();

        let result = self
            .interceptor
            .run(&label, || {
                let attempt = self.attempt(spec.clone());
                async move {
                    let (status, bytes) = attempt.await?;
                    serde_json::from_slice::<R>(&bytes).map_err(|e| RequestFailure::Decode {
                        status,
                        reason: e.to_string(),
                    })
                }
            })
            .await;

        if result.is_ok() {
            info!("{label} completed in {}ms", started.elapsed().as_millis());
        }
        result
    }

    /// One attempt: send, wait for the full body, reject non-2xx.
    /// Returns the 2xx status alongside the body.
    async fn attempt(&self, spec: RequestSpec) -> Result<(u16, Bytes), RequestFailure> {
        let mut request = self
            .http
            .request(spec.method, spec.url)
            .timeout(spec.timeout)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, spec.accept);
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| RequestFailure::from_transport(e, spec.timeout))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| RequestFailure::from_transport(e, spec.timeout))?;

        debug!("HTTP {} with {} bytes", status.as_u16(), bytes.len());

        if !status.is_success() {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            return Err(RequestFailure::Status {
                status: status.as_u16(),
                detail: extract_detail(&body),
                body,
            });
        }

        Ok((status.as_u16(), bytes))
    }
}

fn with_trailing_slash(raw: &str) -> Result<Url> {
    let trimmed = raw.trim().trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}

fn to_json<B: Serialize + ?Sized>(path: &str, body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError {
        class: ErrorClass::BadRequest,
        status: NO_RESPONSE_STATUS,
        message: format!("Could not serialize request for '{path}': {e}"),
    })
}

/// Pulls a human-readable message out of an error body.
///
/// Accepts `{"detail": "..."}` and the validation form
/// `{"detail": [{"loc": [...], "msg": "..."}]}`; anything else yields `None`.
fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| {
                    let msg = item.get("msg")?.as_str()?;
                    let field = item
                        .get("loc")
                        .and_then(Value::as_array)
                        .and_then(|loc| loc.last())
                        .and_then(Value::as_str);
                    Some(match field {
                        Some(field) => format!("{field}: {msg}"),
                        None => msg.to_string(),
                    })
                })
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{spawn_server, test_config};
    use axum::{http::StatusCode, routing::get, routing::post, Json, Router};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Echo {
        received: Value,
    }

    fn client_for(url: &str) -> (ApiClient, NotificationQueue) {
        let notifications = NotificationQueue::new();
        let client = ApiClient::new(&test_config(url), notifications.clone()).unwrap();
        (client, notifications)
    }

    #[test]
    fn test_extract_detail_string() {
        let body = r#"{"detail": "Resume generation failed: model overloaded"}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("Resume generation failed: model overloaded")
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail": [
            {"loc": ["body", "prompt"], "msg": "field required", "type": "missing"},
            {"loc": ["body", "width"], "msg": "must be <= 1024", "type": "le"}
        ]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("prompt: field required; width: must be <= 1024")
        );
    }

    #[test]
    fn test_extract_detail_ignores_other_shapes() {
        assert_eq!(extract_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(extract_detail(r#"{"error": "nope"}"#), None);
        assert_eq!(extract_detail(r#"{"detail": 7}"#), None);
    }

    #[test]
    fn test_url_resolution() {
        let (client, _) = client_for("http://localhost:8000/");
        assert_eq!(
            client.endpoint_url("/ats/analyze").unwrap().as_str(),
            "http://localhost:8000/api/v1/ats/analyze"
        );
        assert_eq!(
            client.asset_url("/images/image_1.png").unwrap().as_str(),
            "http://localhost:8000/images/image_1.png"
        );
        assert_eq!(
            client
                .asset_url("https://image.pollinations.ai/prompt/cat")
                .unwrap()
                .as_str(),
            "https://image.pollinations.ai/prompt/cat"
        );
    }

    #[test]
    fn test_empty_prefix_uses_origin() {
        let notifications = NotificationQueue::new();
        let config = Config {
            api_prefix: String::new(),
            ..test_config("http://localhost:8000")
        };
        let client = ApiClient::new(&config, notifications).unwrap();
        assert_eq!(
            client.endpoint_url("image/generate").unwrap().as_str(),
            "http://localhost:8000/image/generate"
        );
    }

    #[tokio::test]
    async fn test_post_sends_json_and_decodes_response() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/echo",
            post(move |headers: axum::http::HeaderMap, Json(body): Json<Value>| {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(headers["content-type"], "application/json");
                    Json(json!({ "received": body }))
                }
            }),
        );
        let url = spawn_server(router).await;
        let (client, notifications) = client_for(&url);

        let echo: Echo = client
            .post("echo", &json!({ "resume_text": "Rust engineer" }))
            .await
            .unwrap();

        assert_eq!(echo.received, json!({ "resume_text": "Rust engineer" }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(notifications.is_empty());
    }

    #[tokio::test]
    async fn test_error_detail_is_surfaced_after_retry() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/ats/analyze",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(json!({ "detail": "ATS analysis failed: quota exceeded" })),
                    )
                }
            }),
        );
        let url = spawn_server(router).await;
        let (client, notifications) = client_for(&url);

        let err = client
            .post::<_, Value>("ats/analyze", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(err.status, 500);
        assert_eq!(err.message, "ATS analysis failed: quota exceeded");
        let active = notifications.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, ErrorClass::Server.message());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_unexpected() {
        let router = Router::new().route("/api/v1/broken", get(|| async { "not json" }));
        let url = spawn_server(router).await;
        let (client, notifications) = client_for(&url);

        let err = client.get::<Value>("broken").await.unwrap_err();
        assert_eq!(err.class, ErrorClass::Unexpected);
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_undecodable_body_keeps_actual_success_status() {
        let router = Router::new().route(
            "/api/v1/created",
            post(|| async { (StatusCode::CREATED, "created, no json") }),
        );
        let url = spawn_server(router).await;
        let (client, _) = client_for(&url);

        let err = client
            .post::<_, Value>("created", &json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.class, ErrorClass::Unexpected);
        assert_eq!(err.status, 201);
    }

    #[tokio::test]
    async fn test_post_query_encodes_params_without_body() {
        let router = Router::new().route(
            "/api/v1/ats/cover-letter",
            post(|axum::extract::RawQuery(query): axum::extract::RawQuery, body: String| async move {
                Json(json!({ "received": { "query": query, "body": body } }))
            }),
        );
        let url = spawn_server(router).await;
        let (client, _) = client_for(&url);

        let echo: Echo = client
            .post_query("ats/cover-letter", &[("company_name", "Acme & Co")])
            .await
            .unwrap();
        assert_eq!(echo.received["query"], "company_name=Acme+%26+Co");
        assert_eq!(echo.received["body"], "");
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_class() {
        // Bind then drop to get a port nobody listens on.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (client, notifications) = client_for(&format!("http://{addr}"));
        let err = client.get::<Value>("health").await.unwrap_err();

        assert_eq!(err.status, 0);
        assert_eq!(err.class, ErrorClass::Network);
        assert_eq!(notifications.len(), 1);
    }

    #[tokio::test]
    async fn test_put_and_delete_use_their_methods() {
        let router = Router::new().route(
            "/api/v1/items/1",
            axum::routing::put(|Json(body): Json<Value>| async move {
                Json(json!({ "received": body }))
            })
            .delete(|| async { Json(json!({ "received": "deleted" })) }),
        );
        let url = spawn_server(router).await;
        let (client, _) = client_for(&url);

        let put: Echo = client.put("items/1", &json!({ "n": 1 })).await.unwrap();
        assert_eq!(put.received, json!({ "n": 1 }));
        let deleted: Echo = client.delete("items/1").await.unwrap();
        assert_eq!(deleted.received, json!("deleted"));
    }

    #[tokio::test]
    async fn test_download_returns_raw_bytes() {
        let router = Router::new().route(
            "/images/image_1.png",
            get(|| async { vec![0x89_u8, b'P', b'N', b'G'] }),
        );
        let url = spawn_server(router).await;
        let (client, _) = client_for(&url);

        let bytes = client.download("/images/image_1.png").await.unwrap();
        assert_eq!(&bytes[..], &[0x89, b'P', b'N', b'G']);
    }
}
