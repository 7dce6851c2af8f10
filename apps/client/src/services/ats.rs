use async_trait::async_trait;
use tracing::info;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::ats::{
    AtsRequest, AtsResponse, CoverLetter, CoverLetterRequest, ImproveEnvelope,
    ImprovementSuggestions,
};
use crate::models::{ServiceInfo, ServiceInfoEnvelope};

const ANALYZE_PATH: &str = "ats/analyze";
const IMPROVE_PATH: &str = "ats/improve";
const COVER_LETTER_PATH: &str = "ats/cover-letter";
const SERVICE_INFO_PATH: &str = "ats/service-info";

#[async_trait]
pub trait AtsApi: Send + Sync {
    async fn analyze(&self, request: &AtsRequest) -> Result<AtsResponse, ApiError>;

    async fn improve(&self, request: &AtsRequest) -> Result<ImprovementSuggestions, ApiError>;

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<CoverLetter, ApiError>;

    async fn service_info(&self) -> Result<ServiceInfo, ApiError>;
}

#[derive(Clone)]
pub struct AtsService {
    client: ApiClient,
}

impl AtsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AtsApi for AtsService {
    async fn analyze(&self, request: &AtsRequest) -> Result<AtsResponse, ApiError> {
        info!(
            "Analyzing resume ({} chars) against job description ({} chars)",
            request.resume_text.len(),
            request.job_description.len()
        );
        self.client.post(ANALYZE_PATH, request).await
    }

    async fn improve(&self, request: &AtsRequest) -> Result<ImprovementSuggestions, ApiError> {
        let envelope: ImproveEnvelope = self.client.post(IMPROVE_PATH, request).await?;
        Ok(envelope.suggestions)
    }

    async fn cover_letter(&self, request: &CoverLetterRequest) -> Result<CoverLetter, ApiError> {
        info!("Generating cover letter for {}", request.company_name);
        self.client
            .post_query(COVER_LETTER_PATH, &request.query())
            .await
    }

    async fn service_info(&self) -> Result<ServiceInfo, ApiError> {
        let envelope: ServiceInfoEnvelope = self.client.get(SERVICE_INFO_PATH).await?;
        Ok(envelope.service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorClass;
    use crate::notifications::NotificationQueue;
    use crate::test_support::{spawn_server, test_config};
    use axum::extract::Query;
    use axum::{routing::get, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn sample_request() -> AtsRequest {
        AtsRequest {
            resume_text: "Senior Rust engineer. Experience: Acme 2020-2024.".to_string(),
            job_description: "Looking for Rust and Kubernetes.".to_string(),
        }
    }

    #[tokio::test]
    async fn test_analyze_sends_exactly_one_request_with_payload() {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::<Value>::new()));
        let (counter, log) = (hits.clone(), seen.clone());
        let router = Router::new().route(
            "/api/v1/ats/analyze",
            post(move |Json(body): Json<Value>| {
                let (counter, log) = (counter.clone(), log.clone());
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    log.lock().unwrap().push(body);
                    Json(json!({
                        "score": 81,
                        "matched_keywords": ["rust"],
                        "missing_keywords": ["kubernetes"],
                        "section_analysis": {"experience": true}
                    }))
                }
            }),
        );
        let url = spawn_server(router).await;
        let client = ApiClient::new(&test_config(&url), NotificationQueue::new()).unwrap();

        let response = AtsService::new(client).analyze(&sample_request()).await.unwrap();

        assert_eq!(response.score, 81.0);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(
            seen.lock().unwrap()[0],
            serde_json::to_value(sample_request()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_analyze_timeout_retries_once_and_reports_timeout() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let router = Router::new().route(
            "/api/v1/ats/analyze",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Json(json!({ "score": 50 }))
                }
            }),
        );
        let url = spawn_server(router).await;
        let config = crate::config::Config {
            timeout: Duration::from_millis(150),
            ..test_config(&url)
        };
        let notifications = NotificationQueue::new();
        let client = ApiClient::new(&config, notifications.clone()).unwrap();

        let err = AtsService::new(client)
            .analyze(&sample_request())
            .await
            .unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(err.class, ErrorClass::Timeout);
        assert_eq!(err.message, ErrorClass::Timeout.message());
        let active = notifications.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].message, ErrorClass::Timeout.message());
    }

    #[tokio::test]
    async fn test_cover_letter_sends_query_parameters() {
        let router = Router::new().route(
            "/api/v1/ats/cover-letter",
            post(
                |Query(params): Query<std::collections::HashMap<String, String>>| async move {
                    Json(json!({
                        "cover_letter": format!("Dear {} team, ...", params["company_name"]),
                        "company": params["company_name"],
                        "generated_at": "2026-10-17T09:30:00",
                        "resume_len": params["resume_text"].len()
                    }))
                },
            ),
        );
        let url = spawn_server(router).await;
        let client = ApiClient::new(&test_config(&url), NotificationQueue::new()).unwrap();

        let letter = AtsService::new(client)
            .cover_letter(&CoverLetterRequest {
                resume_text: "Senior Rust engineer".to_string(),
                job_description: "Platform team".to_string(),
                company_name: "Acme & Sons".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(letter.company, "Acme & Sons");
        assert!(letter.cover_letter.starts_with("Dear Acme & Sons team"));
        assert_eq!(letter.generated_at, "2026-10-17T09:30:00");
    }

    #[tokio::test]
    async fn test_improve_and_service_info() {
        let router = Router::new()
            .route(
                "/api/v1/ats/improve",
                post(|| async {
                    Json(json!({
                        "suggestions": {
                            "improvements": ["Lead with impact"],
                            "missing_keywords": ["helm"],
                            "formatting_issues": [],
                            "overall_assessment": "Close fit"
                        },
                        "status": "success"
                    }))
                }),
            )
            .route(
                "/api/v1/ats/service-info",
                get(|| async {
                    Json(json!({
                        "service": {"service": "Enhanced ATS Analysis",
                                    "providers": ["Gemini AI"], "capabilities": []},
                        "status": "operational"
                    }))
                }),
            );
        let url = spawn_server(router).await;
        let client = ApiClient::new(&test_config(&url), NotificationQueue::new()).unwrap();
        let service = AtsService::new(client);

        let improvements = service.improve(&sample_request()).await.unwrap();
        assert_eq!(improvements.overall_assessment, "Close fit");
        let info = service.service_info().await.unwrap();
        assert_eq!(info.service, "Enhanced ATS Analysis");
    }
}
