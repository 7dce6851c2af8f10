use async_trait::async_trait;
use tracing::info;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::resume::{EnhanceEnvelope, ResumeEnhancement, ResumeRequest, ResumeResponse};
use crate::models::{ServiceInfo, ServiceInfoEnvelope};

const GENERATE_PATH: &str = "resume/generate";
const ENHANCE_PATH: &str = "resume/enhance";
const SERVICE_INFO_PATH: &str = "resume/service-info";

#[async_trait]
pub trait ResumeApi: Send + Sync {
    async fn generate(&self, request: &ResumeRequest) -> Result<ResumeResponse, ApiError>;

    async fn enhance(&self, request: &ResumeRequest) -> Result<ResumeEnhancement, ApiError>;

    async fn service_info(&self) -> Result<ServiceInfo, ApiError>;
}

#[derive(Clone)]
pub struct ResumeService {
    client: ApiClient,
}

impl ResumeService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResumeApi for ResumeService {
    async fn generate(&self, request: &ResumeRequest) -> Result<ResumeResponse, ApiError> {
        info!("Generating resume for {}", request.name);
        self.client.post(GENERATE_PATH, request).await
    }

    async fn enhance(&self, request: &ResumeRequest) -> Result<ResumeEnhancement, ApiError> {
        let envelope: EnhanceEnvelope = self.client.post(ENHANCE_PATH, request).await?;
        Ok(envelope.enhancements)
    }

    async fn service_info(&self) -> Result<ServiceInfo, ApiError> {
        let envelope: ServiceInfoEnvelope = self.client.get(SERVICE_INFO_PATH).await?;
        Ok(envelope.service)
    }
}
