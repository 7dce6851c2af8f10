use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::image::{ImageGenerationRequest, ImageGenerationResponse, ModelInfo};

const GENERATE_PATH: &str = "image/generate";
const MODEL_INFO_PATH: &str = "image/model-info";

#[async_trait]
pub trait ImageApi: Send + Sync {
    async fn generate(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ApiError>;

    async fn model_info(&self) -> Result<ModelInfo, ApiError>;
}

#[derive(Clone)]
pub struct ImageService {
    client: ApiClient,
    timeout: Duration,
}

impl ImageService {
    /// `timeout` applies per attempt and replaces the client default for generation calls.
    pub fn new(client: ApiClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[async_trait]
impl ImageApi for ImageService {
    async fn generate(
        &self,
        request: &ImageGenerationRequest,
    ) -> Result<ImageGenerationResponse, ApiError> {
        info!(
            "Generating {} image (timeout {}s)",
            request.style,
            self.timeout.as_secs()
        );
        self.client
            .post_with_timeout(GENERATE_PATH, request, self.timeout)
            .await
    }

    async fn model_info(&self) -> Result<ModelInfo, ApiError> {
        self.client.get(MODEL_INFO_PATH).await
    }
}
