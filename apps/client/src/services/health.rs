use crate::api_client::ApiClient;
use crate::errors::ApiError;
use crate::models::HealthStatus;

#[derive(Clone)]
pub struct HealthService {
    client: ApiClient,
}

impl HealthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// GET /health at the server origin.
    pub async fn check(&self) -> Result<HealthStatus, ApiError> {
        self.client.get_root("/health").await
    }
}
