use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::errors::FeatureError;
use crate::features::{BoundedHistory, CallState};
use crate::models::image::{ImageGenerationRequest, ImageGenerationResponse};
use crate::notifications::NotificationQueue;
use crate::services::ImageApi;

pub const HISTORY_CAPACITY: usize = 12;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedImage {
    pub response: ImageGenerationResponse,
    pub generated_at: DateTime<Utc>,
}

pub struct ImageGeneration {
    pub form: ImageGenerationRequest,
    state: CallState<ImageGenerationResponse>,
    history: BoundedHistory<GeneratedImage>,
    service: Arc<dyn ImageApi>,
    notifications: NotificationQueue,
}

impl ImageGeneration {
    pub fn new(service: Arc<dyn ImageApi>, notifications: NotificationQueue) -> Self {
        Self {
            form: ImageGenerationRequest::default(),
            state: CallState::default(),
            history: BoundedHistory::new(HISTORY_CAPACITY),
            service,
            notifications,
        }
    }

    pub fn state(&self) -> &CallState<ImageGenerationResponse> {
        &self.state
    }

    /// Past results, newest first.
    pub fn history(&self) -> &BoundedHistory<GeneratedImage> {
        &self.history
    }

    pub async fn submit(&mut self) -> Result<ImageGenerationResponse, FeatureError> {
        let call = self.state.start(self.form.validate())?;

        let outcome = self.service.generate(&self.form).await;
        let response = call.settle(outcome)?;

        info!(
            "Image {} generated in {:.1}s",
            response.image_id, response.generation_time
        );
        self.history.push(GeneratedImage {
            response: response.clone(),
            generated_at: Utc::now(),
        });
        self.notifications.success("Image generated successfully!");
        Ok(response)
    }

    /// Clears the form and current result; history is kept.
    pub fn reset(&mut self) {
        self.form = ImageGenerationRequest::default();
        self.state.reset();
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
