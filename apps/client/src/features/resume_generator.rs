use std::sync::Arc;

use tracing::info;

use crate::errors::FeatureError;
use crate::features::CallState;
use crate::models::resume::{ResumeRequest, ResumeResponse};
use crate::notifications::NotificationQueue;
use crate::services::ResumeApi;

pub struct ResumeGenerator {
    pub form: ResumeRequest,
    state: CallState<ResumeResponse>,
    service: Arc<dyn ResumeApi>,
    notifications: NotificationQueue,
}

impl ResumeGenerator {
    pub fn new(service: Arc<dyn ResumeApi>, notifications: NotificationQueue) -> Self {
        Self {
            form: ResumeRequest::default(),
            state: CallState::default(),
            service,
            notifications,
        }
    }

    pub fn state(&self) -> &CallState<ResumeResponse> {
        &self.state
    }

    pub async fn submit(&mut self) -> Result<ResumeResponse, FeatureError> {
        let request = self.form.normalized();
        let call = self.state.start(request.validate())?;

        let outcome = self.service.generate(&request).await;
        let response = call.settle(outcome)?;

        info!("Resume {} ready at {}", response.resume_id, response.pdf_url);
        self.notifications.success("Resume generated successfully!");
        Ok(response)
    }

    /// Clears the form and the last result.
    pub fn reset(&mut self) {
        self.form = ResumeRequest::default();
        self.state.reset();
    }
}
