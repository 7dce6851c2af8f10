use std::sync::Arc;

use tracing::info;

use crate::errors::FeatureError;
use crate::features::CallState;
use crate::models::ats::{
    AtsRequest, AtsResponse, CoverLetter, CoverLetterRequest, ImprovementSuggestions, ScoreBand,
};
use crate::notifications::NotificationQueue;
use crate::services::AtsApi;

pub struct AtsAnalyzer {
    pub form: AtsRequest,
    analysis: CallState<AtsResponse>,
    improvements: CallState<ImprovementSuggestions>,
    cover_letter: CallState<CoverLetter>,
    service: Arc<dyn AtsApi>,
    notifications: NotificationQueue,
}

impl AtsAnalyzer {
    pub fn new(service: Arc<dyn AtsApi>, notifications: NotificationQueue) -> Self {
        Self {
            form: AtsRequest::default(),
            analysis: CallState::default(),
            improvements: CallState::default(),
            cover_letter: CallState::default(),
            service,
            notifications,
        }
    }

    pub fn state(&self) -> &CallState<AtsResponse> {
        &self.analysis
    }

    pub fn improvements(&self) -> &CallState<ImprovementSuggestions> {
        &self.improvements
    }

    pub fn cover_letter(&self) -> &CallState<CoverLetter> {
        &self.cover_letter
    }

    pub async fn submit(&mut self) -> Result<AtsResponse, FeatureError> {
        let call = self.analysis.start(self.form.validate())?;

        let outcome = self.service.analyze(&self.form).await;
        let response = call.settle(outcome)?;

        info!(
            "ATS score {:.1} ({})",
            response.score,
            response.score_band().label()
        );
        self.notifications.success("Resume analysis complete!");
        Ok(response)
    }

    /// Asks for rewrite suggestions for the same resume/job pair.
    pub async fn suggest_improvements(&mut self) -> Result<ImprovementSuggestions, FeatureError> {
        let call = self.improvements.start(self.form.validate())?;

        let outcome = self.service.improve(&self.form).await;
        let suggestions = call.settle(outcome)?;

        self.notifications.success("Improvement suggestions ready!");
        Ok(suggestions)
    }

    /// Drafts a cover letter for `company_name` from the current resume/job pair.
    pub async fn write_cover_letter(
        &mut self,
        company_name: &str,
    ) -> Result<CoverLetter, FeatureError> {
        let request = CoverLetterRequest {
            resume_text: self.form.resume_text.clone(),
            job_description: self.form.job_description.clone(),
            company_name: company_name.trim().to_string(),
        };
        let call = self.cover_letter.start(request.validate())?;

        let outcome = self.service.cover_letter(&request).await;
        let letter = call.settle(outcome)?;

        self.notifications.success("Cover letter ready!");
        Ok(letter)
    }

    pub fn score_band(&self) -> Option<ScoreBand> {
        self.analysis.result.as_ref().map(AtsResponse::score_band)
    }

    pub fn missing_sections(&self) -> Vec<&str> {
        self.analysis
            .result
            .as_ref()
            .map(AtsResponse::missing_sections)
            .unwrap_or_default()
    }

    pub fn reset(&mut self) {
        self.form = AtsRequest::default();
        self.analysis.reset();
        self.improvements.reset();
        self.cover_letter.reset();
    }
}
