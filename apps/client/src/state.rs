use std::sync::Arc;

use anyhow::Result;

use crate::api_client::ApiClient;
use crate::config::Config;
use crate::features::{AtsAnalyzer, ImageGeneration, ResumeGenerator};
use crate::notifications::NotificationQueue;
use crate::services::{
    AtsApi, AtsService, HealthService, ImageApi, ImageService, ResumeApi, ResumeService,
};

/// Shared handles wired once at startup and handed to every feature component.
#[derive(Clone)]
pub struct Platform {
    pub config: Config,
    pub client: ApiClient,
    pub notifications: NotificationQueue,
    pub resume: Arc<dyn ResumeApi>,
    pub ats: Arc<dyn AtsApi>,
    /// Generation calls use `config.image_timeout` instead of the client default.
    pub image: Arc<dyn ImageApi>,
    pub health: HealthService,
}

impl Platform {
    pub fn new(config: Config) -> Result<Self> {
        let notifications = NotificationQueue::new();
        let client = ApiClient::new(&config, notifications.clone())?;

        Ok(Self {
            resume: Arc::new(ResumeService::new(client.clone())),
            ats: Arc::new(AtsService::new(client.clone())),
            image: Arc::new(ImageService::new(client.clone(), config.image_timeout)),
            health: HealthService::new(client.clone()),
            client,
            notifications,
            config,
        })
    }

    pub fn resume_generator(&self) -> ResumeGenerator {
        ResumeGenerator::new(self.resume.clone(), self.notifications.clone())
    }

    pub fn ats_analyzer(&self) -> AtsAnalyzer {
        AtsAnalyzer::new(self.ats.clone(), self.notifications.clone())
    }

    pub fn image_generation(&self) -> ImageGeneration {
        ImageGeneration::new(self.image.clone(), self.notifications.clone())
    }
}
