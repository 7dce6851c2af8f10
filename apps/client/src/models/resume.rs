use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::require;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    /// Free-form description, one bullet per line. Used by the enhance endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: String,
}

/// Body of `POST /resume/generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub target_role: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    pub job_description: String,
}

impl ResumeRequest {
    /// Required: name, email, phone, target role, at least one skill, job description.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("target_role", &self.target_role)?;
        if self.skills.iter().all(|s| s.trim().is_empty()) {
            return Err(ValidationError::MissingField("skills"));
        }
        require("job_description", &self.job_description)?;
        Ok(())
    }

    /// Copy with blank skills and blank responsibility lines removed.
    pub fn normalized(&self) -> Self {
        let mut request = self.clone();
        request.skills = trimmed_non_empty(&self.skills);
        for entry in &mut request.experience {
            entry.responsibilities = trimmed_non_empty(&entry.responsibilities);
        }
        request
    }
}

fn trimmed_non_empty(items: &[String]) -> Vec<String> {
    items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// The resume as rewritten by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizedResume {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub target_role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiEnhancements {
    pub summary_enhancement: String,
    pub suggested_skills: Vec<String>,
    pub ats_score_feedback: String,
    pub improvement_suggestions: Vec<String>,
    pub keyword_recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeResponse {
    /// Server-relative location of the generated PDF, e.g. `/resumes/resume_x.pdf`.
    pub pdf_url: String,
    #[serde(default)]
    pub optimized_resume: OptimizedResume,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub resume_id: String,
    #[serde(default)]
    pub gemini_enhancements: Option<GeminiEnhancements>,
    #[serde(default)]
    pub ai_powered: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnhancedBullets {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub enhanced_bullets: Vec<String>,
}

/// `POST /resume/enhance` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeEnhancement {
    pub gemini_enhancements: GeminiEnhancements,
    pub enhanced_bullets: Vec<EnhancedBullets>,
    pub timestamp: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct EnhanceEnvelope {
    pub enhancements: ResumeEnhancement,
}
