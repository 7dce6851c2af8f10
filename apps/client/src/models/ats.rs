use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::models::require;

/// Body of `POST /ats/analyze` and `POST /ats/improve`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtsRequest {
    pub resume_text: String,
    pub job_description: String,
}

impl AtsRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("resume_text", &self.resume_text)?;
        require("job_description", &self.job_description)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsResponse {
    pub score: f64,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub suggestions: Vec<String>,
    /// Section name (contact, experience, education, skills) → present.
    #[serde(default)]
    pub section_analysis: BTreeMap<String, bool>,
    #[serde(default)]
    pub formatting_score: f64,
    #[serde(default)]
    pub keyword_score: f64,
    #[serde(default)]
    pub semantic_score: f64,
    #[serde(default)]
    pub gemini_assessment: Option<String>,
    #[serde(default)]
    pub ai_powered: bool,
}

impl AtsResponse {
    pub fn score_band(&self) -> ScoreBand {
        ScoreBand::from_score(self.score)
    }

    /// Sections the analysis reported as absent, in name order.
    pub fn missing_sections(&self) -> Vec<&str> {
        self.section_analysis
            .iter()
            .filter(|(_, present)| !**present)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else if score >= 40.0 {
            ScoreBand::Fair
        } else {
            ScoreBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent",
            ScoreBand::Good => "Good",
            ScoreBand::Fair => "Fair",
            ScoreBand::Poor => "Needs improvement",
        }
    }
}

/// `POST /ats/improve` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementSuggestions {
    pub improvements: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub formatting_issues: Vec<String>,
    pub overall_assessment: String,
}

/// Arguments of `POST /ats/cover-letter`, sent as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub job_description: String,
    pub company_name: String,
}

impl CoverLetterRequest {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("resume_text", &self.resume_text)?;
        require("job_description", &self.job_description)?;
        require("company_name", &self.company_name)?;
        Ok(())
    }

    pub(crate) fn query(&self) -> [(&str, &str); 3] {
        [
            ("resume_text", self.resume_text.as_str()),
            ("job_description", self.job_description.as_str()),
            ("company_name", self.company_name.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetter {
    pub cover_letter: String,
    pub company: String,
    /// ISO-8601 timestamp from the server, without zone.
    pub generated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ImproveEnvelope {
    pub suggestions: ImprovementSuggestions,
}
