use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::ValidationError;
use crate::models::{require, ServiceInfo};

pub const MIN_DIMENSION: u32 = 512;
pub const MAX_DIMENSION: u32 = 1024;
pub const MIN_INFERENCE_STEPS: u32 = 10;
pub const MAX_INFERENCE_STEPS: u32 = 50;
pub const MIN_GUIDANCE: f32 = 1.0;
pub const MAX_GUIDANCE: f32 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    #[default]
    Realistic,
    Anime,
    Sketch,
    #[serde(rename = "3d")]
    ThreeD,
    Watercolor,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 5] = [
        ImageStyle::Realistic,
        ImageStyle::Anime,
        ImageStyle::Sketch,
        ImageStyle::ThreeD,
        ImageStyle::Watercolor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageStyle::Realistic => "realistic",
            ImageStyle::Anime => "anime",
            ImageStyle::Sketch => "sketch",
            ImageStyle::ThreeD => "3d",
            ImageStyle::Watercolor => "watercolor",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ImageStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = ImageStyle::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown style '{s}', expected one of: {}", known.join(", "))
            })
    }
}

/// Body of `POST /image/generate`. Unset tuning fields are left to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub style: ImageStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_inference_steps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guidance_scale: Option<f32>,
}

impl ImageGenerationRequest {
    pub fn new(prompt: impl Into<String>, style: ImageStyle) -> Self {
        Self {
            prompt: prompt.into(),
            style,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require("prompt", &self.prompt)?;
        check_range("width", self.width, MIN_DIMENSION, MAX_DIMENSION)?;
        check_range("height", self.height, MIN_DIMENSION, MAX_DIMENSION)?;
        check_range(
            "num_inference_steps",
            self.num_inference_steps,
            MIN_INFERENCE_STEPS,
            MAX_INFERENCE_STEPS,
        )?;
        if let Some(guidance) = self.guidance_scale {
            if !(MIN_GUIDANCE..=MAX_GUIDANCE).contains(&guidance) {
                return Err(ValidationError::OutOfRange {
                    field: "guidance_scale",
                    min: MIN_GUIDANCE.into(),
                    max: MAX_GUIDANCE.into(),
                });
            }
        }
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: Option<u32>,
    min: u32,
    max: u32,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if v < min || v > max => Err(ValidationError::OutOfRange {
            field,
            min: min.into(),
            max: max.into(),
        }),
        _ => Ok(()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageGenerationResponse {
    /// Where the image can be fetched; may be an absolute URL on the image provider.
    pub image_url: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub style: ImageStyle,
    /// Seconds spent generating.
    #[serde(default)]
    pub generation_time: f64,
    #[serde(default)]
    pub image_id: String,
    #[serde(default)]
    pub enhanced_description: String,
    #[serde(default)]
    pub message: String,
    /// Server-side path of the locally saved copy, when the server kept one.
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl ImageGenerationResponse {
    /// `/images/{name}` for the server's local copy, if it saved one.
    pub fn local_asset_path(&self) -> Option<String> {
        let path = self.image_path.as_deref()?;
        let name = path.rsplit(['/', '\\']).next()?;
        if name.is_empty() {
            None
        } else {
            Some(format!("/images/{name}"))
        }
    }

    /// Best location to fetch the image from: the server copy, else the provider URL.
    pub fn preferred_asset(&self) -> String {
        self.local_asset_path()
            .unwrap_or_else(|| self.image_url.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiProviderInfo {
    pub provider: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub initialized: bool,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// `GET /image/model-info` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub service: ServiceInfo,
    #[serde(default)]
    pub ai_provider: Option<AiProviderInfo>,
}
