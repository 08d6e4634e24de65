use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{BedrockError, Result};

/// One generated output item returned by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub base64: String,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SdxlResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageGenerationResponse {
    pub image_data: String, // Base64 encoded
    pub finish_reason: Option<String>,
    pub model: String,
}

impl ImageGenerationResponse {
    /// Take the first artifact out of a raw model response body.
    pub fn from_model_output(body: &[u8], model: &str) -> Result<Self> {
        let response: SdxlResponse = serde_json::from_slice(body)
            .map_err(|e| BedrockError::ResponseError(format!("failed to unmarshal JSON: {}", e)))?;

        let artifact = response
            .artifacts
            .into_iter()
            .next()
            .ok_or_else(|| BedrockError::ResponseError("No images generated".into()))?;

        Ok(Self {
            image_data: artifact.base64,
            finish_reason: artifact.finish_reason,
            model: model.to_string(),
        })
    }

    pub fn decode_image(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.image_data)
            .map_err(|e| BedrockError::ResponseError(format!("invalid base64 image: {}", e)))
    }
}
