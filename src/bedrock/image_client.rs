use crate::{
    bedrock::ImageBackend,
    error::{BedrockError, Result},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};

pub const SDXL_MODEL_ID: &str = "stability.stable-diffusion-xl-v1";

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    model_id: String,
}

impl ImageClient {
    pub fn new(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }
}

#[async_trait]
impl ImageBackend for ImageClient {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn invoke_model(&self, body: Vec<u8>) -> Result<Vec<u8>> {
        log::info!("Generating image with model: {}", self.model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                log::error!("failed to invoke model: {:?}", e);

                if let Some(service_error) = e.as_service_error() {
                    BedrockError::AwsServiceError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    BedrockError::AwsError(format!("AWS SDK error: {}", e))
                }
            })?;

        Ok(response.body.into_inner())
    }
}
