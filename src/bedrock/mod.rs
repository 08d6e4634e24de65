pub mod image_client;

use crate::{config::BedrockConfig, error::Result};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;

pub use image_client::{ImageClient, SDXL_MODEL_ID};

/// The inference backend: takes a serialized model request, returns the raw
/// model response body. Implementations must be safe to share between
/// concurrent requests.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    fn model_id(&self) -> &str;

    async fn invoke_model(&self, body: Vec<u8>) -> Result<Vec<u8>>;
}

#[derive(Clone)]
pub struct BedrockClient {
    image_client: ImageClient,
}

impl BedrockClient {
    /// Build the SDK client. Call once at start-up and share the result.
    pub async fn new(bedrock_config: &BedrockConfig) -> Result<Self> {
        let region = aws_sdk_bedrockruntime::config::Region::new(bedrock_config.region_or_default());

        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&bedrock_config.access_key, &bedrock_config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "sdxlgen",
                ))
                .region(region)
                .load()
                .await
        } else {
            aws_config::from_env().region(region).load().await
        };

        let client = Client::new(&aws_config);
        log::info!(
            "Bedrock client ready in region {}",
            bedrock_config.region_or_default()
        );

        Ok(Self {
            image_client: ImageClient::new(client, bedrock_config.model_id_or_default()),
        })
    }

    pub fn into_image(self) -> ImageClient {
        self.image_client
    }
}
