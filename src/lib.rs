pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;
pub mod normalizer;
#[cfg(feature = "server")]
pub mod server;
pub mod validator;

pub use bedrock::{BedrockClient, ImageBackend, ImageClient, SDXL_MODEL_ID};
pub use config::{BedrockConfig, Config};
pub use error::{BedrockError, Result, ValidationError, ValidationKind};
pub use handler::{HandlerResponse, ImageService};
pub use models::{GenerationPayload, ImageGenerationResponse, RawRequest, ValidatedPayload};
pub use normalizer::RequestNormalizer;
pub use validator::{PayloadValidator, Resolution, ALLOWED_RESOLUTIONS};
