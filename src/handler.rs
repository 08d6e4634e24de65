//! Per-request pipeline: normalize, validate, serialize, invoke, unwrap.
//!
//! Every failure is turned into a [`HandlerResponse`]; a failing request never
//! takes the process down.

use std::sync::Arc;
use std::time::Duration;

use crate::{
    bedrock::ImageBackend,
    config::Config,
    error::{BedrockError, Result},
    logger,
    models::{ImageGenerationResponse, RawRequest},
    normalizer::RequestNormalizer,
    validator::PayloadValidator,
};

/// Transport-neutral response: a status code and a plain-text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
        }
    }

    pub fn from_error(error: &BedrockError) -> Self {
        Self {
            status_code: error.status_code(),
            body: error.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}

/// Shared by every in-flight request. Holds the one backend handle created at
/// start-up.
#[derive(Clone)]
pub struct ImageService {
    backend: Arc<dyn ImageBackend>,
    normalizer: RequestNormalizer,
    validator: PayloadValidator,
    timeout: Duration,
}

impl ImageService {
    pub fn new(backend: Arc<dyn ImageBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            normalizer: RequestNormalizer::new(),
            validator: PayloadValidator::new(),
            timeout,
        }
    }

    pub fn from_config(backend: Arc<dyn ImageBackend>, config: &Config) -> Self {
        Self::new(backend, config.timeout())
            .with_validator(PayloadValidator::new().with_prompt_limit(config.enforce_prompt_limit))
    }

    pub fn with_validator(mut self, validator: PayloadValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn handle(&self, request: &RawRequest) -> HandlerResponse {
        match self.generate(request).await {
            Ok(image) => HandlerResponse::ok(image.image_data),
            Err(e) => report_failure(request, &e),
        }
    }

    /// Runs the full pipeline. Rejected payloads never reach the backend.
    pub async fn generate(&self, request: &RawRequest) -> Result<ImageGenerationResponse> {
        let candidate = self.normalizer.normalize(request);
        let payload = self.validator.validate(candidate)?;
        let body = payload.to_json_bytes()?;

        log::debug!(
            "Invoking {} with {}x{}, {} steps, cfg_scale {}, seed {}",
            self.backend.model_id(),
            payload.width,
            payload.height,
            payload.steps,
            payload.cfg_scale,
            payload.seed
        );

        let output = {
            let _timer = logger::timer("Image generation");
            tokio::time::timeout(self.timeout, self.backend.invoke_model(body))
                .await
                .map_err(|_| BedrockError::Timeout(self.timeout))??
        };

        let image = ImageGenerationResponse::from_model_output(&output, self.backend.model_id())?;
        if let Some(reason) = image.finish_reason.as_deref() {
            log::info!("Model finished with reason {}", reason);
        }
        Ok(image)
    }
}

/// Log a failed request at the level its error calls for and turn it into a
/// response. Every transport path reports failures through here.
pub fn report_failure(request: &RawRequest, error: &BedrockError) -> HandlerResponse {
    log::log!(
        error.log_level(),
        "request {} failed: {}",
        request.request_id(),
        error
    );
    HandlerResponse::from_error(error)
}
