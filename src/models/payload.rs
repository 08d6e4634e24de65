use serde::Serialize;

pub const DEFAULT_CFG_SCALE: f64 = 7.0;
pub const DEFAULT_STEPS: i64 = 20;
pub const DEFAULT_SEED: i64 = 0;
pub const DEFAULT_WIDTH: i64 = 1024;
pub const DEFAULT_HEIGHT: i64 = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextPrompt {
    pub text: String,
}

/// Stable Diffusion XL request body.
///
/// Built by the normalizer as a candidate; only a [`ValidatedPayload`] is ever
/// sent to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationPayload {
    pub text_prompts: Vec<TextPrompt>,
    pub cfg_scale: f64,
    pub steps: i64,
    pub seed: i64,
    pub width: i64,
    pub height: i64,
}

impl GenerationPayload {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            text_prompts: vec![TextPrompt {
                text: prompt.into(),
            }],
            cfg_scale: DEFAULT_CFG_SCALE,
            steps: DEFAULT_STEPS,
            seed: DEFAULT_SEED,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    /// Fill zero-valued fields with their defaults. Idempotent.
    ///
    /// `cfg_scale` and `seed` are left alone: zero is a legitimate value for both.
    pub fn apply_defaults(&mut self) -> &mut Self {
        if self.steps == 0 {
            self.steps = DEFAULT_STEPS;
        }
        if self.width == 0 {
            self.width = DEFAULT_WIDTH;
        }
        if self.height == 0 {
            self.height = DEFAULT_HEIGHT;
        }
        self
    }

    /// The single prompt this payload carries.
    pub fn prompt(&self) -> &str {
        self.text_prompts
            .first()
            .map(|p| p.text.as_str())
            .unwrap_or_default()
    }

    pub fn resolution(&self) -> (i64, i64) {
        (self.width, self.height)
    }
}

/// A payload that passed every check in [`crate::validator::PayloadValidator`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidatedPayload(GenerationPayload);

impl ValidatedPayload {
    pub(crate) fn new(payload: GenerationPayload) -> Self {
        Self(payload)
    }

    pub fn to_json_bytes(&self) -> crate::Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| {
            crate::BedrockError::SerializationError(format!("failed to marshal JSON: {}", e))
        })
    }

    pub fn into_inner(self) -> GenerationPayload {
        self.0
    }
}

impl std::ops::Deref for ValidatedPayload {
    type Target = GenerationPayload;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
