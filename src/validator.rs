//! Bounds and enumeration checks for Stable Diffusion XL payloads.

use std::fmt;

use crate::error::{ValidationError, ValidationKind};
use crate::models::{GenerationPayload, ValidatedPayload};

pub const MIN_CFG_SCALE: f64 = 0.0;
pub const MAX_CFG_SCALE: f64 = 35.0;
pub const MIN_STEPS: i64 = 10;
pub const MAX_STEPS: i64 = 50;
pub const MIN_SEED: i64 = 0;
pub const MAX_SEED: i64 = 4_294_967_295;
pub const MAX_PROMPT_TOKENS: usize = 75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: i64,
    pub height: i64,
}

impl Resolution {
    const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    pub fn is_allowed(width: i64, height: i64) -> bool {
        ALLOWED_RESOLUTIONS.contains(&Resolution::new(width, height))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The only output sizes SDXL accepts.
pub const ALLOWED_RESOLUTIONS: [Resolution; 9] = [
    Resolution::new(1024, 1024),
    Resolution::new(896, 1152),
    Resolution::new(832, 1216),
    Resolution::new(768, 1344),
    Resolution::new(640, 1536),
    Resolution::new(1536, 640),
    Resolution::new(1344, 768),
    Resolution::new(1216, 832),
    Resolution::new(1152, 896),
];

struct Rule {
    kind: ValidationKind,
    holds: fn(&PayloadValidator, &GenerationPayload) -> bool,
}

// Evaluated in order; the first failing rule decides the reported error.
const RULES: [Rule; 5] = [
    Rule {
        kind: ValidationKind::CfgScaleOutOfRange,
        holds: |_, p| (MIN_CFG_SCALE..=MAX_CFG_SCALE).contains(&p.cfg_scale),
    },
    Rule {
        kind: ValidationKind::StepsOutOfRange,
        holds: |_, p| (MIN_STEPS..=MAX_STEPS).contains(&p.steps),
    },
    Rule {
        kind: ValidationKind::SeedOutOfRange,
        holds: |_, p| (MIN_SEED..=MAX_SEED).contains(&p.seed),
    },
    Rule {
        kind: ValidationKind::UnsupportedResolution,
        holds: |_, p| Resolution::is_allowed(p.width, p.height),
    },
    Rule {
        kind: ValidationKind::PromptTooLong,
        holds: |v, p| match v.max_prompt_tokens {
            Some(max) => p.prompt().split_whitespace().count() <= max,
            None => true,
        },
    },
];

/// Accepts or rejects candidate payloads. Never mutates them and keeps no state
/// between calls.
#[derive(Debug, Clone)]
pub struct PayloadValidator {
    max_prompt_tokens: Option<usize>,
}

impl Default for PayloadValidator {
    fn default() -> Self {
        Self {
            max_prompt_tokens: Some(MAX_PROMPT_TOKENS),
        }
    }
}

impl PayloadValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_prompt_limit(mut self) -> Self {
        self.max_prompt_tokens = None;
        self
    }

    pub fn with_prompt_limit(mut self, enabled: bool) -> Self {
        self.max_prompt_tokens = enabled.then_some(MAX_PROMPT_TOKENS);
        self
    }

    pub fn validate(
        &self,
        payload: GenerationPayload,
    ) -> std::result::Result<ValidatedPayload, ValidationError> {
        match RULES.iter().find(|rule| !(rule.holds)(self, &payload)) {
            Some(rule) => Err(ValidationError::new(rule.kind, self.describe(rule.kind))),
            None => Ok(ValidatedPayload::new(payload)),
        }
    }

    fn describe(&self, kind: ValidationKind) -> String {
        match kind {
            ValidationKind::CfgScaleOutOfRange => {
                format!("cfg_scale must be between {} and {}", MIN_CFG_SCALE, MAX_CFG_SCALE)
            }
            ValidationKind::StepsOutOfRange => {
                format!("steps must be between {} and {}", MIN_STEPS, MAX_STEPS)
            }
            ValidationKind::SeedOutOfRange => {
                format!("seed must be between {} and {}", MIN_SEED, MAX_SEED)
            }
            ValidationKind::UnsupportedResolution => {
                let allowed: Vec<String> =
                    ALLOWED_RESOLUTIONS.iter().map(ToString::to_string).collect();
                format!("width and height must be one of {}", allowed.join(", "))
            }
            ValidationKind::PromptTooLong => format!(
                "body must be at most {} tokens",
                self.max_prompt_tokens.unwrap_or(MAX_PROMPT_TOKENS)
            ),
        }
    }
}
