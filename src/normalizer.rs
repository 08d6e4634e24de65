//! Turns a [`RawRequest`] into a typed, defaulted [`GenerationPayload`] candidate.
//!
//! Missing or malformed optional parameters never fail a request here; they fall
//! back to their defaults and the validator decides whether the result is usable.

use std::collections::HashMap;
use std::num::IntErrorKind;

use crate::models::{GenerationPayload, RawRequest, TextPrompt, DEFAULT_CFG_SCALE};

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestNormalizer;

impl RequestNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn normalize(&self, request: &RawRequest) -> GenerationPayload {
        log_request(request);

        let prompt = request.body.clone();

        let Some(params) = &request.query_parameters else {
            log::info!("no query string parameters, using default values");
            return GenerationPayload::new(prompt);
        };

        let mut payload = GenerationPayload {
            text_prompts: vec![TextPrompt { text: prompt }],
            cfg_scale: parse_cfg_scale(params),
            steps: parse_int(params, "steps"),
            seed: parse_int(params, "seed"),
            width: parse_int(params, "width"),
            height: parse_int(params, "height"),
        };
        payload.apply_defaults();
        payload
    }
}

fn log_request(request: &RawRequest) {
    log::info!(
        "Processing request data for request {}",
        request.request_id()
    );
    log::info!("Body size = {}", request.body.len());

    log::debug!("Headers:");
    for (key, value) in &request.headers {
        log::debug!(" ++ {}: {}", key, value);
    }

    if let Some(params) = &request.query_parameters {
        log::debug!("Query string parameters:");
        for (key, value) in params {
            log::debug!(" && {}: {}", key, value);
        }
    }
}

fn parse_cfg_scale(params: &HashMap<String, String>) -> f64 {
    match params.get("cfg_scale") {
        None => {
            log::info!("cfg_scale not defined, using default value");
            DEFAULT_CFG_SCALE
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() || is_infinity_literal(raw) => value,
            _ => {
                log::info!("cfg_scale is not a number, using default value");
                DEFAULT_CFG_SCALE
            }
        },
    }
}

/// Only a spelled-out infinity is kept as infinite. A finite literal that
/// overflows f64 (`1e400`) is a range error and falls back like any other
/// unparsable value.
fn is_infinity_literal(raw: &str) -> bool {
    let unsigned = raw.trim_start_matches(['+', '-']);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// Missing or unparsable values become zero and are defaulted later.
/// Numeric strings beyond the i64 range saturate so range checks reject them.
fn parse_int(params: &HashMap<String, String>, key: &str) -> i64 {
    let Some(raw) = params.get(key) else {
        return 0;
    };

    match raw.parse::<i64>() {
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                log::debug!("{} is not an integer ({:?}), using default value", key, raw);
                0
            }
        },
    }
}
