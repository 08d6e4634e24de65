use std::env;
use std::time::Duration;

use crate::bedrock::SDXL_MODEL_ID;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Default)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: Option<String>,
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        BedrockConfig {
            region: non_empty_var("AWS_REGION"),
            access_key: non_empty_var("AWS_ACCESS_KEY_ID"),
            secret_key: non_empty_var("AWS_SECRET_ACCESS_KEY"),
            model_id: non_empty_var("MODEL_ID"),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn region_or_default(&self) -> String {
        self.region
            .clone()
            .unwrap_or_else(|| DEFAULT_REGION.to_string())
    }

    pub fn model_id_or_default(&self) -> String {
        self.model_id
            .clone()
            .unwrap_or_else(|| SDXL_MODEL_ID.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
    /// Where generated images would be stored. Logged only.
    pub bucket_name: Option<String>,
    pub enforce_prompt_limit: bool,
    pub json_logs: bool,
    pub bedrock: BedrockConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            bucket_name: None,
            enforce_prompt_limit: true,
            json_logs: false,
            bedrock: BedrockConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            host: non_empty_var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            timeout_seconds: parse_timeout(env::var("TIMEOUT_SECONDS").ok().as_deref()),
            bucket_name: non_empty_var("BUCKET_NAME"),
            enforce_prompt_limit: parse_flag(env::var("ENFORCE_PROMPT_LIMIT").ok().as_deref(), true),
            json_logs: env::var("LOG_FORMAT").map_or(false, |val| val.eq_ignore_ascii_case("json")),
            bedrock: BedrockConfig::from_env(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Zero falls back to the default, as it does for `TIMEOUT_SECONDS`.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = if seconds == 0 {
            DEFAULT_TIMEOUT_SECONDS
        } else {
            seconds
        };
        self
    }

    pub fn with_bucket(mut self, bucket_name: impl Into<String>) -> Self {
        self.bucket_name = Some(bucket_name.into());
        self
    }

    pub fn with_prompt_limit(mut self, enabled: bool) -> Self {
        self.enforce_prompt_limit = enabled;
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|val| !val.trim().is_empty())
}

/// Unparsable or zero timeouts fall back to the default.
fn parse_timeout(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
}

fn parse_flag(raw: Option<&str>, default: bool) -> bool {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.port, 8080);
        assert!(config.enforce_prompt_limit);
        assert_eq!(config.bedrock.region_or_default(), "us-east-1");
        assert_eq!(config.bedrock.model_id_or_default(), SDXL_MODEL_ID);
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_port(9000)
            .with_timeout(30)
            .with_bucket("generated-images")
            .with_prompt_limit(false)
            .with_bedrock(
                BedrockConfig::new()
                    .with_region("us-west-2")
                    .with_credentials("AKIA", "secret")
                    .with_model("stability.stable-diffusion-xl-v0"),
            );
        assert_eq!(config.bind_address(), ("0.0.0.0".to_string(), 9000));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert_eq!(config.bucket_name.as_deref(), Some("generated-images"));
        assert!(!config.enforce_prompt_limit);
        assert_eq!(config.bedrock.region_or_default(), "us-west-2");
        assert_eq!(config.bedrock.access_key.as_deref(), Some("AKIA"));
        assert_eq!(
            config.bedrock.model_id_or_default(),
            "stability.stable-diffusion-xl-v0"
        );
    }

    #[test]
    fn test_zero_timeout_builder_uses_default() {
        let config = Config::new().with_timeout(0);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECONDS));
        assert_eq!(Config::new().with_timeout(1).timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout(None), 10);
        assert_eq!(parse_timeout(Some("25")), 25);
        assert_eq!(parse_timeout(Some(" 3 ")), 3);
        assert_eq!(parse_timeout(Some("ten")), 10);
        assert_eq!(parse_timeout(Some("0")), 10);
        assert_eq!(parse_timeout(Some("-4")), 10);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag(None, true));
        assert!(!parse_flag(None, false));
        assert!(!parse_flag(Some("FALSE"), true));
        assert!(parse_flag(Some("1"), false));
        assert!(parse_flag(Some("maybe"), true));
    }
}
