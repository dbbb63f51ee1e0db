//! Generation endpoint configuration.

use std::env;
use std::time::Duration;

/// Configuration for the external generation endpoint.
///
/// The credential is optional at construction so the server can boot without
/// it; [`crate::generate::PlanGenerator::generate`] checks it per request and
/// fails fast before any network call when it is absent.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Bearer credential. `None` when `COMET_API_KEY` is unset or empty.
    pub api_key: Option<String>,
    /// Generation endpoint URL.
    pub endpoint: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Output size as `WxH`.
    pub size: String,
    /// Per-request timeout for the upstream call.
    pub timeout: Duration,
}

impl GeneratorConfig {
    pub const DEFAULT_ENDPOINT: &str = "https://api.cometapi.io/v1/generate";
    pub const DEFAULT_MODEL: &str = "nano-banana (gemini-2.5-flash-image)";
    pub const DEFAULT_SIZE: &str = "1024x1024";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Build a config from the environment.
    ///
    /// `COMET_API_KEY` (credential), `COMET_API_URL`, `COMET_MODEL`, and
    /// `COMET_TIMEOUT_SECS` are read, each falling back to the compile-time
    /// default. An unparsable timeout falls back rather than failing boot.
    pub fn from_env() -> Self {
        let timeout_secs = env::var("COMET_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        Self {
            api_key: env::var("COMET_API_KEY").ok().filter(|k| !k.is_empty()),
            endpoint: env::var("COMET_API_URL")
                .unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_owned()),
            model: env::var("COMET_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_owned()),
            size: Self::DEFAULT_SIZE.to_owned(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Build a config with an explicit credential and defaults for the rest
    /// (useful for tests and embedding).
    pub fn with_credential(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::without_credential()
        }
    }

    /// Build a config with no credential; generation requests will fail with
    /// a configuration error before any I/O.
    pub fn without_credential() -> Self {
        Self {
            api_key: None,
            endpoint: Self::DEFAULT_ENDPOINT.to_owned(),
            model: Self::DEFAULT_MODEL.to_owned(),
            size: Self::DEFAULT_SIZE.to_owned(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Override the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_credential() {
        let cfg = GeneratorConfig::with_credential("secret");
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert_eq!(cfg.endpoint, GeneratorConfig::DEFAULT_ENDPOINT);
        assert_eq!(cfg.size, "1024x1024");
        assert_eq!(cfg.timeout, Duration::from_secs(120));
    }

    #[test]
    fn without_credential_has_no_key() {
        let cfg = GeneratorConfig::without_credential();
        assert!(cfg.api_key.is_none());
        assert_eq!(cfg.model, GeneratorConfig::DEFAULT_MODEL);
    }

    #[test]
    fn endpoint_override() {
        let cfg = GeneratorConfig::without_credential().with_endpoint("http://localhost:9");
        assert_eq!(cfg.endpoint, "http://localhost:9");
    }
}
