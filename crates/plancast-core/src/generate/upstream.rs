//! The generation pipeline: one synchronous upstream call per invocation.
//!
//! No retry, no backoff, no deduplication; if the client disconnects the call
//! still runs to completion or timeout. The failure taxonomy keeps the four
//! outcomes distinct: missing credential (checked before any I/O), transport
//! failure, non-2xx status (raw body preserved for diagnostics), and a 2xx
//! body with no recognizable image reference.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::GeneratorConfig;
use crate::layout::ValidatedLayout;

use super::extract::extract_image_url;
use super::prompt::build_prompt;

/// Failure modes of [`PlanGenerator::generate`].
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("generation credential is not configured (set COMET_API_KEY)")]
    MissingCredential,

    #[error("failed to encode layout for the prompt: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("generation endpoint unreachable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("generation endpoint returned {status}: {body}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("generation endpoint response carried no image reference")]
    MalformedResponse,
}

/// A successfully generated render, referenced by URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub url: String,
}

/// Request body for the generation endpoint.
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    n: u8,
}

/// Client for the external image-generation endpoint.
pub struct PlanGenerator {
    config: GeneratorConfig,
    client: reqwest::Client,
}

impl PlanGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render a validated layout into a schematic plan image.
    pub async fn generate(
        &self,
        layout: &ValidatedLayout,
    ) -> Result<GeneratedImage, GenerateError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GenerateError::MissingCredential);
        };

        let prompt = build_prompt(layout)?;
        let request = GenerationRequest {
            model: &self.config.model,
            prompt: &prompt,
            size: &self.config.size,
            n: 1,
        };

        tracing::debug!(
            endpoint = %self.config.endpoint,
            prompt_bytes = prompt.len(),
            "requesting plan render"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(GenerateError::UpstreamUnavailable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, "generation endpoint rejected request");
            return Err(GenerateError::UpstreamStatus { status, body });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|_| GenerateError::MalformedResponse)?;
        let url = extract_image_url(&body).ok_or(GenerateError::MalformedResponse)?;

        tracing::info!(%url, "plan render generated");
        Ok(GeneratedImage { url })
    }
}
