//! DeepInfraApiAgent - Direct REST API implementation for DeepInfra
//! text-generation inference.
//!
//! This agent posts a raw prompt to a DeepInfra-style inference
//! endpoint and returns the generated text. Configuration comes from
//! environment variables.

use crate::inference_agent::InferenceAgent;
use async_trait::async_trait;
use intervo_core::error::GenerationError;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_MODEL_URL: &str =
    "https://api.deepinfra.com/v1/inference/meta-llama/Meta-Llama-3-8B-Instruct";

/// Agent implementation that talks to the DeepInfra inference API.
#[derive(Clone)]
pub struct DeepInfraApiAgent {
    client: Client,
    api_key: String,
    model_url: String,
}

impl DeepInfraApiAgent {
    /// Creates a new agent with the provided API key and model URL.
    pub fn new(api_key: impl Into<String>, model_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model_url: model_url.into(),
        }
    }

    /// Loads configuration from environment variables.
    ///
    /// `DEEPINFRA_API_KEY` is required; `DEEPINFRA_MODEL_URL` defaults
    /// to the Meta-Llama-3-8B-Instruct inference endpoint.
    pub fn try_from_env() -> Result<Self, GenerationError> {
        let api_key = env::var("DEEPINFRA_API_KEY").map_err(|_| GenerationError::Credential)?;
        let model_url =
            env::var("DEEPINFRA_MODEL_URL").unwrap_or_else(|_| DEFAULT_MODEL_URL.into());
        Ok(Self::new(api_key, model_url))
    }

    async fn send_request(&self, body: &InferenceRequest<'_>) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(&self.model_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::Other(format!("inference request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: InferenceResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::Other(format!("failed to parse response: {err}")))?;

        // A response with no results is treated as an empty generation;
        // the extraction layer resolves it to a fallback.
        Ok(parsed
            .results
            .into_iter()
            .next()
            .map(|result| result.generated_text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl InferenceAgent for DeepInfraApiAgent {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = InferenceRequest { input: prompt };
        self.send_request(&request).await
    }
}

/// Maps an HTTP failure status onto the generation error taxonomy.
fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Credential,
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimited,
        status if status.is_server_error() => GenerationError::Server,
        status => GenerationError::Other(format!("inference API returned {status}: {body}")),
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    input: &'a str,
}

#[derive(Deserialize)]
struct InferenceResponse {
    #[serde(default)]
    results: Vec<InferenceResult>,
}

#[derive(Deserialize)]
struct InferenceResult {
    generated_text: String,
}
