//! Hugging Face inference API adapter

use async_trait::async_trait;
use pagecast_domain::{GenerateError, TextGenerator};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::TextGenConfig;
use crate::http::build_client;

/// Instruction-tuned models, in order of preference
pub const DEFAULT_MODELS: &[&str] = &[
    "mistralai/Mistral-7B-Instruct-v0.2",
    "HuggingFaceH4/zephyr-7b-beta",
];

/// Text generator that walks a list of hosted models.
///
/// A model that is still loading (HTTP 503) or fails is skipped; the next
/// model in the list is tried with the same prompt.
pub struct HuggingFaceGenerator {
    client: Client,
    token: SecretString,
    base_url: String,
    models: Vec<String>,
    config: TextGenConfig,
}

impl HuggingFaceGenerator {
    pub fn new(token: SecretString, models: Vec<String>, config: TextGenConfig) -> Self {
        Self::with_base_url(
            token,
            "https://api-inference.huggingface.co/models".to_string(),
            models,
            config,
        )
    }

    pub fn with_base_url(
        token: SecretString,
        base_url: String,
        models: Vec<String>,
        config: TextGenConfig,
    ) -> Self {
        let models = if models.is_empty() {
            DEFAULT_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            models
        };

        Self {
            client: build_client(config.timeout_secs),
            token,
            base_url,
            models,
            config,
        }
    }

    async fn call_model(&self, model: &str, prompt: &str) -> Result<String, GenerateError> {
        let request = InferenceRequest {
            inputs: format!("<s>[INST] {} [/INST]", prompt),
            parameters: InferenceParameters {
                max_new_tokens: self.config.max_output_tokens,
                temperature: self.config.temperature,
                do_sample: true,
                return_full_text: false,
            },
        };

        let url = format!("{}/{}", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.token.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenerateError::Timeout
                } else {
                    GenerateError::Api(e.to_string())
                }
            })?;

        match response.status() {
            StatusCode::SERVICE_UNAVAILABLE => {
                return Err(GenerateError::Unavailable(format!("{} is loading", model)));
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(GenerateError::RateLimited),
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(GenerateError::Api(format!(
                    "API returned {}: {}",
                    status, body
                )));
            }
            _ => {}
        }

        let outputs: Vec<InferenceOutput> = response
            .json()
            .await
            .map_err(|e| GenerateError::InvalidFormat(e.to_string()))?;

        outputs
            .into_iter()
            .next()
            .map(|output| output.generated_text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| GenerateError::InvalidFormat("Empty response".to_string()))
    }
}

#[derive(Serialize)]
struct InferenceRequest {
    inputs: String,
    parameters: InferenceParameters,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_new_tokens: u32,
    temperature: f64,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Deserialize)]
struct InferenceOutput {
    #[serde(default)]
    generated_text: String,
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let mut last_error = None;

        for model in &self.models {
            match self.call_model(model, prompt).await {
                Ok(text) => {
                    tracing::debug!(model = %model, "Hugging Face generation succeeded");
                    return Ok(text);
                }
                Err(GenerateError::RateLimited) => return Err(GenerateError::RateLimited),
                Err(error) => {
                    tracing::warn!(model = %model, error = %error, "Model failed, trying next");
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| GenerateError::Unavailable("No models configured".to_string())))
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}
