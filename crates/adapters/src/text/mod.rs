//! Generative text adapters

mod huggingface;
mod openai;

pub use huggingface::HuggingFaceGenerator;
pub use openai::OpenAiGenerator;

use serde::{Deserialize, Serialize};

/// Common text generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextGenConfig {
    /// Model name/ID
    pub model: String,
    /// Temperature (0.0-2.0)
    pub temperature: f64,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_output_tokens: 300,
            timeout_secs: 45,
        }
    }
}

pub(crate) const SYSTEM_PROMPT: &str = "You are a professional social media manager specializing \
     in football/soccer content. You create engaging, emoji-rich posts that fans love.";
