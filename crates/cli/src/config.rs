//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub facebook: FacebookConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub odds: OddsConfig,

    #[serde(default)]
    pub text: TextConfig,

    #[serde(default)]
    pub images: ImagesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_records_path")]
    pub records_path: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default = "default_max_post_chars")]
    pub max_post_chars: usize,

    #[serde(default = "default_true")]
    pub include_hashtags: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacebookConfig {
    #[serde(default = "default_page_id_env")]
    pub page_id_env: String,

    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,

    /// Graph API base URL including the version; empty uses the built-in one
    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsConfig {
    /// Post a canned day-of-week story when every live source fails
    #[serde(default)]
    pub evergreen_fallback: bool,

    #[serde(default)]
    pub newsapi: NewsApiConfig,

    #[serde(default)]
    pub thesportsdb: TheSportsDbConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsApiConfig {
    #[serde(default = "default_news_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TheSportsDbConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OddsConfig {
    #[serde(default)]
    pub the_odds_api: OddsApiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsApiConfig {
    #[serde(default = "default_odds_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_sports")]
    pub sports: Vec<String>,

    #[serde(default = "default_regions")]
    pub regions: String,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextConfig {
    #[serde(default = "default_text_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_text_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub huggingface: HuggingFaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_text_gen_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuggingFaceConfig {
    #[serde(default = "default_huggingface_token_env")]
    pub token_env: String,

    #[serde(default)]
    pub base_url: String,

    /// Models tried in order; empty uses the built-in list
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagesConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_news_queries")]
    pub news_queries: Vec<String>,

    #[serde(default = "default_odds_queries")]
    pub odds_queries: Vec<String>,

    #[serde(default)]
    pub unsplash: UnsplashConfig,

    #[serde(default)]
    pub pexels: PexelsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsplashConfig {
    #[serde(default = "default_image_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PexelsConfig {
    #[serde(default = "default_pexels_api_key_env")]
    pub api_key_env: String,

    #[serde(default)]
    pub base_url: String,
}

// Default value functions
fn default_records_path() -> PathBuf {
    PathBuf::from("./data/runs.jsonl")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_post_chars() -> usize {
    pagecast_domain::usecases::FACEBOOK_MAX_CHARS
}

fn default_timeout() -> u64 {
    pagecast_adapters::DEFAULT_TIMEOUT_SECS
}

fn default_page_id_env() -> String {
    "PAGE_ID".to_string()
}

fn default_access_token_env() -> String {
    "PAGE_ACCESS_TOKEN".to_string()
}

fn default_news_api_key_env() -> String {
    "NEWS_API_KEY".to_string()
}

fn default_odds_api_key_env() -> String {
    "ODDS_API_KEY".to_string()
}

fn default_sports() -> Vec<String> {
    [
        "soccer_epl",
        "soccer_spain_la_liga",
        "soccer_italy_serie_a",
        "soccer_germany_bundesliga",
        "soccer_uefa_champs_league",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_regions() -> String {
    "uk,eu".to_string()
}

fn default_text_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    300
}

fn default_text_timeout() -> u64 {
    45
}

fn default_text_gen_api_key_env() -> String {
    "TEXT_GEN_API_KEY".to_string()
}

fn default_huggingface_token_env() -> String {
    "HUGGINGFACE_TOKEN".to_string()
}

fn default_image_api_key_env() -> String {
    "IMAGE_API_KEY".to_string()
}

fn default_pexels_api_key_env() -> String {
    "PEXELS_API_KEY".to_string()
}

fn default_news_queries() -> Vec<String> {
    [
        "football soccer stadium",
        "soccer match",
        "football players",
        "soccer ball field",
        "football stadium crowd",
        "soccer goal celebration",
        "football pitch",
        "soccer game action",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_odds_queries() -> Vec<String> {
    [
        "football stadium night",
        "soccer ball goal net",
        "football fans celebrating",
        "soccer match action",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            records_path: default_records_path(),
            log_level: default_log_level(),
            dry_run: false,
            max_post_chars: default_max_post_chars(),
            include_hashtags: default_true(),
        }
    }
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            page_id_env: default_page_id_env(),
            access_token_env: default_access_token_env(),
            base_url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            evergreen_fallback: false,
            newsapi: NewsApiConfig::default(),
            thesportsdb: TheSportsDbConfig::default(),
        }
    }
}

impl Default for NewsApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_news_api_key_env(),
            base_url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for TheSportsDbConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            base_url: String::new(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_odds_api_key_env(),
            base_url: String::new(),
            sports: default_sports(),
            regions: default_regions(),
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            model: default_text_model(),
            temperature: default_temperature(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_text_timeout(),
            openai: OpenAiConfig::default(),
            huggingface: HuggingFaceConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_text_gen_api_key_env(),
            base_url: String::new(),
        }
    }
}

impl Default for HuggingFaceConfig {
    fn default() -> Self {
        Self {
            token_env: default_huggingface_token_env(),
            base_url: String::new(),
            models: vec![],
        }
    }
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            news_queries: default_news_queries(),
            odds_queries: default_odds_queries(),
            unsplash: UnsplashConfig::default(),
            pexels: PexelsConfig::default(),
        }
    }
}

impl Default for UnsplashConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_image_api_key_env(),
            base_url: String::new(),
        }
    }
}

impl Default for PexelsConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_pexels_api_key_env(),
            base_url: String::new(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        let default_path = PathBuf::from("./config.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // PAGECAST__GENERAL__DRY_RUN=true etc.
        builder = builder.add_source(
            config::Environment::with_prefix("PAGECAST")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# pagecast configuration
#
# Secrets never live in this file: each section names the environment
# variable that holds its key. Unset keys disable that provider.

[general]
records_path = "./data/runs.jsonl"
log_level = "info"
dry_run = false
max_post_chars = 63206
include_hashtags = true

[facebook]
page_id_env = "PAGE_ID"
access_token_env = "PAGE_ACCESS_TOKEN"
# base_url = "https://graph.facebook.com/v19.0"
timeout_secs = 30

[news]
# Post a canned story when NewsAPI and TheSportsDB both fail
evergreen_fallback = false

[news.newsapi]
api_key_env = "NEWS_API_KEY"
timeout_secs = 30

[news.thesportsdb]
enabled = true
timeout_secs = 30

[odds.the_odds_api]
api_key_env = "ODDS_API_KEY"
sports = ["soccer_epl", "soccer_spain_la_liga", "soccer_italy_serie_a", "soccer_germany_bundesliga", "soccer_uefa_champs_league"]
regions = "uk,eu"
timeout_secs = 30

[text]
model = "gpt-3.5-turbo"
temperature = 0.7
max_output_tokens = 300
timeout_secs = 45

[text.openai]
api_key_env = "TEXT_GEN_API_KEY"
# base_url = "https://api.openai.com/v1"

[text.huggingface]
token_env = "HUGGINGFACE_TOKEN"
# models = ["mistralai/Mistral-7B-Instruct-v0.2", "HuggingFaceH4/zephyr-7b-beta"]

[images]
timeout_secs = 30
news_queries = ["football soccer stadium", "soccer match", "football players", "soccer ball field"]
odds_queries = ["football stadium night", "soccer ball goal net"]

[images.unsplash]
api_key_env = "IMAGE_API_KEY"

[images.pexels]
api_key_env = "PEXELS_API_KEY"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_toml_parses_into_config() {
        let config: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();

        assert_eq!(config.facebook.page_id_env, "PAGE_ID");
        assert_eq!(config.odds.the_odds_api.sports.len(), 5);
        assert_eq!(config.general.max_post_chars, 63_206);
        assert!(!config.news.evergreen_fallback);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();

        assert_eq!(config.general.records_path, PathBuf::from("./data/runs.jsonl"));
        assert!(config.news.thesportsdb.enabled);
        assert!(config.text.huggingface.models.is_empty());
        assert_eq!(config.images.news_queries.len(), 8);
    }
}
