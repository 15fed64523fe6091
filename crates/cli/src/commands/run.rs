//! News and tips commands - one pipeline run per invocation

use anyhow::{Context, Result};
use pagecast_adapters::{
    content::{
        EvergreenNewsProvider, NewsApiProvider, OddsApiOptions, TheOddsApiProvider,
        TheSportsDbProvider,
    },
    facebook::FacebookPublisher,
    images::{PexelsImages, UnsplashImages},
    records::JsonlRunRecordStore,
    text::{HuggingFaceGenerator, OpenAiGenerator, TextGenConfig},
};
use pagecast_domain::{
    Category, ContentProvider, ImageProvider, RiskLevel, RunRecord, SystemClock, TextGenerator,
    usecases::{
        ComposeConfig, ContentResolver, ImageQueryConfig, ImageResolver, Pipeline,
        PipelineConfig, TextComposer,
    },
};
use secrecy::ExposeSecret;
use std::path::PathBuf;
use std::sync::Arc;

use crate::args::{RunArgs, TipsArgs};
use crate::commands::{base_url_override, load_api_key, optional_api_key};
use crate::config::AppConfig;

pub async fn execute_news(args: RunArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let pipeline_config = PipelineConfig::news();
    run(&config, pipeline_config, args.dry_run).await
}

pub async fn execute_tips(args: TipsArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let pipeline_config = PipelineConfig::tips(args.risk);
    run(&config, pipeline_config, args.run.dry_run).await
}

async fn run(config: &AppConfig, mut pipeline_config: PipelineConfig, dry_run: bool) -> Result<()> {
    pipeline_config.dry_run = dry_run || config.general.dry_run;
    pipeline_config.max_chars = config.general.max_post_chars;

    tracing::info!(
        bot = %pipeline_config.bot,
        risk = ?pipeline_config.risk_level,
        dry_run = pipeline_config.dry_run,
        records = %config.general.records_path.display(),
        "Starting pagecast run"
    );

    // Credentials first: a misconfigured bot must not leave a record behind
    let publisher =
        Arc::new(build_publisher(config).context("Failed to configure Facebook publisher")?);

    let providers =
        build_content_providers(config, pipeline_config.category, pipeline_config.risk_level);
    if providers.is_empty() {
        tracing::warn!(
            category = %pipeline_config.category,
            "No content providers enabled; set an API key or enable a keyless source"
        );
    }

    let composer = TextComposer::new(
        build_text_generators(config),
        ComposeConfig {
            max_chars: config.general.max_post_chars,
            include_hashtags: config.general.include_hashtags,
        },
    );

    let images = ImageResolver::new(
        build_image_providers(config),
        ImageQueryConfig {
            news_queries: config.images.news_queries.clone(),
            odds_queries: config.images.odds_queries.clone(),
        },
    );

    let store = Arc::new(JsonlRunRecordStore::new(config.general.records_path.clone()));

    let pipeline = Pipeline::new(
        ContentResolver::new(providers),
        composer,
        images,
        publisher,
        store,
        Arc::new(SystemClock),
        pipeline_config,
    );

    let record = pipeline.run_once().await.with_context(|| {
        format!(
            "Failed to write run record to {}",
            config.general.records_path.display()
        )
    })?;

    print_outcome(&record);

    Ok(())
}

fn print_outcome(record: &RunRecord) {
    let title = record.title.as_deref().unwrap_or("-");

    if record.is_success() {
        match &record.post_id {
            Some(post_id) => println!("✓ {} run published {}: {}", record.bot, post_id, title),
            None => println!("✓ {} run composed (dry run): {}", record.bot, title),
        }
    } else {
        println!(
            "✗ {} run failed at {}: {}",
            record.bot,
            record.stage,
            record.error.as_deref().unwrap_or("unknown error")
        );
    }
}

pub(crate) fn build_publisher(config: &AppConfig) -> Result<FacebookPublisher> {
    let facebook = &config.facebook;

    let page_id = load_api_key(&facebook.page_id_env, "Facebook page id")?;
    let page_id = page_id.expose_secret().trim().to_string();
    let token = load_api_key(&facebook.access_token_env, "Facebook page access token")?;

    Ok(match base_url_override(&facebook.base_url) {
        Some(base_url) => {
            FacebookPublisher::with_base_url(page_id, token, base_url, facebook.timeout_secs)
        }
        None => FacebookPublisher::new(page_id, token, facebook.timeout_secs),
    })
}

/// Providers for a category, in fallback order; unset keys drop their provider
pub(crate) fn build_content_providers(
    config: &AppConfig,
    category: Category,
    risk: Option<RiskLevel>,
) -> Vec<Arc<dyn ContentProvider>> {
    let mut providers: Vec<Arc<dyn ContentProvider>> = Vec::new();

    match category {
        Category::News => {
            let newsapi = &config.news.newsapi;
            if let Some(key) = optional_api_key(&newsapi.api_key_env) {
                providers.push(Arc::new(match base_url_override(&newsapi.base_url) {
                    Some(base_url) => {
                        NewsApiProvider::with_base_url(key, base_url, newsapi.timeout_secs)
                    }
                    None => NewsApiProvider::new(key, newsapi.timeout_secs),
                }));
            } else {
                tracing::debug!(env = %newsapi.api_key_env, "NewsAPI key not set, skipping");
            }

            let sportsdb = &config.news.thesportsdb;
            if sportsdb.enabled {
                providers.push(Arc::new(match base_url_override(&sportsdb.base_url) {
                    Some(base_url) => {
                        TheSportsDbProvider::with_base_url(base_url, sportsdb.timeout_secs)
                    }
                    None => TheSportsDbProvider::new(sportsdb.timeout_secs),
                }));
            }

            if config.news.evergreen_fallback {
                providers.push(Arc::new(EvergreenNewsProvider::new()));
            }
        }
        Category::Odds => {
            let odds = &config.odds.the_odds_api;
            if let Some(key) = optional_api_key(&odds.api_key_env) {
                let options = OddsApiOptions {
                    sports: odds.sports.clone(),
                    regions: odds.regions.clone(),
                    timeout_secs: odds.timeout_secs,
                };
                let risk = risk.unwrap_or(RiskLevel::Safe);
                providers.push(Arc::new(match base_url_override(&odds.base_url) {
                    Some(base_url) => {
                        TheOddsApiProvider::with_base_url(key, base_url, options, risk)
                    }
                    None => TheOddsApiProvider::new(key, options, risk),
                }));
            } else {
                tracing::debug!(env = %odds.api_key_env, "Odds API key not set, skipping");
            }
        }
    }

    providers
}

pub(crate) fn build_text_generators(config: &AppConfig) -> Vec<Arc<dyn TextGenerator>> {
    let text = &config.text;
    let gen_config = TextGenConfig {
        model: text.model.clone(),
        temperature: text.temperature,
        max_output_tokens: text.max_output_tokens,
        timeout_secs: text.timeout_secs,
    };

    let mut generators: Vec<Arc<dyn TextGenerator>> = Vec::new();

    if let Some(key) = optional_api_key(&text.openai.api_key_env) {
        generators.push(Arc::new(match base_url_override(&text.openai.base_url) {
            Some(base_url) => OpenAiGenerator::with_base_url(key, base_url, gen_config.clone()),
            None => OpenAiGenerator::new(key, gen_config.clone()),
        }));
    }

    let huggingface = &text.huggingface;
    if let Some(token) = optional_api_key(&huggingface.token_env) {
        let models = huggingface.models.clone();
        generators.push(Arc::new(match base_url_override(&huggingface.base_url) {
            Some(base_url) => {
                HuggingFaceGenerator::with_base_url(token, base_url, models, gen_config)
            }
            None => HuggingFaceGenerator::new(token, models, gen_config),
        }));
    }

    generators
}

pub(crate) fn build_image_providers(config: &AppConfig) -> Vec<Arc<dyn ImageProvider>> {
    let images = &config.images;
    let mut providers: Vec<Arc<dyn ImageProvider>> = Vec::new();

    if let Some(key) = optional_api_key(&images.unsplash.api_key_env) {
        providers.push(Arc::new(match base_url_override(&images.unsplash.base_url) {
            Some(base_url) => UnsplashImages::with_base_url(key, base_url, images.timeout_secs),
            None => UnsplashImages::new(key, images.timeout_secs),
        }));
    }

    if let Some(key) = optional_api_key(&images.pexels.api_key_env) {
        providers.push(Arc::new(match base_url_override(&images.pexels.base_url) {
            Some(base_url) => PexelsImages::with_base_url(key, base_url, images.timeout_secs),
            None => PexelsImages::new(key, images.timeout_secs),
        }));
    }

    providers
}
