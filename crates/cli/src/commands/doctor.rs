//! Doctor command - validate configuration and show status

use anyhow::Result;
use pagecast_adapters::records::JsonlRunRecordStore;
use pagecast_domain::{Category, RiskLevel, RunRecordStore};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::commands::env_is_set;
use crate::commands::run::{
    build_content_providers, build_image_providers, build_publisher, build_text_generators,
};
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    facebook: CheckResult,
    news: CheckResult,
    odds: CheckResult,
    text: CheckResult,
    images: CheckResult,
    records: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        facebook: CheckResult::error("Not checked"),
        news: CheckResult::error("Not checked"),
        odds: CheckResult::error("Not checked"),
        text: CheckResult::error("Not checked"),
        images: CheckResult::error("Not checked"),
        records: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        report.facebook = check_facebook(config, args.online).await;
        report.news = check_chain(
            "news",
            build_content_providers(config, Category::News, None)
                .iter()
                .map(|p| p.name())
                .collect(),
        );
        report.odds = check_chain(
            "tips",
            build_content_providers(config, Category::Odds, Some(RiskLevel::Safe))
                .iter()
                .map(|p| p.name())
                .collect(),
        );
        report.text = check_text(config);
        report.images = check_images(config);
        report.records = check_records(config).await;
    }

    let checks = [
        &report.config,
        &report.facebook,
        &report.news,
        &report.odds,
        &report.records,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_facebook(config: &AppConfig, online: bool) -> CheckResult {
    let facebook = &config.facebook;

    // Presence only; values are never printed
    let missing: Vec<&str> = [
        facebook.page_id_env.as_str(),
        facebook.access_token_env.as_str(),
    ]
    .into_iter()
    .filter(|env_var| !env_is_set(env_var))
    .collect();

    if !missing.is_empty() {
        return CheckResult::error(format!(
            "Required credentials not set: {}",
            missing.join(", ")
        ));
    }

    let summary = format!(
        "Page id: {} (set), Token: {} (set)",
        facebook.page_id_env, facebook.access_token_env
    );

    if !online {
        return CheckResult::ok(summary);
    }

    let publisher = match build_publisher(config) {
        Ok(p) => p,
        Err(e) => return CheckResult::error(format!("{:#}", e)),
    };

    match publisher.verify_page().await {
        Ok(name) => CheckResult::ok(format!("{}, Page: {}", summary, name))
            .with_details(serde_json::json!({ "page_name": name })),
        Err(e) => CheckResult::error(format!("Graph API check failed: {}", e)),
    }
}

fn check_chain(bot: &str, names: Vec<&'static str>) -> CheckResult {
    if names.is_empty() {
        return CheckResult::warn(format!(
            "No content providers enabled; {} runs will record a failure",
            bot
        ));
    }

    CheckResult::ok(format!("Chain: {}", names.join(" -> ")))
        .with_details(serde_json::json!({ "providers": names }))
}

fn check_text(config: &AppConfig) -> CheckResult {
    let names: Vec<_> = build_text_generators(config)
        .iter()
        .map(|g| g.name())
        .collect();

    if names.is_empty() {
        return CheckResult::warn("No text generators enabled; posts use the template");
    }

    CheckResult::ok(format!(
        "Chain: {} -> template, Model: {}",
        names.join(" -> "),
        config.text.model
    ))
}

fn check_images(config: &AppConfig) -> CheckResult {
    let names: Vec<_> = build_image_providers(config)
        .iter()
        .map(|p| p.name())
        .collect();

    if names.is_empty() {
        return CheckResult::warn("No image providers enabled; posts go out text-only");
    }

    CheckResult::ok(format!("Chain: {}", names.join(" -> ")))
}

async fn check_records(config: &AppConfig) -> CheckResult {
    let store = JsonlRunRecordStore::new(config.general.records_path.clone());

    match store.read_all().await {
        Ok(records) => {
            let last = records.last().map(|r| r.timestamp.to_string());
            CheckResult::ok(format!(
                "{} runs recorded in {}",
                records.len(),
                store.path().display()
            ))
            .with_details(serde_json::json!({
                "count": records.len(),
                "last_run": last,
            }))
        }
        Err(e) => CheckResult::error(format!(
            "Run records unreadable ({}): {}",
            store.path().display(),
            e
        )),
    }
}

fn print_report(report: &DoctorReport) {
    println!("pagecast Doctor Report");
    println!("======================");
    println!();

    print_check("Config", &report.config);
    print_check("Facebook", &report.facebook);
    print_check("News Sources", &report.news);
    print_check("Odds Sources", &report.odds);
    print_check("Text Generation", &report.text);
    print_check("Images", &report.images);
    print_check("Run Records", &report.records);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall != "error" {
        println!();
        println!("Ready to run! Try: pagecast news --dry-run");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}
