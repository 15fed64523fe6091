//! History command - read back the run record log

use anyhow::{Context, Result};
use pagecast_adapters::records::JsonlRunRecordStore;
use pagecast_domain::{RunRecord, RunRecordStore};
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;

use crate::args::HistoryArgs;
use crate::config::AppConfig;

pub async fn execute(args: HistoryArgs, config_path: Option<PathBuf>) -> Result<()> {
    let config = AppConfig::load(config_path.as_deref())?;
    let store = JsonlRunRecordStore::new(config.general.records_path.clone());

    let records = store.read_all().await.with_context(|| {
        format!(
            "Failed to read run records from {}",
            store.path().display()
        )
    })?;

    let records = most_recent(records, args.limit);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No runs recorded yet ({})", store.path().display());
        return Ok(());
    }

    for record in &records {
        println!("{}", format_line(record));
    }

    let successes = records.iter().filter(|r| r.is_success()).count();
    println!();
    println!(
        "{} runs: {} succeeded, {} failed",
        records.len(),
        successes,
        records.len() - successes
    );

    Ok(())
}

/// Keep the last `limit` records, still oldest first
fn most_recent(mut records: Vec<RunRecord>, limit: Option<usize>) -> Vec<RunRecord> {
    if let Some(limit) = limit {
        let skip = records.len().saturating_sub(limit);
        records = records.split_off(skip);
    }
    records
}

fn format_line(record: &RunRecord) -> String {
    let when = record
        .timestamp
        .format(&Rfc3339)
        .unwrap_or_else(|_| record.timestamp.to_string());

    let bot = match record.risk_level {
        Some(risk) => format!("{} ({})", record.bot, risk),
        None => record.bot.clone(),
    };

    let symbol = if record.is_success() { "✓" } else { "✗" };

    let detail = if record.is_success() {
        match (&record.post_id, record.dry_run) {
            (Some(post_id), _) => format!("post {}", post_id),
            (None, true) => "dry run".to_string(),
            (None, false) => "no post id".to_string(),
        }
    } else {
        format!(
            "failed at {}: {}",
            record.stage,
            record.error.as_deref().unwrap_or("unknown error")
        )
    };

    format!(
        "{} {} {} [{}] {} - {}",
        symbol,
        when,
        bot,
        record.provider_used.as_deref().unwrap_or("-"),
        record.title.as_deref().unwrap_or("-"),
        detail
    )
}
