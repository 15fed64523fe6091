//! Domain models and value objects

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Kind of content a bot publishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Football news articles and match reports
    News,
    /// Betting odds turned into a pick
    Odds,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::News => "news",
            Category::Odds => "odds",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of content normalized from one provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    /// Headline
    pub title: String,
    /// Summary or pick details
    pub body: String,
    /// Link to the original article or event
    pub source_url: String,
    /// Human-readable publication or provider name
    pub source_name: String,
    pub category: Category,
    /// When the provider returned this item
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
}

/// How adventurous a betting pick is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Safe,
    Value,
    Risky,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "safe",
            RiskLevel::Value => "value",
            RiskLevel::Risky => "risky",
        }
    }

    /// Inclusive decimal odds range for picks at this level
    pub fn odds_range(&self) -> (f64, f64) {
        match self {
            RiskLevel::Safe => (1.20, 1.55),
            RiskLevel::Value => (1.60, 2.20),
            RiskLevel::Risky => (2.30, 10.00),
        }
    }

    /// Confidence percentage range, highest at the low end of the odds range
    pub fn confidence_range(&self) -> (u8, u8) {
        match self {
            RiskLevel::Safe => (85, 95),
            RiskLevel::Value => (65, 80),
            RiskLevel::Risky => (45, 60),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE BET",
            RiskLevel::Value => "VALUE BET",
            RiskLevel::Risky => "HIGH ODDS",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            RiskLevel::Safe => "🟢",
            RiskLevel::Value => "🟡",
            RiskLevel::Risky => "🔴",
        }
    }

    pub fn hashtags(&self) -> &'static [&'static str] {
        match self {
            RiskLevel::Safe => &["#SafeBet", "#LowRisk", "#BankBuilder"],
            RiskLevel::Value => &["#ValueBet", "#SmartBet", "#GoodOdds"],
            RiskLevel::Risky => &["#HighOdds", "#RiskyPick", "#Underdog"],
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown risk level '{0}': expected safe, value or risky")]
pub struct ParseRiskLevelError(String);

impl FromStr for RiskLevel {
    type Err = ParseRiskLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(RiskLevel::Safe),
            "value" | "moderate" => Ok(RiskLevel::Value),
            "risky" => Ok(RiskLevel::Risky),
            other => Err(ParseRiskLevelError(other.to_string())),
        }
    }
}

/// An image found by an image provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHit {
    /// Publicly reachable image URL, handed to the Graph API as-is
    pub url: String,
    /// Photographer attribution, if the provider supplies one
    pub credit: Option<String>,
}

/// A not-yet-published Facebook post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub image_url: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

/// Final state of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Success,
    Failure,
}

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStage {
    Fetching,
    Composing,
    ImageResolving,
    Sanitizing,
    Publishing,
    Recording,
    Done,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunStage::Fetching => "fetching",
            RunStage::Composing => "composing",
            RunStage::ImageResolving => "image_resolving",
            RunStage::Sanitizing => "sanitizing",
            RunStage::Publishing => "publishing",
            RunStage::Recording => "recording",
            RunStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Audit entry for one pipeline invocation.
///
/// Records are append-only; a correction is a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Bot variant that ran (e.g. "news", "tips")
    pub bot: String,
    /// Content provider that supplied the item, if any did
    pub provider_used: Option<String>,
    pub outcome: RunOutcome,
    /// Platform post ID on successful publish
    pub post_id: Option<String>,
    /// Last stage reached; the failing stage for failed runs
    pub stage: RunStage,
    /// Headline of the content that was (or would have been) posted
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }
}
