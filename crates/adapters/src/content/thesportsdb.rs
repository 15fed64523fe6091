//! TheSportsDB adapter (free tier, no key)

use async_trait::async_trait;
use pagecast_domain::sanitize::strip_urls;
use pagecast_domain::{Category, Clock, ContentItem, ContentProvider, ProviderError, SystemClock};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use time::macros::format_description;
use time::{Date, Duration};

use crate::http::{build_client, check_status, transport_error};

const DEFAULT_BASE_URL: &str = "https://www.thesportsdb.com/api/v1/json/3";

/// Soccer fixtures and results for today, or yesterday when today is empty
pub struct TheSportsDbProvider {
    client: Client,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl TheSportsDbProvider {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), timeout_secs)
    }

    pub fn with_base_url(base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            base_url,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn events_on(&self, date: Date) -> Result<Vec<Event>, ProviderError> {
        let day = date
            .format(format_description!("[year]-[month]-[day]"))
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        let url = format!("{}/eventsday.php", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("d", day.as_str()), ("s", "Soccer")])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, self.name()).await?;

        let body: EventsResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(body.events.unwrap_or_default())
    }
}

#[derive(Deserialize)]
struct EventsResponse {
    // null when there are no events
    #[serde(default)]
    events: Option<Vec<Event>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Event {
    #[serde(default)]
    id_event: Option<String>,
    #[serde(default)]
    str_home_team: Option<String>,
    #[serde(default)]
    str_away_team: Option<String>,
    #[serde(default)]
    str_league: Option<String>,
    #[serde(default)]
    str_venue: Option<String>,
    // strings, numbers or null depending on the endpoint
    #[serde(default)]
    int_home_score: Option<Value>,
    #[serde(default)]
    int_away_score: Option<Value>,
}

fn score(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Headline and summary for an event; `None` when a team name is missing.
/// `day` names when the event was played ("today's", "yesterday's").
fn describe(event: &Event, day: &str) -> Option<(String, String)> {
    let home = non_empty(event.str_home_team.as_deref())?;
    let away = non_empty(event.str_away_team.as_deref())?;
    let league = non_empty(event.str_league.as_deref()).unwrap_or("Soccer Match");
    let venue = non_empty(event.str_venue.as_deref())
        .map(|v| format!(" at {}", v))
        .unwrap_or_default();

    let described = match (
        score(event.int_home_score.as_ref()),
        score(event.int_away_score.as_ref()),
    ) {
        (Some(hs), Some(aws)) => (
            format!("{} {} - {} {}", home, hs, aws, away),
            format!(
                "In {} {} match, {} faced {}{}. Final score: {}-{}.",
                day, league, home, away, venue, hs, aws
            ),
        ),
        _ => (
            format!("{} vs {} - {}", home, away, league),
            format!(
                "Upcoming {} match: {} takes on {}{}.",
                league, home, away, venue
            ),
        ),
    };

    Some(described)
}

#[async_trait]
impl ContentProvider for TheSportsDbProvider {
    async fn fetch(&self, category: Category) -> Result<ContentItem, ProviderError> {
        if category != Category::News {
            return Err(ProviderError::Unsupported(category));
        }

        let now = self.clock.now();
        let today = now.date();

        let mut events = self.events_on(today).await?;
        let mut day = "today's";
        if events.is_empty() {
            tracing::debug!("No soccer events today, trying yesterday");
            events = self.events_on(today - Duration::days(1)).await?;
            day = "yesterday's";
        }

        let (event, (title, body)) = events
            .iter()
            .find_map(|event| describe(event, day).map(|text| (event, text)))
            .ok_or(ProviderError::NoResults)?;

        let source_url = event
            .id_event
            .as_deref()
            .map(|id| format!("https://www.thesportsdb.com/event/{}", id))
            .unwrap_or_default();

        Ok(ContentItem {
            title: strip_urls(&title),
            body: strip_urls(&body),
            source_url,
            source_name: "TheSportsDB".to_string(),
            category,
            fetched_at: now,
        })
    }

    fn name(&self) -> &'static str {
        "thesportsdb"
    }
}
