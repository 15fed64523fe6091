//! The Odds API (v4) adapter producing betting picks

use async_trait::async_trait;
use pagecast_domain::odds::{OddsEvent, select_pick};
use pagecast_domain::{
    Category, Clock, ContentItem, ContentProvider, ProviderError, RiskLevel, SystemClock,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::http::{build_client, check_status, transport_error};

const DEFAULT_BASE_URL: &str = "https://api.the-odds-api.com";

/// Which markets to query
#[derive(Debug, Clone)]
pub struct OddsApiOptions {
    /// Sport keys tried in order, e.g. "soccer_epl"
    pub sports: Vec<String>,
    /// Comma-separated bookmaker regions, e.g. "uk,eu"
    pub regions: String,
    pub timeout_secs: u64,
}

impl Default for OddsApiOptions {
    fn default() -> Self {
        Self {
            sports: vec![
                "soccer_epl".to_string(),
                "soccer_spain_la_liga".to_string(),
                "soccer_italy_serie_a".to_string(),
                "soccer_germany_bundesliga".to_string(),
                "soccer_uefa_champs_league".to_string(),
            ],
            regions: "uk,eu".to_string(),
            timeout_secs: 30,
        }
    }
}

/// Odds provider that turns bookmaker prices into a pick at a fixed risk level
pub struct TheOddsApiProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    options: OddsApiOptions,
    risk: RiskLevel,
    clock: Arc<dyn Clock>,
}

impl TheOddsApiProvider {
    pub fn new(api_key: SecretString, options: OddsApiOptions, risk: RiskLevel) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), options, risk)
    }

    pub fn with_base_url(
        api_key: SecretString,
        base_url: String,
        options: OddsApiOptions,
        risk: RiskLevel,
    ) -> Self {
        Self {
            client: build_client(options.timeout_secs),
            api_key,
            base_url,
            options,
            risk,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    async fn events_for(&self, sport: &str) -> Result<Vec<OddsEvent>, ProviderError> {
        let url = format!("{}/v4/sports/{}/odds", self.base_url, sport);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.expose_secret()),
                ("regions", self.options.regions.as_str()),
                ("markets", "h2h"),
                ("oddsFormat", "decimal"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if let Some(remaining) = response
            .headers()
            .get("x-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!(sport = %sport, remaining = %remaining, "Odds API quota");
        }

        let response = check_status(response, self.name()).await?;

        let events: Vec<ApiEvent> = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        Ok(events.into_iter().map(ApiEvent::into_odds_event).collect())
    }
}

#[derive(Deserialize)]
struct ApiEvent {
    id: String,
    #[serde(default)]
    sport_title: String,
    #[serde(with = "time::serde::rfc3339")]
    commence_time: OffsetDateTime,
    home_team: String,
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<Bookmaker>,
}

#[derive(Deserialize)]
struct Bookmaker {
    #[serde(default)]
    markets: Vec<Market>,
}

#[derive(Deserialize)]
struct Market {
    key: String,
    #[serde(default)]
    outcomes: Vec<Outcome>,
}

#[derive(Deserialize)]
struct Outcome {
    name: String,
    price: f64,
}

impl ApiEvent {
    /// Average each h2h outcome's price across bookmakers
    fn into_odds_event(self) -> OddsEvent {
        let mut totals: HashMap<&str, (f64, u32)> = HashMap::new();

        for outcome in self
            .bookmakers
            .iter()
            .flat_map(|b| &b.markets)
            .filter(|m| m.key == "h2h")
            .flat_map(|m| &m.outcomes)
        {
            let entry = totals.entry(outcome.name.as_str()).or_insert((0.0, 0));
            entry.0 += outcome.price;
            entry.1 += 1;
        }

        let average = |name: &str| {
            totals
                .get(name)
                .map(|(sum, count)| sum / f64::from(*count))
        };

        OddsEvent {
            home_price: average(&self.home_team),
            draw_price: average("Draw"),
            away_price: average(&self.away_team),
            id: self.id,
            league: self.sport_title,
            home_team: self.home_team,
            away_team: self.away_team,
            commence_time: self.commence_time,
        }
    }
}

#[async_trait]
impl ContentProvider for TheOddsApiProvider {
    async fn fetch(&self, category: Category) -> Result<ContentItem, ProviderError> {
        if category != Category::Odds {
            return Err(ProviderError::Unsupported(category));
        }

        let now = self.clock.now();
        let mut last_error = None;

        for sport in &self.options.sports {
            let events = match self.events_for(sport).await {
                Ok(events) => events,
                // a bad key or exhausted quota fails every sport alike
                Err(error @ (ProviderError::Auth(_) | ProviderError::RateLimited)) => {
                    return Err(error);
                }
                Err(error) => {
                    tracing::warn!(sport = %sport, error = %error, "Odds request failed");
                    last_error = Some(error);
                    continue;
                }
            };

            tracing::debug!(sport = %sport, events = events.len(), "Odds received");

            if let Some(pick) = select_pick(&events, self.risk, now) {
                tracing::info!(
                    sport = %sport,
                    risk = %self.risk,
                    event = %pick.title(),
                    price = pick.price,
                    "Pick selected"
                );
                return Ok(ContentItem {
                    title: pick.title(),
                    body: pick.summary(),
                    source_url: String::new(),
                    source_name: "The Odds API".to_string(),
                    category,
                    fetched_at: now,
                });
            }
        }

        Err(last_error.unwrap_or(ProviderError::NoResults))
    }

    fn name(&self) -> &'static str {
        "the_odds_api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> OffsetDateTime {
            datetime!(2025-01-17 12:00 UTC)
        }
    }

    fn provider(server: &MockServer, sports: &[&str], risk: RiskLevel) -> TheOddsApiProvider {
        TheOddsApiProvider::with_base_url(
            SecretString::new("odds-key".into()),
            server.uri(),
            OddsApiOptions {
                sports: sports.iter().map(|s| s.to_string()).collect(),
                regions: "uk".to_string(),
                timeout_secs: 5,
            },
            risk,
        )
        .with_clock(Arc::new(FixedClock))
    }

    fn h2h(home: f64, draw: f64, away: f64) -> serde_json::Value {
        serde_json::json!({
            "key": "bookie",
            "title": "Bookie",
            "markets": [{
                "key": "h2h",
                "outcomes": [
                    {"name": "Man City", "price": home},
                    {"name": "Arsenal", "price": away},
                    {"name": "Draw", "price": draw}
                ]
            }]
        })
    }

    fn epl_events() -> serde_json::Value {
        serde_json::json!([
            {
                "id": "started",
                "sport_key": "soccer_epl",
                "sport_title": "EPL",
                "commence_time": "2025-01-17T11:00:00Z",
                "home_team": "Man City",
                "away_team": "Arsenal",
                "bookmakers": [h2h(1.40, 4.5, 7.0)]
            },
            {
                "id": "upcoming",
                "sport_key": "soccer_epl",
                "sport_title": "EPL",
                "commence_time": "2025-01-18T15:00:00Z",
                "home_team": "Man City",
                "away_team": "Arsenal",
                "bookmakers": [h2h(1.30, 5.0, 9.0), h2h(1.50, 4.6, 8.0)]
            }
        ])
    }

    #[tokio::test]
    async fn test_fetch_averages_bookmakers_and_picks_in_range() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/sports/soccer_epl/odds"))
            .and(query_param("apiKey", "odds-key"))
            .and(query_param("markets", "h2h"))
            .and(query_param("oddsFormat", "decimal"))
            .and(query_param("regions", "uk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(epl_events()))
            .mount(&mock_server)
            .await;

        let item = provider(&mock_server, &["soccer_epl"], RiskLevel::Safe)
            .fetch(Category::Odds)
            .await
            .unwrap();

        assert_eq!(item.title, "Man City vs Arsenal");
        assert!(item.body.contains("Pick: Home Win (Man City) @ 1.40"));
        assert!(item.body.contains("18 Jan 2025, 15:00 UTC"));
        assert_eq!(item.category, Category::Odds);
        assert_eq!(item.source_name, "The Odds API");
    }

    #[tokio::test]
    async fn test_moves_on_to_next_sport_when_first_has_nothing() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/sports/soccer_spain_la_liga/odds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v4/sports/soccer_epl/odds"))
            .respond_with(ResponseTemplate::new(200).set_body_json(epl_events()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let item = provider(
            &mock_server,
            &["soccer_spain_la_liga", "soccer_epl"],
            RiskLevel::Risky,
        )
        .fetch(Category::Odds)
        .await
        .unwrap();

        assert!(item.body.contains("Pick: Draw @ 4.80"));
    }

    #[tokio::test]
    async fn test_invalid_key_stops_immediately() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "API key is not valid"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &["soccer_epl", "soccer_italy_serie_a"], RiskLevel::Value)
            .fetch(Category::Odds)
            .await;

        assert!(matches!(result, Err(ProviderError::Auth(_))));
    }

    #[tokio::test]
    async fn test_no_events_is_no_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server, &["soccer_epl"], RiskLevel::Safe)
            .fetch(Category::Odds)
            .await;

        assert!(matches!(result, Err(ProviderError::NoResults)));
    }

    #[test]
    fn test_missing_draw_market_leaves_price_empty() {
        let event: ApiEvent = serde_json::from_value(serde_json::json!({
            "id": "x",
            "sport_title": "EPL",
            "commence_time": "2025-01-18T15:00:00Z",
            "home_team": "Man City",
            "away_team": "Arsenal",
            "bookmakers": [{
                "markets": [{
                    "key": "h2h",
                    "outcomes": [
                        {"name": "Man City", "price": 1.5},
                        {"name": "Arsenal", "price": 2.5}
                    ]
                }]
            }]
        }))
        .unwrap();

        let odds = event.into_odds_event();

        assert_eq!(odds.home_price, Some(1.5));
        assert_eq!(odds.away_price, Some(2.5));
        assert_eq!(odds.draw_price, None);
    }
}
