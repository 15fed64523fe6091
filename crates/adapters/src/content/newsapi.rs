//! NewsAPI.org top-headlines adapter

use async_trait::async_trait;
use pagecast_domain::sanitize::strip_urls;
use pagecast_domain::{Category, Clock, ContentItem, ContentProvider, ProviderError, SystemClock};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;

use crate::http::{build_client, check_status, transport_error};

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";

/// Terms OR-ed together into the headline query
const FOOTBALL_KEYWORDS: &[&str] = &[
    "football",
    "soccer",
    "Premier League",
    "Champions League",
    "La Liga",
];

const REMOVED_PLACEHOLDER: &str = "[Removed]";

/// Football headlines from NewsAPI
pub struct NewsApiProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
    clock: Arc<dyn Clock>,
}

impl NewsApiProvider {
    pub fn new(api_key: SecretString, timeout_secs: u64) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string(), timeout_secs)
    }

    pub fn with_base_url(api_key: SecretString, base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key,
            base_url,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Deserialize)]
struct Article {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    source: Option<ArticleSource>,
}

#[derive(Deserialize)]
struct ArticleSource {
    #[serde(default)]
    name: Option<String>,
}

/// Title and description, URL-free; `None` for removed or empty articles
fn usable_text(article: &Article) -> Option<(String, String)> {
    let title = article.title.as_deref()?;
    let description = article.description.as_deref()?;

    if title.contains(REMOVED_PLACEHOLDER) || description.contains(REMOVED_PLACEHOLDER) {
        return None;
    }

    let title = strip_urls(title);
    let description = strip_urls(description);
    if title.is_empty() || description.is_empty() {
        return None;
    }

    Some((title, description))
}

#[async_trait]
impl ContentProvider for NewsApiProvider {
    async fn fetch(&self, category: Category) -> Result<ContentItem, ProviderError> {
        if category != Category::News {
            return Err(ProviderError::Unsupported(category));
        }

        let url = format!("{}/top-headlines", self.base_url);
        let query = FOOTBALL_KEYWORDS.join(" OR ");

        let response = self
            .client
            .get(&url)
            .header("X-Api-Key", self.api_key.expose_secret())
            .query(&[
                ("category", "sports"),
                ("q", query.as_str()),
                ("language", "en"),
                ("pageSize", "10"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, self.name()).await?;

        let headlines: HeadlinesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        if headlines.status != "ok" {
            return Err(ProviderError::Api(
                headlines
                    .message
                    .unwrap_or_else(|| format!("status '{}'", headlines.status)),
            ));
        }

        tracing::debug!(count = headlines.articles.len(), "NewsAPI articles received");

        let (article, (title, body)) = headlines
            .articles
            .iter()
            .find_map(|article| usable_text(article).map(|text| (article, text)))
            .ok_or(ProviderError::NoResults)?;

        let source_name = article
            .source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .map(strip_urls)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "NewsAPI".to_string());

        Ok(ContentItem {
            title,
            body,
            source_url: article.url.clone().unwrap_or_default(),
            source_name,
            category,
            fetched_at: self.clock.now(),
        })
    }

    fn name(&self) -> &'static str {
        "newsapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> NewsApiProvider {
        NewsApiProvider::with_base_url(SecretString::new("news-key".into()), server.uri(), 5)
    }

    #[tokio::test]
    async fn test_fetch_skips_removed_and_incomplete_articles() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .and(header("X-Api-Key", "news-key"))
            .and(query_param("category", "sports"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "totalResults": 3,
                "articles": [
                    {
                        "source": {"id": null, "name": "[Removed]"},
                        "title": "[Removed]",
                        "description": "[Removed]",
                        "url": "https://removed.com"
                    },
                    {
                        "source": {"id": "bbc-sport", "name": "BBC Sport"},
                        "title": "Transfer window latest",
                        "description": null,
                        "url": "https://bbc.co.uk/sport/1"
                    },
                    {
                        "source": {"id": "espn", "name": "ESPN"},
                        "title": "Arsenal sink Chelsea late on",
                        "description": "A stoppage-time winner. More at https://espn.com/x",
                        "url": "https://espn.com/story/2"
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let item = provider(&mock_server).fetch(Category::News).await.unwrap();

        assert_eq!(item.title, "Arsenal sink Chelsea late on");
        assert_eq!(item.body, "A stoppage-time winner. More at");
        assert_eq!(item.source_name, "ESPN");
        assert_eq!(item.source_url, "https://espn.com/story/2");
        assert_eq!(item.category, Category::News);
    }

    #[tokio::test]
    async fn test_fetch_error_status_in_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "error",
                "code": "parameterInvalid",
                "message": "You've included an invalid parameter"
            })))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).fetch(Category::News).await;

        assert!(matches!(result, Err(ProviderError::Api(msg)) if msg.contains("invalid parameter")));
    }

    #[tokio::test]
    async fn test_fetch_no_usable_articles() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "ok",
                "articles": []
            })))
            .mount(&mock_server)
            .await;

        let result = provider(&mock_server).fetch(Category::News).await;

        assert!(matches!(result, Err(ProviderError::NoResults)));
    }

    #[tokio::test]
    async fn test_fetch_unauthorized_and_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/top-headlines"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = provider(&mock_server);

        assert!(matches!(
            provider.fetch(Category::News).await,
            Err(ProviderError::Auth(_))
        ));
        assert!(matches!(
            provider.fetch(Category::News).await,
            Err(ProviderError::RateLimited)
        ));
    }

    #[tokio::test]
    async fn test_odds_category_unsupported() {
        let mock_server = MockServer::start().await;

        let result = provider(&mock_server).fetch(Category::Odds).await;

        assert!(matches!(
            result,
            Err(ProviderError::Unsupported(Category::Odds))
        ));
    }
}
