//! Unsplash random photo adapter

use async_trait::async_trait;
use pagecast_domain::{ImageHit, ImageProvider, ProviderError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::http::{build_client, check_status, transport_error};

pub struct UnsplashImages {
    client: Client,
    access_key: SecretString,
    base_url: String,
}

impl UnsplashImages {
    pub fn new(access_key: SecretString, timeout_secs: u64) -> Self {
        Self::with_base_url(
            access_key,
            "https://api.unsplash.com".to_string(),
            timeout_secs,
        )
    }

    pub fn with_base_url(access_key: SecretString, base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            access_key,
            base_url,
        }
    }
}

#[derive(Deserialize)]
struct RandomPhoto {
    urls: PhotoUrls,
    #[serde(default)]
    user: Option<Photographer>,
}

#[derive(Deserialize)]
struct PhotoUrls {
    regular: String,
}

#[derive(Deserialize)]
struct Photographer {
    name: String,
    #[serde(default)]
    username: Option<String>,
}

#[async_trait]
impl ImageProvider for UnsplashImages {
    async fn search(&self, query: &str) -> Result<ImageHit, ProviderError> {
        let url = format!("{}/photos/random", self.base_url);

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Client-ID {}", self.access_key.expose_secret()),
            )
            .header("Accept-Version", "v1")
            .query(&[
                ("query", query),
                ("orientation", "landscape"),
                ("content_filter", "high"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == 404 {
            return Err(ProviderError::NoResults);
        }

        let response = check_status(response, self.name()).await?;

        let photo: RandomPhoto = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let credit = photo.user.map(|user| match user.username {
            Some(username) => format!("{} (@{}) via Unsplash", user.name, username),
            None => format!("{} via Unsplash", user.name),
        });

        Ok(ImageHit {
            url: photo.urls.regular,
            credit,
        })
    }

    fn name(&self) -> &'static str {
        "unsplash"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn images(server: &MockServer) -> UnsplashImages {
        UnsplashImages::with_base_url(SecretString::new("unsplash-key".into()), server.uri(), 5)
    }

    #[tokio::test]
    async fn test_search_returns_regular_url_and_credit() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .and(header("Authorization", "Client-ID unsplash-key"))
            .and(query_param("query", "football stadium"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "abc",
                "urls": {
                    "raw": "https://images.unsplash.com/photo-1?raw",
                    "regular": "https://images.unsplash.com/photo-1?w=1080"
                },
                "user": {"name": "Jane Doe", "username": "janed"}
            })))
            .mount(&mock_server)
            .await;

        let hit = images(&mock_server).search("football stadium").await.unwrap();

        assert_eq!(hit.url, "https://images.unsplash.com/photo-1?w=1080");
        assert_eq!(hit.credit.as_deref(), Some("Jane Doe (@janed) via Unsplash"));
    }

    #[tokio::test]
    async fn test_search_no_match() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/photos/random"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "errors": ["No photos found."]
            })))
            .mount(&mock_server)
            .await;

        let result = images(&mock_server).search("zzzz").await;

        assert!(matches!(result, Err(ProviderError::NoResults)));
    }

    #[tokio::test]
    async fn test_search_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let result = images(&mock_server).search("football").await;

        assert!(matches!(result, Err(ProviderError::RateLimited)));
    }
}
