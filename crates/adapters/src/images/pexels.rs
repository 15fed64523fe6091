//! Pexels photo search adapter

use async_trait::async_trait;
use pagecast_domain::{ImageHit, ImageProvider, ProviderError};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::http::{build_client, check_status, transport_error};

pub struct PexelsImages {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl PexelsImages {
    pub fn new(api_key: SecretString, timeout_secs: u64) -> Self {
        Self::with_base_url(api_key, "https://api.pexels.com/v1".to_string(), timeout_secs)
    }

    pub fn with_base_url(api_key: SecretString, base_url: String, timeout_secs: u64) -> Self {
        Self {
            client: build_client(timeout_secs),
            api_key,
            base_url,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Deserialize)]
struct Photo {
    src: PhotoSources,
    #[serde(default)]
    photographer: Option<String>,
}

#[derive(Deserialize)]
struct PhotoSources {
    large: String,
}

#[async_trait]
impl ImageProvider for PexelsImages {
    async fn search(&self, query: &str) -> Result<ImageHit, ProviderError> {
        let url = format!("{}/search", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("Authorization", self.api_key.expose_secret())
            .query(&[
                ("query", query),
                ("per_page", "15"),
                ("orientation", "landscape"),
                ("size", "large"),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let response = check_status(response, self.name()).await?;

        let results: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let photo = results
            .photos
            .into_iter()
            .next()
            .ok_or(ProviderError::NoResults)?;

        Ok(ImageHit {
            url: photo.src.large,
            credit: photo
                .photographer
                .filter(|name| !name.trim().is_empty())
                .map(|name| format!("{} via Pexels", name)),
        })
    }

    fn name(&self) -> &'static str {
        "pexels"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn images(server: &MockServer) -> PexelsImages {
        PexelsImages::with_base_url(SecretString::new("pexels-key".into()), server.uri(), 5)
    }

    #[tokio::test]
    async fn test_search_takes_first_photo() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(header("Authorization", "pexels-key"))
            .and(query_param("query", "soccer ball"))
            .and(query_param("orientation", "landscape"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_results": 2,
                "photos": [
                    {
                        "id": 1,
                        "photographer": "Ann Lee",
                        "src": {"large": "https://images.pexels.com/1-large.jpg"}
                    },
                    {
                        "id": 2,
                        "photographer": "Bo Kim",
                        "src": {"large": "https://images.pexels.com/2-large.jpg"}
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let hit = images(&mock_server).search("soccer ball").await.unwrap();

        assert_eq!(hit.url, "https://images.pexels.com/1-large.jpg");
        assert_eq!(hit.credit.as_deref(), Some("Ann Lee via Pexels"));
    }

    #[tokio::test]
    async fn test_search_empty_results() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total_results": 0,
                "photos": []
            })))
            .mount(&mock_server)
            .await;

        let result = images(&mock_server).search("nothing").await;

        assert!(matches!(result, Err(ProviderError::NoResults)));
    }

    #[tokio::test]
    async fn test_search_bad_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let result = images(&mock_server).search("football").await;

        assert!(matches!(result, Err(ProviderError::Auth(_))));
    }
}
