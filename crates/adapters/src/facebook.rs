//! Facebook Graph API publisher for Page posts

use async_trait::async_trait;
use pagecast_domain::{PostDraft, PublishError, PublishResult, Publisher};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::http::build_client;

pub const DEFAULT_GRAPH_URL: &str = "https://graph.facebook.com/v19.0";

/// Publishes drafts to one Facebook Page.
///
/// Drafts with an image go to `/{page}/photos` (the Graph API fetches the
/// image from its URL); text-only drafts go to `/{page}/feed`.
pub struct FacebookPublisher {
    client: Client,
    page_id: String,
    access_token: SecretString,
    base_url: String,
}

impl FacebookPublisher {
    pub fn new(page_id: String, access_token: SecretString, timeout_secs: u64) -> Self {
        Self::with_base_url(
            page_id,
            access_token,
            DEFAULT_GRAPH_URL.to_string(),
            timeout_secs,
        )
    }

    pub fn with_base_url(
        page_id: String,
        access_token: SecretString,
        base_url: String,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: build_client(timeout_secs),
            page_id,
            access_token,
            base_url,
        }
    }

    /// Check the token can read the page; returns the page name
    pub async fn verify_page(&self) -> Result<String, PublishError> {
        let url = format!("{}/{}", self.base_url, self.page_id);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("fields", "id,name"),
                ("access_token", self.access_token.expose_secret()),
            ])
            .send()
            .await
            .map_err(|e| PublishError::Network(e.without_url().to_string()))?;

        let response = reject_unless_success(response).await?;

        let page: PageInfo = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        Ok(page.name.unwrap_or(page.id))
    }
}

#[derive(Deserialize)]
struct PageInfo {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct PostResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    post_id: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: GraphError,
}

#[derive(Deserialize)]
struct GraphError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<i64>,
}

/// Operator hint for well-known Graph API error codes
pub fn graph_error_hint(code: i64) -> Option<&'static str> {
    match code {
        190 => Some("Access token expired or invalid; generate a new Page access token"),
        10 | 200 => Some("Permission denied; the token needs pages_manage_posts"),
        100 => Some("Invalid parameter in the request"),
        4 | 17 | 32 => Some("Rate limit reached; try again later"),
        _ => None,
    }
}

async fn reject_unless_success(response: Response) -> Result<Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let parsed = serde_json::from_str::<ErrorEnvelope>(&body).ok();

    let code = parsed.as_ref().and_then(|e| e.error.code);
    let message = parsed
        .and_then(|e| e.error.message)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    if let Some(hint) = code.and_then(graph_error_hint) {
        tracing::warn!(status = status.as_u16(), code = ?code, hint, "Graph API rejected request");
    }

    Err(PublishError::Rejected {
        status: status.as_u16(),
        code,
        message,
        body,
    })
}

#[async_trait]
impl Publisher for FacebookPublisher {
    async fn publish(&self, draft: &PostDraft) -> Result<PublishResult, PublishError> {
        let token = self.access_token.expose_secret();

        let request = match &draft.image_url {
            Some(image_url) => self
                .client
                .post(format!("{}/{}/photos", self.base_url, self.page_id))
                .form(&[
                    ("url", image_url.as_str()),
                    ("message", draft.text.as_str()),
                    ("access_token", token),
                ]),
            None => self
                .client
                .post(format!("{}/{}/feed", self.base_url, self.page_id))
                .form(&[("message", draft.text.as_str()), ("access_token", token)]),
        };

        tracing::debug!(
            page_id = %self.page_id,
            with_image = draft.image_url.is_some(),
            chars = draft.text.chars().count(),
            "Publishing to Facebook"
        );

        let response = request
            .send()
            .await
            .map_err(|e| PublishError::Network(e.without_url().to_string()))?;

        let response = reject_unless_success(response).await?;

        let created: PostResponse = response
            .json()
            .await
            .map_err(|e| PublishError::InvalidResponse(e.to_string()))?;

        // photos answer with both; post_id is the feed story
        created
            .post_id
            .or(created.id)
            .map(|post_id| PublishResult { post_id })
            .ok_or_else(|| PublishError::InvalidResponse("Response carried no post id".to_string()))
    }

    fn platform(&self) -> &'static str {
        "facebook"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn publisher(server: &MockServer) -> FacebookPublisher {
        FacebookPublisher::with_base_url(
            "1234".to_string(),
            SecretString::new("page-token".into()),
            server.uri(),
            5,
        )
    }

    fn draft(image_url: Option<&str>) -> PostDraft {
        PostDraft {
            text: "⚽ Big derby tonight!".to_string(),
            image_url: image_url.map(String::from),
            risk_level: None,
        }
    }

    #[tokio::test]
    async fn test_publish_photo_uses_post_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1234/photos"))
            .and(body_string_contains("access_token=page-token"))
            .and(body_string_contains(
                "url=https%3A%2F%2Fimg.example.com%2Fa.jpg",
            ))
            .and(body_string_contains("message="))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "9999",
                "post_id": "1234_5678"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = publisher(&mock_server)
            .publish(&draft(Some("https://img.example.com/a.jpg")))
            .await
            .unwrap();

        assert_eq!(result.post_id, "1234_5678");
    }

    #[tokio::test]
    async fn test_publish_text_goes_to_feed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1234/feed"))
            .and(body_string_contains("access_token=page-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "1234_42"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let result = publisher(&mock_server).publish(&draft(None)).await.unwrap();

        assert_eq!(result.post_id, "1234_42");
    }

    #[tokio::test]
    async fn test_publish_invalid_parameter() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1234/feed"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "Invalid parameter"}
            })))
            .mount(&mock_server)
            .await;

        let error = publisher(&mock_server)
            .publish(&draft(None))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(400));
        match error {
            PublishError::Rejected { message, code, .. } => {
                assert_eq!(message, "Invalid parameter");
                assert_eq!(code, None);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_expired_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1234/photos"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {
                    "message": "Error validating access token: Session has expired",
                    "type": "OAuthException",
                    "code": 190,
                    "error_subcode": 463
                }
            })))
            .mount(&mock_server)
            .await;

        let error = publisher(&mock_server)
            .publish(&draft(Some("https://img.example.com/a.jpg")))
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            PublishError::Rejected { code: Some(190), .. }
        ));
        assert!(graph_error_hint(190).is_some());
    }

    #[tokio::test]
    async fn test_publish_non_json_error_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let error = publisher(&mock_server)
            .publish(&draft(None))
            .await
            .unwrap_err();

        match error {
            PublishError::Rejected {
                status,
                message,
                body,
                ..
            } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
                assert_eq!(body, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_missing_id_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&mock_server)
            .await;

        let error = publisher(&mock_server)
            .publish(&draft(None))
            .await
            .unwrap_err();

        assert!(matches!(error, PublishError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_verify_page_returns_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1234"))
            .and(query_param("access_token", "page-token"))
            .and(query_param("fields", "id,name"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "1234",
                "name": "Football Daily"
            })))
            .mount(&mock_server)
            .await;

        let name = publisher(&mock_server).verify_page().await.unwrap();

        assert_eq!(name, "Football Daily");
    }
}
