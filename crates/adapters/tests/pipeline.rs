//! End-to-end pipeline runs over the real HTTP adapters against mock servers

use pagecast_adapters::content::{EvergreenNewsProvider, NewsApiProvider};
use pagecast_adapters::facebook::FacebookPublisher;
use pagecast_adapters::images::{PexelsImages, UnsplashImages};
use pagecast_adapters::records::InMemoryRunRecordStore;
use pagecast_adapters::text::{OpenAiGenerator, TextGenConfig};
use pagecast_domain::usecases::{
    ComposeConfig, ContentResolver, ImageQueryConfig, ImageResolver, Pipeline, PipelineConfig,
    TextComposer,
};
use pagecast_domain::{
    ContentProvider, ImageProvider, RunOutcome, RunRecordStore, RunStage, SystemClock,
};
use secrecy::SecretString;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn key(value: &str) -> SecretString {
    SecretString::new(value.into())
}

async fn mount_headlines(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok",
            "articles": [{
                "source": {"name": "Example Sports"},
                "title": "Arsenal sink Chelsea late on",
                "description": "A stoppage-time winner settled it. Read more at www.example.com",
                "url": "https://example.com/a"
            }]
        })))
        .mount(server)
        .await;
}

fn composer(server: &MockServer) -> TextComposer {
    TextComposer::new(
        vec![Arc::new(OpenAiGenerator::with_base_url(
            key("openai-key"),
            server.uri(),
            TextGenConfig::default(),
        ))],
        ComposeConfig::default(),
    )
}

fn images(server: &MockServer) -> ImageResolver {
    ImageResolver::new(
        vec![
            Arc::new(UnsplashImages::with_base_url(key("u"), server.uri(), 5))
                as Arc<dyn ImageProvider>,
            Arc::new(PexelsImages::with_base_url(key("p"), server.uri(), 5)),
        ],
        ImageQueryConfig {
            news_queries: vec!["football stadium".to_string()],
            odds_queries: vec![],
        },
    )
}

#[tokio::test]
async fn news_run_falls_back_to_template_and_pexels() {
    let server = MockServer::start().await;
    mount_headlines(&server).await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("overloaded"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/photos/random"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "photos": [{
                "photographer": "Ann Lee",
                "src": {"large": "https://images.pexels.com/1.jpg"}
            }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/page-1/photos"))
        .and(body_string_contains("Arsenal+sink+Chelsea"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "77",
            "post_id": "page-1_77"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(InMemoryRunRecordStore::new());
    let pipeline = Pipeline::new(
        ContentResolver::new(vec![Arc::new(NewsApiProvider::with_base_url(
            key("news-key"),
            server.uri(),
            5,
        ))]),
        composer(&server),
        images(&server),
        Arc::new(FacebookPublisher::with_base_url(
            "page-1".to_string(),
            key("page-token"),
            server.uri(),
            5,
        )),
        store.clone(),
        Arc::new(SystemClock),
        PipelineConfig::news(),
    );

    let record = pipeline.run_once().await.unwrap();

    assert_eq!(record.outcome, RunOutcome::Success);
    assert_eq!(record.post_id.as_deref(), Some("page-1_77"));
    assert_eq!(record.provider_used.as_deref(), Some("newsapi"));
    assert_eq!(record.image_url.as_deref(), Some("https://images.pexels.com/1.jpg"));
    assert_eq!(store.read_all().await.unwrap(), vec![record]);
}

#[tokio::test]
async fn rejected_publish_after_evergreen_fallback_is_recorded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/page-1/feed"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"message": "Invalid parameter", "code": 100}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let providers: Vec<Arc<dyn ContentProvider>> = vec![
        Arc::new(NewsApiProvider::with_base_url(key("news-key"), server.uri(), 5)),
        Arc::new(EvergreenNewsProvider::new()),
    ];
    let store = Arc::new(InMemoryRunRecordStore::new());
    let pipeline = Pipeline::new(
        ContentResolver::new(providers),
        TextComposer::template_only(ComposeConfig::default()),
        ImageResolver::disabled(),
        Arc::new(FacebookPublisher::with_base_url(
            "page-1".to_string(),
            key("page-token"),
            server.uri(),
            5,
        )),
        store.clone(),
        Arc::new(SystemClock),
        PipelineConfig::news(),
    );

    let record = pipeline.run_once().await.unwrap();

    assert_eq!(record.outcome, RunOutcome::Failure);
    assert_eq!(record.stage, RunStage::Publishing);
    assert_eq!(record.provider_used.as_deref(), Some("evergreen"));
    assert!(record.error.as_deref().unwrap().contains("Invalid parameter"));
    assert_eq!(store.len(), 1);
}
