//! Port definitions (traits) for external dependencies
//!
//! These traits define the boundaries between the domain and external systems.
//! Adapters implement these traits to connect to real infrastructure.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::model::{Category, ContentItem, ImageHit, PostDraft, RunRecord};

/// Failure of a single content or image provider.
///
/// Resolvers turn this into "try the next provider"; it never escapes them.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("No results")]
    NoResults,
    #[error("Category {0} not supported")]
    Unsupported(Category),
}

/// Port for fetching content from one external API
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch one item of the requested category
    async fn fetch(&self, category: Category) -> Result<ContentItem, ProviderError>;

    /// Stable provider name, written to run records
    fn name(&self) -> &'static str;
}

/// Port for searching stock photos
#[async_trait]
pub trait ImageProvider: Send + Sync {
    /// Find an image for the given search query
    async fn search(&self, query: &str) -> Result<ImageHit, ProviderError>;

    fn name(&self) -> &'static str;
}

/// Error type for text generation
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("API error: {0}")]
    Api(String),
    #[error("Invalid response format: {0}")]
    InvalidFormat(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Timeout")]
    Timeout,
    #[error("Model unavailable: {0}")]
    Unavailable(String),
}

/// Port for generative text APIs
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete the prompt, returning the generated text
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;

    fn name(&self) -> &'static str;
}

/// Error type for publisher operations
#[derive(Debug, Error)]
pub enum PublishError {
    /// The platform answered with a non-2xx status
    #[error("Publish rejected with HTTP {status}: {message}")]
    Rejected {
        status: u16,
        /// Graph API error code, when the body carried one
        code: Option<i64>,
        message: String,
        body: String,
    },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl PublishError {
    /// HTTP status of the failed request, if a response arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result of a successful publish operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishResult {
    /// Platform-assigned post ID
    pub post_id: String,
}

/// Port for publishing a finished draft
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, draft: &PostDraft) -> Result<PublishResult, PublishError>;

    /// Get the platform name (e.g., "facebook")
    fn platform(&self) -> &'static str;
}

/// Error type for run record storage
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Corrupt record at line {line}: {message}")]
    Corrupt { line: usize, message: String },
}

/// Port for the append-only run log
#[async_trait]
pub trait RunRecordStore: Send + Sync {
    /// Append one record
    async fn record(&self, record: &RunRecord) -> Result<(), RecordError>;

    /// All records in insertion order
    async fn read_all(&self) -> Result<Vec<RunRecord>, RecordError>;
}

/// Port for time/clock operations (enables deterministic testing)
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> OffsetDateTime;
}

/// Real clock implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
