//! Ordered fallback chains over content and image providers

use std::sync::Arc;
use thiserror::Error;

use crate::{
    model::{Category, ContentItem, ImageHit},
    ports::{ContentProvider, ImageProvider},
};

/// Every content provider failed (or none was configured)
#[derive(Debug, Error)]
#[error("No {category} content available after trying {attempted} provider(s)")]
pub struct NoContentAvailable {
    pub category: Category,
    pub attempted: usize,
}

/// Content plus the provider that produced it
#[derive(Debug, Clone)]
pub struct ResolvedContent {
    pub item: ContentItem,
    pub provider: &'static str,
}

/// Tries content providers in declaration order, returning the first success.
///
/// Order encodes preference (paid primary before free fallback), so providers
/// are never raced and a failed provider is skipped, not retried.
#[derive(Clone)]
pub struct ContentResolver {
    providers: Vec<Arc<dyn ContentProvider>>,
}

impl ContentResolver {
    pub fn new(providers: Vec<Arc<dyn ContentProvider>>) -> Self {
        Self { providers }
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub async fn resolve(&self, category: Category) -> Result<ResolvedContent, NoContentAvailable> {
        for provider in &self.providers {
            match provider.fetch(category).await {
                Ok(item) => {
                    tracing::info!(
                        provider = provider.name(),
                        category = %category,
                        title = %item.title,
                        "Content fetched"
                    );
                    return Ok(ResolvedContent {
                        item,
                        provider: provider.name(),
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        provider = provider.name(),
                        category = %category,
                        error = %error,
                        "Content provider failed, trying next"
                    );
                }
            }
        }

        Err(NoContentAvailable {
            category,
            attempted: self.providers.len(),
        })
    }
}

/// Search terms per category; rotated by day so consecutive posts differ
#[derive(Debug, Clone, Default)]
pub struct ImageQueryConfig {
    pub news_queries: Vec<String>,
    pub odds_queries: Vec<String>,
}

/// Image plus the provider that found it
#[derive(Debug, Clone)]
pub struct ResolvedImage {
    pub hit: ImageHit,
    pub provider: &'static str,
}

/// Same ordered fallback as [`ContentResolver`], for photo search.
///
/// Exhausting the chain is not an error; the post simply goes out without
/// an image.
#[derive(Clone)]
pub struct ImageResolver {
    providers: Vec<Arc<dyn ImageProvider>>,
    config: ImageQueryConfig,
}

impl ImageResolver {
    pub fn new(providers: Vec<Arc<dyn ImageProvider>>, config: ImageQueryConfig) -> Self {
        Self { providers, config }
    }

    /// A resolver that never finds anything
    pub fn disabled() -> Self {
        Self::new(vec![], ImageQueryConfig::default())
    }

    pub fn is_enabled(&self) -> bool {
        !self.providers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Pick the search query for an item; falls back to the item's title
    pub fn query_for(&self, item: &ContentItem) -> String {
        let queries = match item.category {
            Category::News => &self.config.news_queries,
            Category::Odds => &self.config.odds_queries,
        };

        if queries.is_empty() {
            return item.title.clone();
        }

        let index = usize::from(item.fetched_at.ordinal()) % queries.len();
        queries[index].clone()
    }

    pub async fn resolve(&self, item: &ContentItem) -> Option<ResolvedImage> {
        if self.providers.is_empty() {
            return None;
        }

        let query = self.query_for(item);

        for provider in &self.providers {
            match provider.search(&query).await {
                Ok(hit) => {
                    tracing::info!(
                        provider = provider.name(),
                        query = %query,
                        url = %hit.url,
                        "Image found"
                    );
                    return Some(ResolvedImage {
                        hit,
                        provider: provider.name(),
                    });
                }
                Err(error) => {
                    tracing::warn!(
                        provider = provider.name(),
                        query = %query,
                        error = %error,
                        "Image provider failed, trying next"
                    );
                }
            }
        }

        tracing::info!(query = %query, "No image found, posting without one");
        None
    }
}
