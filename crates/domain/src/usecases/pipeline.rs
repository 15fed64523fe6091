//! Run-once pipeline - fetch, compose, illustrate, sanitize, publish, record

use std::sync::Arc;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    model::{Category, ContentItem, PostDraft, RiskLevel, RunOutcome, RunRecord, RunStage},
    ports::{Clock, PublishError, Publisher, RecordError, RunRecordStore},
    sanitize::{contains_url, sanitize_draft},
    usecases::{
        compose::{TextComposer, truncate_chars},
        resolve::{ContentResolver, ImageResolver, NoContentAvailable, ResolvedImage},
    },
};

/// Configuration for one bot variant
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Bot name written to run records
    pub bot: String,
    pub category: Category,
    /// Risk level for tips posts
    pub risk_level: Option<RiskLevel>,
    /// Dry run mode (compose everything, don't publish)
    pub dry_run: bool,
    /// Hard limit on the final caption, in characters
    pub max_chars: usize,
}

impl PipelineConfig {
    pub fn news() -> Self {
        Self {
            bot: "news".to_string(),
            category: Category::News,
            risk_level: None,
            dry_run: false,
            max_chars: crate::usecases::compose::FACEBOOK_MAX_CHARS,
        }
    }

    pub fn tips(risk: RiskLevel) -> Self {
        Self {
            bot: "tips".to_string(),
            category: Category::Odds,
            risk_level: Some(risk),
            ..Self::news()
        }
    }
}

/// Reasons a run ends with a failure record
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    NoContentAvailable(#[from] NoContentAvailable),
    #[error("Draft still contains a URL after sanitizing")]
    UnsafeDraft,
    #[error("Publish failed: {0}")]
    Publish(#[from] PublishError),
}

/// Errors that prevent a run from being recorded at all
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Failed to write run record: {0}")]
    Record(#[from] RecordError),
}

/// What the run learned before it finished or failed
#[derive(Debug)]
struct Progress {
    stage: RunStage,
    provider_used: Option<&'static str>,
    title: Option<String>,
    image_url: Option<String>,
    post_id: Option<String>,
}

impl Progress {
    fn new() -> Self {
        Self {
            stage: RunStage::Fetching,
            provider_used: None,
            title: None,
            image_url: None,
            post_id: None,
        }
    }
}

/// One bot invocation, end to end.
///
/// Every call to [`Pipeline::run_once`] writes exactly one [`RunRecord`],
/// whatever stage the run stops at.
#[derive(Clone)]
pub struct Pipeline {
    content: ContentResolver,
    composer: TextComposer,
    images: ImageResolver,
    publisher: Arc<dyn Publisher>,
    records: Arc<dyn RunRecordStore>,
    clock: Arc<dyn Clock>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(
        content: ContentResolver,
        composer: TextComposer,
        images: ImageResolver,
        publisher: Arc<dyn Publisher>,
        records: Arc<dyn RunRecordStore>,
        clock: Arc<dyn Clock>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            content,
            composer,
            images,
            publisher,
            records,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline once and persist its record.
    ///
    /// Failures inside the pipeline become a failure record and still return
    /// `Ok`; only a failed record write is an error.
    pub async fn run_once(&self) -> Result<RunRecord, RunError> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", bot = %self.config.bot, run_id = %run_id);
        self.run_recorded(run_id).instrument(span).await
    }

    async fn run_recorded(&self, run_id: Uuid) -> Result<RunRecord, RunError> {
        let mut progress = Progress::new();
        let result = self.execute(&mut progress).await;

        let (outcome, stage, error) = match result {
            Ok(()) => (RunOutcome::Success, RunStage::Done, None),
            Err(error) => {
                tracing::error!(stage = %progress.stage, error = %error, "Run failed");
                (RunOutcome::Failure, progress.stage, Some(error.to_string()))
            }
        };

        let record = RunRecord {
            id: run_id,
            timestamp: self.clock.now(),
            bot: self.config.bot.clone(),
            provider_used: progress.provider_used.map(String::from),
            outcome,
            post_id: progress.post_id,
            stage,
            title: progress.title,
            risk_level: self.config.risk_level,
            image_url: progress.image_url,
            dry_run: self.config.dry_run,
            error,
        };

        self.records.record(&record).await?;

        tracing::info!(
            outcome = ?record.outcome,
            stage = %record.stage,
            post_id = ?record.post_id,
            "Run recorded"
        );

        Ok(record)
    }

    async fn execute(&self, progress: &mut Progress) -> Result<(), PipelineError> {
        progress.stage = RunStage::Fetching;
        let resolved = self.content.resolve(self.config.category).await?;
        progress.provider_used = Some(resolved.provider);
        progress.title = Some(resolved.item.title.clone());

        progress.stage = RunStage::Composing;
        let composition = self
            .composer
            .compose(&resolved.item, self.config.risk_level)
            .await;
        let mut draft = composition.draft;
        tracing::debug!(generated_by = ?composition.generated_by, "Post text composed");

        progress.stage = RunStage::ImageResolving;
        let image = self.images.resolve(&resolved.item).await;
        attach_image(&mut draft, image.as_ref(), &resolved.item, self.config.max_chars);
        progress.image_url = draft.image_url.clone();

        progress.stage = RunStage::Sanitizing;
        sanitize_draft(&mut draft);
        if contains_url(&draft.text) {
            return Err(PipelineError::UnsafeDraft);
        }

        progress.stage = RunStage::Publishing;
        if self.config.dry_run {
            tracing::info!(
                image_url = ?draft.image_url,
                text = %draft.text,
                "Dry run, not publishing"
            );
            return Ok(());
        }

        let published = self.publisher.publish(&draft).await?;
        tracing::info!(
            platform = self.publisher.platform(),
            post_id = %published.post_id,
            "Post published"
        );
        progress.post_id = Some(published.post_id);

        Ok(())
    }
}

/// Set the image and append the photo credit and source lines to the caption
fn attach_image(
    draft: &mut PostDraft,
    image: Option<&ResolvedImage>,
    item: &ContentItem,
    max_chars: usize,
) {
    let mut footer = Vec::new();

    if let Some(image) = image {
        draft.image_url = Some(image.hit.url.clone());
        if let Some(credit) = image.hit.credit.as_deref().filter(|c| !c.trim().is_empty()) {
            footer.push(format!("📷: {}", credit.trim()));
        }
    }
    if !item.source_name.trim().is_empty() {
        footer.push(format!("📰: {}", item.source_name.trim()));
    }

    // Credit goes first, then the source line, until the footer fits
    while !footer.is_empty() && footer.join("\n").chars().count() + 2 > max_chars {
        footer.remove(0);
    }

    if footer.is_empty() {
        draft.text = truncate_chars(&draft.text, max_chars);
        return;
    }

    let footer = footer.join("\n");
    let room = max_chars.saturating_sub(footer.chars().count() + 2);
    draft.text = format!("{}\n\n{}", truncate_chars(&draft.text, room), footer);
}
