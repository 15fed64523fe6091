//! Offline last-resort news content keyed on the day of the week

use async_trait::async_trait;
use pagecast_domain::{Category, Clock, ContentItem, ContentProvider, ProviderError, SystemClock};
use std::sync::Arc;
use time::Weekday;

/// Always-available talking point for the news bot
pub struct EvergreenNewsProvider {
    clock: Arc<dyn Clock>,
}

impl EvergreenNewsProvider {
    pub fn new() -> Self {
        Self {
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl Default for EvergreenNewsProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn talking_point(day: Weekday) -> (&'static str, &'static str) {
    match day {
        Weekday::Monday => (
            "Football Week Kicks Off!",
            "A new week of football begins! What matches are you looking forward to?",
        ),
        Weekday::Tuesday => (
            "Champions League Action Continues",
            "Champions League nights are always special. Who's your pick to win?",
        ),
        Weekday::Wednesday => (
            "Midweek Football Fever",
            "Midweek football is the best! So many great matches happening.",
        ),
        Weekday::Thursday => (
            "Europa League Excitement",
            "Europa League action tonight! Which team will shine?",
        ),
        Weekday::Friday => (
            "Weekend Football Preview",
            "The weekend is almost here! Time to preview all the big matches.",
        ),
        Weekday::Saturday => (
            "It's Matchday!",
            "Matchday vibes! Nothing beats live football action.",
        ),
        Weekday::Sunday => (
            "Super Sunday Football",
            "Super Sunday football! The perfect way to end the weekend.",
        ),
    }
}

#[async_trait]
impl ContentProvider for EvergreenNewsProvider {
    async fn fetch(&self, category: Category) -> Result<ContentItem, ProviderError> {
        if category != Category::News {
            return Err(ProviderError::Unsupported(category));
        }

        let now = self.clock.now();
        let (title, body) = talking_point(now.weekday());

        Ok(ContentItem {
            title: title.to_string(),
            body: body.to_string(),
            source_url: String::new(),
            source_name: String::new(),
            category,
            fetched_at: now,
        })
    }

    fn name(&self) -> &'static str {
        "evergreen"
    }
}
