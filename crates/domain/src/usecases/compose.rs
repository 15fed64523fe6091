//! Text composition - turns a content item into post text

use std::sync::Arc;

use crate::{
    model::{Category, ContentItem, PostDraft, RiskLevel},
    ports::TextGenerator,
};

/// Facebook's message length limit
pub const FACEBOOK_MAX_CHARS: usize = 63_206;

/// Configuration for the composer
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Hard limit on the final text, in characters
    pub max_chars: usize,
    /// Whether to append category hashtags
    pub include_hashtags: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            max_chars: FACEBOOK_MAX_CHARS,
            include_hashtags: true,
        }
    }
}

/// Composed post plus which generator wrote it (`None` = template)
#[derive(Debug, Clone)]
pub struct Composition {
    pub draft: PostDraft,
    pub generated_by: Option<&'static str>,
}

/// Composer that asks generators in order and falls back to a template.
///
/// Composition never fails: any generator error degrades to the template.
#[derive(Clone)]
pub struct TextComposer {
    generators: Vec<Arc<dyn TextGenerator>>,
    config: ComposeConfig,
}

impl TextComposer {
    pub fn new(generators: Vec<Arc<dyn TextGenerator>>, config: ComposeConfig) -> Self {
        Self { generators, config }
    }

    /// Template-only composer
    pub fn template_only(config: ComposeConfig) -> Self {
        Self::new(vec![], config)
    }

    pub fn generator_names(&self) -> Vec<&'static str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    pub async fn compose(&self, item: &ContentItem, risk: Option<RiskLevel>) -> Composition {
        let prompt = build_prompt(item, risk);

        let mut generated = None;
        for generator in &self.generators {
            match generator.generate(&prompt).await {
                Ok(text) => {
                    let text = clean_generated(&text);
                    if text.is_empty() {
                        tracing::warn!(generator = generator.name(), "Generator returned empty text");
                        continue;
                    }
                    tracing::info!(generator = generator.name(), "Post text generated");
                    generated = Some((text, generator.name()));
                    break;
                }
                Err(error) => {
                    tracing::warn!(
                        generator = generator.name(),
                        error = %error,
                        "Text generation failed, trying next"
                    );
                }
            }
        }

        let (body, generated_by) = match generated {
            Some((text, name)) => (text, Some(name)),
            None => {
                tracing::info!(title = %item.title, "Using template post text");
                (template_text(item, risk), None)
            }
        };

        let mut text = body;
        if self.config.include_hashtags {
            let tags: Vec<String> = hashtags_for(item, risk)
                .into_iter()
                .filter(|tag| !text.contains(tag.as_str()))
                .collect();
            if !tags.is_empty() {
                text = format!("{}\n\n{}", text, tags.join(" "));
            }
        }

        Composition {
            draft: PostDraft {
                text: truncate_chars(&text, self.config.max_chars),
                image_url: None,
                risk_level: risk,
            },
            generated_by,
        }
    }
}

/// Build the rewrite prompt for generative APIs
pub fn build_prompt(item: &ContentItem, risk: Option<RiskLevel>) -> String {
    let mut prompt = String::new();

    match item.category {
        Category::News => {
            prompt.push_str(
                "You are the social media manager of a popular football fan page. \
                 Rewrite the following news into an exciting, engaging Facebook post.\n\n",
            );
            prompt.push_str(&format!("NEWS HEADLINE: {}\n", item.title));
            prompt.push_str(&format!("NEWS SUMMARY: {}\n\n", item.body));
        }
        Category::Odds => {
            prompt.push_str(
                "You are the social media manager of a football tips page. \
                 Turn the following betting pick into a short, confident Facebook post.\n\n",
            );
            if let Some(risk) = risk {
                prompt.push_str(&format!("TIP TYPE: {}\n", risk.label()));
            }
            prompt.push_str(&format!("MATCH: {}\n", item.title));
            prompt.push_str(&format!("DETAILS:\n{}\n\n", item.body));
        }
    }

    prompt.push_str(
        "RULES:\n\
         - Use an enthusiastic, fan-friendly tone with 2-4 relevant emojis\n\
         - Keep it under 280 characters\n\
         - Do NOT include any URLs, links or website references\n\
         - Do NOT invent facts; only use the information above\n\
         - End with a call to action inviting comments\n\n\
         Write ONLY the Facebook post text, nothing else:",
    );

    prompt
}

/// Deterministic fallback text
pub fn template_text(item: &ContentItem, risk: Option<RiskLevel>) -> String {
    match item.category {
        Category::News => format!(
            "⚽ {}\n\n{}\n\nWhat do you think? 👇",
            truncate_chars(&item.title, 100),
            truncate_chars(&item.body, 300)
        ),
        Category::Odds => {
            let banner = risk
                .map(|r| format!("{emoji} {} {emoji}\n\n", r.label(), emoji = r.emoji()))
                .unwrap_or_default();
            format!(
                "{}⚽ {}\n\n{}\n\nDrop your prediction below! 👇",
                banner, item.title, item.body
            )
        }
    }
}

fn hashtags_for(item: &ContentItem, risk: Option<RiskLevel>) -> Vec<String> {
    let mut tags: Vec<&str> = Vec::new();

    match item.category {
        Category::News => {
            tags.extend(["#Football", "#Soccer", "#FootballNews"]);
            let haystack = format!("{} {}", item.title, item.body).to_lowercase();
            for (keyword, tag) in NEWS_KEYWORD_TAGS {
                if haystack.contains(keyword) && !tags.contains(tag) {
                    tags.push(tag);
                }
            }
        }
        Category::Odds => {
            if let Some(risk) = risk {
                tags.extend(risk.hashtags());
            }
            tags.extend(["#Football", "#SportsBetting", "#Predictions"]);
        }
    }

    tags.truncate(8);
    tags.into_iter().map(String::from).collect()
}

const NEWS_KEYWORD_TAGS: &[(&str, &str)] = &[
    ("premier league", "#PremierLeague"),
    ("champions league", "#ChampionsLeague"),
    ("la liga", "#LaLiga"),
    ("bundesliga", "#Bundesliga"),
    ("serie a", "#SerieA"),
    ("world cup", "#WorldCup"),
    ("transfer", "#TransferNews"),
    ("liverpool", "#LFC"),
    ("arsenal", "#AFC"),
    ("chelsea", "#CFC"),
    ("real madrid", "#RealMadrid"),
    ("barcelona", "#Barca"),
];

/// Trim whitespace and wrapping quotes that chat models like to add
fn clean_generated(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(trimmed);
    unquoted.trim().to_string()
}

/// Truncate to at most `max` characters, marking the cut with "..."
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }

    let kept: String = text.chars().take(max - 3).collect();
    format!("{}...", kept.trim_end())
}
