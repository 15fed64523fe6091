//! Link stripping for post text
//!
//! Facebook pages run by these bots must never carry hyperlinks in the post
//! body. Everything that looks like `scheme://...` or `www....` is removed
//! and the surrounding whitespace tidied up.

use regex::Regex;
use std::sync::LazyLock;

use crate::model::PostDraft;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:[a-z][a-z0-9+.\-]*://|www\.)\S+").expect("Valid URL regex")
});

/// Remove every URL from `text`.
///
/// Runs of spaces collapse to one, lines are trimmed, consecutive blank lines
/// collapse to a single blank line and leading/trailing blank lines are
/// dropped. Applying it twice gives the same result as applying it once.
pub fn strip_urls(text: &str) -> String {
    let without_urls = URL_PATTERN.replace_all(text, " ");

    let mut lines: Vec<String> = Vec::new();
    let mut in_blank_run = false;

    for line in without_urls.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            if !lines.is_empty() && !in_blank_run {
                lines.push(String::new());
            }
            in_blank_run = true;
        } else {
            lines.push(collapsed);
            in_blank_run = false;
        }
    }

    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Whether `text` still contains anything URL-shaped
pub fn contains_url(text: &str) -> bool {
    URL_PATTERN.is_match(text)
}

/// Strip URLs from a draft's text in place
pub fn sanitize_draft(draft: &mut PostDraft) {
    draft.text = strip_urls(&draft.text);
}
