//! Reduce chatty markdown in completions to plain report text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

const FENCE: &str = "```";

static FENCED_BLOCK: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").ok());

/// Ordered rewrite rules applied after fences are unwrapped.
static RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        // inline code
        (r"`([^`]+)`", "${1}"),
        // images collapse to alt text, links to their text
        (r"!\[([^\]]*)\]\([^)]+\)", "${1}"),
        (r"\[([^\]]+)\]\(([^)]+)\)", "${1}"),
        (r"\*\*(.*?)\*\*", "${1}"),
        (r"__(.*?)__", "${1}"),
        (r"\*(.*?)\*", "${1}"),
        (r"_(.*?)_", "${1}"),
        (r"(?m)^\s{0,3}#{1,6}\s+", ""),
        (r"(?m)^\s{0,3}>\s?", ""),
        (r"(?m)^\s*[*+-]\s+", "• "),
        (r"(?m)^\s*\d+\.\s+", "• "),
        (r"(?m)^•\s{2,}", "• "),
        (r"[ \t]+\n", "\n"),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
    .collect()
});

/// Strip fences, emphasis, headings, quotes and link syntax; normalize list
/// markers to `"• "`.
pub fn strip_markdown(input: &str) -> String {
    let mut text = match FENCED_BLOCK.as_ref() {
        Some(re) => re
            .replace_all(input, |caps: &Captures<'_>| caps[0].replace(FENCE, ""))
            .into_owned(),
        None => input.to_string(),
    };
    for (re, replacement) in RULES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }
    text.trim().to_string()
}
