//! Context snippets around missing skills, escaped for HTML display

use crate::processing::skill_extractor::ExtractedSkillSet;
use crate::processing::vocabulary::SkillTerm;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

pub const DEFAULT_CONTEXT_CHARS: usize = 50;
const FALLBACK_SNIPPET_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillSnippet {
    pub skill: SkillTerm,
    /// Escaped markup, occurrences of the skill wrapped in `<mark>`
    pub snippet: String,
    /// False when the snippet is the generic document prefix
    pub matched: bool,
}

/// One snippet per missing skill, in the order of `missing_skills`.
///
/// `context_chars` counts grapheme clusters on each side of the first
/// case-insensitive occurrence. Skills that do not occur fall back to the
/// first 100 characters of the text.
pub fn highlight(text: &str, missing_skills: &ExtractedSkillSet, context_chars: usize) -> Vec<SkillSnippet> {
    let normalized = collapse_line_breaks(text);
    let graphemes: Vec<usize> = normalized.grapheme_indices(true).map(|(idx, _)| idx).collect();

    missing_skills
        .iter()
        .map(|skill| {
            let finder = substring_finder(skill.name());
            let found = finder.as_ref().and_then(|f| f.find(&normalized));

            let (raw, matched) = match found {
                Some(m) => (context_window(&normalized, &graphemes, m.start(), m.end(), context_chars), true),
                None => (prefix(&normalized, &graphemes, FALLBACK_SNIPPET_CHARS), false),
            };

            SkillSnippet {
                skill: skill.clone(),
                snippet: emphasize(raw, finder.as_ref()),
                matched,
            }
        })
        .collect()
}

/// Render snippets as `<p>` blocks for an HTML report
pub fn render_snippets_html(snippets: &[SkillSnippet]) -> String {
    snippets
        .iter()
        .map(|s| {
            format!(
                "<p><strong>{}:</strong> ...{}...</p>",
                escape_html(s.skill.name()),
                s.snippet
            )
        })
        .collect()
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn collapse_line_breaks(text: &str) -> String {
    text.replace("\r\n", " ").replace(|c: char| c == '\r' || c == '\n', " ")
}

fn substring_finder(term: &str) -> Option<Regex> {
    RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()
}

/// `graphemes` holds the byte offset of every grapheme cluster in `text`
fn context_window<'a>(text: &'a str, graphemes: &[usize], start: usize, end: usize, context: usize) -> &'a str {
    let first = graphemes.partition_point(|&idx| idx <= start).saturating_sub(1);
    let last = graphemes.partition_point(|&idx| idx < end);

    let lo = first.saturating_sub(context);
    let hi = (last + context).min(graphemes.len());

    &text[graphemes[lo]..byte_offset(text, graphemes, hi)]
}

fn prefix<'a>(text: &'a str, graphemes: &[usize], count: usize) -> &'a str {
    &text[..byte_offset(text, graphemes, count.min(graphemes.len()))]
}

fn byte_offset(text: &str, graphemes: &[usize], index: usize) -> usize {
    graphemes.get(index).copied().unwrap_or(text.len())
}

fn emphasize(raw: &str, finder: Option<&Regex>) -> String {
    let Some(finder) = finder else {
        return escape_html(raw);
    };

    let mut output = String::with_capacity(raw.len() + 16);
    let mut last = 0;
    for m in finder.find_iter(raw) {
        output.push_str(&escape_html(&raw[last..m.start()]));
        output.push_str("<mark>");
        output.push_str(&escape_html(m.as_str()));
        output.push_str("</mark>");
        last = m.end();
    }
    output.push_str(&escape_html(&raw[last..]));
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(names: &[&str]) -> ExtractedSkillSet {
        ExtractedSkillSet::from_names(names.iter().copied()).unwrap()
    }

    #[test]
    fn test_fallback_to_document_prefix() {
        let snippets = highlight("Short text", &missing(&["AWS"]), DEFAULT_CONTEXT_CHARS);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].snippet, "Short text");
        assert!(!snippets[0].matched);
    }

    #[test]
    fn test_fallback_is_truncated_and_escaped() {
        let text = format!("<b>{}", "x".repeat(200));
        let snippets = highlight(&text, &missing(&["Docker"]), DEFAULT_CONTEXT_CHARS);
        assert_eq!(snippets[0].snippet, format!("&lt;b&gt;{}", "x".repeat(97)));
    }

    #[test]
    fn test_context_window_around_first_occurrence() {
        let text = "aaaa bbbb Kubernetes cccc dddd kubernetes";
        let snippets = highlight(text, &missing(&["Kubernetes"]), 5);
        assert!(snippets[0].matched);
        assert_eq!(snippets[0].snippet, "bbbb <mark>Kubernetes</mark> cccc");
    }

    #[test]
    fn test_substring_occurrence_is_highlighted() {
        // Known-missing under word boundaries, but still located for context
        let snippets = highlight("Wrote many APIs for clients", &missing(&["API"]), 50);
        assert!(snippets[0].matched);
        assert_eq!(snippets[0].snippet, "Wrote many <mark>API</mark>s for clients");
    }

    #[test]
    fn test_line_breaks_collapsed() {
        let snippets = highlight("line one\nline two\r\nend", &missing(&["Git"]), 50);
        assert_eq!(snippets[0].snippet, "line one line two end");
    }

    #[test]
    fn test_markup_escaped_before_emphasis() {
        let snippets = highlight("<script>Azure</script>", &missing(&["Azure"]), 50);
        assert_eq!(snippets[0].snippet, "&lt;script&gt;<mark>Azure</mark>&lt;/script&gt;");
    }

    #[test]
    fn test_counts_graphemes_not_bytes() {
        let text = "ééé AWS ééé";
        let snippets = highlight(text, &missing(&["AWS"]), 2);
        assert_eq!(snippets[0].snippet, "é <mark>AWS</mark> é");
    }

    #[test]
    fn test_deterministic_and_ordered() {
        let text = "Python and Docker";
        let skills = missing(&["Docker", "Python"]);
        let first = highlight(text, &skills, 3);
        let second = highlight(text, &skills, 3);
        assert_eq!(first, second);
        assert_eq!(first[0].skill.name(), "Docker");
        assert_eq!(first[1].skill.name(), "Python");
    }

    #[test]
    fn test_render_html_block() {
        let snippets = highlight("Short text", &missing(&["AWS"]), 50);
        assert_eq!(render_snippets_html(&snippets), "<p><strong>AWS:</strong> ...Short text...</p>");
    }

    #[test]
    fn test_empty_document() {
        let snippets = highlight("", &missing(&["AWS"]), 50);
        assert_eq!(snippets[0].snippet, "");
    }
}
