use std::sync::LazyLock;

use ego_tree::NodeId;
use engine_logging::{engine_debug, engine_info, engine_warn, log_excerpt};
use jobcloud_core::{SourceFailureKind, SourceOutcome};
use scraper::{ElementRef, Html, Selector};

use crate::indicators::{
    ContentRule, CONTENT_RULES, MIN_CONTENT_CHARS, NON_CONTENT_SELECTOR, NOT_FOUND_MIN_CHARS,
    NOT_FOUND_PHRASES, NOT_FOUND_SELECTORS,
};

pub trait Extractor: Send + Sync {
    /// Turn rendered HTML into posting text, or say why there is none.
    fn extract(&self, html: &str) -> SourceOutcome;
}

static NON_CONTENT: LazyLock<Option<Selector>> =
    LazyLock::new(|| Selector::parse(NON_CONTENT_SELECTOR).ok());

static NOT_FOUND_PROBES: LazyLock<Vec<(&'static str, Selector)>> = LazyLock::new(|| {
    NOT_FOUND_SELECTORS
        .iter()
        .filter_map(|raw| Selector::parse(raw).ok().map(|sel| (*raw, sel)))
        .collect()
});

static CONTENT_PROBES: LazyLock<Vec<(ContentRule, Selector)>> = LazyLock::new(|| {
    CONTENT_RULES
        .iter()
        .filter_map(|rule| Selector::parse(rule.selector).ok().map(|sel| (*rule, sel)))
        .collect()
});

/// Heuristic job-description extractor for arbitrary career pages.
///
/// - drops script/style/meta/link/noscript nodes
/// - rejects pages that read like a removed or expired posting
/// - takes the longest element of the first content rule that yields enough
///   text, falling back to the whole page
#[derive(Debug, Default, Clone, Copy)]
pub struct JobPostingExtractor;

impl Extractor for JobPostingExtractor {
    fn extract(&self, html: &str) -> SourceOutcome {
        let mut doc = Html::parse_document(html);
        strip_non_content(&mut doc);

        let page_text = element_text(doc.root_element());
        if let Some(indicator) = find_not_found(&doc, &page_text) {
            engine_info!("Posting looks unavailable: {}", indicator);
            return SourceOutcome::failure(SourceFailureKind::NotFound, indicator);
        }

        let text = match isolate_content(&doc) {
            Some((rule, text)) => {
                engine_debug!(
                    "Content isolated by {} ({} chars): {}",
                    rule.selector,
                    text.chars().count(),
                    log_excerpt(&text, 80)
                );
                text
            }
            None => {
                engine_debug!("No content rule matched; using full page text");
                page_text
            }
        };

        finalize(&text)
    }
}

fn strip_non_content(doc: &mut Html) {
    let Some(selector) = NON_CONTENT.as_ref() else {
        engine_warn!("Selector {:?} did not parse; page left unsanitized", NON_CONTENT_SELECTOR);
        return;
    };
    let doomed: Vec<NodeId> = doc.select(selector).map(|el| el.id()).collect();
    for id in doomed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Text nodes trimmed and joined by single spaces.
fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn find_not_found(doc: &Html, page_text: &str) -> Option<String> {
    let haystack = page_text.to_lowercase().replace('\u{2019}', "'");
    if let Some(phrase) = NOT_FOUND_PHRASES
        .iter()
        .find(|phrase| haystack.contains(*phrase))
    {
        return Some(format!("Job not found: {phrase}"));
    }

    NOT_FOUND_PROBES.iter().find_map(|(raw, selector)| {
        doc.select(selector)
            .any(|el| element_text(el).chars().count() > NOT_FOUND_MIN_CHARS)
            .then(|| format!("Job not found: found {raw} element with content"))
    })
}

fn isolate_content(doc: &Html) -> Option<(ContentRule, String)> {
    CONTENT_PROBES.iter().find_map(|(rule, selector)| {
        let best = longest_text(doc.select(selector).map(element_text))?;
        rule.accepts(best.chars().count()).then_some((*rule, best))
    })
}

/// First of the longest texts, so document order breaks ties.
fn longest_text(texts: impl Iterator<Item = String>) -> Option<String> {
    let mut best: Option<(usize, String)> = None;
    for text in texts {
        let len = text.chars().count();
        if best.as_ref().is_none_or(|(best_len, _)| len > *best_len) {
            best = Some((len, text));
        }
    }
    best.map(|(_, text)| text)
}

fn finalize(text: &str) -> SourceOutcome {
    let decoded = html_escape::decode_html_entities(text);
    let text = collapse_whitespace(&decoded);
    if text.chars().count() < MIN_CONTENT_CHARS {
        return SourceOutcome::failure(SourceFailureKind::EmptyContent, "insufficient content");
    }
    SourceOutcome::Text(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_text_prefers_first_on_ties() {
        let texts = ["abc", "xyz", "ab"].into_iter().map(String::from);
        assert_eq!(longest_text(texts).as_deref(), Some("abc"));
        assert_eq!(longest_text(std::iter::empty()), None);
    }

    #[test]
    fn stripped_nodes_leave_no_text() {
        let mut doc = Html::parse_document(
            "<html><head><style>p{}</style><script>var x = 1;</script></head>\
             <body><p>kept</p><noscript>enable js</noscript></body></html>",
        );
        strip_non_content(&mut doc);
        assert_eq!(element_text(doc.root_element()), "kept");
    }

    #[test]
    fn finalize_decodes_leftover_entities() {
        let outcome = finalize(&format!("R&amp;D &lt;team&gt; {}", "x".repeat(60)));
        assert_eq!(
            outcome.text().map(|t| t.starts_with("R&D <team> ")),
            Some(true)
        );
    }
}
