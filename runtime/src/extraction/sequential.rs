//! Strategy D: loose adjacency scan over text-bearing elements.
//!
//! Lowest precision. A fragment that starts with `Q` or ends with `?`,
//! immediately followed by a fragment starting with `A`, is taken as a pair.
//! Nested elements repeat text, so no deduplication beyond the adjacency
//! rule is attempted.

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::text::element_text;
use super::ExtractionStrategy;
use crate::types::FaqPair;

static FRAGMENT_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, div, li, span, h2, h3, h4, strong, b").expect("fragment selector is valid")
});

pub struct SequentialStrategy;

impl ExtractionStrategy for SequentialStrategy {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn attempt(&self, document: &Html) -> Vec<FaqPair> {
        let fragments: Vec<String> = document
            .root_element()
            .select(&FRAGMENT_SEL)
            .map(|el| element_text(&el))
            .filter(|text| !text.is_empty())
            .collect();

        fragments
            .windows(2)
            .filter(|pair| looks_like_question(&pair[0]) && pair[1].starts_with('A'))
            .map(|pair| FaqPair::new(pair[0].clone(), pair[1].clone()))
            .collect()
    }
}

fn looks_like_question(text: &str) -> bool {
    text.starts_with('Q') || text.ends_with('?')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<FaqPair> {
        SequentialStrategy.attempt(&Html::parse_document(html))
    }

    #[test]
    fn test_adjacent_fragments() {
        let pairs = run("<span>Is it open?</span><span>Yes, always.</span>\
             <b>Can I pay later?</b><span>After checkout you can.</span>");
        assert_eq!(pairs, vec![FaqPair::new("Can I pay later?", "After checkout you can.")]);
    }

    #[test]
    fn test_q_prefix_counts_as_question() {
        let pairs = run("<li>Q1 Shipping</li><li>Arrives Monday</li>");
        assert_eq!(pairs, vec![FaqPair::new("Q1 Shipping", "Arrives Monday")]);
    }

    #[test]
    fn test_requires_adjacency() {
        assert!(run("<p>Why?</p><p>Because.</p><p>All good.</p>").is_empty());
    }
}
