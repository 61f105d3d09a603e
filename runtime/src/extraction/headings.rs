//! Strategy C: a heading followed by its content.
//!
//! Each heading in range is a candidate question. Its answer is the text of
//! the following siblings up to the next heading or definition term.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use super::text::{element_text, heading_level};
use super::{ExtractionStrategy, PairCollector};
use crate::types::FaqPair;

/// Siblings whose whole text belongs to the answer.
const ANSWER_TAGS: &[&str] = &["p", "ul", "ol", "dd", "blockquote"];

/// Layout wrappers whose text is taken when they hold no question boundary.
const WRAPPER_TAGS: &[&str] = &["div", "section", "article"];

/// Heading boundary inside a wrapper.
const BOUNDARY_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, dt";

/// Which headings count as questions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeadingPolicy {
    /// `h2`–`h4`.
    #[default]
    Standard,
    /// `h2`–`h4`, and the heading must end with `?`.
    Strict,
    /// `h1`–`h4`.
    Loose,
}

impl HeadingPolicy {
    fn levels(self) -> std::ops::RangeInclusive<u8> {
        match self {
            Self::Standard | Self::Strict => 2..=4,
            Self::Loose => 1..=4,
        }
    }

    fn accepts(self, question: &str) -> bool {
        self != Self::Strict || question.ends_with('?')
    }
}

pub struct HeadingStrategy {
    policy: HeadingPolicy,
    headings: Selector,
    boundaries: Selector,
}

impl HeadingStrategy {
    pub fn new(policy: HeadingPolicy) -> Self {
        let list = policy
            .levels()
            .map(|level| format!("h{level}"))
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            policy,
            headings: Selector::parse(&list).expect("heading selector is valid"),
            boundaries: Selector::parse(BOUNDARY_SELECTOR).expect("boundary selector is valid"),
        }
    }

    fn answer_for(&self, heading: &ElementRef<'_>) -> String {
        let mut parts = Vec::new();
        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            let name = sibling.value().name();
            if heading_level(name).is_some() || name == "dt" {
                break;
            }
            if ANSWER_TAGS.contains(&name) {
                parts.push(element_text(&sibling));
            } else if WRAPPER_TAGS.contains(&name) {
                if sibling.select(&self.boundaries).next().is_some() {
                    break;
                }
                parts.push(element_text(&sibling));
            }
        }
        parts.retain(|p| !p.is_empty());
        parts.join(" ")
    }
}

impl ExtractionStrategy for HeadingStrategy {
    fn name(&self) -> &'static str {
        "headings"
    }

    fn attempt(&self, document: &Html) -> Vec<FaqPair> {
        let mut collector = PairCollector::new();
        for heading in document.root_element().select(&self.headings) {
            let question = element_text(&heading);
            if question.is_empty() || !self.policy.accepts(&question) {
                continue;
            }
            if collector.has_question(&question) {
                continue;
            }
            let answer = self.answer_for(&heading);
            collector.offer(&question, &answer);
        }
        collector.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(policy: HeadingPolicy, html: &str) -> Vec<FaqPair> {
        HeadingStrategy::new(policy).attempt(&Html::parse_document(html))
    }

    #[test]
    fn test_heading_paragraph_pairs() {
        assert_eq!(
            run(
                HeadingPolicy::Standard,
                "<h2>What is X?</h2><p>X is Y.</p><h2>How?</h2><p>Like this.</p>"
            ),
            vec![FaqPair::new("What is X?", "X is Y."), FaqPair::new("How?", "Like this.")]
        );
    }

    #[test]
    fn test_accumulates_until_boundary() {
        let pairs = run(
            HeadingPolicy::Standard,
            "<h3>Plans</h3><p>Two tiers.</p><ul><li>Free</li><li>Pro</li></ul>\
             <span>ignored</span><dl><dt>stop</dt></dl>",
        );
        assert_eq!(pairs, vec![FaqPair::new("Plans", "Two tiers. Free Pro")]);
    }

    #[test]
    fn test_wrapper_content_and_boundaries() {
        let pairs = run(
            HeadingPolicy::Standard,
            "<h3>Where?</h3><div class=\"answer\"><p>Everywhere.</p></div>\
             <div><h3>When?</h3></div><p>Later.</p>",
        );
        assert_eq!(pairs, vec![FaqPair::new("Where?", "Everywhere.")]);
    }

    #[test]
    fn test_strict_requires_question_mark() {
        let html = "<h2>Overview</h2><p>Intro.</p><h2>Why?</h2><p>Because.</p>";
        assert_eq!(run(HeadingPolicy::Strict, html), vec![FaqPair::new("Why?", "Because.")]);
        assert_eq!(run(HeadingPolicy::Standard, html).len(), 2);
    }

    #[test]
    fn test_loose_includes_h1() {
        let html = "<h1>Title?</h1><p>Body.</p>";
        assert!(run(HeadingPolicy::Standard, html).is_empty());
        assert_eq!(run(HeadingPolicy::Loose, html), vec![FaqPair::new("Title?", "Body.")]);
    }

    #[test]
    fn test_discards_empty_and_duplicates() {
        let pairs = run(
            HeadingPolicy::Standard,
            "<h2>Empty?</h2><h2>Dup?</h2><p>One.</p><h2>Dup?</h2><p>Two.</p><h2>Other?</h2><p>One.</p>",
        );
        assert_eq!(pairs, vec![FaqPair::new("Dup?", "One.")]);
    }
}
