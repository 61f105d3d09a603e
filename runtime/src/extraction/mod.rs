//! Heuristic FAQ extraction from cleaned HTML.
//!
//! Strategies run in a fixed priority order and the first one that yields
//! at least one pair wins; later strategies never run. Structural markers,
//! when present, are trusted over looser heuristics.
//!
//! All entry points are synchronous: `scraper::Html` is `!Send`, so a parsed
//! document never lives across an await point.

pub mod definitions;
pub mod headings;
pub mod markers;
pub mod sequential;
pub mod text;

use std::collections::HashSet;

use scraper::Html;
use tracing::{debug, info};

use crate::cleaning::normalize;
use crate::types::FaqPair;

pub use definitions::DefinitionListStrategy;
pub use headings::{HeadingPolicy, HeadingStrategy};
pub use markers::MarkerStrategy;
pub use sequential::SequentialStrategy;

/// A single extraction heuristic.
pub trait ExtractionStrategy: Send + Sync {
    /// Short stable name, reported to callers as the winning strategy.
    fn name(&self) -> &'static str;
    /// Pairs found in `document`, in discovery order. Empty means "no match".
    fn attempt(&self, document: &Html) -> Vec<FaqPair>;
}

/// Outcome of running the cascade over one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub pairs: Vec<FaqPair>,
    /// Name of the strategy that produced `pairs`, if any did.
    pub strategy: Option<&'static str>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Ordered chain of extraction strategies.
pub struct ExtractionCascade {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ExtractionCascade {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    /// Markers, definition lists, headings, then the loose sequential scan.
    pub fn standard(headings: HeadingPolicy) -> Self {
        Self::new(vec![
            Box::new(MarkerStrategy),
            Box::new(DefinitionListStrategy),
            Box::new(HeadingStrategy::new(headings)),
            Box::new(SequentialStrategy),
        ])
    }

    /// Run strategies in order over already-cleaned HTML.
    pub fn extract(&self, cleaned_html: &str) -> Extraction {
        let document = Html::parse_document(cleaned_html);
        for strategy in &self.strategies {
            let pairs = strategy.attempt(&document);
            if pairs.is_empty() {
                debug!("strategy {} found nothing", strategy.name());
                continue;
            }
            info!("strategy {} found {} pairs", strategy.name(), pairs.len());
            return Extraction {
                pairs,
                strategy: Some(strategy.name()),
            };
        }
        Extraction::default()
    }
}

impl Default for ExtractionCascade {
    fn default() -> Self {
        Self::standard(HeadingPolicy::default())
    }
}

/// Accumulates pairs for one strategy run, rejecting empties and duplicates.
///
/// A pair is a duplicate when its question or its answer exactly matches one
/// already accepted.
#[derive(Debug, Default)]
pub struct PairCollector {
    seen_questions: HashSet<String>,
    seen_answers: HashSet<String>,
    pairs: Vec<FaqPair>,
}

impl PairCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and offer a candidate. Returns whether it was accepted.
    pub fn offer(&mut self, question: &str, answer: &str) -> bool {
        let question = normalize(question);
        let answer = normalize(answer);
        if question.is_empty() || answer.is_empty() {
            return false;
        }
        if self.seen_questions.contains(&question) || self.seen_answers.contains(&answer) {
            return false;
        }
        self.seen_questions.insert(question.clone());
        self.seen_answers.insert(answer.clone());
        self.pairs.push(FaqPair { question, answer });
        true
    }

    /// Whether `question` (normalized) was already accepted.
    pub fn has_question(&self, question: &str) -> bool {
        self.seen_questions.contains(question)
    }

    pub fn into_pairs(self) -> Vec<FaqPair> {
        self.pairs
    }
}
