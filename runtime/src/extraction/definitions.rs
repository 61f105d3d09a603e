//! Strategy B: `<dt>`/`<dd>` definition lists.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::text::element_text;
use super::{ExtractionStrategy, PairCollector};
use crate::types::FaqPair;

static TERM_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dt").expect("dt selector is valid"));
static DESCRIPTION_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("dd").expect("dd selector is valid"));

pub struct DefinitionListStrategy;

impl ExtractionStrategy for DefinitionListStrategy {
    fn name(&self) -> &'static str {
        "definitions"
    }

    fn attempt(&self, document: &Html) -> Vec<FaqPair> {
        let root = document.root_element();
        let terms: Vec<_> = root.select(&TERM_SEL).collect();
        let descriptions: Vec<_> = root.select(&DESCRIPTION_SEL).collect();

        let mut collector = PairCollector::new();
        for (i, term) in terms.iter().enumerate() {
            // Direct sibling first; otherwise pair the i-th term with the
            // i-th description in document order.
            let description = adjacent_description(term).or_else(|| descriptions.get(i).copied());
            if let Some(description) = description {
                collector.offer(&element_text(term), &element_text(&description));
            }
        }
        collector.into_pairs()
    }
}

/// The element right after `term`, if it is a `<dd>`.
fn adjacent_description<'a>(term: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    let next = term.next_siblings().find_map(ElementRef::wrap)?;
    (next.value().name() == "dd").then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(html: &str) -> Vec<FaqPair> {
        DefinitionListStrategy.attempt(&Html::parse_document(html))
    }

    #[test]
    fn test_adjacent_pairs() {
        let pairs = run("<dl>\
            <dt>Shipping?</dt><dd>Two days.</dd>\
            <dt>Returns?</dt><dd>Thirty days.</dd></dl>");
        assert_eq!(
            pairs,
            vec![FaqPair::new("Shipping?", "Two days."), FaqPair::new("Returns?", "Thirty days.")]
        );
    }

    #[test]
    fn test_wrapped_groups() {
        let pairs = run("<dl><div><dt>One?</dt><dd>1</dd></div><div><dt>Two?</dt><dd>2</dd></div></dl>");
        assert_eq!(pairs, vec![FaqPair::new("One?", "1"), FaqPair::new("Two?", "2")]);
    }

    #[test]
    fn test_positional_fallback() {
        let pairs = run("<dl><dt>Alpha</dt><dt>Beta</dt></dl><div><dd>First</dd><dd>Second</dd></div>");
        assert_eq!(pairs, vec![FaqPair::new("Alpha", "First"), FaqPair::new("Beta", "Second")]);
    }

    #[test]
    fn test_skips_empty_and_duplicate_sides() {
        let pairs = run("<dl>\
            <dt>Empty?</dt><dd>   </dd>\
            <dt>Same?</dt><dd>Yes.</dd>\
            <dt>Again?</dt><dd>Yes.</dd></dl>");
        assert_eq!(pairs, vec![FaqPair::new("Same?", "Yes.")]);
    }

    #[test]
    fn test_no_lists() {
        assert!(run("<p>Nothing.</p>").is_empty());
    }
}
