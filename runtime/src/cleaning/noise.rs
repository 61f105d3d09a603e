//! Removal of non-content regions from a parsed document.
//!
//! Runs before any text extraction. Removed subtrees must not leak into the
//! sibling walks the heading strategy performs, so nodes are detached from
//! the tree rather than merely skipped.

use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};

/// Tags that never carry FAQ content.
const NOISE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "form", "noscript", "iframe", "button",
    "input", "aside",
];

/// Extra tags removed by [`NoiseProfile::Strict`].
const STRICT_NOISE_TAGS: &[&str] = &["head", "svg", "canvas", "link", "meta"];

/// Substrings of `id`/`class` values that mark boilerplate containers.
const NOISE_MARKERS: &[&str] = &[
    "footer",
    "header",
    "nav",
    "toc",
    "sidebar",
    "masthead",
    "menu",
    "cookie",
    "advertisement",
    "promo",
    "newsletter",
];

/// How aggressively to strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NoiseProfile {
    Standard,
    #[default]
    Strict,
}

impl NoiseProfile {
    fn is_noise_tag(self, tag: &str) -> bool {
        NOISE_TAGS.contains(&tag) || (self == Self::Strict && STRICT_NOISE_TAGS.contains(&tag))
    }
}

/// Detach every noise element from `document`. Returns how many subtrees
/// were removed.
///
/// Idempotent, and never increases the element count.
pub fn strip(document: &mut Html, profile: NoiseProfile) -> usize {
    let doomed: Vec<_> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| is_noise(el, profile))
        .map(|el| el.id())
        .collect();

    for id in &doomed {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.detach();
        }
    }

    if !doomed.is_empty() {
        tracing::debug!("stripped {} noise elements", doomed.len());
    }
    doomed.len()
}

fn is_noise(el: &ElementRef<'_>, profile: NoiseProfile) -> bool {
    let name = el.value().name();
    if profile.is_noise_tag(name) {
        return true;
    }
    // A marker on <body class="has-sidebar"> would take the whole page with it.
    if matches!(name, "html" | "body") {
        return false;
    }
    let value = el.value();
    [value.id(), value.attr("class")]
        .into_iter()
        .flatten()
        .any(has_noise_marker)
}

fn has_noise_marker(attr: &str) -> bool {
    let lower = attr.to_ascii_lowercase();
    NOISE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Number of elements reachable from the document root.
pub fn element_count(document: &Html) -> usize {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>t</title><meta charset="utf-8"></head><body>
        <header><h1>Site</h1></header>
        <nav><a href="/">Home</a></nav>
        <div id="main-menu"><p>Menu item</p></div>
        <div class="Cookie-Banner"><p>We use cookies</p></div>
        <main>
          <h2>What is X?</h2>
          <script>var x = 1;</script>
          <p>X is Y.</p>
          <svg><circle r="1"></circle></svg>
        </main>
        <footer>Contact</footer>
    </body></html>"#;

    fn body_text(doc: &Html) -> String {
        doc.root_element().text().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_removes_tags_and_markers() {
        let mut doc = Html::parse_document(PAGE);
        strip(&mut doc, NoiseProfile::Strict);
        let text = body_text(&doc);
        assert!(text.contains("What is X?"));
        assert!(text.contains("X is Y."));
        for gone in ["Site", "Home", "Menu item", "We use cookies", "var x", "Contact"] {
            assert!(!text.contains(gone), "{gone} survived");
        }
        assert!(doc.html().contains("<main>"));
        assert!(!doc.html().contains("<svg"));
        assert!(!doc.html().contains("<head"));
    }

    #[test]
    fn test_standard_profile_keeps_head_and_svg() {
        let mut doc = Html::parse_document(PAGE);
        strip(&mut doc, NoiseProfile::Standard);
        let html = doc.html();
        assert!(html.contains("<svg"));
        assert!(html.contains("<title>"));
        assert!(!html.contains("var x"));
    }

    #[test]
    fn test_body_marker_does_not_remove_page() {
        let mut doc =
            Html::parse_document(r#"<html><body class="has-sidebar"><p>Keep me</p></body></html>"#);
        strip(&mut doc, NoiseProfile::Strict);
        assert!(body_text(&doc).contains("Keep me"));
    }

    #[test]
    fn test_idempotent_and_shrinking() {
        let mut doc = Html::parse_document(PAGE);
        let before = element_count(&doc);
        let removed = strip(&mut doc, NoiseProfile::Strict);
        let after_first = element_count(&doc);
        let first_html = doc.html();

        assert!(removed > 0);
        assert!(after_first < before);

        assert_eq!(strip(&mut doc, NoiseProfile::Strict), 0);
        assert_eq!(element_count(&doc), after_first);
        assert_eq!(doc.html(), first_html);
    }

    #[test]
    fn test_clean_document_untouched() {
        let mut doc = Html::parse_document("<p>Plain</p>");
        let before = element_count(&doc);
        assert_eq!(strip(&mut doc, NoiseProfile::Standard), 0);
        assert_eq!(element_count(&doc), before);
    }

    #[test]
    fn test_strict_drops_implied_head() {
        // The parser synthesizes an empty <head>; strict removes it and nothing else.
        let mut doc = Html::parse_document("<p>Plain</p>");
        let before = element_count(&doc);
        assert_eq!(strip(&mut doc, NoiseProfile::Strict), 1);
        assert_eq!(element_count(&doc), before - 1);
        assert_eq!(body_text(&doc), "Plain");
    }
}
