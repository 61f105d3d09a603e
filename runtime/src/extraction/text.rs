//! Text flattening helpers shared by the extraction strategies.

use scraper::{ElementRef, Html};

use crate::cleaning::normalize;

/// Elements that start a new line when a document is flattened.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p",
    "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Normalized text content of an element.
pub fn element_text(el: &ElementRef<'_>) -> String {
    normalize(&el.text().collect::<Vec<_>>().join(" "))
}

/// Heading level for `h1`..`h6`.
pub fn heading_level(name: &str) -> Option<u8> {
    match name.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

/// Flatten a document into normalized, non-empty lines.
///
/// Block elements and newlines in the source text both end a line; inline
/// markup (`<b>`, `<a>`, `<span>`, ...) stays on the line it appears in.
pub fn block_lines(document: &Html) -> Vec<String> {
    let mut buf = String::new();
    push_text(&document.root_element(), &mut buf);
    buf.lines()
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}

fn push_text(el: &ElementRef<'_>, buf: &mut String) {
    let block = BLOCK_TAGS.contains(&el.value().name());
    if block {
        buf.push('\n');
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            buf.push_str(text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            push_text(&child_el, buf);
        }
    }
    if block {
        buf.push('\n');
    }
}
