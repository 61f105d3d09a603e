//! Text normalization for extracted fragments.

use std::sync::LazyLock;

use regex::Regex;

/// Footnote-style citation markers such as `[12]`.
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("citation regex is valid"));

/// Unicode-aware `\s` also covers U+00A0.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Pilcrow-like marks left behind by heading permalinks.
const STRAY_MARKS: [char; 2] = ['\u{00B6}', '\u{204B}'];

/// UTF-8 non-breaking space decoded as Latin-1 (`C2 A0`).
const MOJIBAKE_NBSP: &str = "\u{00C2}\u{00A0}";

/// Strip decorative artifacts and collapse whitespace.
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    // Removing one artifact can expose another (`[¶3]` → `[3]`), so strip
    // until nothing changes before collapsing whitespace.
    let mut current = text.to_string();
    loop {
        let next = strip_artifacts(&current);
        if next == current {
            break;
        }
        current = next;
    }

    WHITESPACE_RE.replace_all(&current, " ").trim().to_string()
}

fn strip_artifacts(text: &str) -> String {
    let without_marks: String = text
        .replace(MOJIBAKE_NBSP, " ")
        .chars()
        .filter(|c| !STRAY_MARKS.contains(c))
        .collect();
    CITATION_RE.replace_all(&without_marks, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace_and_trims() {
        assert_eq!(normalize("  What   is\n\tX? "), "What is X?");
    }

    #[test]
    fn test_literal_nbsp_is_whitespace() {
        assert_eq!(normalize("a\u{00A0}\u{00A0}b"), "a b");
    }

    #[test]
    fn test_removes_citations() {
        assert_eq!(normalize("Water boils at 100C.[1][23]"), "Water boils at 100C.");
        assert_eq!(normalize("keeps [a] and [1a]"), "keeps [a] and [1a]");
    }

    #[test]
    fn test_removes_stray_marks() {
        assert_eq!(normalize("Installation\u{00B6}"), "Installation");
        assert_eq!(normalize("price\u{00C2}\u{00A0}list"), "price list");
    }

    #[test]
    fn test_nested_artifacts_collapse_in_one_pass() {
        assert_eq!(normalize("x [[1]2] y"), "x y");
        assert_eq!(normalize("x [\u{00B6}4] y"), "x y");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "   ",
            "Q: What?\nA: This.",
            "x [[1]2]\u{00A0} \u{00C2}\u{00A0}[\u{00B6}9]  y",
            "\u{00C2}[1]\u{00A0}z",
            "plain",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("[1]\u{00B6}"), "");
    }
}
