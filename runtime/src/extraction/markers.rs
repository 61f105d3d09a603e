//! Strategy A: explicit `Q:` / `A:` markers in the page text.
//!
//! The document is flattened to lines. A record starts at every line that
//! opens with a question label and runs until the next one (or the end of
//! the text). Inside a record an answer label splits question from answer;
//! without one, the question runs through the first line ending in `?`.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use super::text::block_lines;
use super::{ExtractionStrategy, PairCollector};
use crate::types::FaqPair;

/// `Q:`, `Q1.`, `Question -`, `q)`, or a bare `Q` followed by whitespace.
/// A dash or dot must be followed by whitespace, so `Q-tip` and `Quality`
/// are not labels.
static QUESTION_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:question|q)\s*\d*(?:\s*(?::|[-\u{2013}.)](?:\s|$))|\s)\s*")
        .expect("question label regex is valid")
});

/// Same shape as the question label. Only checked inside a record.
static ANSWER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:answer|a)\s*\d*(?:\s*(?::|[-\u{2013}.)](?:\s|$))|\s)\s*")
        .expect("answer label regex is valid")
});

/// An answer label on the same line as its question: `Q: Why? A: Because.`
/// Mid-line the delimiter is required; a bare "a" is just a word.
static INLINE_ANSWER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s(?:answer|a)\s*\d*\s*(?::|[-\u{2013}.)]\s)\s*")
        .expect("inline answer regex is valid")
});

pub struct MarkerStrategy;

impl ExtractionStrategy for MarkerStrategy {
    fn name(&self) -> &'static str {
        "markers"
    }

    fn attempt(&self, document: &Html) -> Vec<FaqPair> {
        let lines = block_lines(document);
        let mut collector = PairCollector::new();
        for (question, answer) in split_records(&lines) {
            collector.offer(&question, &answer);
        }
        collector.into_pairs()
    }
}

#[derive(Default)]
struct Record<'a> {
    question: Vec<&'a str>,
    answer: Vec<&'a str>,
    labelled_answer: bool,
}

impl Record<'_> {
    /// Resolve into `(question, answer)`; `None` when there is no answer part.
    fn finish(self) -> Option<(String, String)> {
        if self.labelled_answer {
            return Some((self.question.join(" "), self.answer.join(" ")));
        }
        let split = self
            .question
            .iter()
            .position(|line| line.trim_end().ends_with('?'))
            .map_or(1, |i| i + 1);
        if split >= self.question.len() {
            return None;
        }
        let (question, answer) = self.question.split_at(split);
        Some((question.join(" "), answer.join(" ")))
    }
}

/// Split flattened lines into raw `(question, answer)` candidates.
fn split_records(lines: &[String]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut current: Option<Record<'_>> = None;

    for line in lines {
        if let Some(label) = QUESTION_LABEL_RE.find(line) {
            out.extend(current.take().and_then(Record::finish));
            let rest = &line[label.end()..];
            let mut record = Record::default();
            match INLINE_ANSWER_RE.find(rest) {
                Some(inline) => {
                    record.question.push(&rest[..inline.start()]);
                    record.answer.push(&rest[inline.end()..]);
                    record.labelled_answer = true;
                }
                None => record.question.push(rest),
            }
            current = Some(record);
            continue;
        }

        // Text before the first question label is not part of any record.
        let Some(record) = current.as_mut() else {
            continue;
        };
        if record.labelled_answer {
            record.answer.push(line);
        } else if let Some(label) = ANSWER_LABEL_RE.find(line) {
            record.answer.push(&line[label.end()..]);
            record.labelled_answer = true;
        } else {
            record.question.push(line);
        }
    }

    out.extend(current.and_then(Record::finish));
    out
}
