//! Core data types shared across the pipeline.

use serde::{Deserialize, Serialize};

/// A single question/answer pair extracted from a page.
///
/// Both fields are normalized text and never empty once accepted by an
/// extraction strategy. Older cache files stored pairs under `Q`/`A` keys;
/// those still deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FaqPair {
    #[serde(alias = "Q")]
    pub question: String,
    #[serde(alias = "A")]
    pub answer: String,
}

impl FaqPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Ordered pairs for one URL, in discovery order of the winning strategy.
pub type FaqResult = Vec<FaqPair>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_keys_deserialize() {
        let pair: FaqPair = serde_json::from_str(r#"{"Q":"Why?","A":"Because."}"#).unwrap();
        assert_eq!(pair, FaqPair::new("Why?", "Because."));
    }

    #[test]
    fn test_serializes_long_keys() {
        let json = serde_json::to_value(FaqPair::new("Why?", "Because.")).unwrap();
        assert_eq!(json["question"], "Why?");
        assert_eq!(json["answer"], "Because.");
    }
}
