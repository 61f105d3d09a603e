//! Export formats for harvested pairs.

use serde::Serialize;

use crate::types::FaqPair;

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct Transcript<'a> {
    messages: [Message<'a>; 2],
}

/// Pretty-printed JSON array of `{question, answer}` objects.
pub fn to_json(pairs: &[FaqPair]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(pairs)
}

/// One chat transcript per line: the question as the user turn, the answer
/// as the assistant turn.
pub fn to_transcript_jsonl(pairs: &[FaqPair]) -> serde_json::Result<String> {
    let mut out = String::new();
    for pair in pairs {
        let line = serde_json::to_string(&Transcript {
            messages: [
                Message {
                    role: "user",
                    content: &pair.question,
                },
                Message {
                    role: "assistant",
                    content: &pair.answer,
                },
            ],
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}
