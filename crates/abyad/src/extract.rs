//! Extraction of the scoring stage's payload from raw pipeline output.
//!
//! The agent runner prints one event record per line. The final stage is
//! identified by its author marker; its `content.parts[0].text` holds the
//! evaluation JSON, usually wrapped in a markdown code fence. Everything
//! here is a single forward pass over the captured text and fails with a
//! typed error instead of panicking, whatever the input.

use abya_common::EvaluationResult;
use serde::Deserialize;
use serde_json::Value;
use std::iter::Peekable;
use std::str::Chars;
use thiserror::Error;
use tracing::debug;

/// Author marker of the scoring stage, the last agent in the pipeline.
pub const SCORING_STAGE_MARKER: &str = "score_calculator";

/// Extraction failures.
#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    #[error("no line authored by the scoring stage")]
    StageNotFound,

    #[error("scoring stage line is not a decodable event: {0}")]
    MalformedEvent(String),

    #[error("payload is not valid JSON: {0}")]
    InvalidPayload(String),

    #[error("payload has no final_score")]
    IncompleteResult,
}

/// Event record as printed by the agent runner. Only the fields the
/// extractor needs; everything else in the record is ignored.
#[derive(Debug, Deserialize)]
struct StageEvent {
    content: EventContent,
    #[serde(default)]
    author: String,
}

#[derive(Debug, Deserialize)]
struct EventContent {
    parts: Vec<EventPart>,
}

#[derive(Debug, Deserialize)]
struct EventPart {
    text: Option<String>,
}

/// Extract the scoring stage's evaluation from a full pipeline transcript.
///
/// The first line carrying the stage marker decides the outcome; later
/// lines are never consulted.
pub fn extract(raw: &str) -> Result<EvaluationResult, ExtractError> {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|line| line.contains(SCORING_STAGE_MARKER))
        .ok_or(ExtractError::StageNotFound)?;

    let text = decode_event_text(line)?;
    let payload = strip_code_fence(&text);
    parse_payload(payload)
}

/// Decode one printed event line and pull out `content.parts[0].text`.
fn decode_event_text(line: &str) -> Result<String, ExtractError> {
    let value = parse_event_value(line)?;
    let event: StageEvent = serde_json::from_value(value)
        .map_err(|e| ExtractError::MalformedEvent(e.to_string()))?;

    debug!("  Decoded event from author '{}'", event.author);

    let part = event
        .content
        .parts
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::MalformedEvent("event has no content parts".to_string()))?;
    part.text
        .ok_or_else(|| ExtractError::MalformedEvent("first content part has no text".to_string()))
}

/// Parse an event line: JSON first, then the framework's printed literal
/// form (single-quoted strings, True/False/None).
fn parse_event_value(line: &str) -> Result<Value, ExtractError> {
    if let Ok(value) = serde_json::from_str::<Value>(line) {
        return Ok(value);
    }
    let converted = printed_literal_to_json(line).map_err(ExtractError::MalformedEvent)?;
    serde_json::from_str(&converted).map_err(|e| ExtractError::MalformedEvent(e.to_string()))
}

/// Convert a printed Python-style literal to JSON text. Strings and the
/// three keyword constants are rewritten; all other characters pass
/// through and the JSON parser has the final say.
fn printed_literal_to_json(input: &str) -> Result<String, String> {
    let mut out = String::with_capacity(input.len() + 16);
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => convert_string(c, &mut chars, &mut out)?,
            'T' | 'F' | 'N' => {
                let mut word = String::new();
                word.push(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.as_str() {
                    "True" => out.push_str("true"),
                    "False" => out.push_str("false"),
                    "None" => out.push_str("null"),
                    _ => out.push_str(&word),
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Rewrite one quoted string (either quote style) as a JSON string.
fn convert_string(
    quote: char,
    chars: &mut Peekable<Chars<'_>>,
    out: &mut String,
) -> Result<(), String> {
    out.push('"');
    loop {
        match chars.next() {
            None => return Err("unterminated string in event".to_string()),
            Some('\\') => match chars.next() {
                None => return Err("dangling escape in event".to_string()),
                Some('\'') => out.push('\''),
                Some('"') => out.push_str("\\\""),
                Some('\\') => out.push_str("\\\\"),
                Some('n') => out.push_str("\\n"),
                Some('t') => out.push_str("\\t"),
                Some('r') => out.push_str("\\r"),
                Some('x') => {
                    // \xNN has no JSON spelling; emit \u00NN
                    let hi = chars.next();
                    let lo = chars.next();
                    match (hi, lo) {
                        (Some(hi), Some(lo))
                            if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() =>
                        {
                            out.push_str("\\u00");
                            out.push(hi);
                            out.push(lo);
                        }
                        _ => return Err("bad \\x escape in event".to_string()),
                    }
                }
                Some('u') => {
                    out.push_str("\\u");
                    for _ in 0..4 {
                        match chars.next() {
                            Some(d) if d.is_ascii_hexdigit() => out.push(d),
                            _ => return Err("bad \\u escape in event".to_string()),
                        }
                    }
                }
                Some(other) => out.push(other),
            },
            Some(c) if c == quote => {
                out.push('"');
                return Ok(());
            }
            Some('"') => out.push_str("\\\""),
            Some(c) if (c as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            Some(c) => out.push(c),
        }
    }
}

/// Strip one leading/trailing markdown fence pair. Framing only: a fence
/// must open the payload to count, and only then is a trailing fence
/// removed. Interior backticks are content.
fn strip_code_fence(text: &str) -> &str {
    let mut t = text.trim();
    if let Some(rest) = t.strip_prefix("```json").or_else(|| t.strip_prefix("```")) {
        t = rest.trim();
        if let Some(body) = t.strip_suffix("```") {
            t = body.trim();
        }
    }
    t
}

/// Parse the cleaned payload text and require the final score.
fn parse_payload(text: &str) -> Result<EvaluationResult, ExtractError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ExtractError::InvalidPayload(e.to_string()))?;
    if value.get("final_score").is_none() {
        return Err(ExtractError::IncompleteResult);
    }
    serde_json::from_value(value).map_err(|e| ExtractError::InvalidPayload(e.to_string()))
}
