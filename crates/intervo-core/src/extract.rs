//! Response sanitization and extraction policy.
//!
//! Raw generated text is never trusted: it may carry code fences,
//! bullet markers, chat-template control tokens or trailing
//! explanations. The functions here reduce it to a single usable
//! question or feedback block. Extraction never fails; every path
//! resolves to a deterministic fallback so the interview can proceed
//! through a generator outage.

use once_cell::sync::Lazy;
use regex::Regex;

/// Opening question used when the initial generation yields nothing.
pub const OPENING_FALLBACK: &str = "Let's begin. Tell me about yourself.";
/// Follow-up used when a cleaned response contains no usable line.
pub const FOLLOW_UP_EMPTY_FALLBACK: &str = "Could you elaborate on that experience?";
/// Follow-up used when the generator call itself failed mid-interview.
pub const FOLLOW_UP_OUTAGE_FALLBACK: &str = "Could you tell me more about your experience?";
/// Feedback used when the generator returned an empty report.
pub const FEEDBACK_EMPTY_FALLBACK: &str = "Thank you for your time. We'll provide feedback shortly.";
/// Feedback used when feedback generation failed outright.
pub const FEEDBACK_OUTAGE_FALLBACK: &str =
    "Thank you for completing the interview. Feedback generation failed.";
/// Canned report when no qualifying answers exist to assess.
pub const NOT_ENOUGH_INFORMATION: &str =
    "Not enough information was provided to generate feedback. Please answer the questions in detail.";

/// Minimum length for a line to be preferred as a follow-up question.
const MIN_QUESTION_LINE_LEN: usize = 10;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[\s\S]*?```").unwrap());
static DASH_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-+").unwrap());
static LEADING_BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*[-*]\s*").unwrap());
static CONTROL_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\|.*?\|>").unwrap());
static NOTE_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)Note:.*$").unwrap());

/// Extracts the opening question from raw generated text.
///
/// Strips code fences, dash runs, leading bullets and control tokens,
/// then uses the cleaned text verbatim. Falls back to
/// [`OPENING_FALLBACK`] when nothing survives cleanup.
pub fn extract_initial_question(raw: &str) -> String {
    let cleaned = CODE_FENCE.replace_all(raw.trim(), "");
    let cleaned = DASH_RUN.replace_all(&cleaned, "");
    let cleaned = LEADING_BULLET.replace_all(&cleaned, "");
    let cleaned = CONTROL_TOKEN.replace_all(&cleaned, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        OPENING_FALLBACK.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extracts a single follow-up question from raw generated text.
///
/// After cleanup (code fences, trailing `Note:` sections, control
/// tokens) the text is split into non-empty trimmed lines. The first
/// line longer than ten characters that ends with a question mark
/// wins; otherwise the first line; otherwise
/// [`FOLLOW_UP_EMPTY_FALLBACK`].
pub fn extract_follow_up_question(raw: &str) -> String {
    let cleaned = CODE_FENCE.replace_all(raw.trim(), "");
    let cleaned = NOTE_TAIL.replace_all(&cleaned, "");
    let cleaned = CONTROL_TOKEN.replace_all(&cleaned, "");

    let lines: Vec<&str> = cleaned
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let preferred = lines
        .iter()
        .find(|line| line.chars().count() > MIN_QUESTION_LINE_LEN && line.ends_with('?'))
        .or_else(|| lines.first());

    match preferred {
        Some(line) => line.to_string(),
        None => FOLLOW_UP_EMPTY_FALLBACK.to_string(),
    }
}

/// Extracts the feedback report from raw generated text.
///
/// No line extraction is applied; the trimmed text is returned
/// verbatim, or [`FEEDBACK_EMPTY_FALLBACK`] when empty.
pub fn extract_feedback(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        FEEDBACK_EMPTY_FALLBACK.to_string()
    } else {
        trimmed.to_string()
    }
}
