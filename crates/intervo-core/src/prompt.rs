//! Prompt construction policy.
//!
//! Builds the bounded text payloads sent to the generator collaborator:
//! the initial question prompt, the follow-up question prompt, and the
//! feedback prompt. Each builder truncates its embedded inputs and
//! enforces the token budget before a request is allowed to go out.

use crate::error::GenerationError;
use crate::session::{Turn, TurnRole};
use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum characters of resume/job description embedded in the
/// initial question prompt.
pub const INITIAL_INPUT_LIMIT: usize = 3000;
/// Maximum characters of resume/job description embedded in the
/// follow-up question prompt.
pub const FOLLOW_UP_INPUT_LIMIT: usize = 2500;
/// Number of most recent turns rendered into the follow-up prompt.
pub const HISTORY_WINDOW: usize = 10;
/// Number of most recent qualifying answers rendered into the
/// feedback prompt.
pub const FEEDBACK_WINDOW: usize = 20;
/// Minimum trimmed answer length for inclusion in the feedback prompt.
pub const MIN_ANSWER_LEN: usize = 10;
/// Upper bound on the estimated token count of any outgoing prompt.
pub const TOKEN_LIMIT: usize = 8191;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>?").unwrap());

/// Estimates the token count of a prompt as `ceil(chars / 4)`.
///
/// A deliberately cheap heuristic; it only needs to be good enough to
/// reject requests the backend would refuse anyway.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Removes anything that looks like an HTML/XML tag from user input.
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// Drops NUL and Unicode non-characters that upset downstream stores.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '\u{0}' | '\u{FFFD}' | '\u{FFFE}' | '\u{FFFF}'))
        .collect()
}

/// Truncates `text` to at most `max` characters, appending an ellipsis
/// marker when anything was cut.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

/// Renders turns as alternating `Interviewer:`/`Candidate:` lines in
/// chronological order.
pub fn format_history(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|turn| {
            let speaker = match turn.role {
                TurnRole::Interviewer => "Interviewer",
                TurnRole::Candidate => "Candidate",
            };
            format!("{speaker}: {}", turn.content)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Candidate-authored turns with content longer than [`MIN_ANSWER_LEN`]
/// after trimming. Only these carry enough signal to assess.
pub fn qualifying_answers(turns: &[Turn]) -> Vec<&Turn> {
    turns
        .iter()
        .filter(|turn| {
            turn.role == TurnRole::Candidate && turn.content.trim().chars().count() > MIN_ANSWER_LEN
        })
        .collect()
}

fn check_token_budget(prompt: String) -> Result<String, GenerationError> {
    let estimated = estimate_tokens(&prompt);
    if estimated > TOKEN_LIMIT {
        return Err(GenerationError::InputTooLarge {
            estimated,
            limit: TOKEN_LIMIT,
        });
    }
    Ok(prompt)
}

/// Builds the prompt for the opening interview question.
///
/// Resume and job description are independently truncated to
/// [`INITIAL_INPUT_LIMIT`] characters. Fails with
/// [`GenerationError::InputTooLarge`] when the token pre-flight check
/// trips; the generator must not be called in that case.
pub fn build_initial_prompt(
    resume_text: &str,
    job_description: &str,
) -> Result<String, GenerationError> {
    let resume = truncate(&strip_html(resume_text), INITIAL_INPUT_LIMIT);
    let jd = truncate(&strip_html(job_description), INITIAL_INPUT_LIMIT);

    let prompt = format!(
        "\nYou are an AI interviewer. Based on the candidate's resume and job description, \
         generate ONE concise, professional interview question. \n\
         **Output ONLY the question, and nothing else. Do NOT include any notes, explanations, or formatting.**\n\n\
         **Resume:**\n{resume}\n\n\
         **Job Description:**\n{jd}\n\n\
         Output only the question.\n"
    );

    check_token_budget(prompt)
}

/// Builds the follow-up question prompt from the trimmed inputs plus
/// the most recent [`HISTORY_WINDOW`] transcript turns.
pub fn build_follow_up_prompt(
    resume_text: &str,
    job_description: &str,
    transcript: &[Turn],
) -> Result<String, GenerationError> {
    let resume = truncate(&strip_html(resume_text), FOLLOW_UP_INPUT_LIMIT);
    let jd = truncate(&strip_html(job_description), FOLLOW_UP_INPUT_LIMIT);

    let start = transcript.len().saturating_sub(HISTORY_WINDOW);
    let history = format_history(&transcript[start..]);

    let prompt = format!(
        "<|begin_of_text|>\n\
         <|start_header_id|>system<|end_header_id|>\n\
         You are an AI interviewer conducting a job interview. Ask relevant follow-up questions based on:\n\
         - Candidate's resume\n\
         - Job description\n\
         - Previous responses\n\
         Ask one question at a time.\n\
         ONLY output the next question, and nothing else.<|eot_id|>\n\
         <|start_header_id|>user<|end_header_id|>\n\
         Resume: {resume}\n\
         Job Description: {jd}\n\
         Conversation History: {history}\n\
         Generate your next question:<|eot_id|>"
    );

    check_token_budget(prompt)
}

/// Builds the structured feedback prompt from the candidate's answers.
///
/// Resume and job description are deliberately excluded so the report
/// reflects only spoken performance. Returns `None` when no qualifying
/// answers exist: the caller must short-circuit to the canned
/// "not enough information" result without calling the generator.
pub fn build_feedback_prompt(transcript: &[Turn]) -> Option<Result<String, GenerationError>> {
    let answers = qualifying_answers(transcript);
    if answers.is_empty() {
        return None;
    }

    let start = answers.len().saturating_sub(FEEDBACK_WINDOW);
    let recent: Vec<Turn> = answers[start..].iter().map(|t| (*t).clone()).collect();
    let history = format_history(&recent);

    let prompt = format!(
        "\nYou are an AI interviewer providing structured feedback based ONLY on the candidate's answers during the interview. \n\
         Do NOT use or reference the resume or job description. \n\
         Format as:\n\
         1. Overall Assessment\n\
         2. Strengths\n\
         3. Areas for Improvement\n\
         4. Communication Skills\n\
         5. Next Steps\n\n\
         Candidate's Answers:\n{history}\n\n\
         Provide comprehensive feedback based only on the candidate's answers above.\n"
    );

    Some(check_token_budget(prompt))
}
