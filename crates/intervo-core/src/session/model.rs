//! Interview session domain model.
//!
//! This module contains the core `InterviewSession` entity plus the
//! transcript types it is built from. The session is the "pure" domain
//! model the orchestrator operates on, independent of any storage
//! format or UI framework.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of interviewer-authored turns after which the next candidate
/// submission ends the interview instead of producing a follow-up.
pub const INTERVIEWER_TURN_LIMIT: usize = 10;

/// Lifecycle status of an interview session.
///
/// Strictly forward-moving except on recoverable failure, where a
/// transition falls back exactly one step (`Starting` -> `Idle`,
/// `Ending` -> `InProgress`). An explicit reset returns any state to
/// `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for inputs; no session exists yet.
    Idle,
    /// Inputs validated, opening question in flight.
    Starting,
    /// Interview underway; answers and follow-ups alternate.
    InProgress,
    /// Feedback generation in flight.
    Ending,
    /// Feedback stored; the session is finished.
    Completed,
}

impl SessionStatus {
    /// The snake_case wire form used in session records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Starting => "starting",
            Self::InProgress => "in_progress",
            Self::Ending => "ending",
            Self::Completed => "completed",
        }
    }
}

/// Author of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnRole {
    /// A question asked by the AI interviewer.
    Interviewer,
    /// An answer given by the user.
    Candidate,
}

/// A single utterance in the interview transcript.
///
/// Turns are created only by the orchestration core, never mutated,
/// only appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The author of this turn.
    pub role: TurnRole,
    /// Sanitized plain-text content.
    pub content: String,
}

impl Turn {
    /// Creates an interviewer turn.
    pub fn interviewer(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Interviewer,
            content: content.into(),
        }
    }

    /// Creates a candidate turn.
    pub fn candidate(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Candidate,
            content: content.into(),
        }
    }
}

/// Field-scoped input errors surfaced to the UI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors {
    /// Problem with the uploaded resume, if any.
    pub resume: Option<String>,
    /// Problem with the job description, if any.
    pub job_description: Option<String>,
}

impl FieldErrors {
    /// True when neither field carries an error.
    pub fn is_empty(&self) -> bool {
        self.resume.is_none() && self.job_description.is_none()
    }
}

/// One interview instance from start to completion or reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewSession {
    /// Opaque unique identifier, set when the session is created and
    /// immutable afterwards. `None` until the interview has started.
    pub id: Option<String>,
    /// Sanitized resume text; editable only before the session starts.
    pub resume_text: String,
    /// Sanitized job description; editable only before the session starts.
    pub job_description_text: String,
    /// Ordered, append-only sequence of turns.
    pub transcript: Vec<Turn>,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Final feedback report, set exactly once on completion.
    pub feedback: Option<String>,
    /// Field-scoped validation/extraction errors.
    pub errors: FieldErrors,
    /// When the interview started, for elapsed-time display only.
    pub started_at: Option<DateTime<Utc>>,
}

impl Default for InterviewSession {
    fn default() -> Self {
        Self {
            id: None,
            resume_text: String::new(),
            job_description_text: String::new(),
            transcript: Vec::new(),
            status: SessionStatus::Idle,
            feedback: None,
            errors: FieldErrors::default(),
            started_at: None,
        }
    }
}

impl InterviewSession {
    /// Creates a fresh idle session with no inputs.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts interviewer-authored turns in the transcript.
    ///
    /// Only these count toward the turn limit; candidate turns are
    /// unbounded.
    pub fn interviewer_turn_count(&self) -> usize {
        self.transcript
            .iter()
            .filter(|turn| turn.role == TurnRole::Interviewer)
            .count()
    }

    /// Whether the interviewer turn limit has been reached.
    pub fn turn_limit_reached(&self) -> bool {
        self.interviewer_turn_count() >= INTERVIEWER_TURN_LIMIT
    }

    /// Time elapsed since the interview started, for display only.
    pub fn elapsed(&self) -> Option<chrono::Duration> {
        self.started_at.map(|start| Utc::now() - start)
    }
}
