//! Record store trait and record shapes.
//!
//! Defines the interface for the external durable store holding
//! session and message records, decoupling the orchestration core from
//! the specific storage mechanism (in-memory, TOML files, a remote
//! database). The core only needs insert/update semantics; no reads.

use super::model::{SessionStatus, TurnRole};
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Durable form of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Session identifier.
    pub id: String,
    /// Human-readable record title.
    pub title: String,
    /// Sanitized resume text as submitted.
    pub resume_text: String,
    /// Sanitized job description as submitted.
    pub job_description: String,
    /// Lifecycle status at write time.
    pub status: SessionStatus,
    /// Final feedback, present only once completed.
    pub feedback: Option<String>,
}

/// Durable form of a single transcript turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// The session this message belongs to.
    pub interview_id: String,
    /// Author of the turn.
    pub role: TurnRole,
    /// Sanitized turn content.
    pub content: String,
}

/// An abstract store for session and message records.
///
/// Writes are idempotent in intent: re-inserting a record with the
/// same identity must not fail, so a rolled-back transition can be
/// retried safely.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts (or re-inserts) a session record.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not reach durable storage.
    async fn insert_session(&self, record: &SessionRecord) -> Result<()>;

    /// Appends a message record to a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the write did not reach durable storage.
    async fn insert_message(&self, record: &MessageRecord) -> Result<()>;

    /// Updates a session record by id, setting status and feedback.
    ///
    /// # Errors
    ///
    /// Returns an error if the session is unknown or the write failed.
    async fn update_session(
        &self,
        id: &str,
        status: SessionStatus,
        feedback: Option<&str>,
    ) -> Result<()>;
}
