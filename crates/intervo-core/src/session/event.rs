//! Session events and the observer interface.
//!
//! The orchestrator emits an event after every committed transition so
//! a UI layer can mirror session state without sharing mutable state
//! with the core.

use super::model::{SessionStatus, Turn};
use serde::{Deserialize, Serialize};

/// Notification emitted after a committed session transition.
///
/// Events describe state that has already been persisted (or rolled
/// back); observers never see a transition that later failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The session moved to a new status.
    StatusChanged { status: SessionStatus },
    /// A turn was appended to the transcript and persisted.
    TurnAppended { turn: Turn },
    /// The feedback report was stored.
    FeedbackReady { feedback: String },
    /// The session was cleared back to its initial state.
    SessionReset,
}

/// Receives [`SessionEvent`]s from the orchestrator.
pub trait SessionObserver: Send + Sync {
    /// Called synchronously after each committed transition.
    fn on_event(&self, event: &SessionEvent);
}
