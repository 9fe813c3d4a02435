//! Interview session domain module.
//!
//! Contains the session model, transcript types, the orchestration
//! state machine, the record-store interface, and session events.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`InterviewSession`, `Turn`)
//! - `event`: Committed-transition events and the observer trait
//! - `repository`: Record-store trait and durable record shapes
//! - `orchestrator`: The interview state machine

mod event;
mod model;
mod orchestrator;
mod repository;

#[cfg(test)]
mod orchestrator_test;

// Re-export public API
pub use event::{SessionEvent, SessionObserver};
pub use model::{
    FieldErrors, INTERVIEWER_TURN_LIMIT, InterviewSession, SessionStatus, Turn, TurnRole,
};
pub use orchestrator::InterviewOrchestrator;
pub use repository::{MessageRecord, RecordStore, SessionRecord};
