//! Intervo orchestration core.
//!
//! The domain layer of the mock-interview assistant: the session state
//! machine, the prompt-construction policy, the response extraction
//! policy, and the collaborator traits (generator, record store, text
//! extractor) that infrastructure crates implement.

pub mod error;
pub mod extract;
pub mod extractor;
pub mod generate;
pub mod prompt;
pub mod session;

// Re-export common error types
pub use error::{GenerationError, InputField, InterviewError};
