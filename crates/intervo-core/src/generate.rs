//! Generator collaborator trait.
//!
//! The orchestration core depends on an abstract question/feedback
//! generation capability, not a particular vendor API. Implementations
//! live outside the core (see `intervo-interaction`) and are expected
//! to apply the extraction policy from [`crate::extract`] before
//! returning, so an `Ok` result is always a usable string.

use crate::error::GenerationError;
use crate::session::Turn;
use async_trait::async_trait;

/// Produces interview questions and feedback text.
///
/// Every method returns `Err` only for reportable failures
/// (credentials, rate limiting, server outage, oversized input); an
/// empty or malformed generation is resolved to a deterministic
/// fallback by the implementation and comes back as `Ok`.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Generates the opening interview question from the candidate's
    /// resume and the job description.
    async fn generate_initial_question(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, GenerationError>;

    /// Generates a follow-up question from the inputs plus the
    /// conversation so far.
    async fn generate_follow_up_question(
        &self,
        resume_text: &str,
        job_description: &str,
        transcript: &[Turn],
    ) -> Result<String, GenerationError>;

    /// Generates the structured feedback report from the candidate's
    /// answers. Resume and job description are deliberately not part
    /// of this call.
    async fn generate_interview_feedback(
        &self,
        transcript: &[Turn],
    ) -> Result<String, GenerationError>;
}
