//! `QuestionGenerator` implementation over a raw inference agent.
//!
//! `AgentGenerator` is the single place where prompt construction and
//! response extraction wrap a generation call, so every call site gets
//! the same fallback behavior instead of duplicating it.

use crate::inference_agent::InferenceAgent;
use async_trait::async_trait;
use intervo_core::error::GenerationError;
use intervo_core::extract::{
    FEEDBACK_OUTAGE_FALLBACK, FOLLOW_UP_OUTAGE_FALLBACK, NOT_ENOUGH_INFORMATION, OPENING_FALLBACK,
    extract_feedback, extract_follow_up_question, extract_initial_question,
};
use intervo_core::generate::QuestionGenerator;
use intervo_core::prompt::{build_feedback_prompt, build_follow_up_prompt, build_initial_prompt};
use intervo_core::session::Turn;
use std::sync::Arc;
use tracing::warn;

/// Adapts an [`InferenceAgent`] to the core's [`QuestionGenerator`]
/// contract: bounded prompts in, sanitized single questions or a
/// feedback block out.
///
/// Reportable failures (credentials, rate limit, server, oversized
/// input) propagate to the orchestrator, which decides whether to roll
/// back or substitute; anything else is masked here with the
/// deterministic fallback for the call type.
pub struct AgentGenerator {
    agent: Arc<dyn InferenceAgent>,
}

impl AgentGenerator {
    /// Creates a generator over the given inference backend.
    pub fn new(agent: Arc<dyn InferenceAgent>) -> Self {
        Self { agent }
    }

    async fn generate_with_fallback(
        &self,
        prompt: &str,
        fallback: &str,
        extract: fn(&str) -> String,
    ) -> Result<String, GenerationError> {
        match self.agent.generate(prompt).await {
            Ok(raw) => Ok(extract(&raw)),
            Err(err) if err.is_reportable() => Err(err),
            Err(err) => {
                warn!(error = %err, "generation failed, substituting fallback");
                Ok(fallback.to_string())
            }
        }
    }
}

#[async_trait]
impl QuestionGenerator for AgentGenerator {
    async fn generate_initial_question(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<String, GenerationError> {
        let prompt = build_initial_prompt(resume_text, job_description)?;
        self.generate_with_fallback(&prompt, OPENING_FALLBACK, extract_initial_question)
            .await
    }

    async fn generate_follow_up_question(
        &self,
        resume_text: &str,
        job_description: &str,
        transcript: &[Turn],
    ) -> Result<String, GenerationError> {
        let prompt = build_follow_up_prompt(resume_text, job_description, transcript)?;
        self.generate_with_fallback(
            &prompt,
            FOLLOW_UP_OUTAGE_FALLBACK,
            extract_follow_up_question,
        )
        .await
    }

    async fn generate_interview_feedback(
        &self,
        transcript: &[Turn],
    ) -> Result<String, GenerationError> {
        // Zero qualifying answers short-circuits to the canned report
        // without touching the backend at all.
        let Some(prompt) = build_feedback_prompt(transcript) else {
            return Ok(NOT_ENOUGH_INFORMATION.to_string());
        };
        let prompt = prompt?;
        self.generate_with_fallback(&prompt, FEEDBACK_OUTAGE_FALLBACK, extract_feedback)
            .await
    }
}
