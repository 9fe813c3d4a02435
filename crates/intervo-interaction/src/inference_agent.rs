//! Raw text-generation agent trait.

use async_trait::async_trait;
use intervo_core::error::GenerationError;

/// A raw prompt-in, text-out generation backend.
///
/// Implementations handle transport and authentication only; prompt
/// construction and response extraction live in
/// [`crate::generator::AgentGenerator`].
#[async_trait]
pub trait InferenceAgent: Send + Sync {
    /// Sends a prompt and returns the generated text.
    ///
    /// An empty string is a valid result (the extraction policy
    /// resolves it to a fallback); `Err` is reserved for transport,
    /// credential, rate-limit and server failures.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
