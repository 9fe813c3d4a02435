//! Generator collaborator for the Intervo orchestration core.
//!
//! Provides the raw inference agent abstraction, the DeepInfra HTTP
//! implementation, and the [`generator::AgentGenerator`] adapter that
//! turns raw generations into sanitized questions and feedback.

pub mod deepinfra_api_agent;
pub mod generator;
pub mod inference_agent;

pub use deepinfra_api_agent::DeepInfraApiAgent;
pub use generator::AgentGenerator;
pub use inference_agent::InferenceAgent;
