//! Text extraction collaborator trait.

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;

/// Extracts plain text from an uploaded file.
///
/// The core only consumes the resulting string; parsing of specific
/// document formats is an infrastructure concern.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    /// Reads the file at `path` and returns its plain-text content.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    async fn extract(&self, path: &Path) -> Result<String>;
}
