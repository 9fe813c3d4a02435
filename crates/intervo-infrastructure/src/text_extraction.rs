//! Plain-text file extraction.

use anyhow::{Context, Result};
use async_trait::async_trait;
use intervo_core::extractor::TextExtractor;
use intervo_core::prompt::sanitize_text;
use std::path::Path;
use tokio::fs;

/// Reads an uploaded file as UTF-8 plain text.
///
/// Content is sanitized (NUL and non-characters dropped) before it is
/// handed to the core; rich document formats are out of scope here.
#[derive(Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(sanitize_text(&content))
    }
}
