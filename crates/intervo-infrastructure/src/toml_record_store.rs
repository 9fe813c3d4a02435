//! TOML file record store.
//!
//! Persists each session as one TOML document under a data directory:
//! a `[session]` table plus an append-only `[[messages]]` array.
//! Writes go through a tmp file followed by an atomic rename so a
//! crashed write never leaves a half-written document behind.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use intervo_core::session::{MessageRecord, RecordStore, SessionRecord, SessionStatus};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionDocument {
    session: Option<SessionRecord>,
    #[serde(default)]
    messages: Vec<MessageRecord>,
}

/// File-backed [`RecordStore`] writing one TOML document per session.
pub struct TomlRecordStore {
    dir: PathBuf,
}

impl TomlRecordStore {
    /// Creates a store rooted at `dir`, creating the directory if
    /// needed.
    pub async fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("failed to create record store dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn document_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.toml"))
    }

    async fn load(&self, path: &Path) -> Result<SessionDocument> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    async fn save(&self, path: &Path, document: &SessionDocument) -> Result<()> {
        let content = toml::to_string(document).context("failed to serialize session document")?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, content)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .await
            .with_context(|| format!("failed to replace {}", path.display()))?;
        debug!(path = %path.display(), "session document written");
        Ok(())
    }
}

#[async_trait]
impl RecordStore for TomlRecordStore {
    async fn insert_session(&self, record: &SessionRecord) -> Result<()> {
        let path = self.document_path(&record.id);
        // Re-inserting keeps already-stored messages (idempotent intent).
        let mut document = if path.exists() {
            self.load(&path).await?
        } else {
            SessionDocument::default()
        };
        document.session = Some(record.clone());
        self.save(&path, &document).await
    }

    async fn insert_message(&self, record: &MessageRecord) -> Result<()> {
        let path = self.document_path(&record.interview_id);
        if !path.exists() {
            bail!("unknown session: {}", record.interview_id);
        }
        let mut document = self.load(&path).await?;
        document.messages.push(record.clone());
        self.save(&path, &document).await
    }

    async fn update_session(
        &self,
        id: &str,
        status: SessionStatus,
        feedback: Option<&str>,
    ) -> Result<()> {
        let path = self.document_path(id);
        if !path.exists() {
            bail!("unknown session: {id}");
        }
        let mut document = self.load(&path).await?;
        let Some(session) = document.session.as_mut() else {
            bail!("session document without a session table: {id}");
        };
        session.status = status;
        session.feedback = feedback.map(String::from);
        self.save(&path, &document).await
    }
}
