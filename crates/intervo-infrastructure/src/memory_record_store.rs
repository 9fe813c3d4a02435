//! In-memory record store.
//!
//! The default store for tests and ephemeral runs. Inserts are
//! upserts, matching the idempotent-intent write contract: a
//! rolled-back transition can retry the same write safely.

use anyhow::{Result, bail};
use async_trait::async_trait;
use intervo_core::session::{MessageRecord, RecordStore, SessionRecord, SessionStatus};
use std::collections::HashMap;
use std::sync::Mutex;

/// `Mutex<HashMap>`-backed [`RecordStore`].
#[derive(Default)]
pub struct MemoryRecordStore {
    sessions: Mutex<HashMap<String, SessionRecord>>,
    messages: Mutex<Vec<MessageRecord>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored session record for `id`, if any.
    pub fn session(&self, id: &str) -> Option<SessionRecord> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    /// Counts stored messages belonging to the session `id`.
    pub fn message_count(&self, id: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|record| record.interview_id == id)
            .count()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_session(&self, record: &SessionRecord) -> Result<()> {
        self.sessions
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn insert_message(&self, record: &MessageRecord) -> Result<()> {
        if !self
            .sessions
            .lock()
            .unwrap()
            .contains_key(&record.interview_id)
        {
            bail!("unknown session: {}", record.interview_id);
        }
        self.messages.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn update_session(
        &self,
        id: &str,
        status: SessionStatus,
        feedback: Option<&str>,
    ) -> Result<()> {
        let mut sessions = self.sessions.lock().unwrap();
        let Some(record) = sessions.get_mut(id) else {
            bail!("unknown session: {id}");
        };
        record.status = status;
        record.feedback = feedback.map(String::from);
        Ok(())
    }
}
