//! State machine tests with scripted collaborators.

use super::event::{SessionEvent, SessionObserver};
use super::model::{INTERVIEWER_TURN_LIMIT, SessionStatus, TurnRole};
use super::orchestrator::InterviewOrchestrator;
use super::repository::{MessageRecord, RecordStore, SessionRecord};
use crate::error::{GenerationError, InterviewError};
use crate::extract::FOLLOW_UP_OUTAGE_FALLBACK;
use crate::generate::QuestionGenerator;
use crate::session::Turn;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockGenerator {
    fail_initial: Mutex<Option<GenerationError>>,
    fail_follow_up: Mutex<Option<GenerationError>>,
    fail_feedback: Mutex<Option<GenerationError>>,
    initial_calls: AtomicUsize,
    follow_up_calls: AtomicUsize,
    feedback_calls: AtomicUsize,
}

impl MockGenerator {
    fn fail_initial_with(&self, err: GenerationError) {
        *self.fail_initial.lock().unwrap() = Some(err);
    }

    fn fail_follow_up_with(&self, err: GenerationError) {
        *self.fail_follow_up.lock().unwrap() = Some(err);
    }

    fn fail_feedback_with(&self, err: GenerationError) {
        *self.fail_feedback.lock().unwrap() = Some(err);
    }

    fn clear_feedback_failure(&self) {
        *self.fail_feedback.lock().unwrap() = None;
    }
}

#[async_trait]
impl QuestionGenerator for MockGenerator {
    async fn generate_initial_question(
        &self,
        _resume_text: &str,
        _job_description: &str,
    ) -> Result<String, GenerationError> {
        self.initial_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_initial.lock().unwrap().clone() {
            return Err(err);
        }
        Ok("Tell me about your experience with Rust?".to_string())
    }

    async fn generate_follow_up_question(
        &self,
        _resume_text: &str,
        _job_description: &str,
        transcript: &[Turn],
    ) -> Result<String, GenerationError> {
        self.follow_up_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_follow_up.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(format!("Follow-up question {}?", transcript.len()))
    }

    async fn generate_interview_feedback(
        &self,
        _transcript: &[Turn],
    ) -> Result<String, GenerationError> {
        self.feedback_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_feedback.lock().unwrap().clone() {
            return Err(err);
        }
        Ok("1. Overall Assessment\nSolid performance.".to_string())
    }
}

#[derive(Default)]
struct MockRecordStore {
    sessions: Mutex<Vec<SessionRecord>>,
    messages: Mutex<Vec<MessageRecord>>,
    updates: Mutex<Vec<(String, SessionStatus, Option<String>)>>,
    fail_sessions: AtomicBool,
    fail_messages: AtomicBool,
    fail_updates: AtomicBool,
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn insert_session(&self, record: &SessionRecord) -> anyhow::Result<()> {
        if self.fail_sessions.load(Ordering::SeqCst) {
            anyhow::bail!("session write refused");
        }
        self.sessions.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn insert_message(&self, record: &MessageRecord) -> anyhow::Result<()> {
        if self.fail_messages.load(Ordering::SeqCst) {
            anyhow::bail!("message write refused");
        }
        self.messages.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn update_session(
        &self,
        id: &str,
        status: SessionStatus,
        feedback: Option<&str>,
    ) -> anyhow::Result<()> {
        if self.fail_updates.load(Ordering::SeqCst) {
            anyhow::bail!("update write refused");
        }
        self.updates
            .lock()
            .unwrap()
            .push((id.to_string(), status, feedback.map(String::from)));
        Ok(())
    }
}

struct CollectingObserver {
    events: Arc<Mutex<Vec<SessionEvent>>>,
}

impl SessionObserver for CollectingObserver {
    fn on_event(&self, event: &SessionEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

fn orchestrator_with_inputs() -> (
    InterviewOrchestrator,
    Arc<MockRecordStore>,
    Arc<MockGenerator>,
) {
    let store = Arc::new(MockRecordStore::default());
    let generator = Arc::new(MockGenerator::default());
    let mut orchestrator = InterviewOrchestrator::new(store.clone(), generator.clone());
    orchestrator.set_resume_text("Senior engineer with ten years of backend experience.");
    orchestrator.set_job_description_text("Backend role building distributed systems.");
    (orchestrator, store, generator)
}

async fn run_to_turn_limit(orchestrator: &mut InterviewOrchestrator) {
    orchestrator.submit_inputs().await.unwrap();
    // One interviewer turn exists; each answered round adds one more.
    for _ in 0..INTERVIEWER_TURN_LIMIT - 1 {
        orchestrator
            .send_answer("I designed and operated several large production systems.")
            .await
            .unwrap();
    }
    assert_eq!(
        orchestrator.session().interviewer_turn_count(),
        INTERVIEWER_TURN_LIMIT
    );
}

#[tokio::test]
async fn submitting_inputs_starts_with_one_interviewer_turn() {
    let (mut orchestrator, store, _) = orchestrator_with_inputs();

    orchestrator.submit_inputs().await.unwrap();

    let session = orchestrator.session();
    assert_eq!(session.status, SessionStatus::InProgress);
    assert!(session.id.is_some());
    assert!(session.started_at.is_some());
    assert_eq!(session.transcript.len(), 1);
    assert_eq!(session.transcript[0].role, TurnRole::Interviewer);

    assert_eq!(store.sessions.lock().unwrap().len(), 1);
    assert_eq!(store.messages.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn rate_limit_during_start_rolls_back_to_idle() {
    let (mut orchestrator, store, generator) = orchestrator_with_inputs();
    generator.fail_initial_with(GenerationError::RateLimited);

    let err = orchestrator.submit_inputs().await.unwrap_err();
    assert!(matches!(
        err,
        InterviewError::Generation(GenerationError::RateLimited)
    ));

    let session = orchestrator.session();
    assert_eq!(session.status, SessionStatus::Idle);
    assert!(session.id.is_none());
    assert!(session.transcript.is_empty());
    // No record-store insert happened.
    assert!(store.sessions.lock().unwrap().is_empty());
    assert!(store.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn missing_inputs_block_submission_without_transition() {
    let store = Arc::new(MockRecordStore::default());
    let generator = Arc::new(MockGenerator::default());
    let mut orchestrator = InterviewOrchestrator::new(store, generator.clone());
    orchestrator.set_resume_text("Senior engineer.");

    let err = orchestrator.submit_inputs().await.unwrap_err();
    assert!(err.is_validation());

    let session = orchestrator.session();
    assert_eq!(session.status, SessionStatus::Idle);
    assert!(session.errors.job_description.is_some());
    assert!(session.errors.resume.is_none());
    assert_eq!(generator.initial_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn answers_are_followed_by_new_questions() {
    let (mut orchestrator, store, _) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();

    orchestrator
        .send_answer("I led the migration to an event-driven architecture.")
        .await
        .unwrap();

    let session = orchestrator.session();
    assert_eq!(session.transcript.len(), 3);
    assert_eq!(session.transcript[1].role, TurnRole::Candidate);
    assert_eq!(session.transcript[2].role, TurnRole::Interviewer);
    assert_eq!(store.messages.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn follow_up_outage_is_masked_with_fallback_question() {
    let (mut orchestrator, _, generator) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();
    generator.fail_follow_up_with(GenerationError::Server);

    orchestrator
        .send_answer("I built the payments pipeline end to end.")
        .await
        .unwrap();

    let session = orchestrator.session();
    let last = session.transcript.last().unwrap();
    assert_eq!(last.role, TurnRole::Interviewer);
    assert_eq!(last.content, FOLLOW_UP_OUTAGE_FALLBACK);
    assert_eq!(session.status, SessionStatus::InProgress);
}

#[tokio::test]
async fn turn_limit_forces_ending_without_a_new_question() {
    let (mut orchestrator, store, generator) = orchestrator_with_inputs();
    run_to_turn_limit(&mut orchestrator).await;
    let turns_before = orchestrator.session().transcript.len();

    orchestrator.send_answer("ok").await.unwrap();

    let session = orchestrator.session();
    assert_eq!(session.status, SessionStatus::Completed);
    assert!(session.feedback.is_some());
    assert_eq!(
        session.interviewer_turn_count(),
        INTERVIEWER_TURN_LIMIT,
        "no follow-up question may be issued past the limit"
    );
    assert_eq!(session.transcript.len(), turns_before);
    assert_eq!(generator.feedback_calls.load(Ordering::SeqCst), 1);

    let updates = store.updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].1, SessionStatus::Completed);
    assert!(updates[0].2.is_some());
}

#[tokio::test]
async fn message_write_failure_rolls_back_the_turn() {
    let (mut orchestrator, store, _) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();
    store.fail_messages.store(true, Ordering::SeqCst);

    let err = orchestrator
        .send_answer("This answer never reaches durable storage.")
        .await
        .unwrap_err();

    assert!(err.is_persistence());
    let session = orchestrator.session();
    // Only the opening question remains; the candidate turn was rolled back.
    assert_eq!(session.transcript.len(), 1);
    assert_eq!(session.status, SessionStatus::InProgress);
}

#[tokio::test]
async fn session_write_failure_rolls_back_to_idle() {
    let (mut orchestrator, store, _) = orchestrator_with_inputs();
    store.fail_sessions.store(true, Ordering::SeqCst);

    let err = orchestrator.submit_inputs().await.unwrap_err();
    assert!(err.is_persistence());

    let session = orchestrator.session();
    assert_eq!(session.status, SessionStatus::Idle);
    assert!(session.id.is_none());
    assert!(store.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn failed_ending_returns_to_in_progress_and_is_retryable() {
    let (mut orchestrator, _, generator) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();
    orchestrator
        .send_answer("I mentored four engineers on the team.")
        .await
        .unwrap();

    generator.fail_feedback_with(GenerationError::Server);
    let err = orchestrator.end_interview().await.unwrap_err();
    assert!(matches!(
        err,
        InterviewError::Generation(GenerationError::Server)
    ));
    assert_eq!(orchestrator.session().status, SessionStatus::InProgress);
    assert!(orchestrator.session().feedback.is_none());

    generator.clear_feedback_failure();
    orchestrator.end_interview().await.unwrap();
    assert_eq!(orchestrator.session().status, SessionStatus::Completed);
    assert!(orchestrator.session().feedback.is_some());
}

#[tokio::test]
async fn completion_write_failure_returns_to_in_progress_and_is_retryable() {
    let (mut orchestrator, store, _) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();
    orchestrator
        .send_answer("I rebuilt the deployment pipeline from scratch.")
        .await
        .unwrap();

    store.fail_updates.store(true, Ordering::SeqCst);
    let err = orchestrator.end_interview().await.unwrap_err();
    assert!(err.is_persistence());
    // The feedback was generated but must not be kept past the failed write.
    assert_eq!(orchestrator.session().status, SessionStatus::InProgress);
    assert!(orchestrator.session().feedback.is_none());
    assert!(store.updates.lock().unwrap().is_empty());

    store.fail_updates.store(false, Ordering::SeqCst);
    orchestrator.end_interview().await.unwrap();
    assert_eq!(orchestrator.session().status, SessionStatus::Completed);
    assert!(orchestrator.session().feedback.is_some());
    assert_eq!(store.updates.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn reset_clears_everything_and_is_idempotent() {
    let (mut orchestrator, _, _) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();
    orchestrator
        .send_answer("An answer that will be discarded by reset.")
        .await
        .unwrap();

    orchestrator.reset();
    let first = orchestrator.session().clone();
    orchestrator.reset();
    let second = orchestrator.session().clone();

    assert_eq!(first, second);
    assert_eq!(first.status, SessionStatus::Idle);
    assert!(first.id.is_none());
    assert!(first.resume_text.is_empty());
    assert!(first.transcript.is_empty());
    assert!(first.feedback.is_none());
    assert!(first.errors.is_empty());
}

#[tokio::test]
async fn send_answer_is_ignored_outside_in_progress() {
    let (mut orchestrator, store, generator) = orchestrator_with_inputs();

    orchestrator.send_answer("too early").await.unwrap();

    assert!(orchestrator.session().transcript.is_empty());
    assert_eq!(generator.follow_up_calls.load(Ordering::SeqCst), 0);
    assert!(store.messages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn inputs_are_immutable_once_started() {
    let (mut orchestrator, _, _) = orchestrator_with_inputs();
    orchestrator.submit_inputs().await.unwrap();

    orchestrator.set_resume_text("replacement resume");
    orchestrator.set_job_description_text("replacement jd");

    let session = orchestrator.session();
    assert!(session.resume_text.starts_with("Senior engineer"));
    assert!(session.job_description_text.starts_with("Backend role"));
}

#[tokio::test]
async fn observers_see_committed_transitions_in_order() {
    let (mut orchestrator, _, _) = orchestrator_with_inputs();
    let events = Arc::new(Mutex::new(Vec::new()));
    orchestrator.subscribe(Box::new(CollectingObserver {
        events: events.clone(),
    }));

    orchestrator.submit_inputs().await.unwrap();

    let events = events.lock().unwrap();
    let statuses: Vec<SessionStatus> = events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::StatusChanged { status } => Some(*status),
            _ => None,
        })
        .collect();
    assert_eq!(
        statuses,
        vec![SessionStatus::Starting, SessionStatus::InProgress]
    );
    assert!(
        events
            .iter()
            .any(|event| matches!(event, SessionEvent::TurnAppended { .. }))
    );
}
