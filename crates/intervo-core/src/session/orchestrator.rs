//! Interview session state machine.
//!
//! `InterviewOrchestrator` owns one [`InterviewSession`] and is the
//! only place transcript appends and status transitions happen. All
//! user-initiated actions (submit inputs, send answer, end, reset) are
//! serialized through its `&mut self` methods, so no concurrent
//! mutation of the transcript is possible.
//!
//! Durability rule: a transition is committed only after the matching
//! record-store write succeeded. On a write failure the in-memory
//! change is rolled back and the failure surfaces as a recoverable
//! [`InterviewError`], never leaving memory ahead of durable state.

use super::event::{SessionEvent, SessionObserver};
use super::model::{FieldErrors, InterviewSession, SessionStatus, Turn};
use super::repository::{MessageRecord, RecordStore, SessionRecord};
use crate::error::{InputField, InterviewError, Result};
use crate::extract::FOLLOW_UP_OUTAGE_FALLBACK;
use crate::extractor::TextExtractor;
use crate::generate::QuestionGenerator;
use crate::prompt::sanitize_text;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

const MISSING_RESUME: &str = "Please upload your resume";
const MISSING_JOB_DESCRIPTION: &str = "Please enter the job description";
const UNREADABLE_FILE: &str = "Could not read file contents. Please try a different file.";
const SESSION_TITLE: &str = "Interview Session";

/// Drives one interview session through its lifecycle.
///
/// Collaborators are injected as trait objects: the generator produces
/// question/feedback text, the record store receives durable writes,
/// and observers mirror committed transitions into a UI layer.
pub struct InterviewOrchestrator {
    session: InterviewSession,
    store: Arc<dyn RecordStore>,
    generator: Arc<dyn QuestionGenerator>,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl InterviewOrchestrator {
    /// Creates an orchestrator with an empty idle session.
    pub fn new(store: Arc<dyn RecordStore>, generator: Arc<dyn QuestionGenerator>) -> Self {
        Self {
            session: InterviewSession::new(),
            store,
            generator,
            observers: Vec::new(),
        }
    }

    /// Read access to the observable session state.
    pub fn session(&self) -> &InterviewSession {
        &self.session
    }

    /// Registers an observer for committed transitions.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Sets the resume text directly. Editable only before the
    /// interview starts; clears any pending resume field error.
    pub fn set_resume_text(&mut self, text: &str) {
        if self.session.status != SessionStatus::Idle {
            warn!(status = ?self.session.status, "resume is immutable once the interview started");
            return;
        }
        self.session.resume_text = sanitize_text(text);
        self.session.errors.resume = None;
    }

    /// Loads the resume from an uploaded file via the extraction
    /// collaborator.
    ///
    /// # Errors
    ///
    /// A read failure sets a field-scoped resume error and returns
    /// [`InterviewError::Extraction`]; no transition occurs.
    pub async fn load_resume_file(
        &mut self,
        extractor: &dyn TextExtractor,
        path: &Path,
    ) -> Result<()> {
        if self.session.status != SessionStatus::Idle {
            warn!(status = ?self.session.status, "resume is immutable once the interview started");
            return Ok(());
        }
        match extractor.extract(path).await {
            Ok(text) => {
                self.set_resume_text(&text);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "resume extraction failed");
                self.session.errors.resume = Some(UNREADABLE_FILE.to_string());
                Err(InterviewError::extraction(err.to_string()))
            }
        }
    }

    /// Sets the job description text. Editable only before the
    /// interview starts; clears any pending field error.
    pub fn set_job_description_text(&mut self, text: &str) {
        if self.session.status != SessionStatus::Idle {
            warn!(status = ?self.session.status, "job description is immutable once the interview started");
            return;
        }
        self.session.job_description_text = sanitize_text(text);
        self.session.errors.job_description = None;
    }

    /// Validates the inputs, recording field-scoped errors.
    ///
    /// Returns true when both resume and job description are present.
    pub fn validate(&mut self) -> bool {
        let mut errors = FieldErrors::default();
        if self.session.resume_text.is_empty() {
            errors.resume = Some(MISSING_RESUME.to_string());
        }
        if self.session.job_description_text.is_empty() {
            errors.job_description = Some(MISSING_JOB_DESCRIPTION.to_string());
        }
        let ok = errors.is_empty();
        self.session.errors = errors;
        ok
    }

    /// Submits the validated inputs and starts the interview.
    ///
    /// On success the session holds a fresh id, status `InProgress`,
    /// and a transcript with exactly one interviewer turn. Any failure
    /// rolls back to `Idle` with no session created, and the user may
    /// retry.
    ///
    /// # Errors
    ///
    /// [`InterviewError::Validation`] when an input is missing (no
    /// transition), [`InterviewError::Generation`] when the opening
    /// question could not be obtained, [`InterviewError::Persistence`]
    /// when the session record could not be written.
    pub async fn submit_inputs(&mut self) -> Result<()> {
        if self.session.status != SessionStatus::Idle {
            warn!(status = ?self.session.status, "submit_inputs ignored: interview already started");
            return Ok(());
        }
        if !self.validate() {
            if let Some(message) = self.session.errors.resume.clone() {
                return Err(InterviewError::validation(InputField::Resume, message));
            }
            let message = self
                .session
                .errors
                .job_description
                .clone()
                .unwrap_or_default();
            return Err(InterviewError::validation(
                InputField::JobDescription,
                message,
            ));
        }

        self.set_status(SessionStatus::Starting);
        match self.start_interview().await {
            Ok(()) => {
                self.set_status(SessionStatus::InProgress);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "starting the interview failed, rolling back to idle");
                self.session.id = None;
                self.session.transcript.clear();
                self.session.started_at = None;
                self.set_status(SessionStatus::Idle);
                Err(err)
            }
        }
    }

    async fn start_interview(&mut self) -> Result<()> {
        let question = self
            .generator
            .generate_initial_question(
                &self.session.resume_text,
                &self.session.job_description_text,
            )
            .await?;

        let id = uuid::Uuid::new_v4().to_string();
        let record = SessionRecord {
            id: id.clone(),
            title: SESSION_TITLE.to_string(),
            resume_text: self.session.resume_text.clone(),
            job_description: self.session.job_description_text.clone(),
            status: SessionStatus::InProgress,
            feedback: None,
        };
        self.store
            .insert_session(&record)
            .await
            .map_err(|err| InterviewError::persistence(err.to_string()))?;

        let turn = Turn::interviewer(question);
        self.store
            .insert_message(&MessageRecord {
                interview_id: id.clone(),
                role: turn.role,
                content: turn.content.clone(),
            })
            .await
            .map_err(|err| InterviewError::persistence(err.to_string()))?;

        self.session.id = Some(id);
        self.session.transcript.push(turn.clone());
        self.session.started_at = Some(chrono::Utc::now());
        self.notify(&SessionEvent::TurnAppended { turn });
        Ok(())
    }

    /// Records a candidate answer and fetches the next question.
    ///
    /// Ignored unless the session is `InProgress` (the status check is
    /// the re-entrancy guard: no new send while a start or end is
    /// outstanding). Once the interviewer turn limit is reached the
    /// submission is not answered; the session goes straight to the
    /// ending flow.
    ///
    /// A follow-up generation failure never blocks the interview: the
    /// turn is answered with a deterministic fallback question.
    ///
    /// # Errors
    ///
    /// [`InterviewError::Persistence`] when a message write failed; the
    /// in-memory turn is rolled back and the same answer may be
    /// resubmitted.
    pub async fn send_answer(&mut self, content: &str) -> Result<()> {
        if self.session.status != SessionStatus::InProgress {
            debug!(status = ?self.session.status, "send_answer ignored");
            return Ok(());
        }
        let Some(id) = self.session.id.clone() else {
            return Err(InterviewError::internal("in-progress session without an id"));
        };

        if self.session.turn_limit_reached() {
            debug!("interviewer turn limit reached, ending interview");
            return self.end_interview().await;
        }

        let answer = Turn::candidate(sanitize_text(content.trim()));
        self.append_turn(&id, answer).await?;

        let question = match self
            .generator
            .generate_follow_up_question(
                &self.session.resume_text,
                &self.session.job_description_text,
                &self.session.transcript,
            )
            .await
        {
            Ok(question) => question,
            Err(err) => {
                warn!(error = %err, "follow-up generation failed, using fallback question");
                FOLLOW_UP_OUTAGE_FALLBACK.to_string()
            }
        };

        self.append_turn(&id, Turn::interviewer(question)).await
    }

    async fn append_turn(&mut self, interview_id: &str, turn: Turn) -> Result<()> {
        self.session.transcript.push(turn.clone());
        let write = self
            .store
            .insert_message(&MessageRecord {
                interview_id: interview_id.to_string(),
                role: turn.role,
                content: turn.content.clone(),
            })
            .await;
        if let Err(err) = write {
            // Keep memory in step with durable state.
            self.session.transcript.pop();
            return Err(InterviewError::persistence(err.to_string()));
        }
        self.notify(&SessionEvent::TurnAppended { turn });
        Ok(())
    }

    /// Ends the interview and produces the feedback report.
    ///
    /// Ignored unless the session is `InProgress`. On failure the
    /// session returns to `InProgress` with no partial feedback kept;
    /// the call may be retried.
    ///
    /// # Errors
    ///
    /// [`InterviewError::Generation`] when the report could not be
    /// obtained, [`InterviewError::Persistence`] when the completion
    /// update could not be written.
    pub async fn end_interview(&mut self) -> Result<()> {
        if self.session.status != SessionStatus::InProgress {
            debug!(status = ?self.session.status, "end_interview ignored");
            return Ok(());
        }
        let Some(id) = self.session.id.clone() else {
            return Err(InterviewError::internal("in-progress session without an id"));
        };

        self.set_status(SessionStatus::Ending);
        match self.finish_interview(&id).await {
            Ok(feedback) => {
                self.session.feedback = Some(feedback.clone());
                self.set_status(SessionStatus::Completed);
                self.notify(&SessionEvent::FeedbackReady { feedback });
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "ending the interview failed, returning to in_progress");
                self.set_status(SessionStatus::InProgress);
                Err(err)
            }
        }
    }

    async fn finish_interview(&self, id: &str) -> Result<String> {
        let feedback = self
            .generator
            .generate_interview_feedback(&self.session.transcript)
            .await?;
        let feedback = sanitize_text(&feedback);
        self.store
            .update_session(id, SessionStatus::Completed, Some(&feedback))
            .await
            .map_err(|err| InterviewError::persistence(err.to_string()))?;
        Ok(feedback)
    }

    /// Clears the session back to its initial state.
    ///
    /// Atomic from the caller's point of view: id, texts, transcript,
    /// status, feedback and field errors are all reset together.
    /// Calling reset twice yields the same cleared state.
    pub fn reset(&mut self) {
        self.session = InterviewSession::new();
        self.notify(&SessionEvent::SessionReset);
    }

    fn set_status(&mut self, status: SessionStatus) {
        self.session.status = status;
        self.notify(&SessionEvent::StatusChanged { status });
    }

    fn notify(&self, event: &SessionEvent) {
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}
