//! Per-user session state: the last question and what is on screen for it.

use qna_chain::QnaOutcome;
use serde::Serialize;

/// Where a session is in its question/answer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No question answered yet.
    #[default]
    Idle,
    /// A question was submitted and the pipelines are running.
    Awaiting,
    /// Results for `current_question` are shown.
    Displaying,
}

/// Explicit replacement for implicit UI session storage.
///
/// Answer fields always belong to `current_question`; a failed submission
/// leaves them untouched and only sets `error`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    phase: Phase,
    current_question: Option<String>,
    answer: Option<String>,
    context: Vec<String>,
    baseline_answer: Option<String>,
    error: Option<String>,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&str> {
        self.current_question.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when `question` is already displayed without an error, so a
    /// resubmission must not recompute anything.
    pub fn is_showing(&self, question: &str) -> bool {
        self.phase == Phase::Displaying
            && self.error.is_none()
            && self.current_question.as_deref() == Some(question)
    }

    /// Idle/Displaying → Awaiting.
    ///
    /// The returned guard must be resolved with [`Pending::complete`] or
    /// [`Pending::fail`]; dropping it unresolved puts the previous phase back.
    pub(crate) fn begin(&mut self) -> Pending<'_> {
        let previous = self.phase;
        self.phase = Phase::Awaiting;
        Pending {
            session: self,
            previous,
            resolved: false,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            question: self.current_question.clone(),
            answer: self.answer.clone(),
            context: self.context.clone(),
            baseline_answer: self.baseline_answer.clone(),
            error: self.error.clone(),
        }
    }
}

/// A submission in flight. Holds the session until it resolves.
pub(crate) struct Pending<'a> {
    session: &'a mut SessionState,
    previous: Phase,
    resolved: bool,
}

impl Pending<'_> {
    /// Awaiting → Displaying; the previous answer is discarded.
    pub(crate) fn complete(mut self, question: &str, outcome: QnaOutcome) {
        let s = &mut *self.session;
        s.phase = Phase::Displaying;
        s.current_question = Some(question.to_string());
        s.context = outcome
            .informed
            .source_documents
            .into_iter()
            .map(|d| d.content)
            .collect();
        s.answer = Some(outcome.informed.answer);
        s.baseline_answer = Some(outcome.baseline);
        s.error = None;
        self.resolved = true;
    }

    /// Awaiting → previous phase, with a message to show instead of answers.
    pub(crate) fn fail(mut self, message: impl Into<String>) {
        self.session.phase = self.previous;
        self.session.error = Some(message.into());
        self.resolved = true;
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        // Abandoned (e.g. the request future was cancelled): nothing changed.
        if !self.resolved {
            self.session.phase = self.previous;
        }
    }
}

/// Serializable snapshot of a session, used by the JSON API and the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub phase: Phase,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub context: Vec<String>,
    pub baseline_answer: Option<String>,
    pub error: Option<String>,
}

impl SessionView {
    /// Context documents as shown in the expandable panel.
    pub fn context_text(&self) -> String {
        self.context.join("\n")
    }
}
