use std::sync::Arc;

use qna_chain::QnaPipelines;
use serde::Serialize;
use tracing::{info, warn};

use crate::session::state::SessionState;

/// What a submission did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Submission {
    /// Blank input; nothing ran.
    Ignored,
    /// Same question already displayed; nothing ran.
    Unchanged,
    Answered,
    /// Pipelines failed; the session shows an error.
    Failed,
}

/// Drives [`SessionState`] transitions with the answer pipelines.
#[derive(Clone)]
pub struct SessionController {
    pipelines: Arc<QnaPipelines>,
}

impl SessionController {
    pub fn new(pipelines: Arc<QnaPipelines>) -> Self {
        Self { pipelines }
    }

    /// Submits `question` to `session`.
    ///
    /// The caller holds the session exclusively for the whole call, so one
    /// session processes one question at a time.
    pub async fn submit(&self, session: &mut SessionState, question: &str) -> Submission {
        let question = question.trim();
        if question.is_empty() {
            return Submission::Ignored;
        }
        if session.is_showing(question) {
            return Submission::Unchanged;
        }

        // Dropping this future mid-await leaves the session as it was.
        let pending = session.begin();
        match self.pipelines.answer_both(question).await {
            Ok(outcome) => {
                info!(
                    docs = outcome.informed.source_documents.len(),
                    "question answered"
                );
                pending.complete(question, outcome);
                Submission::Answered
            }
            Err(err) => {
                warn!(error = %err, "question failed");
                pending.fail(err.user_message());
                Submission::Failed
            }
        }
    }
}
