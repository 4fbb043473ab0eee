use serde::{Deserialize, Serialize};

use crate::session::{SessionView, Submission};

/// Request payload for `POST /api/ask` and the `POST /ask` form.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question; blank input is a no-op.
    pub question: String,
}

/// Response payload for `POST /api/ask`.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// What the submission did (`answered`, `unchanged`, `ignored`, `failed`).
    pub submission: Submission,
    pub session: SessionView,
}
