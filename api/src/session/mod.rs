//! UI session controller: per-user state machine over the answer pipelines.

pub mod controller;
pub mod registry;
pub mod state;

pub use controller::{SessionController, Submission};
pub use registry::{SESSION_COOKIE, SessionRegistry, SharedSession, session_cookie, session_id};
pub use state::{Phase, SessionState, SessionView};
