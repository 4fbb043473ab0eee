//! Backend-agnostic capabilities consumed by the pipelines.
//!
//! The provider clients in [`crate::services`] implement these traits through
//! [`crate::service_profiles::ProviderClient`]; tests substitute their own
//! doubles. Futures are boxed so the traits stay object safe and can be shared
//! as `Arc<dyn ...>` between request handlers.

pub use futures::future::BoxFuture;

use crate::error_handler::Result;

/// Converts text into a fixed-length vector.
///
/// The dimensionality is backend-defined and must match the one used when the
/// index was populated.
pub trait TextEmbedder: Send + Sync {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>>;
}

/// Turns a prompt into generated text.
pub trait TextGenerator: Send + Sync {
    /// Stable identity of the model and its sampling parameters.
    ///
    /// Two generators with different identities never share cached answers.
    fn llm_string(&self) -> String;

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>>;
}

/// Prompt → answer memo consulted around a [`TextGenerator`].
///
/// Implementations swallow their own failures: a broken cache behaves like an
/// empty one and must never fail a generation.
pub trait LlmCache: Send + Sync {
    fn lookup<'a>(&'a self, prompt: &'a str, llm_string: &'a str)
    -> BoxFuture<'a, Option<String>>;

    fn update<'a>(
        &'a self,
        prompt: &'a str,
        llm_string: &'a str,
        answer: &'a str,
    ) -> BoxFuture<'a, ()>;
}

/// Cache that never hits and never stores.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl LlmCache for NoCache {
    fn lookup<'a>(
        &'a self,
        _prompt: &'a str,
        _llm_string: &'a str,
    ) -> BoxFuture<'a, Option<String>> {
        Box::pin(async { None })
    }

    fn update<'a>(
        &'a self,
        _prompt: &'a str,
        _llm_string: &'a str,
        _answer: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async {})
    }
}
