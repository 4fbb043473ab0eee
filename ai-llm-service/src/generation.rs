//! Generation wrapped by an explicitly injected answer cache.

use std::sync::Arc;

use tracing::debug;

use crate::capabilities::{BoxFuture, LlmCache, TextGenerator};
use crate::error_handler::Result;

/// [`TextGenerator`] that consults an [`LlmCache`] before calling `inner`.
///
/// On a hit the stored answer is returned and `inner` is not called. On a
/// miss `inner` runs and its answer is written back. Callers cannot tell the
/// two apart.
#[derive(Clone)]
pub struct CachedGenerator {
    inner: Arc<dyn TextGenerator>,
    cache: Arc<dyn LlmCache>,
}

impl CachedGenerator {
    pub fn new(inner: Arc<dyn TextGenerator>, cache: Arc<dyn LlmCache>) -> Self {
        Self { inner, cache }
    }
}

impl TextGenerator for CachedGenerator {
    fn llm_string(&self) -> String {
        self.inner.llm_string()
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        Box::pin(async move {
            let llm = self.inner.llm_string();

            if let Some(hit) = self.cache.lookup(prompt, &llm).await {
                debug!(llm = %llm, "answer cache hit");
                return Ok(hit);
            }
            debug!(llm = %llm, "answer cache miss");

            let answer = self.inner.generate(prompt).await?;
            self.cache.update(prompt, &llm, &answer).await;
            Ok(answer)
        })
    }
}
