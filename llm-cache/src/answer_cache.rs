//! The answer cache as seen by the generation path.

use std::sync::Arc;

use ai_llm_service::{BoxFuture, LlmCache, TextEmbedder};
use tracing::{debug, warn};

use crate::config::{CacheConfig, CacheMode};
use crate::errors::Result;
use crate::store::CacheStore;

/// Disabled, exact-match or semantic cache over a [`CacheStore`].
///
/// Implements [`LlmCache`], so it is injected into
/// [`ai_llm_service::generation::CachedGenerator`] and stays invisible to the
/// pipelines. Store or embedding failures are logged and count as misses.
#[derive(Clone)]
pub enum AnswerCache {
    Disabled,
    Exact {
        store: Arc<dyn CacheStore>,
    },
    Semantic {
        store: Arc<dyn CacheStore>,
        embedder: Arc<dyn TextEmbedder>,
        max_distance: f32,
    },
}

impl AnswerCache {
    /// Picks the variant for `cfg.mode`.
    pub fn from_config(
        cfg: &CacheConfig,
        store: Arc<dyn CacheStore>,
        embedder: Arc<dyn TextEmbedder>,
    ) -> Self {
        match cfg.mode {
            CacheMode::Disabled => AnswerCache::Disabled,
            CacheMode::Exact => AnswerCache::Exact { store },
            CacheMode::Semantic => AnswerCache::Semantic {
                store,
                embedder,
                max_distance: cfg.max_distance,
            },
        }
    }

    pub fn mode(&self) -> CacheMode {
        match self {
            AnswerCache::Disabled => CacheMode::Disabled,
            AnswerCache::Exact { .. } => CacheMode::Exact,
            AnswerCache::Semantic { .. } => CacheMode::Semantic,
        }
    }

    async fn try_lookup(&self, prompt: &str, llm: &str) -> Result<Option<String>> {
        match self {
            AnswerCache::Disabled => Ok(None),
            AnswerCache::Exact { store } => store.get_exact(llm, prompt).await,
            AnswerCache::Semantic {
                store,
                embedder,
                max_distance,
            } => {
                let vector = embedder.embed(prompt).await?;
                store.nearest(llm, &vector, *max_distance).await
            }
        }
    }

    async fn try_update(&self, prompt: &str, llm: &str, answer: &str) -> Result<()> {
        match self {
            AnswerCache::Disabled => Ok(()),
            AnswerCache::Exact { store } => store.put_exact(llm, prompt, answer).await,
            AnswerCache::Semantic {
                store, embedder, ..
            } => {
                let vector = embedder.embed(prompt).await?;
                store.put_vector(llm, prompt, &vector, answer).await
            }
        }
    }
}

impl LlmCache for AnswerCache {
    fn lookup<'a>(&'a self, prompt: &'a str, llm_string: &'a str) -> BoxFuture<'a, Option<String>> {
        Box::pin(async move {
            match self.try_lookup(prompt, llm_string).await {
                Ok(hit) => {
                    debug!(mode = %self.mode(), hit = hit.is_some(), "answer cache lookup");
                    hit
                }
                Err(e) => {
                    warn!(
                        mode = %self.mode(),
                        error = %e,
                        "answer cache lookup failed, treating as miss"
                    );
                    None
                }
            }
        })
    }

    fn update<'a>(
        &'a self,
        prompt: &'a str,
        llm_string: &'a str,
        answer: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            if let Err(e) = self.try_update(prompt, llm_string, answer).await {
                warn!(mode = %self.mode(), error = %e, "answer cache update dropped");
            }
        })
    }
}
