//! Both pipelines behind one entry point, and their construction from settings.

use std::sync::Arc;

use ai_llm_service::{LlmCache, LlmServiceProfiles, TextEmbedder};
use llm_cache::{AnswerCache, CacheMode, QdrantCacheStore};
use rag_store::{QdrantStore, VectorStore};
use tracing::{info, instrument};

use crate::cfg::QnaSettings;
use crate::direct_qa::DirectQa;
use crate::error::Result;
use crate::prompt::PromptTemplate;
use crate::retrieval_qa::{RagAnswer, RetrievalQa};

/// Results of one question through both pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct QnaOutcome {
    pub informed: RagAnswer,
    pub baseline: String,
}

pub struct QnaPipelines {
    retrieval: RetrievalQa,
    direct: DirectQa,
}

impl QnaPipelines {
    pub fn new(retrieval: RetrievalQa, direct: DirectQa) -> Self {
        Self { retrieval, direct }
    }

    /// Runs both pipelines concurrently; fails if either fails.
    #[instrument(skip_all)]
    pub async fn answer_both(&self, question: &str) -> Result<QnaOutcome> {
        let (informed, baseline) =
            tokio::try_join!(self.retrieval.ask(question), self.direct.ask(question))?;
        Ok(QnaOutcome { informed, baseline })
    }
}

/// Everything the web layer needs, built once at startup.
pub struct QnaRuntime {
    pub pipelines: Arc<QnaPipelines>,
    pub llm: Arc<LlmServiceProfiles>,
    pub store: Arc<dyn VectorStore>,
    pub cache_mode: CacheMode,
}

/// Builds providers, cache, vector store and both pipelines.
///
/// # Errors
/// Fails on provider construction errors, an unreachable Qdrant, or a
/// missing index.
pub async fn build_runtime(settings: &QnaSettings) -> Result<QnaRuntime> {
    let llm = Arc::new(LlmServiceProfiles::new(&settings.llm, Some(10))?);
    let embedder = llm.embedder();

    let cache = build_cache(settings, embedder.clone())?;
    let cache_mode = cache.mode();

    let store: Arc<dyn VectorStore> = Arc::new(QdrantStore::new(&settings.rag)?);

    let retrieval = RetrievalQa::connect(
        embedder,
        store.clone(),
        llm.answer_generator(Arc::new(cache) as Arc<dyn LlmCache>),
        PromptTemplate::qa(),
        settings.chain.clone(),
    )
    .await?;
    let direct = DirectQa::new(llm.direct_generator(), PromptTemplate::direct());

    info!(
        kind = %settings.llm.kind,
        index = %settings.rag.index,
        cache = %cache_mode,
        "pipelines built"
    );

    Ok(QnaRuntime {
        pipelines: Arc::new(QnaPipelines::new(retrieval, direct)),
        llm,
        store,
        cache_mode,
    })
}

fn build_cache(settings: &QnaSettings, embedder: Arc<dyn TextEmbedder>) -> Result<AnswerCache> {
    if settings.cache.mode == CacheMode::Disabled {
        return Ok(AnswerCache::Disabled);
    }
    let store = QdrantCacheStore::new(
        &settings.rag.qdrant_url,
        settings.rag.qdrant_api_key.as_deref(),
        &settings.cache.collection_prefix,
    )?;
    Ok(AnswerCache::from_config(
        &settings.cache,
        Arc::new(store),
        embedder,
    ))
}
