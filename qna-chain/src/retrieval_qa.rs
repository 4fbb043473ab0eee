//! Retrieval-augmented answer pipeline.

use std::sync::Arc;

use ai_llm_service::{TextEmbedder, TextGenerator};
use rag_store::{RetrievedDocument, VectorStore};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::cfg::ChainConfig;
use crate::error::Result;
use crate::prompt::{PromptTemplate, build_context};

/// Generated answer plus the documents that formed its context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagAnswer {
    pub answer: String,
    pub source_documents: Vec<RetrievedDocument>,
}

/// Embed → retrieve top-K → fill template → generate.
///
/// Holds no per-question state; the generator may be wrapped by an answer
/// cache without this type knowing.
pub struct RetrievalQa {
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn TextGenerator>,
    prompt: PromptTemplate,
    chain: ChainConfig,
}

impl RetrievalQa {
    /// Builds the pipeline after confirming the index exists.
    ///
    /// # Errors
    /// [`crate::QnaError::MissingIndex`] when the store's index is absent,
    /// [`crate::QnaError::Connectivity`] when the store cannot be reached.
    pub async fn connect(
        embedder: Arc<dyn TextEmbedder>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn TextGenerator>,
        prompt: PromptTemplate,
        chain: ChainConfig,
    ) -> Result<Self> {
        store.check_index().await?;
        info!(
            index = %store.index_name(),
            top_k = chain.top_k,
            score_floor = ?chain.score_floor,
            llm = %generator.llm_string(),
            "retrieval pipeline ready"
        );
        Ok(Self {
            embedder,
            store,
            generator,
            prompt,
            chain,
        })
    }

    /// Answers `question` from the retrieved context.
    ///
    /// Any failure propagates; there are no retries and no partial answers.
    #[instrument(skip_all, fields(index = %self.store.index_name()))]
    pub async fn ask(&self, question: &str) -> Result<RagAnswer> {
        let vector = self.embedder.embed(question).await?;

        let docs = self
            .store
            .retrieve(vector, self.chain.top_k, self.chain.score_floor)
            .await?;
        debug!(docs = docs.len(), "context retrieved");

        let context = build_context(&docs);
        let prompt = self
            .prompt
            .render(&[("context", context.as_str()), ("question", question)]);

        let answer = self.generator.generate(&prompt).await?;

        Ok(RagAnswer {
            answer: answer.trim().to_string(),
            source_documents: docs,
        })
    }
}
