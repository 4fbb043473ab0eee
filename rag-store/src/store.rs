//! The vector store handle used by the retrieval pipeline.

use futures::future::BoxFuture;
use tracing::{debug, instrument};

use crate::config::RagConfig;
use crate::errors::Result;
use crate::qdrant_facade::QdrantFacade;
use crate::record::{RetrievedDocument, rank_hits};

/// Read-only similarity retrieval over an existing index.
pub trait VectorStore: Send + Sync {
    fn index_name(&self) -> &str;

    /// Where the index lives, for health reporting.
    fn endpoint(&self) -> &str;

    /// Fails with [`crate::RagError::MissingIndex`] if the index does not exist.
    fn check_index(&self) -> BoxFuture<'_, Result<()>>;

    /// Up to `k` documents by descending similarity; hits scoring below
    /// `floor` are excluded when a floor is given.
    fn retrieve(
        &self,
        query: Vec<f32>,
        k: usize,
        floor: Option<f32>,
    ) -> BoxFuture<'_, Result<Vec<RetrievedDocument>>>;
}

/// [`VectorStore`] over a Qdrant collection.
pub struct QdrantStore {
    facade: QdrantFacade,
}

impl QdrantStore {
    pub fn new(cfg: &RagConfig) -> Result<Self> {
        Ok(Self {
            facade: QdrantFacade::new(cfg)?,
        })
    }

    #[instrument(skip_all, fields(index = %self.facade.collection(), k = k, floor = ?floor))]
    async fn search(
        &self,
        query: Vec<f32>,
        k: usize,
        floor: Option<f32>,
    ) -> Result<Vec<RetrievedDocument>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        let hits = self.facade.search(query, k as u64, floor).await?;
        let docs = hits
            .into_iter()
            .map(|(score, payload)| RetrievedDocument::from_payload(score, &payload))
            .collect();
        let ranked = rank_hits(docs, k, floor);
        debug!(returned = ranked.len(), "retrieve completed");
        Ok(ranked)
    }
}

impl VectorStore for QdrantStore {
    fn index_name(&self) -> &str {
        self.facade.collection()
    }

    fn endpoint(&self) -> &str {
        self.facade.url()
    }

    fn check_index(&self) -> BoxFuture<'_, Result<()>> {
        Box::pin(self.facade.check_collection())
    }

    fn retrieve(
        &self,
        query: Vec<f32>,
        k: usize,
        floor: Option<f32>,
    ) -> BoxFuture<'_, Result<Vec<RetrievedDocument>>> {
        Box::pin(self.search(query, k, floor))
    }
}
