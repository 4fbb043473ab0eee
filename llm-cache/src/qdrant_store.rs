//! Qdrant-backed [`CacheStore`].
//!
//! Two collections per prefix:
//! - `<prefix>_exact`    → one point per `(llm, prompt)`, looked up by id
//!   (uuid v5 of the key); the vector is a constant 1-dim placeholder
//! - `<prefix>_semantic` → prompt embeddings, cosine distance, searched with
//!   `score_threshold = 1 - max_distance` and a filter on `llm`
//!
//! Collections are created on first write; the semantic one takes the size
//! of the first embedding it stores.

use ai_llm_service::BoxFuture;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, Distance, Filter, GetPointsBuilder, PointStruct,
    SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{CacheError, Result};
use crate::store::CacheStore;

const PLACEHOLDER_VECTOR: [f32; 1] = [1.0];

pub struct QdrantCacheStore {
    client: Qdrant,
    exact_collection: String,
    semantic_collection: String,
    exact_ready: OnceCell<()>,
    semantic_ready: OnceCell<()>,
}

impl QdrantCacheStore {
    /// Builds the client; no request is sent until the first cache access.
    pub fn new(url: &str, api_key: Option<&str>, prefix: &str) -> Result<Self> {
        let mut builder = Qdrant::from_url(url);
        if let Some(key) = api_key {
            builder = builder.api_key(key.to_string());
        }
        let client = builder
            .build()
            .map_err(|e| CacheError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            exact_collection: format!("{prefix}_exact"),
            semantic_collection: format!("{prefix}_semantic"),
            exact_ready: OnceCell::new(),
            semantic_ready: OnceCell::new(),
        })
    }

    pub fn collections(&self) -> (&str, &str) {
        (&self.exact_collection, &self.semantic_collection)
    }

    async fn ensure_collection(
        &self,
        cell: &OnceCell<()>,
        name: &str,
        dim: u64,
        distance: Distance,
    ) -> Result<()> {
        cell.get_or_try_init(|| async {
            let exists = self
                .client
                .collection_exists(name)
                .await
                .map_err(|e| CacheError::Qdrant(format!("collection_exists: {e}")))?;
            if !exists {
                self.client
                    .create_collection(
                        CreateCollectionBuilder::new(name)
                            .vectors_config(VectorParamsBuilder::new(dim, distance)),
                    )
                    .await
                    .map_err(|e| CacheError::Qdrant(format!("create_collection: {e}")))?;
                info!(collection = %name, dim, "cache collection created");
            }
            Ok::<(), CacheError>(())
        })
        .await
        .map(|_| ())
    }

    /// `false` when nothing was ever written, so reads can skip the request.
    async fn readable(&self, cell: &OnceCell<()>, name: &str) -> Result<bool> {
        if cell.initialized() {
            return Ok(true);
        }
        self.client
            .collection_exists(name)
            .await
            .map_err(|e| CacheError::Qdrant(format!("collection_exists: {e}")))
    }

    async fn upsert(&self, collection: &str, point: PointStruct) -> Result<()> {
        self.client
            .upsert_points(UpsertPointsBuilder::new(collection, vec![point]))
            .await
            .map_err(|e| CacheError::Qdrant(format!("upsert_points: {e}")))?;
        Ok(())
    }
}

/// Deterministic point id for an `(llm, prompt)` key.
pub fn entry_id(llm: &str, prompt: &str) -> String {
    let key = format!("{llm}\u{1f}{prompt}");
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

fn entry_payload(llm: &str, prompt: &str, answer: &str) -> Result<Payload> {
    serde_json::json!({
        "llm": llm,
        "prompt": prompt,
        "answer": answer,
    })
    .try_into()
    .map_err(|e| CacheError::Qdrant(format!("payload convert: {e}")))
}

fn answer_from_payload(
    payload: &std::collections::HashMap<String, qdrant_client::qdrant::Value>,
) -> Option<String> {
    payload
        .get("answer")
        .and_then(|v| v.clone().into_json().as_str().map(str::to_owned))
}

impl CacheStore for QdrantCacheStore {
    fn get_exact<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            if !self
                .readable(&self.exact_ready, &self.exact_collection)
                .await?
            {
                return Ok(None);
            }

            let resp = self
                .client
                .get_points(
                    GetPointsBuilder::new(
                        &self.exact_collection,
                        vec![entry_id(llm, prompt).into()],
                    )
                    .with_payload(true),
                )
                .await
                .map_err(|e| CacheError::Qdrant(format!("get_points: {e}")))?;

            Ok(resp
                .result
                .into_iter()
                .find_map(|p| answer_from_payload(&p.payload)))
        })
    }

    fn put_exact<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
        answer: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.ensure_collection(&self.exact_ready, &self.exact_collection, 1, Distance::Dot)
                .await?;
            let point = PointStruct::new(
                entry_id(llm, prompt),
                PLACEHOLDER_VECTOR.to_vec(),
                entry_payload(llm, prompt, answer)?,
            );
            self.upsert(&self.exact_collection, point).await?;
            debug!(collection = %self.exact_collection, "exact cache entry stored");
            Ok(())
        })
    }

    fn nearest<'a>(
        &'a self,
        llm: &'a str,
        vector: &'a [f32],
        max_distance: f32,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            if !self
                .readable(&self.semantic_ready, &self.semantic_collection)
                .await?
            {
                return Ok(None);
            }

            // Qdrant reports cosine similarity, so distance d maps to score 1 - d.
            let builder = SearchPointsBuilder::new(&self.semantic_collection, vector.to_vec(), 1)
                .with_payload(true)
                .filter(Filter::must([Condition::matches("llm", llm.to_string())]))
                .score_threshold(1.0 - max_distance);

            let resp = self
                .client
                .search_points(builder)
                .await
                .map_err(|e| CacheError::Qdrant(format!("search_points: {e}")))?;

            Ok(resp
                .result
                .into_iter()
                .find_map(|p| answer_from_payload(&p.payload)))
        })
    }

    fn put_vector<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
        vector: &'a [f32],
        answer: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.ensure_collection(
                &self.semantic_ready,
                &self.semantic_collection,
                vector.len() as u64,
                Distance::Cosine,
            )
            .await?;
            let point = PointStruct::new(
                entry_id(llm, prompt),
                vector.to_vec(),
                entry_payload(llm, prompt, answer)?,
            );
            self.upsert(&self.semantic_collection, point).await?;
            debug!(collection = %self.semantic_collection, "semantic cache entry stored");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_id_is_stable_and_scoped() {
        let a = entry_id("openai:gpt-3.5-turbo", "Q");
        assert_eq!(a, entry_id("openai:gpt-3.5-turbo", "Q"));
        assert_ne!(a, entry_id("ollama:llama3.1", "Q"));
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn collection_names_follow_prefix() {
        let store = QdrantCacheStore::new("http://localhost:6334", None, "llmcache").unwrap();
        assert_eq!(store.collections(), ("llmcache_exact", "llmcache_semantic"));
    }

    #[test]
    fn payload_round_trips_answer() {
        let payload = entry_payload("m", "p", "the answer").unwrap();
        let map: std::collections::HashMap<String, qdrant_client::qdrant::Value> = payload.into();
        assert_eq!(answer_from_payload(&map).as_deref(), Some("the answer"));
    }
}
