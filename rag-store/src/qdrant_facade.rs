//! Thin adapter around `qdrant-client` to isolate API usage.
//!
//! All Qdrant interactions of the crate go through this facade, keeping the
//! rest of the code decoupled from the verbose builder API.

use std::collections::HashMap;

use qdrant_client::Qdrant;
use qdrant_client::qdrant::{SearchPointsBuilder, Value as QValue};
use tracing::{debug, info};

use crate::config::RagConfig;
use crate::errors::{RagError, Result};

/// Facade over the Qdrant client bound to one collection.
pub struct QdrantFacade {
    client: Qdrant,
    url: String,
    collection: String,
}

impl QdrantFacade {
    /// Creates a new facade from the given configuration.
    ///
    /// No request is sent here; see [`QdrantFacade::check_collection`].
    pub fn new(cfg: &RagConfig) -> Result<Self> {
        cfg.validate()?;

        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            url: cfg.qdrant_url.clone(),
            collection: cfg.index.clone(),
        })
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fails with [`RagError::MissingIndex`] when the collection does not exist.
    pub async fn check_collection(&self) -> Result<()> {
        let exists = self
            .client
            .collection_exists(&self.collection)
            .await
            .map_err(|e| RagError::Qdrant(format!("collection_exists: {e}")))?;

        if !exists {
            return Err(RagError::MissingIndex {
                url: self.url.clone(),
                index: self.collection.clone(),
            });
        }

        info!(collection = %self.collection, url = %self.url, "index is available");
        Ok(())
    }

    /// Similarity search returning `(score, payload)` tuples, best first.
    ///
    /// `score_threshold` is forwarded to Qdrant when set.
    pub async fn search(
        &self,
        vector: Vec<f32>,
        top_k: u64,
        score_threshold: Option<f32>,
    ) -> Result<Vec<(f32, serde_json::Value)>> {
        debug!(
            collection = %self.collection,
            top_k,
            score_threshold = ?score_threshold,
            "search"
        );

        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, top_k).with_payload(true);
        if let Some(t) = score_threshold {
            builder = builder.score_threshold(t);
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(format!("search_points: {e}")))?;

        let out: Vec<_> = res
            .result
            .into_iter()
            .map(|r| (r.score, qpayload_to_json(r.payload)))
            .collect();

        debug!(hits = out.len(), "search completed");
        Ok(out)
    }
}

/// Converts a Qdrant payload into a JSON object.
fn qpayload_to_json(payload: HashMap<String, QValue>) -> serde_json::Value {
    serde_json::Value::Object(
        payload
            .into_iter()
            .map(|(k, v)| (k, v.into_json()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_converts_scalars() {
        let mut p = HashMap::new();
        p.insert("content".to_string(), QValue::from("Managers plan."));
        p.insert("tokens".to_string(), QValue::from(12i64));

        let json = qpayload_to_json(p);
        assert_eq!(json["content"], "Managers plan.");
        assert_eq!(json["tokens"], 12);
    }

    #[test]
    fn empty_index_name_is_rejected() {
        let cfg = RagConfig::new_default("http://localhost:6334", " ");
        assert!(matches!(QdrantFacade::new(&cfg), Err(RagError::Config(_))));
    }
}
