//! In-process [`CacheStore`] with brute-force cosine search.
//!
//! Lives as long as the process; used by tests and when no vector database
//! should be touched.

use std::collections::HashMap;

use ai_llm_service::BoxFuture;
use tokio::sync::RwLock;

use crate::errors::Result;
use crate::store::{CacheStore, cosine_distance};

struct VectorEntry {
    llm: String,
    prompt: String,
    vector: Vec<f32>,
    answer: String,
}

#[derive(Default)]
pub struct MemoryCacheStore {
    exact: RwLock<HashMap<(String, String), String>>,
    vectors: RwLock<Vec<VectorEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries across both modes.
    pub async fn len(&self) -> usize {
        self.exact.read().await.len() + self.vectors.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn get_exact<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>>> {
        Box::pin(async move {
            let map = self.exact.read().await;
            Ok(map.get(&(llm.to_string(), prompt.to_string())).cloned())
        })
    }

    fn put_exact<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
        answer: &'a str,
    ) -> BoxFuture<'a, Result<()>> {
        Box::pin(async move {
            self.exact
                .write()
                .await
                .insert((llm.to_string(), prompt.to_string()), answer.to_string());
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
            let entries = self.vectors.read().await;
            let best = entries
                .iter()
                .filter(|e| e.llm == llm)
                .filter_map(|e| cosine_distance(&e.vector, vector).map(|d| (d, e)))
                .filter(|(d, _)| *d <= max_distance)
                .min_by(|a, b| a.0.total_cmp(&b.0));
            Ok(best.map(|(_, e)| e.answer.clone()))
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
            let mut entries = self.vectors.write().await;
            entries.retain(|e| !(e.llm == llm && e.prompt == prompt));
            entries.push(VectorEntry {
                llm: llm.to_string(),
                prompt: prompt.to_string(),
                vector: vector.to_vec(),
                answer: answer.to_string(),
            });
            Ok(())
        })
    }
}
