//! Storage seam behind the answer cache.

use ai_llm_service::BoxFuture;

use crate::errors::Result;

/// Key-value and nearest-vector storage for cached answers.
///
/// Every entry is scoped by `llm`, the generator identity string.
pub trait CacheStore: Send + Sync {
    /// Answer stored for exactly this `(llm, prompt)`.
    fn get_exact<'a>(&'a self, llm: &'a str, prompt: &'a str)
    -> BoxFuture<'a, Result<Option<String>>>;

    fn put_exact<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
        answer: &'a str,
    ) -> BoxFuture<'a, Result<()>>;

    /// Answer of the closest stored prompt vector when its cosine distance
    /// to `vector` is at most `max_distance`.
    fn nearest<'a>(
        &'a self,
        llm: &'a str,
        vector: &'a [f32],
        max_distance: f32,
    ) -> BoxFuture<'a, Result<Option<String>>>;

    fn put_vector<'a>(
        &'a self,
        llm: &'a str,
        prompt: &'a str,
        vector: &'a [f32],
        answer: &'a str,
    ) -> BoxFuture<'a, Result<()>>;
}

/// Cosine distance `1 - cos(a, b)`; `None` for mismatched or zero vectors.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return None;
    }
    Some(1.0 - dot / (na.sqrt() * nb.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_distance_basics() {
        assert!(cosine_distance(&[1.0, 0.0], &[2.0, 0.0]).unwrap().abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 3.0]).unwrap() - 1.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[1.0], &[1.0, 0.0]), None);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), None);
    }
}
