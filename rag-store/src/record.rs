//! Core data models used by the library.

use serde::Serialize;
use serde_json::Value;

/// One reference passage returned by similarity search.
///
/// `tokens` is metadata only and never drives control flow.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub title: Option<String>,
    pub heading: Option<String>,
    pub tokens: Option<u64>,
    pub score: f32,
}

impl RetrievedDocument {
    pub fn new(content: impl Into<String>, score: f32) -> Self {
        Self {
            content: content.into(),
            title: None,
            heading: None,
            tokens: None,
            score,
        }
    }

    /// Builds a document from a JSON payload, reading fields best-effort.
    ///
    /// The passage text is taken from `content`, falling back to `text`.
    pub fn from_payload(score: f32, payload: &Value) -> Self {
        let str_field = |key: &str| {
            payload
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let tokens = payload.get("tokens").and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_f64().map(|f| f as u64))
                .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
        });

        Self {
            content: str_field("content")
                .or_else(|| str_field("text"))
                .unwrap_or_default(),
            title: str_field("title"),
            heading: str_field("heading"),
            tokens,
            score,
        }
    }
}

/// Orders by descending score, drops hits under `floor`, keeps at most `k`.
///
/// Equal scores keep their incoming order.
pub fn rank_hits(
    mut docs: Vec<RetrievedDocument>,
    k: usize,
    floor: Option<f32>,
) -> Vec<RetrievedDocument> {
    if let Some(min) = floor {
        docs.retain(|d| d.score >= min);
    }
    docs.sort_by(|a, b| b.score.total_cmp(&a.score));
    docs.truncate(k);
    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_fields_are_best_effort() {
        let d = RetrievedDocument::from_payload(
            0.8,
            &json!({"content": "Managers plan.", "title": "Mgmt", "tokens": "42"}),
        );
        assert_eq!(d.content, "Managers plan.");
        assert_eq!(d.title.as_deref(), Some("Mgmt"));
        assert_eq!(d.heading, None);
        assert_eq!(d.tokens, Some(42));

        let fallback = RetrievedDocument::from_payload(0.1, &json!({"text": "t", "tokens": 7}));
        assert_eq!(fallback.content, "t");
        assert_eq!(fallback.tokens, Some(7));
    }

    #[test]
    fn ranking_sorts_filters_and_truncates() {
        let docs = vec![
            RetrievedDocument::new("c", 0.55),
            RetrievedDocument::new("a", 0.9),
            RetrievedDocument::new("b", 0.75),
            RetrievedDocument::new("d", 0.7),
        ];
        let out = rank_hits(docs.clone(), 2, None);
        assert_eq!(
            out.iter().map(|d| d.content.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );

        let floored = rank_hits(docs, 10, Some(0.6));
        assert_eq!(
            floored.iter().map(|d| d.content.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "d"]
        );
    }
}
