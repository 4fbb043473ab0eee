//! Prompt templates and context assembly.

use rag_store::RetrievedDocument;

use crate::error::{QnaError, Result};

/// Answer prompt for the retrieval-augmented pipeline.
///
/// Restricts the model to the context and asks it to say it does not know
/// instead of inventing an answer.
pub const QA_TEMPLATE: &str = "Use the following pieces of context to answer the question at the end. \
If you don't know the answer, say that you don't know, don't try to make up an answer.

This should be in the following format:

Question: [question here]
Answer: [answer here]

Begin!

Context:
---------
{context}
---------
Question: {question}
Answer:";

/// Baseline prompt: the bare question, no context.
pub const DIRECT_TEMPLATE: &str = "Answer the following question as helpfully and concisely as you can.

Question: {question}
Answer:";

/// Separator between documents inside the context block.
pub const DOC_SEPARATOR: &str = "\n\n";

/// Text template with `{name}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Checks that every name in `required` appears as `{name}`.
    pub fn new(template: impl Into<String>, required: &[&str]) -> Result<Self> {
        let template = template.into();
        if let Some(missing) = required
            .iter()
            .find(|v| !template.contains(&format!("{{{v}}}")))
        {
            return Err(QnaError::Config(format!(
                "prompt template lacks the {{{missing}}} placeholder"
            )));
        }
        Ok(Self { template })
    }

    pub fn qa() -> Self {
        Self {
            template: QA_TEMPLATE.to_string(),
        }
    }

    pub fn direct() -> Self {
        Self {
            template: DIRECT_TEMPLATE.to_string(),
        }
    }

    /// Substitutes the placeholders in one pass.
    ///
    /// Inserted values are never re-scanned, so a question containing
    /// `{context}` stays literal.
    pub fn render(&self, vars: &[(&str, &str)]) -> String {
        let mut out = String::with_capacity(
            self.template.len() + vars.iter().map(|(_, v)| v.len()).sum::<usize>(),
        );
        let mut rest = self.template.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let value = after.find('}').and_then(|close| {
                let name = &after[..close];
                vars.iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| (*v, close))
            });
            match value {
                Some((v, close)) => {
                    out.push_str(v);
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }
}

/// Joins document texts in retrieval order.
pub fn build_context(docs: &[RetrievedDocument]) -> String {
    docs.iter()
        .map(|d| d.content.trim())
        .collect::<Vec<_>>()
        .join(DOC_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qa_template_declines_and_has_markers() {
        let t = PromptTemplate::new(QA_TEMPLATE, &["context", "question"]).unwrap();
        assert!(t.as_str().contains("say that you don't know"));
        assert_eq!(t.as_str().matches("---------").count(), 2);
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        let err = PromptTemplate::new("Question: {question}", &["context", "question"]);
        assert!(matches!(err, Err(QnaError::Config(m)) if m.contains("{context}")));
    }

    #[test]
    fn render_substitutes_once() {
        let t = PromptTemplate::new("C={context} Q={question} {other}", &[]).unwrap();
        let out = t.render(&[("context", "ctx"), ("question", "what is {context}?")]);
        assert_eq!(out, "C=ctx Q=what is {context}? {other}");
    }

    #[test]
    fn context_keeps_order() {
        let docs = vec![
            RetrievedDocument::new("  first ", 0.9),
            RetrievedDocument::new("second", 0.8),
        ];
        assert_eq!(build_context(&docs), "first\n\nsecond");
        assert_eq!(build_context(&[]), "");
    }
}
