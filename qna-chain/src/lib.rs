//! Question answering over a document index, with a no-context baseline.
//!
//! - [`RetrievalQa`]: embeds the question, retrieves top-K documents, fills
//!   the context prompt and generates the informed answer
//! - [`DirectQa`]: asks the bare question for side-by-side comparison
//! - [`QnaPipelines::answer_both`]: runs both for one question
//! - [`build_runtime`]: wires providers, cache and store from [`QnaSettings`]

mod cfg;
mod direct_qa;
mod error;
mod pipelines;
pub mod prompt;
mod retrieval_qa;

pub use cfg::{ChainConfig, DEFAULT_TOP_K, QnaSettings};
pub use direct_qa::DirectQa;
pub use error::{QnaError, Result};
pub use pipelines::{QnaOutcome, QnaPipelines, QnaRuntime, build_runtime};
pub use prompt::PromptTemplate;
pub use retrieval_qa::{RagAnswer, RetrievalQa};
