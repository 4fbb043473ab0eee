//! Retrieval over an existing Qdrant index of reference documents.
//!
//! The index is populated elsewhere; this crate only checks that it exists
//! and runs top-K similarity search against it.

mod config;
mod errors;
mod qdrant_facade;
mod record;
mod store;

pub use config::{DEFAULT_HOST, DEFAULT_INDEX, DEFAULT_PORT, RagConfig};
pub use errors::{RagError, Result};
pub use qdrant_facade::QdrantFacade;
pub use record::{RetrievedDocument, rank_hits};
pub use store::{QdrantStore, VectorStore};
