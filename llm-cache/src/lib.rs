//! Answer cache for LLM generation.
//!
//! Three modes, chosen by `CACHE_TYPE`:
//! - disabled: every lookup misses
//! - exact: hit on an identical prompt for the same generator
//! - semantic: hit when the prompt embedding lies within a max cosine
//!   distance (0.2 by default) of a stored one
//!
//! Entries live in Qdrant ([`QdrantCacheStore`]) or in process memory
//! ([`MemoryCacheStore`]).

mod answer_cache;
mod config;
mod errors;
mod memory_store;
mod qdrant_store;
mod store;

pub use answer_cache::AnswerCache;
pub use config::{CacheConfig, CacheMode, DEFAULT_COLLECTION_PREFIX, DEFAULT_MAX_DISTANCE};
pub use errors::{CacheError, Result};
pub use memory_store::MemoryCacheStore;
pub use qdrant_store::{QdrantCacheStore, entry_id};
pub use store::{CacheStore, cosine_distance};
