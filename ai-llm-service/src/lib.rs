//! Embedding and generation providers for the Q&A service.
//!
//! - [`config`]: `LLM_KIND` and model profiles resolved from the environment
//! - [`services`]: OpenAI (hosted) and Ollama (local) HTTP clients
//! - [`capabilities`]: `TextEmbedder` / `TextGenerator` / `LlmCache` seams
//! - [`service_profiles`]: the answer, direct and embedding profiles as capabilities
//! - [`health_service`], [`telemetry`]: `/health` probes and the library log layer

pub mod capabilities;
pub mod config;
pub mod error_handler;
pub mod generation;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use capabilities::{BoxFuture, LlmCache, NoCache, TextEmbedder, TextGenerator};
pub use config::default_config::LlmSettings;
pub use error_handler::{AiLlmError, Result};
pub use service_profiles::LlmServiceProfiles;
