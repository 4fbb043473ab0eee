//! Shared LLM service with three profiles: `answer`, `direct`, and `embedding`.
//!
//! - Built once at startup from [`LlmSettings`]; construction fails fast when
//!   a provider client cannot be created (e.g. hosted backend without a key).
//! - Hands out the profiles as capability objects ([`TextEmbedder`],
//!   [`TextGenerator`]) so the pipelines never match on the backend kind.
//! - The answer cache is passed in explicitly when the answer generator is
//!   requested; the direct generator never sees it.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::capabilities::NoCache;
//! use ai_llm_service::config::default_config::LlmSettings;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = LlmSettings::from_env()?;
//! let svc = LlmServiceProfiles::new(&settings, Some(10))?;
//!
//! let answer = svc.answer_generator(Arc::new(NoCache));
//! let text = answer.generate("Hello world").await?;
//! let emb = svc.embedder().embed("Ferris").await?;
//! println!("{text} / dim = {}", emb.len());
//! # Ok(()) }
//! ```

use std::sync::Arc;

use crate::{
    capabilities::{BoxFuture, LlmCache, TextEmbedder, TextGenerator},
    config::{
        default_config::LlmSettings, llm_model_config::LlmModelConfig, llm_provider::LlmProvider,
    },
    error_handler::Result,
    generation::CachedGenerator,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// One configured backend client.
///
/// The variant is fixed by `LLM_KIND` at startup.
#[derive(Debug)]
pub enum ProviderClient {
    OpenAI(OpenAiService),
    Ollama(OllamaService),
}

impl ProviderClient {
    /// Builds the client matching `cfg.provider`.
    pub fn from_config(cfg: &LlmModelConfig) -> Result<Self> {
        Ok(match cfg.provider {
            LlmProvider::OpenAI => ProviderClient::OpenAI(OpenAiService::new(cfg.clone())?),
            LlmProvider::Ollama => ProviderClient::Ollama(OllamaService::new(cfg.clone())?),
        })
    }

    pub fn config(&self) -> &LlmModelConfig {
        match self {
            ProviderClient::OpenAI(c) => c.config(),
            ProviderClient::Ollama(c) => c.config(),
        }
    }
}

impl TextEmbedder for ProviderClient {
    fn embed<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<Vec<f32>>> {
        match self {
            ProviderClient::OpenAI(c) => Box::pin(c.embeddings(text)),
            ProviderClient::Ollama(c) => Box::pin(c.embeddings(text)),
        }
    }
}

impl TextGenerator for ProviderClient {
    fn llm_string(&self) -> String {
        self.config().llm_string()
    }

    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String>> {
        match self {
            ProviderClient::OpenAI(c) => Box::pin(c.generate(prompt)),
            ProviderClient::Ollama(c) => Box::pin(c.generate(prompt)),
        }
    }
}

/// Owner of the three profile clients plus the health checker.
pub struct LlmServiceProfiles {
    answer: Arc<ProviderClient>,
    direct: Arc<ProviderClient>,
    embedding: Arc<ProviderClient>,
    health: HealthService,
}

impl LlmServiceProfiles {
    /// Creates every profile client.
    ///
    /// # Errors
    /// Returns the first provider construction error (missing API key,
    /// invalid endpoint, HTTP client build failure).
    pub fn new(settings: &LlmSettings, health_timeout_secs: Option<u64>) -> Result<Self> {
        Ok(Self {
            answer: Arc::new(ProviderClient::from_config(&settings.answer)?),
            direct: Arc::new(ProviderClient::from_config(&settings.direct)?),
            embedding: Arc::new(ProviderClient::from_config(&settings.embedding)?),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Embedding profile as a shareable capability.
    pub fn embedder(&self) -> Arc<dyn TextEmbedder> {
        self.embedding.clone()
    }

    /// Answer profile wrapped by `cache`.
    pub fn answer_generator(&self, cache: Arc<dyn LlmCache>) -> Arc<dyn TextGenerator> {
        Arc::new(CachedGenerator::new(self.answer.clone(), cache))
    }

    /// Baseline profile, uncached.
    pub fn direct_generator(&self) -> Arc<dyn TextGenerator> {
        self.direct.clone()
    }

    /// Health snapshot for every distinct profile config.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let configs = distinct_profiles([
            self.answer.config(),
            self.direct.config(),
            self.embedding.config(),
        ]);
        self.health.check_many(&configs).await
    }

    /// Current profiles `(answer, direct, embedding)`.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig, &LlmModelConfig) {
        (
            self.answer.config(),
            self.direct.config(),
            self.embedding.config(),
        )
    }
}

/// Profiles probing the same `(endpoint, model)` are checked once.
fn distinct_profiles(all: [&LlmModelConfig; 3]) -> Vec<LlmModelConfig> {
    let mut out: Vec<LlmModelConfig> = Vec::with_capacity(3);
    for cfg in all {
        if !out
            .iter()
            .any(|c| c.endpoint == cfg.endpoint && c.model == cfg.model)
        {
            out.push(cfg.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_settings() -> LlmSettings {
        LlmSettings::from_lookup(|k| match k {
            "LLM_KIND" => Some("local".into()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn local_kind_builds_ollama_clients() {
        let svc = LlmServiceProfiles::new(&local_settings(), Some(1)).unwrap();
        assert!(matches!(*svc.answer, ProviderClient::Ollama(_)));
        assert!(matches!(*svc.embedding, ProviderClient::Ollama(_)));

        let (answer, direct, _) = svc.profiles();
        assert_eq!(answer.temperature, Some(0.7));
        assert_eq!(direct.temperature, Some(0.6));
        assert_ne!(
            svc.answer_generator(Arc::new(crate::capabilities::NoCache))
                .llm_string(),
            svc.direct_generator().llm_string()
        );
    }

    #[test]
    fn hosted_kind_without_key_fails_at_startup() {
        let settings = LlmSettings::from_lookup(|_| None).unwrap();
        assert!(LlmServiceProfiles::new(&settings, None).is_err());
    }

    #[test]
    fn health_probes_each_model_once() {
        let s = local_settings();
        let configs = distinct_profiles([&s.answer, &s.direct, &s.embedding]);
        let models: Vec<_> = configs.iter().map(|c| c.model.as_str()).collect();
        assert_eq!(models, vec!["llama3.1", "all-minilm"]);
    }
}
