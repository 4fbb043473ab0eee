//! LLM profiles resolved from environment variables.
//!
//! One backend kind (`LLM_KIND`) drives three profiles:
//!
//! - **Answer**    → model answering the retrieval-augmented prompt
//! - **Direct**    → model answering the bare question (baseline)
//! - **Embedding** → embedding generator for queries and the semantic cache
//!
//! Every variable is optional. Values that are present but malformed
//! (non-numeric port, unknown provider, temperature out of range) are errors.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`               = `openai` | `hosted` | `ollama` | `local` (default `openai`)
//! - `GENERATION_MODEL`       = answer model
//! - `DIRECT_MODEL`           = baseline model (defaults to `GENERATION_MODEL`)
//! - `EMBEDDING_MODEL`        = embedding model
//! - `GENERATION_TEMPERATURE` = answer temperature (default 0.7)
//! - `DIRECT_TEMPERATURE`     = baseline temperature (default 0.6)
//! - `LLM_MAX_TOKENS`         = max generated tokens (default 256)
//! - `LLM_TIMEOUT_SECS`       = request timeout (default 60)
//!
//! OpenAI-specific:
//! - `OPENAI_API_KEY`
//! - `OPENAI_API_BASE` (default `https://api.openai.com`)
//!
//! Ollama-specific:
//! - `OLLAMA_URL` or `OLLAMA_PORT` (default `http://localhost:11434`)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, Result, opt_f32, opt_u32, opt_u64, opt_var,
        validate_http_endpoint, validate_range_f32,
    },
};

const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com";
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Resolved provider configuration for all profiles.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmSettings {
    pub kind: LlmProvider,
    pub answer: LlmModelConfig,
    pub direct: LlmModelConfig,
    pub embedding: LlmModelConfig,
}

impl LlmSettings {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Reads the settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
    /// - [`ConfigError::InvalidNumber`] for malformed numbers or ports
    /// - [`ConfigError::InvalidFormat`] for endpoints without http/https
    /// - [`ConfigError::OutOfRange`] for temperatures outside `0.0..=2.0`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = match opt_var(&lookup, "LLM_KIND") {
            Some(v) => v.parse::<LlmProvider>()?,
            None => LlmProvider::default(),
        };

        let (endpoint, api_key) = match kind {
            LlmProvider::OpenAI => {
                let base = opt_var(&lookup, "OPENAI_API_BASE")
                    .unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string());
                validate_http_endpoint("OPENAI_API_BASE", &base)?;
                (base, opt_var(&lookup, "OPENAI_API_KEY"))
            }
            LlmProvider::Ollama => (ollama_endpoint(&lookup)?, None),
        };

        let (default_gen, default_emb) = match kind {
            LlmProvider::OpenAI => ("gpt-3.5-turbo", "text-embedding-ada-002"),
            LlmProvider::Ollama => ("llama3.1", "all-minilm"),
        };

        let answer_model =
            opt_var(&lookup, "GENERATION_MODEL").unwrap_or_else(|| default_gen.to_string());
        let direct_model = opt_var(&lookup, "DIRECT_MODEL").unwrap_or_else(|| answer_model.clone());
        let embedding_model =
            opt_var(&lookup, "EMBEDDING_MODEL").unwrap_or_else(|| default_emb.to_string());

        let answer_temp = opt_f32(&lookup, "GENERATION_TEMPERATURE")?.unwrap_or(0.7);
        let direct_temp = opt_f32(&lookup, "DIRECT_TEMPERATURE")?.unwrap_or(0.6);
        validate_range_f32("GENERATION_TEMPERATURE", answer_temp, 0.0, 2.0)?;
        validate_range_f32("DIRECT_TEMPERATURE", direct_temp, 0.0, 2.0)?;

        let max_tokens = opt_u32(&lookup, "LLM_MAX_TOKENS")?.unwrap_or(256);
        let timeout_secs = opt_u64(&lookup, "LLM_TIMEOUT_SECS")?.unwrap_or(60);

        let base = LlmModelConfig {
            provider: kind,
            model: answer_model,
            endpoint,
            api_key,
            max_tokens: Some(max_tokens),
            temperature: Some(answer_temp),
            top_p: None,
            timeout_secs: Some(timeout_secs),
        };

        let direct = LlmModelConfig {
            model: direct_model,
            temperature: Some(direct_temp),
            ..base.clone()
        };

        let embedding = LlmModelConfig {
            model: embedding_model,
            max_tokens: None,
            temperature: None,
            ..base.clone()
        };

        Ok(Self {
            kind,
            answer: base,
            direct,
            embedding,
        })
    }
}

/// Resolves the Ollama endpoint.
///
/// Precedence:
/// 1. `OLLAMA_URL` if present and non-empty
/// 2. `OLLAMA_PORT` → `http://localhost:{port}`
/// 3. `http://localhost:11434`
fn ollama_endpoint<F>(lookup: &F) -> std::result::Result<String, AiLlmError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = opt_var(lookup, "OLLAMA_URL") {
        validate_http_endpoint("OLLAMA_URL", &url)?;
        return Ok(url);
    }
    if let Some(port) = opt_var(lookup, "OLLAMA_PORT") {
        let port = port
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                var: "OLLAMA_PORT",
                reason: "expected u16 (1..=65535)",
            })?;
        return Ok(format!("http://localhost:{port}"));
    }
    Ok(DEFAULT_OLLAMA_URL.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn empty_environment_yields_hosted_defaults() {
        let s = LlmSettings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(s.kind, LlmProvider::OpenAI);
        assert_eq!(s.answer.endpoint, "https://api.openai.com");
        assert_eq!(s.answer.model, "gpt-3.5-turbo");
        assert_eq!(s.direct.model, "gpt-3.5-turbo");
        assert_eq!(s.direct.temperature, Some(0.6));
        assert_eq!(s.embedding.model, "text-embedding-ada-002");
        assert_eq!(s.embedding.temperature, None);
        assert_eq!(s.answer.api_key, None);
    }

    #[test]
    fn local_kind_switches_every_profile() {
        let s = LlmSettings::from_lookup(lookup_from(&[
            ("LLM_KIND", "local"),
            ("OLLAMA_PORT", "11500"),
            ("DIRECT_MODEL", "mistral"),
        ]))
        .unwrap();
        assert_eq!(s.answer.provider, LlmProvider::Ollama);
        assert_eq!(s.embedding.provider, LlmProvider::Ollama);
        assert_eq!(s.answer.endpoint, "http://localhost:11500");
        assert_eq!(s.answer.model, "llama3.1");
        assert_eq!(s.direct.model, "mistral");
        assert_eq!(s.embedding.model, "all-minilm");
    }

    #[test]
    fn malformed_values_are_rejected() {
        let bad_port = LlmSettings::from_lookup(lookup_from(&[
            ("LLM_KIND", "ollama"),
            ("OLLAMA_PORT", "eleven"),
        ]));
        assert!(matches!(
            bad_port,
            Err(AiLlmError::Config(ConfigError::InvalidNumber { var: "OLLAMA_PORT", .. }))
        ));

        let bad_kind = LlmSettings::from_lookup(lookup_from(&[("LLM_KIND", "azure")]));
        assert!(matches!(
            bad_kind,
            Err(AiLlmError::Config(ConfigError::UnsupportedProvider(_)))
        ));

        let hot = LlmSettings::from_lookup(lookup_from(&[("GENERATION_TEMPERATURE", "3.5")]));
        assert!(matches!(
            hot,
            Err(AiLlmError::Config(ConfigError::OutOfRange { .. }))
        ));
    }
}
