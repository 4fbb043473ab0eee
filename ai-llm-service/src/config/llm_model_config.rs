use crate::config::llm_provider::LlmProvider;

/// Configuration for an LLM model invocation.
///
/// This struct contains both general and provider-specific parameters.
///
/// # Fields
///
/// - `provider`: Which backend to use (OpenAI or Ollama).
/// - `model`: The model identifier (e.g., `"gpt-3.5-turbo"`, `"llama3.1"`).
/// - `endpoint`: Base URL of the backend (without the API path).
/// - `api_key`: Optional API key for providers that require authentication.
/// - `max_tokens`: Maximum number of tokens to generate (if supported).
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff.
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::llm_model_config::LlmModelConfig;
/// use ai_llm_service::config::llm_provider::LlmProvider;
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenAI,
///     model: "gpt-3.5-turbo".to_string(),
///     endpoint: "https://api.openai.com".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(256),
///     temperature: Some(0.7),
///     top_p: None,
///     timeout_secs: Some(60),
/// };
/// assert_eq!(
///     cfg.llm_string(),
///     "openai:gpt-3.5-turbo@https://api.openai.com:t=0.7:max=256"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The LLM provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint (base URL).
    pub endpoint: String,

    /// Optional API key for authentication (e.g., OpenAI).
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Stable identity of the generation parameters.
    ///
    /// Used as the second half of answer-cache keys, so two generators with
    /// different endpoints, models or sampling settings never share cached
    /// answers. Credentials and timeouts are not part of it.
    pub fn llm_string(&self) -> String {
        let endpoint = self.endpoint.trim_end_matches('/');
        let mut s = format!("{}:{}@{endpoint}", self.provider, self.model);
        if let Some(t) = self.temperature {
            s.push_str(&format!(":t={t}"));
        }
        if let Some(p) = self.top_p {
            s.push_str(&format!(":p={p}"));
        }
        if let Some(m) = self.max_tokens {
            s.push_str(&format!(":max={m}"));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(endpoint: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::OpenAI,
            model: "gpt-3.5-turbo".into(),
            endpoint: endpoint.into(),
            api_key: Some("sk-test".into()),
            max_tokens: Some(256),
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(60),
        }
    }

    #[test]
    fn endpoint_is_part_of_the_identity() {
        let hosted = cfg("https://api.openai.com");
        let proxy = cfg("https://llm-proxy.internal");
        assert_ne!(hosted.llm_string(), proxy.llm_string());
        assert_eq!(
            hosted.llm_string(),
            cfg("https://api.openai.com/").llm_string()
        );
    }

    #[test]
    fn credentials_and_timeouts_are_not() {
        let mut other = cfg("https://api.openai.com");
        other.api_key = Some("sk-other".into());
        other.timeout_secs = None;
        assert_eq!(other.llm_string(), cfg("https://api.openai.com").llm_string());
    }
}
