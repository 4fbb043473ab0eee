//! Baseline pipeline: the bare question, no retrieval and no answer cache.

use std::sync::Arc;

use ai_llm_service::TextGenerator;
use tracing::instrument;

use crate::error::Result;
use crate::prompt::PromptTemplate;

pub struct DirectQa {
    generator: Arc<dyn TextGenerator>,
    prompt: PromptTemplate,
}

impl DirectQa {
    pub fn new(generator: Arc<dyn TextGenerator>, prompt: PromptTemplate) -> Self {
        Self { generator, prompt }
    }

    #[instrument(skip_all)]
    pub async fn ask(&self, question: &str) -> Result<String> {
        let prompt = self.prompt.render(&[("question", question)]);
        let answer = self.generator.generate(&prompt).await?;
        Ok(answer.trim().to_string())
    }
}
