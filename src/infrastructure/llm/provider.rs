use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::{ollama, openrouter};

use crate::domain::{ports::LlmService, DomainError};
use crate::infrastructure::config::{require_env, LlmProvider};

enum Backend {
    Ollama(ollama::Client),
    OpenRouter(openrouter::Client),
}

/// Chat completion through a rig provider client.
pub struct ProviderLlm {
    backend: Backend,
    model: String,
}

impl ProviderLlm {
    /// Reads the provider's credentials from the environment
    /// (`OLLAMA_API_BASE_URL` or `OPENROUTER_API_KEY`).
    pub fn from_env(provider: LlmProvider, model: impl Into<String>) -> Result<Self, DomainError> {
        let backend = match provider {
            LlmProvider::Ollama => {
                require_env("OLLAMA_API_BASE_URL")?;
                Backend::Ollama(ollama::Client::from_env())
            }
            LlmProvider::OpenRouter => {
                require_env("OPENROUTER_API_KEY")?;
                Backend::OpenRouter(openrouter::Client::from_env())
            }
        };

        Ok(Self {
            backend,
            model: model.into(),
        })
    }
}

#[async_trait]
impl LlmService for ProviderLlm {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let response = match &self.backend {
            Backend::Ollama(client) => {
                let agent = client.agent(&self.model).preamble(system).build();
                agent.prompt(prompt).await
            }
            Backend::OpenRouter(client) => {
                let agent = client.agent(&self.model).preamble(system).build();
                agent.prompt(prompt).await
            }
        };

        response.map_err(|e| DomainError::external(format!("{} completion failed: {e}", self.model)))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
