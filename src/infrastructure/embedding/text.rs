use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::{EmbeddingModel, EmbeddingsBuilder};
use rig::providers::{ollama, openai};

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::{require_env, EmbeddingConfig, EmbeddingProvider};

enum Backend {
    Ollama(ollama::Client),
    OpenAi(openai::Client),
}

pub struct TextEmbedding {
    backend: Backend,
    model: String,
    dimension: usize,
}

impl TextEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self, DomainError> {
        let backend = match config.provider.parse::<EmbeddingProvider>()? {
            EmbeddingProvider::Ollama => {
                require_env("OLLAMA_API_BASE_URL")?;
                Backend::Ollama(ollama::Client::from_env())
            }
            EmbeddingProvider::OpenAi => {
                require_env("OPENAI_API_KEY")?;
                Backend::OpenAi(openai::Client::from_env())
            }
        };

        Ok(Self {
            backend,
            model: config.model.clone(),
            dimension: config.dimension,
        })
    }
}

async fn embed_with<M: EmbeddingModel>(model: M, text: &str) -> Result<Embedding, DomainError> {
    let embeddings = EmbeddingsBuilder::new(model)
        .document(text)
        .map_err(|e| DomainError::external(e.to_string()))?
        .build()
        .await
        .map_err(|e| DomainError::external(e.to_string()))?;

    embeddings
        .into_iter()
        .next()
        .map(|(_doc, emb)| {
            let vec_f32: Vec<f32> = emb.first().vec.into_iter().map(|x| x as f32).collect();
            Embedding::new(vec_f32)
        })
        .ok_or_else(|| DomainError::internal("No embedding returned"))
}

#[async_trait]
impl EmbeddingService for TextEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        match &self.backend {
            Backend::Ollama(client) => {
                let model = client.embedding_model_with_ndims(&self.model, self.dimension);
                embed_with(model, text).await
            }
            Backend::OpenAi(client) => {
                let model = client.embedding_model_with_ndims(&self.model, self.dimension);
                embed_with(model, text).await
            }
        }
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
