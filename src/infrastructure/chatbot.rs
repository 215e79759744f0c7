use std::sync::Arc;
use tracing::info;

use crate::application::{RagChatbot, RagService};
use crate::domain::DomainError;
use crate::infrastructure::config::{AppConfig, LlmProvider};
use crate::infrastructure::{ProviderLlm, QdrantVectorStore, TextEmbedding};

/// Builds the RAG chatbot from configuration: checks provider credentials,
/// then connects to the vector store.
pub async fn connect_chatbot(config: &AppConfig) -> Result<RagChatbot, DomainError> {
    let provider: LlmProvider = config.llm.provider.parse()?;
    let llm = Arc::new(ProviderLlm::from_env(provider, &config.llm.model)?);
    let embedding = Arc::new(TextEmbedding::from_config(&config.embedding)?);
    let vector_store =
        Arc::new(QdrantVectorStore::connect(&config.rag.db_url, &config.rag.collection_name).await?);

    info!(
        provider = ?provider,
        model = %config.llm.model,
        embedding_model = %config.embedding.model,
        collection = %config.rag.collection_name,
        "RAG chatbot initialized"
    );

    let rag = Arc::new(RagService::new(embedding, vector_store));
    Ok(RagChatbot::new(
        rag,
        llm,
        config.prompts.system.clone(),
        config.prompts.no_context_message.clone(),
    )
    .with_timeout(config.rag.ask_timeout))
}
