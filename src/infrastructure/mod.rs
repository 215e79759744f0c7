pub mod chatbot;
pub mod config;
pub mod embedding;
pub mod llm;
pub mod vector_store;

pub use chatbot::connect_chatbot;
pub use config::{AppConfig, ConfigError, LlmProvider, PromptsConfig};
pub use embedding::TextEmbedding;
pub use llm::ProviderLlm;
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
