mod chatbot;
mod embedding;
mod llm;
mod vector_store;

pub use chatbot::Chatbot;
pub use embedding::EmbeddingService;
pub use llm::LlmService;
pub use vector_store::VectorStore;
