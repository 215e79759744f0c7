use crate::domain::errors::DomainError;
use async_trait::async_trait;

/// Answers a question using the `k_results` most relevant passages.
#[async_trait]
pub trait Chatbot: Send + Sync {
    async fn ask(&self, query_text: &str, k_results: usize) -> Result<String, DomainError>;
}
