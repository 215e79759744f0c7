use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::application::RagService;
use crate::domain::{
    ports::{Chatbot, LlmService},
    DomainError, SearchResult,
};

/// Retrieval-augmented chatbot: searches the knowledge base, then asks the
/// LLM to answer from the retrieved passages.
pub struct RagChatbot {
    rag: Arc<RagService>,
    llm: Arc<dyn LlmService>,
    system_prompt: String,
    no_context_message: String,
    timeout: Option<Duration>,
}

impl RagChatbot {
    pub fn new(
        rag: Arc<RagService>,
        llm: Arc<dyn LlmService>,
        system_prompt: impl Into<String>,
        no_context_message: impl Into<String>,
    ) -> Self {
        Self {
            rag,
            llm,
            system_prompt: system_prompt.into(),
            no_context_message: no_context_message.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    async fn answer(&self, query_text: &str, k_results: usize) -> Result<String, DomainError> {
        let results = self.rag.retrieve_top_k(query_text, k_results).await?;
        debug!(hits = results.len(), model = self.llm.model(), "context retrieved");

        let prompt = self.build_prompt(query_text, &results);
        self.llm
            .complete_with_system(&self.system_prompt, &prompt)
            .await
    }

    fn build_prompt(&self, question: &str, results: &[SearchResult]) -> String {
        let context = results
            .iter()
            .enumerate()
            .map(|(i, r)| format!("[{}] {}", i + 1, r.chunk.content))
            .collect::<Vec<_>>()
            .join("\n\n");

        let context = if context.is_empty() {
            self.no_context_message.as_str()
        } else {
            context.as_str()
        };

        format!("Context:\n{}\n\nQuestion: {}", context, question)
    }
}

#[async_trait]
impl Chatbot for RagChatbot {
    #[instrument(skip(self, query_text), fields(query_len = query_text.len()))]
    async fn ask(&self, query_text: &str, k_results: usize) -> Result<String, DomainError> {
        if query_text.trim().is_empty() {
            return Err(DomainError::validation("query text is empty"));
        }

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.answer(query_text, k_results))
                .await
                .map_err(|_| DomainError::timeout("RAG answer timed out"))?,
            None => self.answer(query_text, k_results).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ports::EmbeddingService, DocumentChunk, Embedding};
    use crate::infrastructure::InMemoryVectorStore;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct AxisEmbedding;

    #[async_trait]
    impl EmbeddingService for AxisEmbedding {
        async fn embed(&self, _text: &str) -> Result<Embedding, DomainError> {
            Ok(Embedding::new(vec![1.0, 0.0]))
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct RecordingLlm {
        prompts: Mutex<Vec<(String, String)>>,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl LlmService for RecordingLlm {
        async fn complete_with_system(
            &self,
            system: &str,
            prompt: &str,
        ) -> Result<String, DomainError> {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.prompts
                .lock()
                .unwrap()
                .push((system.to_string(), prompt.to_string()));
            Ok("X is Y".to_string())
        }

        fn model(&self) -> &str {
            "recording"
        }
    }

    fn chatbot(store: InMemoryVectorStore, llm: Arc<RecordingLlm>) -> RagChatbot {
        let rag = Arc::new(RagService::new(Arc::new(AxisEmbedding), Arc::new(store)));
        RagChatbot::new(rag, llm, "Answer from context.", "No relevant documents found.")
    }

    #[tokio::test]
    async fn test_ask_includes_passages_in_score_order() {
        let store = InMemoryVectorStore::new();
        let doc_id = Uuid::new_v4();
        store
            .insert(
                DocumentChunk::new(doc_id, "second best", 1),
                Embedding::new(vec![0.6, 0.8]),
            )
            .unwrap();
        store
            .insert(
                DocumentChunk::new(doc_id, "best", 0),
                Embedding::new(vec![1.0, 0.0]),
            )
            .unwrap();

        let llm = Arc::new(RecordingLlm::default());
        let answer = chatbot(store, llm.clone())
            .ask("What is X?", 2)
            .await
            .unwrap();

        assert_eq!(answer, "X is Y");
        let prompts = llm.prompts.lock().unwrap();
        let (system, prompt) = &prompts[0];
        assert_eq!(system, "Answer from context.");
        assert!(prompt.contains("[1] best\n\n[2] second best"));
        assert!(prompt.ends_with("Question: What is X?"));
    }

    #[tokio::test]
    async fn test_ask_without_hits_uses_no_context_message() {
        let llm = Arc::new(RecordingLlm::default());
        chatbot(InMemoryVectorStore::new(), llm.clone())
            .ask("What is X?", 5)
            .await
            .unwrap();

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].1.contains("No relevant documents found."));
    }

    #[tokio::test]
    async fn test_ask_rejects_blank_query() {
        let llm = Arc::new(RecordingLlm::default());
        let err = chatbot(InMemoryVectorStore::new(), llm.clone())
            .ask("   ", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ask_times_out() {
        let llm = Arc::new(RecordingLlm {
            delay: Some(Duration::from_millis(200)),
            ..Default::default()
        });
        let err = chatbot(InMemoryVectorStore::new(), llm)
            .with_timeout(Some(Duration::from_millis(10)))
            .ask("What is X?", 5)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Timeout(_)));
        assert!(err.is_retryable());
    }
}
