use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError, SearchResult,
};

pub struct RagService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
}

impl RagService {
    pub fn new(embedding: Arc<dyn EmbeddingService>, vector_store: Arc<dyn VectorStore>) -> Self {
        Self {
            embedding,
            vector_store,
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let embedding = self.embedding.embed(query).await?;
        if embedding.dimension() != self.embedding.dimension() {
            return Err(DomainError::internal(format!(
                "embedding has {} dimensions, expected {}",
                embedding.dimension(),
                self.embedding.dimension()
            )));
        }

        let mut results = self.vector_store.search(&embedding, top_k).await?;
        results.truncate(top_k);
        Ok(results)
    }
}
