use async_trait::async_trait;
use qdrant_client::qdrant::{SearchPointsBuilder, Value};
use qdrant_client::Qdrant;
use std::collections::HashMap;
use tracing::info;
use uuid::Uuid;

use crate::domain::{ports::VectorStore, DocumentChunk, DomainError, Embedding, SearchResult};

/// Read-only view of a Qdrant collection populated by the ingestion pipeline.
///
/// Points are expected to carry a `content` payload field; `chunk_id`,
/// `document_id`, `chunk_index` and `source` are picked up when present.
pub struct QdrantVectorStore {
    client: Qdrant,
    collection: String,
}

impl QdrantVectorStore {
    /// Connects and checks that `collection` exists. Nothing is created: an
    /// empty collection would hide a missing ingestion run.
    pub async fn connect(url: &str, collection: &str) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url)
            .build()
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        let store = Self {
            client,
            collection: collection.to_string(),
        };

        store.ensure_collection().await?;
        info!(url, collection, "Qdrant collection available");

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| DomainError::unavailable(e.to_string()))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            return Err(DomainError::not_found(format!(
                "collection '{}' does not exist",
                self.collection
            )));
        }

        Ok(())
    }

    fn chunk_from_payload(payload: &HashMap<String, Value>) -> Option<DocumentChunk> {
        let uuid_field = |key: &str| -> Uuid {
            payload
                .get(key)
                .and_then(|v| v.as_str())
                .and_then(|s| s.parse().ok())
                .unwrap_or_default()
        };

        let content = payload.get("content")?.as_str()?.to_string();
        let chunk_index = payload
            .get("chunk_index")
            .and_then(|v| v.as_integer())
            .and_then(|i| usize::try_from(i).ok())
            .unwrap_or(0);
        let source = payload
            .get("source")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        Some(DocumentChunk {
            id: uuid_field("chunk_id"),
            document_id: uuid_field("document_id"),
            content,
            chunk_index,
            source,
        })
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    async fn search(&self, query: &Embedding, top_k: usize) -> Result<Vec<SearchResult>, DomainError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| DomainError::external(e.to_string()))?;

        let search_results: Vec<SearchResult> = results
            .result
            .into_iter()
            .filter_map(|point| {
                let chunk = Self::chunk_from_payload(&point.payload)?;
                Some(SearchResult {
                    chunk,
                    score: point.score,
                })
            })
            .collect();

        Ok(search_results)
    }
}
