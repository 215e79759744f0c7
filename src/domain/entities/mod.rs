mod document;
mod embedding;
mod query;

pub use document::{DocumentChunk, SearchResult};
pub use embedding::Embedding;
pub use query::{Query, DEFAULT_K_RESULTS};
