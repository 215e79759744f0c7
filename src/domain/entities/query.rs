use serde::{Deserialize, Serialize};

/// Number of passages retrieved when a request does not specify one.
pub const DEFAULT_K_RESULTS: usize = 5;

/// A question plus how many retrieved passages should back the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub text: String,
    pub k_results: usize,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            k_results: DEFAULT_K_RESULTS,
        }
    }

    pub fn with_k_results(mut self, k_results: usize) -> Self {
        self.k_results = k_results;
        self
    }
}
