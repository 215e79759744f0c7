use std::sync::Arc;
use tracing::error;

use crate::domain::{ports::Chatbot, DomainError};
use crate::infrastructure::AppConfig;

/// Outcome of the one-time chatbot initialization.
#[derive(Clone)]
pub enum RagState {
    Ready(Arc<dyn Chatbot>),
    Unavailable { reason: String },
}

impl RagState {
    /// Logs and records a failed initialization instead of propagating it,
    /// so the HTTP service still starts.
    pub fn from_init<C>(result: Result<C, DomainError>) -> Self
    where
        C: Chatbot + 'static,
    {
        match result {
            Ok(chatbot) => Self::Ready(Arc::new(chatbot)),
            Err(e) => {
                error!(error = %e, kind = e.kind(), "Failed to initialize RAG chatbot");
                Self::Unavailable {
                    reason: e.to_string(),
                }
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub rag: RagState,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(config: AppConfig, rag: RagState) -> Self {
        Self {
            rag,
            config: Arc::new(config),
        }
    }
}
