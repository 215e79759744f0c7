use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::api::{error::ApiError, extract::JsonBody, state::AppState, state::RagState};
use crate::domain::{Query, DEFAULT_K_RESULTS};

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub query: String,
    #[serde(default = "default_k_results")]
    pub k_results: i64,
}

fn default_k_results() -> i64 {
    DEFAULT_K_RESULTS as i64
}

impl AskRequest {
    /// Checks `k_results` against `1..=max_k_results`.
    pub fn into_query(self, max_k_results: usize) -> Result<Query, ApiError> {
        let k_results = usize::try_from(self.k_results)
            .ok()
            .filter(|k| (1..=max_k_results).contains(k))
            .ok_or_else(|| {
                ApiError::validation(format!(
                    "k_results must be between 1 and {max_k_results}, got {}",
                    self.k_results
                ))
            })?;

        Ok(Query::new(self.query).with_k_results(k_results))
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponse {
    pub answer: String,
}

pub async fn ask_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    let query = request.into_query(state.config.rag.max_k_results)?;

    let chatbot = match &state.rag {
        RagState::Ready(chatbot) => chatbot.clone(),
        RagState::Unavailable { .. } => return Err(ApiError::RagUnavailable),
    };

    let answer = chatbot
        .ask(&query.text, query.k_results)
        .await
        .map_err(|e| {
            error!(
                error = %e,
                kind = e.kind(),
                retryable = e.is_retryable(),
                "Failed to answer RAG query"
            );
            ApiError::RagFailed(e)
        })?;

    Ok(Json(AskResponse { answer }))
}
