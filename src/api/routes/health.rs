use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::api::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub rag: &'static str,
}

/// Liveness only: answers `ok` even when the chatbot failed to initialize.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<ReadinessResponse>) {
    if state.rag.is_ready() {
        (
            StatusCode::OK,
            Json(ReadinessResponse {
                status: "ready",
                rag: "available",
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadinessResponse {
                status: "not_ready",
                rag: "unavailable",
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::{get, ready_state, unavailable_state};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn test_health_ok_when_ready() {
        let (state, _) = ready_state();
        let (status, body) = get(state, "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_health_ok_when_unavailable() {
        let (status, body) = get(unavailable_state(), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn test_ready_reflects_rag_state() {
        let (state, _) = ready_state();
        let (status, body) = get(state, "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rag"], "available");

        let (status, body) = get(unavailable_state(), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "status": "not_ready", "rag": "unavailable" }));
    }
}
