pub mod ask;
pub mod health;

use axum::http::HeaderValue;
use axum::{middleware, routing::get, routing::post, Router};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::api::middleware::request_logger;
use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = build_cors(&state.config.cors.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api_routes())
        .layer(middleware::from_fn(request_logger))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Credentials are always allowed. Wildcards cannot be combined with
/// credentials, so `*` mirrors the request's origin, method and headers.
fn build_cors(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        warn!("CORS allows every origin with credentials");
        cors.allow_origin(AllowOrigin::mirror_request())
    } else {
        cors.allow_origin(parse_origins(origins))
    }
}

fn parse_origins(origins: &[String]) -> Vec<HeaderValue> {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin = %origin.escape_debug(), error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        warn!("No valid CORS origins configured; cross-origin requests will be refused");
    }
    parsed
}

fn api_routes() -> Router<AppState> {
    Router::new().route("/ask", post(ask::ask_handler))
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use super::create_router;
    use crate::api::state::{AppState, RagState};
    use crate::domain::{ports::Chatbot, DomainError};
    use crate::infrastructure::AppConfig;

    /// Records every call and replies with a canned answer or failure.
    pub struct StubChatbot {
        pub calls: Mutex<Vec<(String, usize)>>,
        reply: Result<String, String>,
    }

    impl StubChatbot {
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Chatbot for StubChatbot {
        async fn ask(&self, query_text: &str, k_results: usize) -> Result<String, DomainError> {
            self.calls
                .lock()
                .unwrap()
                .push((query_text.to_string(), k_results));
            self.reply.clone().map_err(DomainError::external)
        }
    }

    pub fn test_config() -> AppConfig {
        AppConfig::from_lookup(|_| None).unwrap()
    }

    fn state_with(reply: Result<String, String>) -> (AppState, Arc<StubChatbot>) {
        let chatbot = Arc::new(StubChatbot {
            calls: Mutex::new(Vec::new()),
            reply,
        });
        let state = AppState::new(test_config(), RagState::Ready(chatbot.clone()));
        (state, chatbot)
    }

    pub fn ready_state() -> (AppState, Arc<StubChatbot>) {
        state_with(Ok("X is Y".to_string()))
    }

    pub fn failing_state(message: &str) -> (AppState, Arc<StubChatbot>) {
        state_with(Err(message.to_string()))
    }

    pub fn unavailable_state() -> AppState {
        AppState::new(
            test_config(),
            RagState::Unavailable {
                reason: "collection 'sourcetxt' does not exist".to_string(),
            },
        )
    }

    pub async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(state: AppState, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        send(state, request).await
    }

    pub async fn post_json(state: AppState, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(state, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{ready_state, test_config};
    use super::*;
    use crate::api::state::RagState;
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/ask")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_cors_preflight_mirrors_origin_with_credentials() {
        let (state, _) = ready_state();
        let response = create_router(state)
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();
        let headers = response.headers();

        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    }

    #[test]
    fn test_parse_origins_skips_invalid_entries() {
        let origins = vec![
            "bad\norigin".to_string(),
            "https://app.example.com".to_string(),
        ];

        let parsed = parse_origins(&origins);
        assert_eq!(parsed, vec![HeaderValue::from_static("https://app.example.com")]);
    }

    #[tokio::test]
    async fn test_cors_restricted_origins() {
        let mut config = test_config();
        config.cors.allowed_origins = vec!["https://app.example.com".to_string()];
        let state = AppState::new(
            config,
            RagState::Unavailable {
                reason: "not needed".to_string(),
            },
        );

        let response = create_router(state)
            .oneshot(preflight("https://evil.example.com"))
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
