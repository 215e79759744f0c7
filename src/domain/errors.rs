use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    /// Short, stable label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Validation(_) => "validation",
            Self::Configuration(_) => "configuration",
            Self::Unavailable(_) => "unavailable",
            Self::Timeout(_) => "timeout",
            Self::ExternalService(_) => "external_service",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the same call may succeed if attempted again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::Timeout(_) | Self::ExternalService(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_failures_are_retryable() {
        assert!(DomainError::timeout("slow").is_retryable());
        assert!(DomainError::unavailable("qdrant down").is_retryable());
        assert!(DomainError::external("502 from provider").is_retryable());
    }

    #[test]
    fn test_permanent_failures_are_not_retryable() {
        assert!(!DomainError::configuration("missing key").is_retryable());
        assert!(!DomainError::not_found("collection").is_retryable());
        assert!(!DomainError::validation("empty").is_retryable());
        assert!(!DomainError::internal("bug").is_retryable());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(DomainError::timeout("x").kind(), "timeout");
        assert_eq!(DomainError::external("x").kind(), "external_service");
    }
}
