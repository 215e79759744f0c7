use serde::Deserialize;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::DomainError;

pub const DEFAULT_COLLECTION_NAME: &str = "sourcetxt";
pub const DEFAULT_LLM_PROVIDER: &str = "ollama";
pub const DEFAULT_OLLAMA_MODEL: &str = "gemma3:4b";
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-3-8b-instruct";
pub const DEFAULT_DB_URL: &str = "http://localhost:6334";
pub const DEFAULT_MAX_K_RESULTS: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read prompts file {path}: {source}")]
    PromptsFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse prompts file {path}: {source}")]
    PromptsParse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// Process-wide settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub rag: RagConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub cors: CorsConfig,
    pub prompts: PromptsConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct RagConfig {
    pub collection_name: String,
    /// Vector store endpoint.
    pub db_url: String,
    pub max_k_results: usize,
    pub ask_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Raw selector; validated when the chatbot is built so that a bad value
    /// degrades the service instead of stopping it.
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    pub system: String,
    pub no_context_message: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            system: "You are a helpful assistant. Answer the question using only the \
                     numbered context passages. If the context does not contain the \
                     answer, say that you do not know."
                .to_string(),
            no_context_message: "No relevant documents found.".to_string(),
        }
    }
}

impl PromptsConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::PromptsFile {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::PromptsParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    Ollama,
    OpenRouter,
}

impl FromStr for LlmProvider {
    type Err = DomainError;

    /// Exact match, like the model selection in `AppConfig::from_lookup`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ollama" => Ok(Self::Ollama),
            "openrouter" => Ok(Self::OpenRouter),
            other => Err(DomainError::configuration(format!(
                "unsupported LLM provider '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingProvider {
    Ollama,
    OpenAi,
}

impl FromStr for EmbeddingProvider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAi),
            other => Err(DomainError::configuration(format!(
                "unsupported embedding provider '{other}'"
            ))),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let provider = get_or("LLM_PROVIDER", DEFAULT_LLM_PROVIDER);
        let model = if provider == "ollama" {
            get_or("LLM_MODEL_OLLAMA", DEFAULT_OLLAMA_MODEL)
        } else {
            get_or("LLM_MODEL_OPENROUTER", DEFAULT_OPENROUTER_MODEL)
        };

        let max_k_results: usize = parse_or(&get, "RAG_MAX_K_RESULTS", DEFAULT_MAX_K_RESULTS)?;
        if max_k_results == 0 {
            return Err(ConfigError::Invalid {
                key: "RAG_MAX_K_RESULTS",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        let ask_timeout = match get("RAG_ASK_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(parse_value("RAG_ASK_TIMEOUT_SECS", &raw)?)),
            None => None,
        };

        let prompts = match get("RAG_PROMPTS_FILE") {
            Some(path) => PromptsConfig::from_file(Path::new(&path))?,
            None => PromptsConfig::default(),
        };

        let allowed_origins = get_or("CORS_ALLOWED_ORIGINS", "*")
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            server: ServerConfig {
                host: parse_or(&get, "SERVER_HOST", IpAddr::from([0, 0, 0, 0]))?,
                port: parse_or(&get, "SERVER_PORT", 8000)?,
            },
            rag: RagConfig {
                collection_name: get_or("RAG_COLLECTION_NAME", DEFAULT_COLLECTION_NAME),
                db_url: get_or("RAG_DB_URL", DEFAULT_DB_URL),
                max_k_results,
                ask_timeout,
            },
            llm: LlmConfig { provider, model },
            embedding: EmbeddingConfig {
                provider: get_or("EMBEDDING_PROVIDER", "ollama"),
                model: get_or("EMBEDDING_MODEL", "nomic-embed-text"),
                dimension: parse_or(&get, "EMBEDDING_DIMENSION", 768)?,
            },
            cors: CorsConfig { allowed_origins },
            prompts,
        })
    }
}

/// Fails with a configuration error when `key` is unset or empty. rig's
/// `from_env` constructors panic on a missing variable, so callers check first.
pub fn require_env(key: &str) -> Result<(), DomainError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(()),
        _ => Err(DomainError::configuration(format!("{key} is not set"))),
    }
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T, G>(get: &G, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => parse_value(key, &raw),
        None => Ok(default),
    }
}
