//! Environment-driven configuration.
//!
//! Everything tunable lives here, including the retrieval threshold and the
//! analyzer floors. Unparseable values log a warning and fall back to the
//! default instead of failing startup.

use serde::Deserialize;
use std::env;
use std::str::FromStr;

fn env_parsed<T>(var: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Ok(raw) = env::var(var) else {
        return default;
    };
    match raw.parse() {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(var, value = %raw, error = %e, "unparseable env value, using default");
            default
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub embeddings: EmbeddingsConfig,
    pub insights: InsightsConfig,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            embeddings: EmbeddingsConfig::from_env(),
            insights: InsightsConfig::from_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Accepted Bearer tokens. Empty locks down every protected route.
    pub api_keys: Vec<String>,
}

impl ServerConfig {
    fn from_env() -> Self {
        let api_keys = env::var("CADENCE_API_KEYS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            host: env::var("CADENCE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parsed("CADENCE_PORT", 3000),
            api_keys,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    /// Replica path for remote URLs; enables the embedded-replica mode.
    pub local_path: Option<String>,
}

impl DatabaseConfig {
    fn from_env() -> Self {
        Self {
            url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:cadence.db".to_string()),
            auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
            local_path: env::var("DATABASE_LOCAL_PATH").ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingsConfig {
    /// `provider/model` or a bare OpenAI model name.
    pub model: String,
    pub dimensions: usize,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Summary text is truncated to this many characters before embedding.
    pub max_input_chars: usize,
}

impl EmbeddingsConfig {
    fn from_env() -> Self {
        Self {
            model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "openai/text-embedding-3-small".to_string()),
            dimensions: env_parsed("EMBEDDING_DIMENSIONS", 1536),
            api_key: env::var("EMBEDDING_API_KEY").ok(),
            base_url: env::var("EMBEDDING_BASE_URL").ok(),
            timeout_secs: env_parsed("EMBEDDING_TIMEOUT", 30),
            max_retries: env_parsed("EMBEDDING_MAX_RETRIES", 3),
            max_input_chars: env_parsed("EMBEDDING_MAX_INPUT_CHARS", 8000),
        }
    }
}

/// Retrieval and analyzer tunables. The 0.7 threshold and the ±2 dead zone
/// are product defaults pending real input, so they are env-overridable
/// rather than baked into the analyzers.
#[derive(Debug, Clone, Deserialize)]
pub struct InsightsConfig {
    pub similarity_threshold: f32,
    pub retrieval_limit: u32,
    pub insight_window_days: u32,
    pub trend_window_days: u32,
    pub trend_dead_zone: f64,
    pub high_score_threshold: f64,
    pub min_app_entries: usize,
    pub min_focus_entries: usize,
    pub confidence_cap: usize,
    pub default_focus_secs: u64,
}

impl InsightsConfig {
    fn from_env() -> Self {
        Self {
            similarity_threshold: env_parsed("CADENCE_SIMILARITY_THRESHOLD", 0.7),
            retrieval_limit: env_parsed("CADENCE_RETRIEVAL_LIMIT", 5),
            insight_window_days: env_parsed("CADENCE_INSIGHT_WINDOW_DAYS", 30),
            trend_window_days: env_parsed("CADENCE_TREND_WINDOW_DAYS", 14),
            trend_dead_zone: env_parsed("CADENCE_TREND_DEAD_ZONE", 2.0),
            high_score_threshold: env_parsed("CADENCE_HIGH_SCORE_THRESHOLD", 80.0),
            min_app_entries: env_parsed("CADENCE_MIN_APP_ENTRIES", 3),
            min_focus_entries: env_parsed("CADENCE_MIN_FOCUS_ENTRIES", 3),
            confidence_cap: env_parsed("CADENCE_CONFIDENCE_CAP", 10),
            default_focus_secs: env_parsed("CADENCE_DEFAULT_FOCUS_SECS", 1800),
        }
    }
}

/// Split a model string into provider and model name. Unrecognized prefixes
/// belong to the model name itself (OpenAI names can contain slashes).
pub fn parse_provider_model(model: &str) -> (&str, &str) {
    match model.split_once('/') {
        Some((prefix, rest))
            if matches!(
                prefix.to_lowercase().as_str(),
                "openai" | "openrouter" | "ollama" | "lmstudio"
            ) =>
        {
            (prefix, rest)
        }
        _ => ("openai", model),
    }
}
