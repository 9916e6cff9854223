use serde::{Deserialize, Serialize};

/// Main configuration structure for the service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// HTTP listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Vector store configuration
    #[serde(default)]
    pub vector_store: VectorStoreConfig,

    /// Retrieval and prompt shaping
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Fast hosted inference backend
    #[serde(default)]
    pub groq: GroqConfig,

    /// Remote custom-model backend
    #[serde(default)]
    pub custom: CustomModelConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests (the browser frontend is served elsewhere)
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8000
}

const fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_true(),
        }
    }
}

/// Embedding provider configuration (Voyage AI)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EmbeddingConfig {
    /// API key (also read from `VOYAGE_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the embeddings API
    #[serde(default = "default_embedding_base_url")]
    pub base_url: String,

    /// Embedding model
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Voyage input type hint for query-side embeddings
    #[serde(default = "default_input_type")]
    pub input_type: String,

    /// Expected vector dimension; must match the stored vectors
    #[serde(default = "default_dimension")]
    pub dimension: usize,

    /// Request timeout in seconds
    #[serde(default = "default_embedding_timeout")]
    pub timeout_secs: u64,
}

fn default_embedding_base_url() -> String {
    "https://api.voyageai.com/v1".to_string()
}

fn default_embedding_model() -> String {
    "voyage-3.5-lite".to_string()
}

fn default_input_type() -> String {
    "query".to_string()
}

const fn default_dimension() -> usize {
    1024
}

const fn default_embedding_timeout() -> u64 {
    15
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_embedding_base_url(),
            model: default_embedding_model(),
            input_type: default_input_type(),
            dimension: default_dimension(),
            timeout_secs: default_embedding_timeout(),
        }
    }
}

/// Similarity function used by the vector store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    /// `1 - cosine distance`, in [-1, 1]
    #[default]
    Cosine,
    /// Raw inner product, suitable for normalized vectors
    InnerProduct,
}

/// Vector store configuration (Postgres with pgvector)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VectorStoreConfig {
    /// Connection string (also read from `DATABASE_URL`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,

    /// Table holding `source`, `question`, `answer` and `embedding` columns
    #[serde(default = "default_table")]
    pub table: String,

    /// Maximum pooled connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Seconds to wait for a pooled connection
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Seconds to wait for a similarity query
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,

    /// Similarity function
    #[serde(default)]
    pub metric: SimilarityMetric,
}

fn default_table() -> String {
    "chunks".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

const fn default_acquire_timeout() -> u64 {
    5
}

const fn default_query_timeout() -> u64 {
    10
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            table: default_table(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            query_timeout_secs: default_query_timeout(),
            metric: SimilarityMetric::default(),
        }
    }
}

/// Retrieval and prompt shaping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetrievalConfig {
    /// Passages fetched per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Passages folded into the prompt context
    #[serde(default = "default_context_passages")]
    pub context_passages: usize,

    /// Characters of each passage kept in the context
    #[serde(default = "default_answer_snippet_chars")]
    pub answer_snippet_chars: usize,

    /// Passages returned to the caller as sources
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,

    /// Characters of the stored question kept in source metadata
    #[serde(default = "default_source_question_chars")]
    pub source_question_chars: usize,
}

const fn default_top_k() -> usize {
    5
}

const fn default_context_passages() -> usize {
    3
}

const fn default_answer_snippet_chars() -> usize {
    300
}

const fn default_max_sources() -> usize {
    3
}

const fn default_source_question_chars() -> usize {
    100
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            context_passages: default_context_passages(),
            answer_snippet_chars: default_answer_snippet_chars(),
            max_sources: default_max_sources(),
            source_question_chars: default_source_question_chars(),
        }
    }
}

/// Groq chat-completions backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GroqConfig {
    /// API key (also read from `GROQ_API_KEY`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_groq_base_url")]
    pub base_url: String,

    /// Model to use
    #[serde(default = "default_groq_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_groq_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_groq_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds
    #[serde(default = "default_groq_timeout")]
    pub timeout_secs: u64,
}

fn default_groq_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_groq_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

const fn default_groq_temperature() -> f32 {
    0.2
}

const fn default_groq_max_tokens() -> u32 {
    300
}

const fn default_groq_timeout() -> u64 {
    30
}

impl Default for GroqConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_groq_base_url(),
            model: default_groq_model(),
            temperature: default_groq_temperature(),
            max_tokens: default_groq_max_tokens(),
            timeout_secs: default_groq_timeout(),
        }
    }
}

/// Remote custom-model backend (Modal web endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CustomModelConfig {
    /// Endpoint URL (also read from `MODAL_URL`); unset disables the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Request timeout in seconds, sized for GPU cold starts
    #[serde(default = "default_custom_timeout")]
    pub timeout_secs: u64,
}

const fn default_custom_timeout() -> u64 {
    300
}

impl Default for CustomModelConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_custom_timeout(),
        }
    }
}

impl CustomModelConfig {
    /// Endpoint URL if one is configured and non-blank.
    pub fn endpoint(&self) -> Option<&str> {
        self.url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stdout only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// File rotation: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_deployment() {
        let config = Config::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.embedding.model, "voyage-3.5-lite");
        assert_eq!(config.vector_store.table, "chunks");
        assert_eq!(config.vector_store.metric, SimilarityMetric::Cosine);
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.context_passages, 3);
        assert_eq!(config.groq.model, "llama-3.3-70b-versatile");
        assert_eq!(config.groq.max_tokens, 300);
        assert!(config.custom.timeout_secs > config.groq.timeout_secs);
    }

    #[test]
    fn test_custom_endpoint_ignores_blank_url() {
        let mut custom = CustomModelConfig::default();
        assert_eq!(custom.endpoint(), None);

        custom.url = Some("   ".to_string());
        assert_eq!(custom.endpoint(), None);

        custom.url = Some("https://example.modal.run".to_string());
        assert_eq!(custom.endpoint(), Some("https://example.modal.run"));
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let yaml = "retrieval:\n  top_k: 8\nvector_store:\n  metric: inner_product\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.retrieval.max_sources, 3);
        assert_eq!(config.vector_store.metric, SimilarityMetric::InnerProduct);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
