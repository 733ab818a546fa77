use std::net::SocketAddr;

const DEFAULT_BIND: &str = "127.0.0.1:9600";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub llm_base_url: String,
    pub llm_api_key: Option<String>,
    /// Model for knowledge-base construction.
    pub build_model: String,
    /// Model for user queries. Defaults to the build model; the origin
    /// header, not the model name, is what the backend router splits on.
    pub query_model: String,
    pub cache_capacity: usize,
    pub max_attempts: u32,
}

impl ServerConfig {
    /// Reads configuration from `RAGCORE_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env_or("RAGCORE_BIND_ADDR", DEFAULT_BIND)
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid RAGCORE_BIND_ADDR: {e}"))?;
        let build_model = env_or("RAGCORE_LLM_MODEL", DEFAULT_MODEL);
        let query_model =
            std::env::var("RAGCORE_LLM_QUERY_MODEL").unwrap_or_else(|_| build_model.clone());
        let cache_capacity = env_or("RAGCORE_CACHE_CAPACITY", "1024")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid RAGCORE_CACHE_CAPACITY: {e}"))?;
        let max_attempts = env_or("RAGCORE_MAX_ATTEMPTS", "3")
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid RAGCORE_MAX_ATTEMPTS: {e}"))?;
        Ok(Self {
            bind_addr,
            llm_base_url: env_or("RAGCORE_LLM_BASE_URL", DEFAULT_BASE_URL),
            llm_api_key: std::env::var("RAGCORE_LLM_API_KEY").ok(),
            build_model,
            query_model,
            cache_capacity,
            max_attempts,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
