use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the retrieval oracle. When unset, candidate pools stay local.
    #[serde(default)]
    pub oracle_url: Option<String>,
    #[serde(default = "default_oracle_timeout_ms")]
    pub oracle_timeout_ms: u64,
    #[serde(default = "default_chunk_chars")]
    pub chunk_chars: usize,
    #[serde(default = "default_overlap_chars")]
    pub overlap_chars: usize,
    #[serde(default = "default_min_sim")]
    pub min_sim: f64,
    #[serde(default = "default_max_sim")]
    pub max_sim: f64,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_oracle_timeout_ms() -> u64 {
    3000
}

fn default_chunk_chars() -> usize {
    3000
}

fn default_overlap_chars() -> usize {
    500
}

fn default_min_sim() -> f64 {
    0.12
}

fn default_max_sim() -> f64 {
    0.75
}

fn default_workers() -> usize {
    4
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            oracle_url: None,
            oracle_timeout_ms: default_oracle_timeout_ms(),
            chunk_chars: default_chunk_chars(),
            overlap_chars: default_overlap_chars(),
            min_sim: default_min_sim(),
            max_sim: default_max_sim(),
            workers: default_workers(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn oracle_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.oracle_timeout_ms)
    }
}
