//! Client for the embedding/index microservice, treated as a best-effort
//! retrieval oracle: nothing in the pipeline may depend on it being up.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::time::Duration;

/// A chunk submitted for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkItem {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodeAck {
    pub ok: bool,
    pub count: usize,
}

/// A ranked neighbour returned by a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: String,
    pub text: String,
    pub score: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleStatus {
    pub ok: bool,
    pub index_built: bool,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    results: Vec<Neighbor>,
}

#[async_trait]
pub trait RetrievalOracle: Send + Sync {
    /// Replace the oracle's index with `chunks`.
    async fn encode(&self, chunks: &[ChunkItem]) -> Result<EncodeAck, OracleError>;

    /// Up to `k` indexed chunks nearest to `text`, best first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<Neighbor>, OracleError>;

    async fn status(&self) -> Result<OracleStatus, OracleError>;
}

/// HTTP/JSON oracle client. Every call is bounded by `timeout`.
#[derive(Clone)]
pub struct HttpOracle {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpOracle {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, OracleError>
    where
        F: Future<Output = Result<T, OracleError>> + Send,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Err(OracleError::Http(e))) if e.is_timeout() => Err(OracleError::Timeout(self.timeout)),
            Ok(result) => result,
            Err(_) => Err(OracleError::Timeout(self.timeout)),
        }
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, OracleError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(OracleError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl RetrievalOracle for HttpOracle {
    async fn encode(&self, chunks: &[ChunkItem]) -> Result<EncodeAck, OracleError> {
        // The service rejects empty batches.
        if chunks.is_empty() {
            return Ok(EncodeAck { ok: true, count: 0 });
        }

        let url = format!("{}/encode", self.base_url);
        let body = json!({ "chunks": chunks });
        self.bounded(async {
            let resp = self.client.post(&url).json(&body).send().await?;
            let ack: EncodeAck = Self::check(resp).await?.json().await?;
            tracing::debug!(count = ack.count, "Oracle indexed chunks");
            Ok::<_, OracleError>(ack)
        })
        .await
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<Neighbor>, OracleError> {
        let url = format!("{}/query", self.base_url);
        let body = json!({ "query": text, "k": k });
        self.bounded(async {
            let resp = self.client.post(&url).json(&body).send().await?;
            let parsed: QueryResponse = Self::check(resp).await?.json().await?;
            Ok::<_, OracleError>(parsed.results)
        })
        .await
    }

    async fn status(&self) -> Result<OracleStatus, OracleError> {
        let url = format!("{}/status", self.base_url);
        self.bounded(async {
            let resp = self.client.get(&url).send().await?;
            let status: OracleStatus = Self::check(resp).await?.json().await?;
            Ok::<_, OracleError>(status)
        })
        .await
    }
}

/// Explicit fallback for oracle results: on failure, log and substitute a
/// locally computed value.
pub trait OracleFallback<T> {
    fn or_local(self, context: &str, fallback: impl FnOnce() -> T) -> T;
}

impl<T> OracleFallback<T> for Result<T, OracleError> {
    fn or_local(self, context: &str, fallback: impl FnOnce() -> T) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, context, "Retrieval oracle unavailable, using local fallback");
                fallback()
            }
        }
    }
}

/// Neighbour texts for `text`, or none when no oracle is configured or it fails.
pub async fn neighbours_or_empty(
    oracle: Option<&dyn RetrievalOracle>,
    text: &str,
    k: usize,
) -> Vec<Neighbor> {
    match oracle {
        Some(oracle) => oracle.query(text, k).await.or_local("query", Vec::new),
        None => Vec::new(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("oracle returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("oracle call timed out after {0:?}")]
    Timeout(Duration),
}
