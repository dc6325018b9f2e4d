use lexis_chunker::{ChunkerConfig, SemanticChunker};
use lexis_common::config::AppConfig;
use lexis_connectors::ExtractorRegistry;
use lexis_ingestion::IngestionPipeline;
use lexis_oracle_client::{HttpOracle, RetrievalOracle};
use lexis_scheduler::WorkerPool;
use lexis_scoring::{DistractorSelector, SimilarityBand};
use lexis_store::MemoryStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: MemoryStore,
    pub oracle: Option<Arc<dyn RetrievalOracle>>,
    pub pipeline: Arc<IngestionPipeline>,
    pub worker_pool: WorkerPool,
    pub chunker: ChunkerConfig,
    pub selector: DistractorSelector,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let oracle: Option<Arc<dyn RetrievalOracle>> = match &config.oracle_url {
            Some(url) => {
                let oracle = HttpOracle::new(url, config.oracle_timeout())?;
                tracing::info!("Retrieval oracle configured at {url}");
                Some(Arc::new(oracle))
            }
            None => {
                tracing::info!("No retrieval oracle configured, candidate pools stay local");
                None
            }
        };

        Self::with_oracle(config, oracle)
    }

    /// Build the state around an already constructed oracle (or none).
    pub fn with_oracle(config: &AppConfig, oracle: Option<Arc<dyn RetrievalOracle>>) -> anyhow::Result<Self> {
        let band = SimilarityBand::try_from(config)?;
        let chunker = ChunkerConfig::from(config);
        let store = MemoryStore::new();

        let pipeline = Arc::new(IngestionPipeline::new(
            store.clone(),
            oracle.clone(),
            ExtractorRegistry::with_defaults(),
            SemanticChunker::with_config(chunker),
        ));

        let worker_pool = WorkerPool::spawn(config.workers, pipeline.clone());
        tracing::info!(workers = config.workers, "Worker pool started");

        Ok(Self {
            store,
            oracle,
            pipeline,
            worker_pool,
            chunker,
            selector: DistractorSelector::new(band),
        })
    }
}
