pub mod pipeline;
pub mod quiz;

pub use pipeline::{oracle_chunk_id, IngestResult, IngestionError, IngestionPipeline, Upload};
