pub mod jobs;
pub mod worker;

pub use jobs::JobPayload;
pub use worker::{SubmitError, WorkerPool};
