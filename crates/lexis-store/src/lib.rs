pub mod memory;
pub mod models;

pub use memory::{MemoryStore, StoreError};
pub use models::Insertion;
