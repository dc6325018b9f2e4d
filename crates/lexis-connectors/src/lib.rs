pub mod plaintext;
pub mod registry;
pub mod traits;
pub mod upload;

pub use registry::ExtractorRegistry;
pub use traits::{ExtractedDocument, Extractor};
pub use upload::hash_content;
