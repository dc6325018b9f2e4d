use sha2::{Digest, Sha256};

/// SHA-256 of uploaded content, hex encoded, for change detection.
pub fn hash_content(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
