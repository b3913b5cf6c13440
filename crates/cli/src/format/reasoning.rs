use runtime::{Chunk, REASONING_KEY};
use serde_json::Value;

/// Reasoning text carried in a chunk's metadata, or `""` when there is none.
pub fn extract_reasoning(chunk: &Chunk) -> &str {
    chunk
        .metadata
        .as_ref()
        .and_then(|metadata| metadata.get(REASONING_KEY))
        .and_then(Value::as_str)
        .unwrap_or_default()
}
