//! LLM provider backends.
//!
//! Each provider implements the backend trait for its specific API.

mod ollama;

pub use ollama::{OllamaBackend, OllamaBackendBuilder};
