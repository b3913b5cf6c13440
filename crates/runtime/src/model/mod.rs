//! LLM protocol types and backend trait.

pub mod errors;
pub mod types;

pub use errors::ModelError;
pub use types::{
    Backend, Message, ModelChunk, ModelRequest, Part, Role, ToolCall, ToolResult, ToolSpec, Usage,
};
