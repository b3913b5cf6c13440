//! Agent runtime: model backend, MCP tools and the ReAct loop.
//!
//! This crate provides everything the chat client needs to run a tool-using
//! agent against a locally hosted model and a remote MCP tool server.
//!
//! # Overview
//!
//! The runtime is organized around these concepts:
//!
//! - **Backend**: A trait abstracting streaming LLM providers (Ollama).
//! - **ToolHost**: A trait for tool execution, implemented over MCP.
//! - **Agent**: The loop alternating model turns and tool calls.
//! - **Chunk**: One fragment of the agent's streamed output.
//!
//! # Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use runtime::{Agent, McpToolHost, OllamaBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let backend = OllamaBackend::builder("http://localhost:11434", "qwen3:30b").build();
//! let tools = McpToolHost::connect("http://localhost:13744/mcp").await?;
//! let agent = Agent::new(backend, tools).with_system("Be concise.");
//!
//! let mut chunks = agent.stream("What is 3 + 4?");
//! while let Some(chunk) = chunks.next().await {
//!     println!("{:?}", chunk?);
//! }
//! # Ok(())
//! # }
//! ```

mod agent;
mod chunk;
mod error;
mod mcp;
pub mod model;
mod providers;
pub mod tools;

pub use agent::{Agent, DEFAULT_MAX_TURNS};
pub use chunk::{Chunk, ChunkKind, Content, ContentBlock, REASONING_KEY};
pub use error::{Error, Result};
pub use mcp::{McpClient, McpError};
pub use model::{Backend, ModelChunk, ModelError, ToolCall, ToolSpec};
pub use providers::{OllamaBackend, OllamaBackendBuilder};
pub use tools::{EmptyToolHost, McpToolHost, ToolError, ToolHost};
