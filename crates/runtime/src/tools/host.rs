//! Tool host trait.

use crate::model::{ToolCall, ToolSpec};
use crate::tools::ToolError;
use serde_json::Value;
use std::future::Future;

/// Where the agent loop gets its tools from.
///
/// [`McpToolHost`](super::McpToolHost) serves the tools advertised by a
/// remote MCP server; [`EmptyToolHost`](super::EmptyToolHost) serves none.
/// Specs are fixed for the host's lifetime and sent to the model every turn.
pub trait ToolHost: Send + Sync {
    fn specs(&self) -> &[ToolSpec];

    /// Run one model-requested call. Unknown tool names are
    /// [`ToolError::NotFound`].
    fn execute(&self, call: &ToolCall) -> impl Future<Output = Result<Value, ToolError>> + Send;
}
