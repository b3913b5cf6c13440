//! MCP (Model Context Protocol) client integration.
//!
//! This module provides MCP server access using the official rmcp SDK over
//! the streamable HTTP transport.
//!
//! # Example
//!
//! ```ignore
//! use runtime::McpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = McpClient::connect("http://localhost:13744/mcp").await?;
//!
//! let tools = client.list_tools().await?;
//! for tool in &tools {
//!     println!("Tool: {}", tool.name);
//! }
//! # Ok(())
//! # }
//! ```

use rmcp::{
    ServiceExt,
    model::{CallToolRequestParams, CallToolResult, Tool},
    service::{RoleClient, RunningService},
    transport::StreamableHttpClientTransport,
};
use tracing::debug;

/// Error type for MCP operations.
pub type McpError = Box<dyn std::error::Error + Send + Sync>;

/// An MCP client session with a remote server.
pub struct McpClient {
    service: RunningService<RoleClient, ()>,
}

impl McpClient {
    /// Open a session with the MCP server at `url` (e.g. `http://host:13744/mcp`).
    pub async fn connect(url: impl Into<String>) -> Result<Self, McpError> {
        let url = url.into();
        let transport = StreamableHttpClientTransport::from_uri(url.clone());
        let service = ().serve(transport).await?;

        if let Some(info) = service.peer_info() {
            debug!(
                %url,
                server = %info.server_info.name,
                version = %info.server_info.version,
                "mcp session initialized"
            );
        }

        Ok(Self { service })
    }

    /// List available tools from the server.
    pub async fn list_tools(&self) -> Result<Vec<Tool>, McpError> {
        Ok(self.service.list_all_tools().await?)
    }

    /// Call a tool with the given name and arguments.
    pub async fn call_tool(
        &self,
        name: impl Into<String>,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<CallToolResult, McpError> {
        let params = CallToolRequestParams {
            name: name.into().into(),
            arguments,
            meta: None,
            task: None,
        };

        let result = self.service.call_tool(params).await?;
        Ok(result)
    }

    /// Close the session.
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.service.cancel().await?;
        Ok(())
    }
}
