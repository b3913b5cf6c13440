use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use serde::Deserialize;
use tracing::info;

type McpError = rmcp::ErrorData;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddNumbersParams {
    #[schemars(description = "first number to add.")]
    pub num1: i64,
    #[schemars(description = "second number to add.")]
    pub num2: i64,
}

/// The `math` tool server.
#[derive(Debug, Clone)]
pub struct MathServer {
    tool_router: ToolRouter<MathServer>,
}

impl Default for MathServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl MathServer {
    pub fn new() -> Self {
        Self {
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Add two numbers. Returns the sum of both the input numbers.")]
    async fn add_numbers(
        &self,
        Parameters(p): Parameters<AddNumbersParams>,
    ) -> Result<CallToolResult, McpError> {
        let sum = p.num1.checked_add(p.num2).ok_or_else(|| {
            McpError::invalid_params(
                format!("{} + {} does not fit in a 64-bit integer", p.num1, p.num2),
                None,
            )
        })?;

        info!("add_numbers({}, {}) => {}", p.num1, p.num2, sum);
        Ok(CallToolResult::success(vec![Content::text(sum.to_string())]))
    }
}

#[tool_handler]
impl ServerHandler for MathServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "math".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some("Arithmetic tools. Call add_numbers to add two integers.".to_string()),
        }
    }
}
