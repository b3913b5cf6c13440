//! MCP-backed tool host.

use super::{ToolError, ToolHost};
use crate::mcp::{McpClient, McpError};
use crate::model::{ToolCall, ToolSpec};
use rmcp::model::{Content, RawContent, Tool};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Tool host backed by a remote MCP server.
pub struct McpToolHost {
    client: McpClient,
    specs: Vec<ToolSpec>,
}

impl McpToolHost {
    /// Connect to the MCP server at `url` and cache its tool specs.
    pub async fn connect(url: impl Into<String>) -> Result<Self, McpError> {
        let client = McpClient::connect(url).await?;
        let specs: Vec<ToolSpec> = client.list_tools().await?.iter().map(tool_spec).collect();
        debug!(
            tools = ?specs.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            "discovered mcp tools"
        );
        Ok(Self { client, specs })
    }

    /// Close the underlying MCP session.
    pub async fn shutdown(self) -> Result<(), McpError> {
        self.client.shutdown().await
    }
}

impl ToolHost for McpToolHost {
    fn specs(&self) -> &[ToolSpec] {
        &self.specs
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        if !self.specs.iter().any(|spec| spec.name == call.name) {
            return Err(ToolError::NotFound(call.name.clone()));
        }

        let arguments = arguments(&call.input)?;
        let result = self
            .client
            .call_tool(&call.name, arguments)
            .await
            .map_err(|e| ToolError::Execution(e.to_string()))?;

        let text = extract_text(&result.content);
        if result.is_error == Some(true) {
            warn!(tool = %call.name, error = %text, "tool reported an error");
            return Err(ToolError::Execution(text));
        }

        match result.structured_content {
            Some(structured) if text.is_empty() => Ok(structured),
            _ => Ok(Value::String(text)),
        }
    }
}

/// Convert an rmcp tool definition into a model-facing spec.
fn tool_spec(tool: &Tool) -> ToolSpec {
    ToolSpec {
        name: tool.name.to_string(),
        description: tool
            .description
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default(),
        schema: Value::Object(tool.input_schema.as_ref().clone()),
    }
}

/// MCP expects tool arguments as a JSON object.
fn arguments(input: &Value) -> Result<Option<Map<String, Value>>, ToolError> {
    match input {
        Value::Object(map) => Ok(Some(map.clone())),
        Value::Null => Ok(None),
        other => Err(ToolError::InvalidInput(format!(
            "expected an object of arguments, got {other}"
        ))),
    }
}

/// Join the text items of a tool result.
fn extract_text(content: &[Content]) -> String {
    content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn object_arguments_pass_through() {
        let args = arguments(&json!({"num1": 3, "num2": 4})).unwrap().unwrap();
        assert_eq!(args["num1"], 3);
        assert_eq!(args["num2"], 4);
    }

    #[test]
    fn null_arguments_are_omitted() {
        assert!(arguments(&Value::Null).unwrap().is_none());
    }

    #[test]
    fn non_object_arguments_are_rejected() {
        let err = arguments(&json!([3, 4])).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn text_content_is_joined() {
        let content = vec![Content::text("7"), Content::text("done")];
        assert_eq!(extract_text(&content), "7\ndone");
        assert_eq!(extract_text(&[]), "");
    }

    #[test]
    fn tool_spec_from_mcp_tool() {
        let schema = json!({
            "type": "object",
            "properties": {"num1": {"type": "integer"}, "num2": {"type": "integer"}}
        });
        let Value::Object(schema) = schema else {
            unreachable!()
        };
        let tool = Tool::new("add_numbers", "Add two numbers", Arc::new(schema));

        let spec = tool_spec(&tool);
        assert_eq!(spec.name, "add_numbers");
        assert_eq!(spec.description, "Add two numbers");
        assert_eq!(spec.schema["properties"]["num1"]["type"], "integer");
    }

    #[tokio::test]
    async fn round_trip_against_math_server() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, mcp_server::router()).await.unwrap();
        });

        let host = McpToolHost::connect(format!("http://{addr}/mcp"))
            .await
            .unwrap();
        assert!(host.specs().iter().any(|s| s.name == "add_numbers"));

        let call = ToolCall {
            id: "1".into(),
            name: "add_numbers".into(),
            input: json!({"num1": 3, "num2": 4}),
        };
        assert_eq!(host.execute(&call).await.unwrap(), json!("7"));

        let unknown = ToolCall {
            id: "2".into(),
            name: "subtract_numbers".into(),
            input: json!({}),
        };
        assert!(matches!(
            host.execute(&unknown).await,
            Err(ToolError::NotFound(_))
        ));

        host.shutdown().await.unwrap();
    }
}
