//! Empty tool host implementation.

use crate::model::{ToolCall, ToolSpec};
use crate::tools::{ToolError, ToolHost};
use serde_json::Value;

/// A no-op tool host with no tools.
///
/// Useful for testing or when tools are not needed.
#[derive(Debug, Default)]
pub struct EmptyToolHost;

impl ToolHost for EmptyToolHost {
    fn specs(&self) -> &[ToolSpec] {
        &[]
    }

    async fn execute(&self, call: &ToolCall) -> Result<Value, ToolError> {
        Err(ToolError::NotFound(call.name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_host_has_no_tools() {
        let host = EmptyToolHost;
        assert!(host.specs().is_empty());

        let call = ToolCall {
            id: "1".into(),
            name: "add_numbers".into(),
            input: Value::Null,
        };
        let err = host.execute(&call).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(name) if name == "add_numbers"));
    }
}
