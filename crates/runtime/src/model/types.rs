use super::errors::ModelError;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// The result the runtime returned from a tool call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolResult {
    Success {
        tool_call_id: String,
        output: Value,
    },
    Failure {
        tool_call_id: String,
        error: String,
    },
}

impl ToolResult {
    /// Text handed back to the model for this result.
    pub fn content(&self) -> String {
        match self {
            Self::Success { output, .. } => match output {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            },
            Self::Failure { error, .. } => format!("Error: {error}"),
        }
    }
}

/// A part of a message, which can be text or a tool interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Part {
    Text(String),
    ToolCall(ToolCall),
    ToolResult(ToolResult),
}

/// A message, consisting of a role and one or more parts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Message {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }

    /// Get combined text content from all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Extract all tool calls from this message.
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::ToolCall(call) => Some(call.clone()),
                _ => None,
            })
            .collect()
    }

    /// Extract all tool results from this message.
    pub fn tool_results(&self) -> Vec<&ToolResult> {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::ToolResult(result) => Some(result),
                _ => None,
            })
            .collect()
    }
}

/// A tool definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub schema: Value,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Everything needed for a model request.
#[derive(Debug, Clone)]
pub struct ModelRequest<'a> {
    pub messages: &'a [Message],
    pub tools: &'a [ToolSpec],
}

/// One incremental piece of a streamed model response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelChunk {
    /// Answer text delta.
    pub content: String,
    /// Reasoning text delta, when the model exposes it.
    pub thinking: Option<String>,
    /// Completed tool calls carried by this chunk.
    pub tool_calls: Vec<ToolCall>,
    /// Set on the final chunk of a response.
    pub done: bool,
    pub usage: Option<Usage>,
}

/// Trait for LLM provider backends.
pub trait Backend: Send + Sync {
    /// Stream the model's response as incremental chunks.
    fn stream<'a>(
        &'a self,
        request: ModelRequest<'a>,
    ) -> BoxStream<'a, Result<ModelChunk, ModelError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_text_extraction() {
        let msg = Message {
            role: Role::Assistant,
            parts: vec![
                Part::Text("Hello ".into()),
                Part::ToolCall(ToolCall {
                    id: "1".into(),
                    name: "test".into(),
                    input: Value::Null,
                }),
                Part::Text("world".into()),
            ],
        };
        assert_eq!(msg.text(), "Hello world");
    }

    #[test]
    fn message_tool_calls_extraction() {
        let msg = Message {
            role: Role::Assistant,
            parts: vec![
                Part::Text("Let me help".into()),
                Part::ToolCall(ToolCall {
                    id: "1".into(),
                    name: "add_numbers".into(),
                    input: serde_json::json!({"num1": 1, "num2": 2}),
                }),
                Part::ToolCall(ToolCall {
                    id: "2".into(),
                    name: "add_numbers".into(),
                    input: serde_json::json!({"num1": 3, "num2": 4}),
                }),
            ],
        };
        let calls = msg.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "1");
        assert_eq!(calls[1].input["num2"], 4);
    }

    #[test]
    fn tool_result_content() {
        let ok = ToolResult::Success {
            tool_call_id: "1".into(),
            output: Value::String("7".into()),
        };
        assert_eq!(ok.content(), "7");

        let json = ToolResult::Success {
            tool_call_id: "2".into(),
            output: serde_json::json!({"sum": 7}),
        };
        assert_eq!(json.content(), r#"{"sum":7}"#);

        let failed = ToolResult::Failure {
            tool_call_id: "3".into(),
            error: "boom".into(),
        };
        assert_eq!(failed.content(), "Error: boom");
    }

    #[test]
    fn model_chunks_compare_usage() {
        let done = |output_tokens| ModelChunk {
            done: true,
            usage: Some(Usage {
                input_tokens: 12,
                output_tokens,
            }),
            ..Default::default()
        };
        assert_eq!(done(5), done(5));
        assert_ne!(done(5), done(6));
        assert_ne!(done(5), ModelChunk::default());
    }
}
