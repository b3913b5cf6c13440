//! Incremental output of an agent run.
//!
//! A [`Chunk`] is one fragment of the conversation as it streams in: a piece
//! of model text or reasoning, a batch of tool-call requests, or a tool
//! result. Content is deliberately loose (plain text, typed blocks, or an
//! arbitrary JSON value) so that any provider's payload can be displayed.

use crate::model::{ModelChunk, ToolCall};
use serde_json::{Value, json};

/// Metadata key under which reasoning text travels.
pub const REASONING_KEY: &str = "reasoning_content";

/// Who produced a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum ChunkKind {
    /// Input typed by the user.
    Human,
    /// Model output, with any tool invocations it requested.
    Ai { tool_calls: Vec<ToolCall> },
    /// Output of a tool invocation.
    Tool { name: Option<String> },
    /// Instructions given to the model.
    System,
    /// Any other role tag.
    Other(String),
}

/// Payload of a chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Text(String),
    Blocks(Vec<ContentBlock>),
    /// Structured payload with no dedicated representation.
    Other(Value),
}

impl Content {
    /// Interpret a raw JSON payload.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(text) => Self::Text(text),
            Value::Array(items) => {
                Self::Blocks(items.into_iter().map(ContentBlock::from_value).collect())
            }
            other => Self::Other(other),
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

/// A typed element of block content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    Reasoning(String),
    ToolUse { name: String, args: Value },
    ToolResult { name: String, output: Value },
    /// Kept verbatim when the shape is not recognized.
    Unknown(Value),
}

impl ContentBlock {
    /// Parse a block from its JSON form, keyed on the `type` field.
    ///
    /// Anything that does not match a known shape becomes
    /// [`ContentBlock::Unknown`], including a `text` block whose text is not
    /// a string.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(map) = &value else {
            return Self::Unknown(value);
        };

        match map.get("type").and_then(Value::as_str) {
            Some("text") => match map.get("text") {
                Some(Value::String(text)) => Self::Text(text.clone()),
                _ => Self::Unknown(value),
            },
            Some(kind @ ("reasoning" | "thinking")) => {
                let text = [kind, "text"]
                    .iter()
                    .find_map(|key| map.get(*key).and_then(Value::as_str))
                    .unwrap_or_default();
                Self::Reasoning(text.to_string())
            }
            Some("tool_use") => Self::ToolUse {
                name: block_name(map.get("name")),
                args: ["input", "args"]
                    .iter()
                    .filter_map(|key| map.get(*key))
                    .find(|v| is_truthy(v))
                    .cloned()
                    .unwrap_or_else(|| json!({})),
            },
            Some("tool_result") => Self::ToolResult {
                name: block_name(map.get("name")),
                output: map.get("output").cloned().unwrap_or(Value::Null),
            },
            _ => Self::Unknown(value),
        }
    }
}

fn block_name(name: Option<&Value>) -> String {
    match name {
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
        None => "tool".to_string(),
    }
}

/// Empty containers, empty strings, zero, false and null count as absent.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// One fragment of streamed conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub content: Content,
    /// Free-form provider metadata; reasoning text lives under
    /// [`REASONING_KEY`].
    pub metadata: Option<Value>,
}

impl Chunk {
    pub fn new(kind: ChunkKind, content: impl Into<Content>) -> Self {
        Self {
            kind,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn human(content: impl Into<Content>) -> Self {
        Self::new(ChunkKind::Human, content)
    }

    pub fn ai(content: impl Into<Content>) -> Self {
        Self::new(
            ChunkKind::Ai {
                tool_calls: Vec::new(),
            },
            content,
        )
    }

    pub fn tool(name: impl Into<String>, content: impl Into<Content>) -> Self {
        Self::new(
            ChunkKind::Tool {
                name: Some(name.into()),
            },
            content,
        )
    }

    pub fn system(content: impl Into<Content>) -> Self {
        Self::new(ChunkKind::System, content)
    }

    pub fn other(role: impl Into<String>, content: impl Into<Content>) -> Self {
        Self::new(ChunkKind::Other(role.into()), content)
    }

    /// Attach tool calls. No-op unless this is a model chunk.
    pub fn with_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        if let ChunkKind::Ai { tool_calls } = &mut self.kind {
            tool_calls.extend(calls);
        }
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Store reasoning text in the metadata side channel.
    pub fn with_reasoning(self, reasoning: impl Into<String>) -> Self {
        let reasoning: String = reasoning.into();
        self.with_metadata(json!({ REASONING_KEY: reasoning }))
    }
}

impl From<ModelChunk> for Chunk {
    fn from(chunk: ModelChunk) -> Self {
        let out = Chunk::ai(chunk.content).with_tool_calls(chunk.tool_calls);
        match chunk.thinking {
            Some(thinking) => out.with_reasoning(thinking),
            None => out,
        }
    }
}
