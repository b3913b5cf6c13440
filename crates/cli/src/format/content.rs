use runtime::{Content, ContentBlock};
use serde_json::Value;

/// Render a chunk payload as display text.
///
/// Reasoning blocks are left out; they are shown from chunk metadata
/// instead.
pub fn render_content(content: &Content) -> String {
    match content {
        Content::Text(text) => text.clone(),
        Content::Blocks(blocks) => blocks
            .iter()
            .filter_map(render_block)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Content::Other(Value::Null) => String::new(),
        Content::Other(value) => value.to_string(),
    }
}

fn render_block(block: &ContentBlock) -> Option<String> {
    match block {
        ContentBlock::Text(text) => Some(text.clone()),
        ContentBlock::Reasoning(_) => None,
        ContentBlock::ToolUse { name, args } => Some(format!("[calls {name} {args}]")),
        ContentBlock::ToolResult { name, output } => {
            Some(format!("[result from {name}: {}]", display_value(output)))
        }
        ContentBlock::Unknown(value) => Some(value.to_string()),
    }
}

/// Strings as-is, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
