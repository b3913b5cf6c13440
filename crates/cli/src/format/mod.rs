//! Transcript formatting for streamed chunks.
//!
//! Each chunk is turned into the exact text appended to the transcript. A
//! role label (`You:`, `Assistant:`, ...) is printed only when it differs
//! from the last one printed, so consecutive fragments of one message read as
//! a single block.

mod content;
mod reasoning;

pub use content::render_content;
pub use reasoning::extract_reasoning;

use runtime::{Chunk, ChunkKind};

/// Label of the most recently printed output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterState {
    last_label: Option<String>,
}

impl FormatterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }
}

/// Format one chunk for the transcript, updating `state`.
pub fn format_message(chunk: &Chunk, state: &mut FormatterState) -> String {
    let reasoning = extract_reasoning(chunk);
    let mut label = role_label(&chunk.kind);
    if !reasoning.is_empty() {
        label.push_str(" (reasoning)");
    }
    let mut include = state.last_label() != Some(label.as_str());

    let (out, emitted) = match &chunk.kind {
        ChunkKind::Ai { tool_calls } => {
            let mut lines = Vec::new();
            if !reasoning.is_empty() {
                lines.push(labelled(&label, reasoning, include));
                include = false;
            }
            let text = render_content(&chunk.content);
            if !text.is_empty() {
                lines.push(labelled(&label, &text, include));
                include = false;
            }
            for call in tool_calls {
                let line = format!("Calling tool -> {} with args: {}", call.name, call.input);
                lines.push(labelled(&label, &line, include));
                include = false;
            }
            let emitted = !lines.is_empty();
            (lines.join("\n"), emitted)
        }
        ChunkKind::Human => (labelled(&label, &render_content(&chunk.content), include), true),
        ChunkKind::Tool { name } => {
            let name = name.as_deref().unwrap_or("tool");
            let text = render_content(&chunk.content);
            let out = match (include, text.is_empty()) {
                (true, false) => format!("\n[Tool {name}] -> {text}"),
                (true, true) => format!("[Tool {name}]"),
                (false, _) => text,
            };
            (out, true)
        }
        ChunkKind::System => {
            let text = render_content(&chunk.content);
            let out = match (include, text.is_empty()) {
                (true, false) => format!("[System] {text}"),
                (true, true) => "[System]".to_string(),
                (false, _) => text,
            };
            (out, true)
        }
        ChunkKind::Other(_) => {
            let mut lines = Vec::new();
            if !reasoning.is_empty() {
                lines.push(labelled(&label, &format!("Reasoning: {reasoning}"), include));
                include = false;
            }
            let text = render_content(&chunk.content);
            if !text.is_empty() || include {
                lines.push(labelled(&label, &text, include));
            }
            lines.retain(|line| !line.is_empty());
            (lines.join("\n"), true)
        }
    };

    if emitted {
        state.last_label = Some(label);
    }
    out
}

fn role_label(kind: &ChunkKind) -> String {
    match kind {
        ChunkKind::Human => "You".to_string(),
        ChunkKind::Ai { .. } => "Assistant".to_string(),
        ChunkKind::Tool { .. } => "Tool".to_string(),
        ChunkKind::System => "System".to_string(),
        ChunkKind::Other(tag) => capitalize(tag),
    }
}

/// First character upper-cased, the rest lower-cased.
fn capitalize(tag: &str) -> String {
    let mut chars = tag.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

fn labelled(label: &str, text: &str, include: bool) -> String {
    if include {
        format!("\n{label}: {text}")
    } else {
        text.to_string()
    }
}
