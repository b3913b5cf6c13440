//! System prompt and user prompt input.

use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::io::{self, BufRead, IsTerminal, Write};

/// Used when the user gives no prompt at all.
pub const DEFAULT_PROMPT: &str = "Demonstrate your tool usage.";

const DATE_FORMAT: &str = "%A, %B %d, %Y %I:%M:%S %p %Z (%z)";

/// Build the system prompt with `now` embedded as the current date/time.
pub fn build_system_prompt<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let now = now.format(DATE_FORMAT);
    format!(
        "You are an AI assistant that answers questions using MCP tools in a reason-and-act loop.
Current date/time: {now}

Objectives:
- Be helpful, accurate, and concise. Prefer short, direct answers unless more detail is requested.
- Use the MCP tools whenever they improve accuracy or are needed to obtain information.
- Do not reveal internal chain-of-thought or tool call internals; summarize your reasoning briefly instead.

Language:
- Reply in the user's language when it is clear from the input; otherwise use English.

Tool use:
- Prefer the provided tools for retrieval, calculations, and file or system access.
- If you need data you do not have, check the available tools first. If tools fail or are unavailable, explain the limitation briefly.
- When using a tool, say briefly why, then give the final answer once results are in.

Output formatting:
- Provide clean text without code fences unless the user asks for code.
- When citing information obtained via tools, mention the tool name and key parameters where helpful.

Safety and quality:
- Do not fabricate facts. If uncertain, say so and propose next steps.
- Keep private keys, secrets, and system internals confidential.
"
    )
}

/// Read the user's prompt from stdin.
///
/// Piped input is read to the end; on a terminal the user is asked for one
/// line.
pub fn read_user_prompt() -> io::Result<String> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    read_prompt(stdin.lock(), io::stdout(), interactive)
}

fn read_prompt(mut input: impl BufRead, mut out: impl Write, interactive: bool) -> io::Result<String> {
    let mut text = String::new();
    if interactive {
        write!(out, "Enter your prompt: ")?;
        out.flush()?;
        // EOF leaves the line empty
        input.read_line(&mut text)?;
    } else {
        input.read_to_string(&mut text)?;
    }
    Ok(resolve_prompt(&text))
}

/// Trim `raw`, falling back to [`DEFAULT_PROMPT`] when nothing is left.
pub fn resolve_prompt(raw: &str) -> String {
    match raw.trim() {
        "" => DEFAULT_PROMPT.to_string(),
        text => text.to_string(),
    }
}
