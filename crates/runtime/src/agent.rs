//! ReAct agent loop.
//!
//! Alternates between streaming a model response and executing the tool
//! calls it requests, until the model answers without asking for tools.

use crate::chunk::Chunk;
use crate::model::{Backend, Message, ModelRequest, Part, Role, ToolCall, ToolResult};
use crate::tools::ToolHost;
use crate::{Error, Result};
use async_stream::try_stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use tracing::{debug, warn};

/// Model turns allowed per run before giving up.
pub const DEFAULT_MAX_TURNS: usize = 25;

/// A tool-using agent over a model backend and a tool host.
pub struct Agent<B, T> {
    backend: B,
    tools: T,
    system: Option<String>,
    max_turns: usize,
}

impl<B: Backend, T: ToolHost> Agent<B, T> {
    pub fn new(backend: B, tools: T) -> Self {
        Self {
            backend,
            tools,
            system: None,
            max_turns: DEFAULT_MAX_TURNS,
        }
    }

    /// Set the system prompt.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Consume the agent, handing back its tool host.
    pub fn into_tools(self) -> T {
        self.tools
    }

    /// Run the agent on `prompt`, yielding chunks in the order they happen.
    ///
    /// Model output is yielded as it streams; each tool result follows once
    /// its call has finished. A failed tool call is reported back to the
    /// model (and yielded) as an `Error: ...` result rather than ending the
    /// run.
    pub fn stream<'a>(&'a self, prompt: &str) -> BoxStream<'a, Result<Chunk>> {
        let mut messages = Vec::new();
        if let Some(system) = &self.system {
            messages.push(Message::system(system.clone()));
        }
        messages.push(Message::user(prompt));

        Box::pin(try_stream! {
            let mut turn = 0;
            loop {
                turn += 1;
                if turn > self.max_turns {
                    Err::<(), _>(Error::RecursionLimit(self.max_turns))?;
                }
                debug!(turn, messages = messages.len(), "model turn");

                let mut text = String::new();
                let mut calls: Vec<ToolCall> = Vec::new();
                {
                    let request = ModelRequest {
                        messages: &messages,
                        tools: self.tools.specs(),
                    };
                    let mut chunks = self.backend.stream(request);
                    while let Some(chunk) = chunks.next().await {
                        let chunk = chunk?;
                        if let Some(usage) = chunk.usage {
                            debug!(
                                input_tokens = usage.input_tokens,
                                output_tokens = usage.output_tokens,
                                "model turn finished"
                            );
                        }
                        text.push_str(&chunk.content);
                        calls.extend(chunk.tool_calls.iter().cloned());
                        yield Chunk::from(chunk);
                    }
                }

                let mut parts = Vec::new();
                if !text.is_empty() {
                    parts.push(Part::Text(text));
                }
                parts.extend(calls.iter().cloned().map(Part::ToolCall));
                messages.push(Message {
                    role: Role::Assistant,
                    parts,
                });

                if calls.is_empty() {
                    break;
                }

                let mut results = Vec::with_capacity(calls.len());
                for call in &calls {
                    let result = match self.tools.execute(call).await {
                        Ok(output) => ToolResult::Success {
                            tool_call_id: call.id.clone(),
                            output,
                        },
                        Err(e) => {
                            warn!(tool = %call.name, error = %e, "tool call failed");
                            ToolResult::Failure {
                                tool_call_id: call.id.clone(),
                                error: e.to_string(),
                            }
                        }
                    };
                    yield Chunk::tool(call.name.clone(), result.content());
                    results.push(Part::ToolResult(result));
                }
                messages.push(Message {
                    role: Role::User,
                    parts: results,
                });
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{ChunkKind, Content};
    use crate::model::{ModelChunk, ModelError, ToolSpec};
    use crate::tools::{EmptyToolHost, ToolError};
    use serde_json::{Value, json};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays one scripted response per model turn and records requests.
    #[derive(Default)]
    struct ScriptedBackend {
        turns: Mutex<VecDeque<Vec<ModelChunk>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedBackend {
        fn new(turns: Vec<Vec<ModelChunk>>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                seen: Mutex::default(),
            }
        }
    }

    impl Backend for ScriptedBackend {
        fn stream<'a>(
            &'a self,
            request: ModelRequest<'a>,
        ) -> BoxStream<'a, std::result::Result<ModelChunk, ModelError>> {
            self.seen.lock().unwrap().push(request.messages.to_vec());
            let chunks = self.turns.lock().unwrap().pop_front().unwrap_or_default();
            futures::stream::iter(chunks.into_iter().map(Ok)).boxed()
        }
    }

    /// Loops forever asking for the same tool.
    struct LoopingBackend;

    impl Backend for LoopingBackend {
        fn stream<'a>(
            &'a self,
            _request: ModelRequest<'a>,
        ) -> BoxStream<'a, std::result::Result<ModelChunk, ModelError>> {
            futures::stream::iter([Ok(call_chunk(3, 4))]).boxed()
        }
    }

    struct MathTools {
        specs: Vec<ToolSpec>,
    }

    impl MathTools {
        fn new() -> Self {
            Self {
                specs: vec![ToolSpec {
                    name: "add_numbers".into(),
                    description: "Add two numbers".into(),
                    schema: json!({"type": "object"}),
                }],
            }
        }
    }

    impl ToolHost for MathTools {
        fn specs(&self) -> &[ToolSpec] {
            &self.specs
        }

        async fn execute(&self, call: &ToolCall) -> std::result::Result<Value, ToolError> {
            let arg = |key: &str| {
                call.input[key]
                    .as_i64()
                    .ok_or_else(|| ToolError::InvalidInput(format!("missing {key}")))
            };
            Ok(Value::String((arg("num1")? + arg("num2")?).to_string()))
        }
    }

    fn text_chunk(text: &str) -> ModelChunk {
        ModelChunk {
            content: text.into(),
            ..Default::default()
        }
    }

    fn call_chunk(num1: i64, num2: i64) -> ModelChunk {
        ModelChunk {
            tool_calls: vec![ToolCall {
                id: "call-1".into(),
                name: "add_numbers".into(),
                input: json!({"num1": num1, "num2": num2}),
            }],
            ..Default::default()
        }
    }

    fn done_chunk() -> ModelChunk {
        ModelChunk {
            done: true,
            ..Default::default()
        }
    }

    async fn run<B: Backend, T: ToolHost>(agent: &Agent<B, T>, prompt: &str) -> Vec<Result<Chunk>> {
        agent.stream(prompt).collect().await
    }

    #[tokio::test]
    async fn answer_without_tools_ends_after_one_turn() {
        let backend = ScriptedBackend::new(vec![vec![
            text_chunk("Hel"),
            text_chunk("lo"),
            done_chunk(),
        ]]);
        let agent = Agent::new(backend, MathTools::new());

        let chunks: Vec<Chunk> = run(&agent, "Hi").await.into_iter().map(|c| c.unwrap()).collect();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].content, Content::Text("Hel".into()));
        assert_eq!(chunks[1].content, Content::Text("lo".into()));
        assert!(chunks.iter().all(|c| matches!(c.kind, ChunkKind::Ai { .. })));
    }

    #[tokio::test]
    async fn tool_results_follow_the_model_turn() {
        let backend = ScriptedBackend::new(vec![
            vec![call_chunk(3, 4), done_chunk()],
            vec![text_chunk("The sum is 7."), done_chunk()],
        ]);
        let agent = Agent::new(backend, MathTools::new()).with_system("be brief");

        let chunks: Vec<Chunk> = run(&agent, "add 3 and 4")
            .await
            .into_iter()
            .map(|c| c.unwrap())
            .collect();

        assert_eq!(chunks.len(), 5);
        assert_eq!(chunks[2], Chunk::tool("add_numbers", "7"));
        assert_eq!(chunks[3].content, Content::Text("The sum is 7.".into()));

        let seen = agent.backend.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0][0].role, Role::System);
        assert_eq!(seen[0][1].text(), "add 3 and 4");

        let second = &seen[1];
        assert_eq!(second.len(), 4);
        assert_eq!(second[2].tool_calls()[0].name, "add_numbers");
        assert_eq!(second[3].tool_results()[0].content(), "7");
    }

    #[tokio::test]
    async fn failed_tool_is_reported_not_fatal() {
        let backend = ScriptedBackend::new(vec![
            vec![call_chunk(1, 2)],
            vec![text_chunk("Sorry, no tools.")],
        ]);
        let agent = Agent::new(backend, EmptyToolHost);

        let chunks: Vec<Chunk> = run(&agent, "add").await.into_iter().map(|c| c.unwrap()).collect();

        assert_eq!(
            chunks[1],
            Chunk::tool("add_numbers", "Error: tool not found: add_numbers")
        );
        assert_eq!(chunks[2].content, Content::Text("Sorry, no tools.".into()));
    }

    #[tokio::test]
    async fn runaway_tool_loop_hits_the_turn_limit() {
        let agent = Agent::new(LoopingBackend, MathTools::new()).with_max_turns(2);

        let chunks = run(&agent, "loop").await;

        // two turns of (call, result), then the error
        assert_eq!(chunks.len(), 5);
        assert!(chunks[..4].iter().all(|c| c.is_ok()));
        assert!(matches!(chunks[4], Err(Error::RecursionLimit(2))));
    }
}
