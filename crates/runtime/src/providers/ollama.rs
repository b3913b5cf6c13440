//! Ollama chat API backend.
//!
//! Talks to the native `/api/chat` endpoint in streaming mode. Ollama answers
//! with newline-delimited JSON, one object per generated fragment, the last
//! one flagged `done`.

use crate::model::{
    Backend, Message, ModelChunk, ModelError, ModelRequest, Part, Role, ToolCall, ToolSpec, Usage,
};
use async_stream::try_stream;
use futures::StreamExt;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

const DEFAULT_TEMPERATURE: f32 = 0.8;
const DEFAULT_NUM_PREDICT: u32 = 4096;

// ─────────────────────────────────────────────────────────────────────────────
// API Wire Types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool<'a>>,
    stream: bool,
    think: bool,
    options: ApiOptions,
}

#[derive(Debug, Serialize)]
struct ApiOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Serialize)]
struct ApiTool<'a> {
    #[serde(rename = "type")]
    tool_type: &'static str,
    function: ApiFunction<'a>,
}

#[derive(Debug, Serialize)]
struct ApiFunction<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a Value,
}

#[derive(Debug, Deserialize)]
struct ApiChunk {
    #[serde(default)]
    message: Option<ApiResponseMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    thinking: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ApiToolCall>,
}

#[derive(Debug, Deserialize)]
struct ApiTags {
    #[serde(default)]
    models: Vec<ApiModelTag>,
}

#[derive(Debug, Deserialize)]
struct ApiModelTag {
    name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Backend Implementation
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for creating an Ollama backend.
#[derive(Debug, Clone)]
pub struct OllamaBackendBuilder {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    reasoning: bool,
}

impl OllamaBackendBuilder {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_NUM_PREDICT,
            reasoning: true,
        }
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Maximum number of tokens to generate per response (`num_predict`).
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Ask the model to expose its reasoning separately from the answer.
    pub fn reasoning(mut self, reasoning: bool) -> Self {
        self.reasoning = reasoning;
        self
    }

    pub fn build(self) -> OllamaBackend {
        OllamaBackend {
            client: reqwest::Client::new(),
            base_url: self.base_url,
            model: self.model,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            reasoning: self.reasoning,
        }
    }
}

/// Ollama API backend.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    reasoning: bool,
}

impl OllamaBackend {
    pub fn builder(base_url: impl Into<String>, model: impl Into<String>) -> OllamaBackendBuilder {
        OllamaBackendBuilder::new(base_url, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    /// Check that the configured model has been pulled on the server.
    pub async fn validate_model(&self) -> Result<(), ModelError> {
        let response = self
            .client
            .get(self.endpoint("api/tags"))
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let tags: ApiTags = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        let latest = format!("{}:latest", self.model);
        if tags
            .models
            .iter()
            .any(|tag| tag.name == self.model || tag.name == latest)
        {
            Ok(())
        } else {
            Err(ModelError::ModelNotFound(self.model.clone()))
        }
    }

    fn build_request<'a>(&'a self, request: &ModelRequest<'a>) -> ApiRequest<'a> {
        ApiRequest {
            model: &self.model,
            messages: request
                .messages
                .iter()
                .flat_map(Self::message_to_api)
                .collect(),
            tools: request.tools.iter().map(Self::tool_to_api).collect(),
            stream: true,
            think: self.reasoning,
            options: ApiOptions {
                temperature: self.temperature,
                num_predict: self.max_tokens,
            },
        }
    }

    /// Tool results travel as separate `tool` role messages.
    fn message_to_api(msg: &Message) -> Vec<ApiMessage> {
        let role = match msg.role {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        };

        let mut out = Vec::new();
        let text = msg.text();
        let tool_calls: Vec<ApiToolCall> = msg
            .tool_calls()
            .into_iter()
            .map(|call| ApiToolCall {
                id: Some(call.id),
                function: ApiFunctionCall {
                    name: call.name,
                    arguments: call.input,
                },
            })
            .collect();

        if !text.is_empty() || !tool_calls.is_empty() {
            out.push(ApiMessage {
                role,
                content: text,
                tool_calls,
            });
        }

        for part in &msg.parts {
            if let Part::ToolResult(result) = part {
                out.push(ApiMessage {
                    role: "tool",
                    content: result.content(),
                    tool_calls: Vec::new(),
                });
            }
        }

        out
    }

    fn tool_to_api(spec: &ToolSpec) -> ApiTool<'_> {
        ApiTool {
            tool_type: "function",
            function: ApiFunction {
                name: &spec.name,
                description: &spec.description,
                parameters: &spec.schema,
            },
        }
    }
}

impl std::fmt::Display for OllamaBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ollama({}, {})", self.model, self.base_url)
    }
}

impl Backend for OllamaBackend {
    fn stream<'a>(
        &'a self,
        request: ModelRequest<'a>,
    ) -> BoxStream<'a, Result<ModelChunk, ModelError>> {
        Box::pin(try_stream! {
            let api_request = self.build_request(&request);
            debug!(
                model = %self.model,
                messages = api_request.messages.len(),
                tools = api_request.tools.len(),
                "sending chat request"
            );

            let response = self
                .client
                .post(self.endpoint("api/chat"))
                .json(&api_request)
                .send()
                .await
                .map_err(|e| ModelError::Network(e.to_string()))?;

            let mut bytes = check_status(response).await?.bytes_stream();
            let mut lines = LineBuffer::default();

            while let Some(piece) = bytes.next().await {
                let piece = piece.map_err(|e| ModelError::Network(e.to_string()))?;
                lines.push(&piece);
                while let Some(line) = lines.next_line() {
                    if let Some(chunk) = decode_line(&line)? {
                        yield chunk;
                    }
                }
            }

            if let Some(line) = lines.finish() {
                if let Some(chunk) = decode_line(&line)? {
                    yield chunk;
                }
            }
        })
    }
}

/// Turn a non-success response into an API error carrying its body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ModelError::Api(format!("{status}: {body}")))
}

/// Reassembles newline-delimited records from arbitrarily split reads.
#[derive(Debug, Default)]
struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn next_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buf.iter().position(|b| *b == b'\n')?;
        Some(self.buf.drain(..=pos).collect())
    }

    /// Whatever is left once the body ends without a trailing newline.
    fn finish(&mut self) -> Option<Vec<u8>> {
        if self.buf.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buf))
        }
    }
}

fn decode_line(line: &[u8]) -> Result<Option<ModelChunk>, ModelError> {
    let line = std::str::from_utf8(line)
        .map_err(|e| ModelError::InvalidResponse(e.to_string()))?
        .trim();
    if line.is_empty() {
        return Ok(None);
    }

    let chunk: ApiChunk =
        serde_json::from_str(line).map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

    if let Some(error) = chunk.error {
        return Err(ModelError::Api(error));
    }

    let usage = chunk.done.then(|| Usage {
        input_tokens: chunk.prompt_eval_count.unwrap_or_default(),
        output_tokens: chunk.eval_count.unwrap_or_default(),
    });

    let Some(message) = chunk.message else {
        return Ok(Some(ModelChunk {
            done: chunk.done,
            usage,
            ..Default::default()
        }));
    };

    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall {
            id: call
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            name: call.function.name,
            input: normalize_arguments(call.function.arguments),
        })
        .collect();

    Ok(Some(ModelChunk {
        content: message.content,
        thinking: message.thinking.filter(|t| !t.is_empty()),
        tool_calls,
        done: chunk.done,
        usage,
    }))
}

/// Some models emit arguments as a JSON-encoded string instead of an object.
fn normalize_arguments(arguments: Value) -> Value {
    match arguments {
        Value::String(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        Value::Null => Value::Object(Default::default()),
        other => other,
    }
}
