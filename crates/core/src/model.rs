//! Model invocation adapter trait — the abstraction over the LLM endpoint.
//!
//! The adapter takes the full message history bound to the registry's tool
//! schemas and returns one assistant message, which may carry zero or more
//! tool call requests. The loop never sees transport details; failures
//! arrive as distinguished [`ModelError`] variants, never partial output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::message::Message;
use crate::tool::ToolCall;

/// One model invocation: history plus the tools the model may request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRequest {
    /// The model to use (e.g., "gemini-2.5-flash")
    pub model: String,

    /// The full ordered message history for this thread
    pub messages: Vec<Message>,

    /// Sampling temperature (0.0 = deterministic routing answers)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Tool schemas the model is bound to for this invocation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
}

fn default_temperature() -> f32 {
    0.0
}

/// A tool schema sent to the model so it knows what it can call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

/// The adapter's answer to one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    /// The assistant message (text and/or tool call requests)
    pub message: Message,

    /// Which model actually responded
    pub model: String,

    /// Token usage, when the endpoint reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ModelResponse {
    /// The tool calls the model requested, in its listed order.
    pub fn tool_calls(&self) -> &[ToolCall] {
        &self.message.tool_calls
    }
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An embedding request (document index construction and queries).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRequest {
    /// The embedding model (e.g., "gemini-embedding-001")
    pub model: String,

    /// The texts to embed
    pub inputs: Vec<String>,
}

/// An embedding response, one vector per input text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub model: String,
}

/// The model invocation adapter.
///
/// One network call per `invoke`; the orchestration loop owns retrying
/// (by looping) and the timeout around the call. Implementations must
/// never return garbled partial output — a failed or timed-out request is
/// a [`ModelError`].
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// A human-readable name for this adapter (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send the history + tool schemas, get one assistant message back.
    async fn invoke(&self, request: ModelRequest) -> Result<ModelResponse, ModelError>;

    /// Generate embeddings for the given texts.
    ///
    /// Default implementation reports embeddings as unsupported.
    async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse, ModelError> {
        Err(ModelError::NotConfigured(format!(
            "adapter '{}' does not support embeddings",
            self.name()
        )))
    }

    /// Health check — can we reach the endpoint?
    async fn health_check(&self) -> Result<bool, ModelError> {
        Ok(true)
    }
}
