//! Shared scripted providers for turn tests.

use std::sync::Mutex;
use std::time::Duration;

use sevahealth_core::error::ModelError;
use sevahealth_core::message::Message;
use sevahealth_core::model::{ModelProvider, ModelRequest, ModelResponse, Usage};
use sevahealth_core::tool::ToolCall;

/// A mock provider that returns a sequence of scripted responses.
///
/// Each call to `invoke` returns the next response in the queue.
/// Panics if more calls are made than responses provided.
pub struct ScriptedModel {
    responses: Mutex<Vec<ModelResponse>>,
    call_count: Mutex<usize>,
}

impl ScriptedModel {
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// A provider that returns a single text response, no tool calls.
    pub fn single_text(text: &str) -> Self {
        Self::new(vec![make_text_response(text)])
    }

    #[allow(dead_code)]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ModelProvider for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn invoke(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
        let mut count = self.call_count.lock().unwrap();
        let responses = self.responses.lock().unwrap();

        if *count >= responses.len() {
            panic!(
                "ScriptedModel: no more responses (call #{}, have {})",
                *count,
                responses.len()
            );
        }

        let response = responses[*count].clone();
        *count += 1;
        Ok(response)
    }
}

/// A provider that always fails with the given error.
pub struct FailingModel {
    error: ModelError,
}

impl FailingModel {
    pub fn new(error: ModelError) -> Self {
        Self { error }
    }
}

#[async_trait::async_trait]
impl ModelProvider for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn invoke(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
        Err(self.error.clone())
    }
}

/// A provider that answers after a delay, for timeout tests.
pub struct SlowModel {
    delay: Duration,
    text: String,
}

impl SlowModel {
    pub fn new(delay: Duration, text: &str) -> Self {
        Self {
            delay,
            text: text.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl ModelProvider for SlowModel {
    fn name(&self) -> &str {
        "slow"
    }

    async fn invoke(&self, _request: ModelRequest) -> Result<ModelResponse, ModelError> {
        tokio::time::sleep(self.delay).await;
        Ok(make_text_response(&self.text))
    }
}

/// Create a simple text response (no tool calls).
pub fn make_text_response(text: &str) -> ModelResponse {
    ModelResponse {
        message: Message::assistant(text),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Create a response with tool calls and optional text content.
pub fn make_tool_call_response(tool_calls: Vec<ToolCall>, text: &str) -> ModelResponse {
    ModelResponse {
        message: Message::assistant_with_tool_calls(text, tool_calls),
        model: "mock-model".into(),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}

/// Helper to create a tool call with an explicit id.
pub fn make_tool_call(id: &str, name: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    }
}
