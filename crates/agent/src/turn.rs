//! The orchestration loop, one conversation turn from user text to answer.
//!
//! A turn alternates two phases: invoke the model with the full history
//! bound to every registered tool schema, then dispatch whatever tool calls
//! the response carries, in the order the model listed them. The loop ends
//! when a response carries no tool calls. Each appended message goes out as
//! an event while the turn is still running, so transports can stream
//! progress instead of waiting for the final answer.
//!
//! Failure policy: a tool that is missing or fails becomes an error-marker
//! tool result the model can react to; only the model itself being
//! unreachable, timing out, or the iteration cap tripping is fatal to the
//! turn. Fatal errors put one terminal `Error` event on the stream and keep
//! all history appended so far.

use std::sync::Arc;
use std::time::Duration;

use sevahealth_config::AppConfig;
use sevahealth_core::error::{ModelError, ToolError, TurnError};
use sevahealth_core::event::TurnEvent;
use sevahealth_core::message::{ConversationState, Message};
use sevahealth_core::model::{ModelProvider, ModelRequest};
use sevahealth_core::tool::{ToolCall, ToolRegistry};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, info, warn};

/// Tunables for the orchestration loop.
#[derive(Debug, Clone)]
pub struct TurnOptions {
    /// Model name sent to the adapter
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Cap on model invocations per turn; exceeding it is fatal
    pub max_iterations: u32,

    /// Timeout around each model invocation
    pub model_timeout: Duration,

    /// Timeout around each tool dispatch
    pub tool_timeout: Duration,
}

impl Default for TurnOptions {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            temperature: 0.0,
            max_iterations: 25,
            model_timeout: Duration::from_secs(120),
            tool_timeout: Duration::from_secs(30),
        }
    }
}

impl TurnOptions {
    /// Derive options from loaded configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            model: config.model.model.clone(),
            temperature: config.model.temperature,
            max_iterations: config.agent.max_iterations,
            model_timeout: Duration::from_secs(config.model.timeout_secs),
            tool_timeout: Duration::from_secs(config.agent.tool_timeout_secs),
        }
    }
}

/// Drives the model and tool cycle for one turn.
///
/// The runner holds no conversation state of its own; everything lives in
/// the [`ConversationState`] it is handed, so one runner serves every
/// thread.
pub struct TurnRunner {
    provider: Arc<dyn ModelProvider>,
    tools: Arc<ToolRegistry>,
    options: TurnOptions,
}

impl TurnRunner {
    pub fn new(
        provider: Arc<dyn ModelProvider>,
        tools: Arc<ToolRegistry>,
        options: TurnOptions,
    ) -> Self {
        Self {
            provider,
            tools,
            options,
        }
    }

    /// Run one turn to completion.
    ///
    /// Appends the user message, then alternates model invocation and tool
    /// dispatch until the model answers without tool calls. `ModelResponse`
    /// and `ToolResult` events go out on `events` in append order; a closed
    /// receiver cancels the turn at the next send, keeping whatever history
    /// was already appended. Returns the messages the loop produced
    /// (assistant and tool messages, not the user message), which are
    /// already appended to `state`.
    pub async fn run(
        &self,
        state: &mut ConversationState,
        user_text: &str,
        events: &mpsc::Sender<TurnEvent>,
    ) -> Result<Vec<Message>, TurnError> {
        state.push(Message::user(user_text));

        let schemas = self.tools.schemas();
        let mut produced: Vec<Message> = Vec::new();

        info!(
            thread_id = %state.thread_id,
            history = state.len(),
            "Turn starting"
        );

        for iteration in 1..=self.options.max_iterations {
            debug!(iteration, "Invoking model");

            let request = ModelRequest {
                model: self.options.model.clone(),
                messages: state.messages.clone(),
                temperature: self.options.temperature,
                tools: schemas.clone(),
            };

            let response = match tokio::time::timeout(
                self.options.model_timeout,
                self.provider.invoke(request),
            )
            .await
            {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    warn!(error = %e, "Model invocation failed");
                    let _ = events
                        .send(TurnEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                    return Err(TurnError::Model(e));
                }
                Err(_) => {
                    let e = ModelError::Timeout(format!(
                        "no model response within {}s",
                        self.options.model_timeout.as_secs()
                    ));
                    warn!(error = %e, "Model invocation timed out");
                    let _ = events
                        .send(TurnEvent::Error {
                            message: e.to_string(),
                        })
                        .await;
                    return Err(TurnError::Model(e));
                }
            };

            let assistant = response.message;
            state.push(assistant.clone());
            produced.push(assistant.clone());

            if events
                .send(TurnEvent::ModelResponse {
                    message: assistant.clone(),
                })
                .await
                .is_err()
            {
                info!(thread_id = %state.thread_id, "Event receiver dropped, stopping turn");
                return Ok(produced);
            }

            if assistant.tool_calls.is_empty() {
                info!(
                    thread_id = %state.thread_id,
                    iterations = iteration,
                    produced = produced.len(),
                    "Turn complete"
                );
                return Ok(produced);
            }

            for call in &assistant.tool_calls {
                let output = self.dispatch_one(call).await;
                let message = Message::tool_result(&call.id, output);
                state.push(message.clone());
                produced.push(message.clone());

                if events.send(TurnEvent::ToolResult { message }).await.is_err() {
                    info!(thread_id = %state.thread_id, "Event receiver dropped, stopping turn");
                    return Ok(produced);
                }
            }
        }

        let limit = self.options.max_iterations;
        warn!(thread_id = %state.thread_id, limit, "Turn exceeded iteration cap");
        let err = TurnError::MaxIterationsExceeded { limit };
        let _ = events
            .send(TurnEvent::Error {
                message: err.to_string(),
            })
            .await;
        Err(err)
    }

    /// Dispatch one tool call and render its output for the model.
    ///
    /// An unknown tool, a failed invocation, or a timed-out tool all come
    /// back as an error-marker string; the model sees the marker in the
    /// tool result and can retry or apologize.
    async fn dispatch_one(&self, call: &ToolCall) -> String {
        debug!(tool = %call.name, call_id = %call.id, "Dispatching tool call");

        let result = tokio::time::timeout(self.options.tool_timeout, self.tools.dispatch(call))
            .await
            .unwrap_or_else(|_| {
                Err(ToolError::Timeout {
                    tool_name: call.name.clone(),
                    timeout_secs: self.options.tool_timeout.as_secs(),
                })
            });

        match result {
            Ok(result) => result.output,
            Err(e) => {
                warn!(tool = %call.name, error = %e, "Tool call failed");
                format!("Error: {e}")
            }
        }
    }

    /// Spawned variant of [`run`] for streaming transports.
    ///
    /// The thread mutex is taken inside the spawned task and held for the
    /// whole turn, so a second request for the same thread waits its turn.
    /// The returned receiver yields events as they happen and closes when
    /// the turn reaches a terminal state.
    pub fn run_stream(
        self: &Arc<Self>,
        state: Arc<Mutex<ConversationState>>,
        user_text: String,
    ) -> mpsc::Receiver<TurnEvent> {
        let (tx, rx) = mpsc::channel::<TurnEvent>(128);
        let runner = Arc::clone(self);

        tokio::spawn(async move {
            let mut state = state.lock().await;
            // Fatal errors already produced a terminal event inside run
            let _ = runner.run(&mut state, &user_text, &tx).await;
        });

        rx
    }
}
