//! Turn events — the incremental progress records streamed to the caller.
//!
//! The orchestration loop is the single producer; the transport layer is
//! the single consumer, draining events as they happen rather than after
//! the turn completes. Events are ephemeral: consumed once, never stored.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// One record on a turn's event stream.
///
/// Tagged by node kind: one `model-response` per model invocation, one
/// `tool-result` per dispatched tool call (in call-list order), and at
/// most one terminal `error` when the turn fails fatally. The channel
/// closing is the end-of-stream signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum TurnEvent {
    /// The model produced a response message (final answer or tool requests)
    ModelResponse { message: Message },

    /// A dispatched tool call produced a result message
    ToolResult { message: Message },

    /// The turn failed fatally; this is always the last event
    Error { message: String },
}

impl TurnEvent {
    /// The node kind as emitted on the wire.
    pub fn node(&self) -> &'static str {
        match self {
            TurnEvent::ModelResponse { .. } => "model-response",
            TurnEvent::ToolResult { .. } => "tool-result",
            TurnEvent::Error { .. } => "error",
        }
    }
}
