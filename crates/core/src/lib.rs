//! # SevaHealth Core
//!
//! Domain types, traits, and error definitions for the SevaHealth
//! conversational health assistant. This crate has **zero framework
//! dependencies** — it defines the model that all other crates implement
//! against.
//!
//! ## Design Philosophy
//!
//! Every subsystem boundary is a trait here: the model invocation adapter
//! and the tool contract. Implementations live in their respective crates
//! (providers, tools), and the orchestration loop in the agent crate binds
//! them together. All crates depend inward on core.

pub mod error;
pub mod event;
pub mod message;
pub mod model;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, IndexError, ModelError, Result, ToolError, TurnError};
pub use event::TurnEvent;
pub use message::{ConversationState, Message, Role, ThreadId};
pub use model::{ModelProvider, ModelRequest, ModelResponse, ToolSchema, Usage};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
