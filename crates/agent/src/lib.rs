//! Conversation orchestration, the heart of SevaHealth.
//!
//! A turn alternates model invocation and tool dispatch:
//!
//! 1. **Append** the user message to the thread's history
//! 2. **Invoke the model** with the full history and every tool schema
//! 3. **If tool calls**: dispatch each in order, append results, loop back to step 2
//! 4. **If text only**: the turn is done, the last message is the answer
//!
//! Every appended message streams out as an event while the loop runs.
//! [`SessionStore`] keeps one history per thread, seeded with the primer,
//! and serializes concurrent turns on the same thread.

pub mod primer;
pub mod session;
pub mod turn;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use primer::DEFAULT_PRIMER;
pub use session::{DEFAULT_CAPACITY, SessionStore};
pub use turn::{TurnOptions, TurnRunner};
