//! The system primer, the fixed first message of every thread.
//!
//! The bundled text carries the assistant's role, the tool usage guidance,
//! and the speciality routing list. Deployments can swap it via
//! `[agent].system_prompt_path` without rebuilding.

use sevahealth_config::AgentConfig;
use tracing::info;

/// The primer compiled into the binary.
pub const DEFAULT_PRIMER: &str = include_str!("primer.txt");

/// Resolve the primer text: the configured override file when set,
/// otherwise the bundled default.
pub fn load(config: &AgentConfig) -> std::io::Result<String> {
    match &config.system_prompt_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            info!(path = %path, "Loaded system primer override");
            Ok(text)
        }
        None => Ok(DEFAULT_PRIMER.to_string()),
    }
}
