//! Model adapter implementations for SevaHealth.
//!
//! All adapters implement the `sevahealth_core::ModelProvider` trait. The
//! orchestration loop and the document index only ever see that trait, so
//! the Gemini specifics stay inside this crate.

pub mod gemini;

pub use gemini::GeminiProvider;

use std::sync::Arc;

use sevahealth_config::AppConfig;
use sevahealth_core::error::ModelError;
use sevahealth_core::model::ModelProvider;

/// Build the configured model adapter.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn ModelProvider>, ModelError> {
    let provider = GeminiProvider::from_config(&config.model)?;
    Ok(Arc::new(provider))
}
