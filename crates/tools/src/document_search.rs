//! Document search over the embedded health-document index.
//!
//! Thin tool wrapper: embed the query through the model adapter, rank the
//! index by cosine similarity, return the top five passages. No relevance
//! threshold; weak matches still come back and the model decides what to
//! use.

use std::sync::Arc;

use async_trait::async_trait;
use sevahealth_core::error::ToolError;
use sevahealth_core::model::ModelProvider;
use sevahealth_core::tool::{Tool, ToolResult};
use sevahealth_index::DocumentIndex;
use tracing::debug;

/// How many passages a query returns.
pub const TOP_K: usize = 5;

/// The `search_documents` tool over a shared [`DocumentIndex`].
pub struct SearchDocumentsTool {
    index: Arc<DocumentIndex>,
    provider: Arc<dyn ModelProvider>,
}

impl SearchDocumentsTool {
    pub fn new(index: Arc<DocumentIndex>, provider: Arc<dyn ModelProvider>) -> Self {
        Self { index, provider }
    }
}

#[async_trait]
impl Tool for SearchDocumentsTool {
    fn name(&self) -> &str {
        "search_documents"
    }

    fn description(&self) -> &str {
        "Search the indexed health scheme and medical guidance documents. Returns the most relevant document passages for a query."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            },
            "required": ["query"]
        })
    }

    async fn invoke(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;

        let hits = self
            .index
            .search(self.provider.as_ref(), query, TOP_K)
            .await
            .map_err(|e| ToolError::InvocationFailed {
                tool_name: "search_documents".into(),
                reason: e.to_string(),
            })?;

        debug!(query, hits = hits.len(), "Document search");

        // The model sees content and metadata only; scores stay internal
        let docs: Vec<serde_json::Value> = hits
            .into_iter()
            .map(|hit| {
                serde_json::json!({
                    "content": hit.content,
                    "metadata": hit.metadata,
                })
            })
            .collect();

        let data = serde_json::Value::Array(docs);
        Ok(ToolResult {
            call_id: String::new(),
            success: true,
            output: data.to_string(),
            data: Some(data),
        })
    }
}
