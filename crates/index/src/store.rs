//! The in-memory document embedding index.
//!
//! Holds every chunk of the health knowledge base together with its
//! embedding. Built once (by the `index` CLI command or at test setup),
//! optionally serialized to a JSON file, and queried read-only at runtime
//! by the document search tool.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use sevahealth_core::error::IndexError;
use sevahealth_core::model::{EmbeddingRequest, ModelProvider};

use crate::chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, chunk_text};
use crate::vector::top_k;

/// Provenance of one indexed chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Source document (file name)
    pub source: String,

    /// Chunk ordinal within the source document
    pub chunk: usize,
}

/// One indexed chunk: text, provenance, and its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub embedding: Vec<f32>,
}

/// A search result: the chunk text and provenance, scored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub content: String,
    pub metadata: ChunkMetadata,
    pub score: f32,
}

/// The document index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentIndex {
    /// Embedding model the vectors were produced with; queries must use
    /// the same model or similarities are meaningless.
    pub embed_model: String,

    /// All indexed chunks
    pub chunks: Vec<DocumentChunk>,
}

impl DocumentIndex {
    /// Create an empty index bound to an embedding model.
    pub fn new(embed_model: impl Into<String>) -> Self {
        Self {
            embed_model: embed_model.into(),
            chunks: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Chunk a document, embed every chunk, and add them to the index.
    ///
    /// Returns the number of chunks added. One embedding request per
    /// document, all chunks batched as inputs.
    pub async fn add_document(
        &mut self,
        provider: &dyn ModelProvider,
        source: &str,
        text: &str,
    ) -> Result<usize, IndexError> {
        let pieces = chunk_text(text, DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP);
        if pieces.is_empty() {
            return Ok(0);
        }

        let response = provider
            .embed(EmbeddingRequest {
                model: self.embed_model.clone(),
                inputs: pieces.clone(),
            })
            .await
            .map_err(|e| IndexError::EmbeddingFailed(e.to_string()))?;

        if response.embeddings.len() != pieces.len() {
            return Err(IndexError::EmbeddingFailed(format!(
                "endpoint returned {} embeddings for {} inputs",
                response.embeddings.len(),
                pieces.len()
            )));
        }

        let added = pieces.len();
        for (i, (content, embedding)) in pieces.into_iter().zip(response.embeddings).enumerate() {
            self.chunks.push(DocumentChunk {
                content,
                metadata: ChunkMetadata {
                    source: source.to_string(),
                    chunk: i,
                },
                embedding,
            });
        }

        debug!(source, chunks = added, "Indexed document");
        Ok(added)
    }

    /// Embed the query and return the top-k chunks by cosine similarity.
    ///
    /// No score threshold: up to k results come back regardless of
    /// relevance quality. An empty index yields an empty result, not an
    /// error.
    pub async fn search(
        &self,
        provider: &dyn ModelProvider,
        query: &str,
        k: usize,
    ) -> Result<Vec<SearchHit>, IndexError> {
        if self.chunks.is_empty() {
            return Ok(Vec::new());
        }

        let response = provider
            .embed(EmbeddingRequest {
                model: self.embed_model.clone(),
                inputs: vec![query.to_string()],
            })
            .await
            .map_err(|e| IndexError::EmbeddingFailed(e.to_string()))?;

        let query_embedding = response
            .embeddings
            .first()
            .ok_or_else(|| IndexError::EmbeddingFailed("endpoint returned no embedding for query".into()))?;

        Ok(self.search_by_embedding(query_embedding, k))
    }

    /// Rank chunks against an already-computed query embedding.
    pub fn search_by_embedding(&self, query_embedding: &[f32], k: usize) -> Vec<SearchHit> {
        top_k(&self.chunks, query_embedding, k)
    }

    /// Serialize the index to a JSON file.
    pub fn save_to(&self, path: &Path) -> Result<(), IndexError> {
        let json = serde_json::to_string(self).map_err(|e| IndexError::Storage(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| {
            IndexError::Storage(format!("failed to write {}: {e}", path.display()))
        })?;
        info!(path = %path.display(), chunks = self.chunks.len(), "Saved document index");
        Ok(())
    }

    /// Load an index from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, IndexError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            IndexError::Storage(format!("failed to read {}: {e}", path.display()))
        })?;
        let index: Self =
            serde_json::from_str(&content).map_err(|e| IndexError::Storage(e.to_string()))?;
        info!(path = %path.display(), chunks = index.chunks.len(), "Loaded document index");
        Ok(index)
    }
}
