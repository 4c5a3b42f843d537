//! Document embedding index for the SevaHealth knowledge base.
//!
//! Health articles are chunked, embedded, and held in memory; the document
//! search tool answers queries with top-k cosine similarity over the
//! chunks.

pub mod chunker;
pub mod store;
pub mod vector;

pub use chunker::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE, chunk_text};
pub use store::{ChunkMetadata, DocumentChunk, DocumentIndex, SearchHit};
pub use vector::{cosine_similarity, top_k};
