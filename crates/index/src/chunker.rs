//! Text chunking for index construction.
//!
//! Documents are split into fixed-size character windows with overlap so a
//! passage near a boundary still lands whole in at least one chunk.

/// Default chunk size in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 2048;

/// Default overlap between consecutive chunks in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Split text into character windows of `chunk_size` advancing by
/// `chunk_size - overlap`.
///
/// Operates on characters, not bytes, so multi-byte scripts (Devanagari
/// health leaflets) never split mid-character. Empty input yields no
/// chunks; text shorter than one window yields a single chunk.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }

    let step = chunk_size.saturating_sub(overlap).max(1);
    let chars: Vec<char> = text.chars().collect();

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}
