//! Vector similarity — pure-Rust cosine ranking over indexed chunks.

use crate::store::{DocumentChunk, SearchHit};

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 =
/// opposite. Returns 0.0 if the vectors are empty, mismatched in length,
/// or either has (near-)zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

/// Rank chunks by cosine similarity to a query embedding and keep the top k.
///
/// No score threshold: the k nearest chunks are returned regardless of how
/// weak the match is, so a query always gets its quota of context.
pub fn top_k(chunks: &[DocumentChunk], query_embedding: &[f32], k: usize) -> Vec<SearchHit> {
    let mut scored: Vec<SearchHit> = chunks
        .iter()
        .map(|chunk| SearchHit {
            content: chunk.content.clone(),
            metadata: chunk.metadata.clone(),
            score: cosine_similarity(&chunk.embedding, query_embedding),
        })
        .collect();

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ChunkMetadata;

    fn chunk(source: &str, embedding: Vec<f32>) -> DocumentChunk {
        DocumentChunk {
            content: format!("content from {source}"),
            metadata: ChunkMetadata {
                source: source.into(),
                chunk: 0,
            },
            embedding,
        }
    }

    #[test]
    fn cosine_identical_vectors() {
        let v = vec![1.0, 2.0, 3.0];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn cosine_opposite_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) - (-1.0)).abs() < 1e-6);
    }

    #[test]
    fn cosine_empty_vectors() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn cosine_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn cosine_known_value() {
        // [1,1] · [1,0] = 1, |[1,1]| = sqrt(2), |[1,0]| = 1
        // similarity = 1 / sqrt(2) ≈ 0.7071
        let sim = cosine_similarity(&[1.0, 1.0], &[1.0, 0.0]);
        assert!((sim - 0.7071).abs() < 0.001);
    }

    #[test]
    fn top_k_ranks_by_similarity() {
        let query = vec![1.0, 0.0, 0.0];
        let chunks = vec![
            chunk("a.txt", vec![0.0, 1.0, 0.0]), // orthogonal = 0
            chunk("b.txt", vec![1.0, 0.0, 0.0]), // identical = 1
            chunk("c.txt", vec![0.5, 0.5, 0.0]), // partial ≈ 0.707
        ];

        let hits = top_k(&chunks, &query, 10);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].metadata.source, "b.txt");
        assert_eq!(hits[1].metadata.source, "c.txt");
        assert_eq!(hits[2].metadata.source, "a.txt");
    }

    #[test]
    fn top_k_respects_limit() {
        let query = vec![1.0, 0.0];
        let chunks: Vec<_> = (0..10)
            .map(|i| chunk(&format!("doc{i}.txt"), vec![1.0, i as f32 * 0.1]))
            .collect();

        assert_eq!(top_k(&chunks, &query, 5).len(), 5);
    }

    #[test]
    fn top_k_has_no_score_threshold() {
        // Even completely unrelated chunks are returned; k bounds the
        // result, relevance does not.
        let query = vec![1.0, 0.0];
        let chunks = vec![chunk("unrelated.txt", vec![0.0, 1.0])];

        let hits = top_k(&chunks, &query, 5);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].score.abs() < 1e-6);
    }

    #[test]
    fn top_k_on_empty_index() {
        assert!(top_k(&[], &[1.0, 0.0], 5).is_empty());
    }
}
