//! Nearest-neighbor search over embedding vectors.

use crate::domain::entities::content::Content;

/// Cosine distance between two vectors, in `[0, 2]` (0 = same direction).
///
/// A zero-norm vector has no direction: its distance to anything is pinned to
/// the neutral 1.0 so degenerate embeddings neither dominate nor disappear.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }

    (1.0 - dot / (norm_a * norm_b)).clamp(0.0, 2.0)
}

/// The `k` candidates closest to `query`, ascending by cosine distance.
///
/// Candidates without an embedding never match. Ties keep the pool's own
/// order (stable sort) so results are deterministic for fixed inputs.
pub fn k_nearest(query: &[f32], pool: Vec<Content>, k: usize) -> Vec<(Content, f32)> {
    let mut scored: Vec<(Content, f32)> = pool
        .into_iter()
        .filter_map(|content| {
            let distance = content
                .embedding
                .as_ref()
                .map(|embedding| cosine_distance(query, embedding))?;
            Some((content, distance))
        })
        .collect();

    scored.sort_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}
