//! Cosine-space vector math.
//!
//! Embeddings arrive from an external model and are not guaranteed to
//! share a dimension, so mismatches are treated as "no similarity"
//! rather than a panic.

/// Cosine similarity between two vectors.
///
/// Returns a value in [-1.0, 1.0] where 1.0 means identical direction.
/// Mismatched dimensions and zero vectors yield 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Cosine distance: `1 - cosine_similarity`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

/// Element-wise mean of a set of embeddings.
///
/// The result is deliberately not re-normalized: downstream comparisons
/// use cosine similarity, which is scale invariant. Embeddings whose
/// dimension differs from the first are skipped.
pub fn centroid(embeddings: &[&[f32]]) -> Vec<f32> {
    let Some(first) = embeddings.first() else {
        return Vec::new();
    };
    let dim = first.len();
    let mut sum = vec![0.0f32; dim];
    let mut count = 0usize;

    for embedding in embeddings {
        if embedding.len() != dim {
            continue;
        }
        for (acc, &val) in sum.iter_mut().zip(embedding.iter()) {
            *acc += val;
        }
        count += 1;
    }

    let n = count as f32;
    for val in sum.iter_mut() {
        *val /= n;
    }
    sum
}

/// Dense pairwise distance matrix, `distance = 1 - cosine_similarity`.
pub fn pairwise_distances(embeddings: &[Vec<f32>]) -> Vec<Vec<f32>> {
    let n = embeddings.len();
    let mut distances = vec![vec![0.0f32; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let dist = cosine_distance(&embeddings[i], &embeddings[j]);
            distances[i][j] = dist;
            distances[j][i] = dist;
        }
    }

    distances
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &a) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let a = vec![1.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_distance_is_scale_invariant() {
        let a = vec![1.0, 2.0];
        let b = vec![2.0, 4.0];
        assert!(cosine_distance(&a, &b).abs() < 0.001);
    }

    #[test]
    fn test_centroid_is_mean() {
        let e1 = vec![1.0, 0.0, 0.0];
        let e2 = vec![0.0, 1.0, 0.0];
        let c = centroid(&[&e1, &e2]);
        assert!((c[0] - 0.5).abs() < 0.001);
        assert!((c[1] - 0.5).abs() < 0.001);
        assert!(c[2].abs() < 0.001);
    }

    #[test]
    fn test_centroid_empty() {
        let c = centroid(&[]);
        assert!(c.is_empty());
    }

    #[test]
    fn test_centroid_skips_ragged_embeddings() {
        let e1 = vec![1.0, 1.0];
        let e2 = vec![1.0, 1.0, 1.0];
        let e3 = vec![3.0, 3.0];
        let c = centroid(&[&e1, &e2, &e3]);
        assert!((c[0] - 2.0).abs() < 0.001);
        assert!((c[1] - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_pairwise_distances() {
        let embeddings = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 0.0]];
        let distances = pairwise_distances(&embeddings);
        assert!(distances[0][2].abs() < 0.001);
        assert!((distances[0][1] - 1.0).abs() < 0.001);
        assert!(distances[0][0].abs() < 0.001);
        assert_eq!(distances[0][1], distances[1][0]);
    }
}
