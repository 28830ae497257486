//! Deterministic DBSCAN over cosine distance.

use std::collections::VecDeque;

use tracing::debug;

use crate::similarity::pairwise_distances;
use topic_types::Embedding;

/// The outcome of one clustering pass over an embedding batch.
///
/// Indices refer back to the input slice. Every input index appears in
/// exactly one cluster or in `noise`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
    /// Clusters of size >= 2, members in ascending index order
    pub clusters: Vec<Vec<usize>>,
    /// Points not reachable from any core point, ascending index order
    pub noise: Vec<usize>,
}

impl ClusterAssignment {
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.noise.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Label {
    Unvisited,
    Noise,
    Cluster(usize),
}

/// Partition `embeddings` into density clusters and noise.
///
/// A point is a core point iff at least `min_samples` *other* points
/// lie within cosine distance `eps`. Clusters grow breadth-first from
/// core points, visited in index order, so the assignment is fully
/// deterministic for a fixed input. Clusters that end up with a single
/// member are returned as noise.
pub fn dbscan(embeddings: &[Embedding], eps: f32, min_samples: usize) -> ClusterAssignment {
    let n = embeddings.len();
    if n == 0 {
        return ClusterAssignment {
            clusters: Vec::new(),
            noise: Vec::new(),
        };
    }

    let distances = pairwise_distances(embeddings);
    let neighbors: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && distances[i][j] <= eps)
                .collect()
        })
        .collect();

    let mut labels = vec![Label::Unvisited; n];
    let mut cluster_count = 0usize;

    for i in 0..n {
        if labels[i] != Label::Unvisited {
            continue;
        }
        if neighbors[i].len() < min_samples {
            labels[i] = Label::Noise;
            continue;
        }

        let cluster_id = cluster_count;
        cluster_count += 1;
        labels[i] = Label::Cluster(cluster_id);

        let mut queue: VecDeque<usize> = neighbors[i].iter().copied().collect();
        while let Some(j) = queue.pop_front() {
            if labels[j] == Label::Noise {
                // Border point: density-reachable but not core.
                labels[j] = Label::Cluster(cluster_id);
            }
            if labels[j] != Label::Unvisited {
                continue;
            }
            labels[j] = Label::Cluster(cluster_id);
            if neighbors[j].len() >= min_samples {
                queue.extend(neighbors[j].iter().copied());
            }
        }
    }

    let mut clusters: Vec<Vec<usize>> = vec![Vec::new(); cluster_count];
    let mut noise = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        match label {
            Label::Cluster(id) => clusters[*id].push(i),
            Label::Noise => noise.push(i),
            Label::Unvisited => unreachable!("all points labeled after the scan"),
        }
    }

    // Size-1 clusters get the same treatment as noise.
    let (clusters, singles): (Vec<_>, Vec<_>) =
        clusters.into_iter().partition(|members| members.len() > 1);
    for members in singles {
        noise.extend(members);
    }
    noise.sort_unstable();

    debug!(
        points = n,
        clusters = clusters.len(),
        noise = noise.len(),
        "dbscan pass complete"
    );

    ClusterAssignment { clusters, noise }
}
