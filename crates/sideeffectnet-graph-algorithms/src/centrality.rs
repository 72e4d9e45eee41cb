//! Betweenness centrality
//!
//! Brandes' algorithm over the undirected projection of a [`GraphView`].
//! Large graphs can be approximated by accumulating dependencies from a
//! random subset of pivot nodes only.

use super::common::{GraphView, NodeId};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use std::collections::{HashMap, VecDeque};

/// Betweenness configuration
///
/// With `sample_size` set below the node count, only that many pivots are
/// used and the scores are an estimate. Unless `seed` is fixed, repeated runs
/// draw different pivots and return slightly different scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BetweennessConfig {
    /// Number of pivot nodes (`None` = exact computation)
    pub sample_size: Option<usize>,
    /// Seed for pivot selection
    pub seed: Option<u64>,
    /// Scale scores by `1 / ((n - 1)(n - 2))`
    pub normalized: bool,
}

impl Default for BetweennessConfig {
    fn default() -> Self {
        Self {
            sample_size: None,
            seed: None,
            normalized: true,
        }
    }
}

impl BetweennessConfig {
    /// Exact computation over every node
    pub fn exact() -> Self {
        Self::default()
    }

    /// Approximate with `sample_size` pivots
    pub fn sampled(sample_size: usize, seed: Option<u64>) -> Self {
        Self {
            sample_size: Some(sample_size),
            seed,
            ..Self::default()
        }
    }

    /// Whether two runs over a graph of `node_count` nodes yield identical scores.
    pub fn is_deterministic(&self, node_count: usize) -> bool {
        match self.sample_size {
            None => true,
            Some(k) => k >= node_count || self.seed.is_some(),
        }
    }

    fn pivots(&self, node_count: usize) -> Vec<usize> {
        match self.sample_size {
            Some(k) if k < node_count => {
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let mut picked = index::sample(&mut rng, node_count, k).into_vec();
                // Fixed accumulation order keeps seeded runs bit-identical
                picked.sort_unstable();
                picked
            }
            _ => (0..node_count).collect(),
        }
    }
}

/// Calculate betweenness centrality for every node in the view.
///
/// Edge direction is ignored. Returns an empty map for an empty view.
pub fn betweenness_centrality(
    view: &GraphView,
    config: &BetweennessConfig,
) -> HashMap<NodeId, f64> {
    let n = view.node_count;

    if n == 0 {
        return HashMap::new();
    }

    let adjacency = view.undirected_adjacency();
    let pivots = config.pivots(n);

    let mut betweenness = vec![0.0; n];

    // Per-source buffers, reset between pivots
    let mut sigma = vec![0.0f64; n];
    let mut dist: Vec<Option<usize>> = vec![None; n];
    let mut delta = vec![0.0f64; n];
    let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut stack = Vec::with_capacity(n);
    let mut queue = VecDeque::new();

    for &source in &pivots {
        sigma.iter_mut().for_each(|s| *s = 0.0);
        dist.iter_mut().for_each(|d| *d = None);
        delta.iter_mut().for_each(|d| *d = 0.0);
        preds.iter_mut().for_each(Vec::clear);
        stack.clear();

        sigma[source] = 1.0;
        dist[source] = Some(0);
        queue.push_back(source);

        // 1. BFS: shortest-path counts
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            let dv = dist[v].unwrap_or(0);
            for &w in &adjacency[v] {
                if dist[w].is_none() {
                    dist[w] = Some(dv + 1);
                    queue.push_back(w);
                }
                if dist[w] == Some(dv + 1) {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        // 2. Dependency accumulation in reverse BFS order
        while let Some(w) = stack.pop() {
            for &v in &preds[w] {
                delta[v] += sigma[v] / sigma[w] * (1.0 + delta[w]);
            }
            if w != source {
                betweenness[w] += delta[w];
            }
        }
    }

    // 3. Rescale
    let scale = if config.normalized {
        if n <= 2 {
            None
        } else {
            Some(1.0 / ((n - 1) * (n - 2)) as f64)
        }
    } else {
        // Undirected: every pair was counted from both endpoints
        Some(0.5)
    };

    if let Some(mut scale) = scale {
        if pivots.len() < n && !pivots.is_empty() {
            scale *= n as f64 / pivots.len() as f64;
        }
        for score in betweenness.iter_mut() {
            *score *= scale;
        }
    }

    let mut result = HashMap::with_capacity(n);
    for (idx, score) in betweenness.into_iter().enumerate() {
        result.insert(view.index_to_node[idx], score);
    }

    result
}
