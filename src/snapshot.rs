//! Graph snapshot for external visualization
//!
//! A plain node/edge projection of the scored graph, capped at a maximum
//! number of nodes. Edges are kept only when both endpoints made the cut.

use crate::graph::{NodeId, NodeKind};
use crate::risk::{ExportError, ExportResult, ScoredGraph};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeView {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub color: String,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeView {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphSnapshot {
    /// Project the first `max_nodes` nodes (all when `None`) in insertion order
    pub fn from_scored(scored: &ScoredGraph, max_nodes: Option<usize>) -> Self {
        let graph = scored.graph();
        let limit = max_nodes.unwrap_or(usize::MAX);

        let nodes: Vec<NodeView> = graph
            .nodes()
            .take(limit)
            .map(|node| NodeView {
                id: node.id,
                name: node.name().to_string(),
                kind: node.kind(),
                color: node.color.clone(),
                size: node.size,
                risk_score: scored.risk_score(node.id),
            })
            .collect();

        let kept: FxHashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
        let edges: Vec<EdgeView> = graph
            .edges()
            .filter(|edge| kept.contains(&edge.source) && kept.contains(&edge.target))
            .map(|edge| EdgeView {
                source: edge.source,
                target: edge.target,
                frequency: edge.frequency,
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> ExportResult<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> ExportResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        self.to_writer(&mut writer)?;
        writer.flush()?;

        info!(
            "Graph snapshot saved to: {:?} ({} nodes, {} edges)",
            path,
            self.nodes.len(),
            self.edges.len()
        );
        Ok(())
    }
}
