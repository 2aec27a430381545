//! Graph serialization to plain node/edge lists.
//!
//! Exposes any built view as flat records ready for external tooling:
//! a JSON document (node-link shape) or a line-oriented edge list. Output
//! ordering is deterministic — nodes sorted by id (courses before faculty),
//! edges sorted by normalized endpoint pair — so repeated exports of the
//! same graph are byte-identical.

use anyhow::{Context, Result};
use petgraph::visit::EdgeRef;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::network::models::{NodeId, TeachingNetwork};
use crate::records::Window;

/// Flat node record: identity, kind, and whichever attributes the node
/// carries. Course-only fields are omitted from faculty records and vice
/// versa.
#[derive(Debug, Clone, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<String>,
}

/// Flat edge record with normalized endpoint order (source < target by
/// node-id ordering).
#[derive(Debug, Clone, Serialize)]
pub struct EdgeRecord {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

/// A complete exportable view.
#[derive(Debug, Clone, Serialize)]
pub struct GraphExport {
    pub view: String,
    pub window: String,
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

/// Flatten a built view into export records.
pub fn graph_export(net: &TeachingNetwork, window: Window) -> GraphExport {
    let mut node_ids: Vec<(NodeId, petgraph::graph::NodeIndex)> = net
        .graph
        .node_indices()
        .map(|idx| (net.graph[idx].id, idx))
        .collect();
    node_ids.sort_by_key(|(id, _)| *id);

    let nodes = node_ids
        .iter()
        .map(|&(id, idx)| {
            let node = &net.graph[idx];
            NodeRecord {
                id: id.to_string(),
                kind: id.kind(),
                name: node.name.clone(),
                department: node.department.clone(),
                title: node.title.clone(),
                term: node.term.clone(),
                year: node.year,
                departments: node.departments.iter().cloned().collect(),
            }
        })
        .collect();

    let mut edge_keys: Vec<(NodeId, NodeId, f64)> = net
        .graph
        .edge_references()
        .map(|edge| {
            let a = net.graph[edge.source()].id;
            let b = net.graph[edge.target()].id;
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            (lo, hi, edge.weight().weight)
        })
        .collect();
    edge_keys.sort_by_key(|&(lo, hi, _)| (lo, hi));

    let edges = edge_keys
        .into_iter()
        .map(|(lo, hi, weight)| EdgeRecord {
            source: lo.to_string(),
            target: hi.to_string(),
            weight,
        })
        .collect();

    GraphExport {
        view: net.view.to_string(),
        window: window.to_string(),
        node_count: net.node_count(),
        edge_count: net.edge_count(),
        nodes,
        edges,
    }
}

/// Write the export as pretty-printed JSON.
pub fn write_json(export: &GraphExport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), export)
        .with_context(|| format!("Failed to write JSON export to {}", path.display()))?;
    tracing::info!("Exported {} view to {}", export.view, path.display());
    Ok(())
}

/// Write the export as a line-oriented edge list: `source target weight`.
pub fn write_edge_list(export: &GraphExport, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create export file {}", path.display()))?;
    let mut out = BufWriter::new(file);
    for edge in &export.edges {
        writeln!(out, "{} {} {}", edge.source, edge.target, edge.weight)
            .with_context(|| format!("Failed to write edge list to {}", path.display()))?;
    }
    out.flush()
        .with_context(|| format!("Failed to write edge list to {}", path.display()))?;
    tracing::info!("Exported {} edges to {}", export.edges.len(), path.display());
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
