//! Network data models.
//!
//! Defines the type system for teaching-network analysis:
//!
//! ## Graph structure
//! - [`NodeId`] — discriminated node identity (course offering or faculty)
//! - [`NetworkNode`] / [`NetworkEdge`] — node attributes and edge weights
//! - [`ViewKind`] — which of the three graph views to build
//! - [`TeachingNetwork`] — petgraph wrapper with ID ↔ NodeIndex mapping
//!
//! ## Output types
//! - [`BuiltNetwork`] — a built view plus data-quality accounting
//! - [`CentralityScores`] — per-node centrality measures
//!
//! ## Configuration
//! - [`AnalysisConfig`] — tuning parameters for the analysis algorithms

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::network::error::NetworkError;
use crate::records::TeachingFact;

// ============================================================================
// Node identity
// ============================================================================

/// Discriminated node identity. The same faculty id always maps to the same
/// node within one built view; course nodes are offering-level, so a course
/// taught in two terms yields two distinct nodes.
///
/// Derived `Ord` gives a total order used wherever determinism requires one
/// (community tie-breaks, export ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeId {
    /// Course-offering node, keyed by offering id
    Course(i64),
    /// Faculty node, keyed by faculty id
    Faculty(i64),
}

impl NodeId {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Course(_) => "course",
            Self::Faculty(_) => "faculty",
        }
    }

    pub fn is_faculty(&self) -> bool {
        matches!(self, Self::Faculty(_))
    }

    pub fn is_course(&self) -> bool {
        matches!(self, Self::Course(_))
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Course(id) => write!(f, "course:{id}"),
            Self::Faculty(id) => write!(f, "faculty:{id}"),
        }
    }
}

// ============================================================================
// Nodes and edges
// ============================================================================

/// Attributes carried by a network node. Course nodes fill the offering
/// fields; faculty nodes fill `departments` (every department they taught
/// in within the window, needed by the interdisciplinary detector).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: NodeId,
    /// Faculty display name or course catalog code
    pub name: String,
    /// Offering department (course nodes)
    pub department: Option<String>,
    /// Catalog title (course nodes)
    pub title: Option<String>,
    /// Term of the offering (course nodes)
    pub term: Option<String>,
    /// Year of the offering (course nodes)
    pub year: Option<i32>,
    /// Departments taught in (faculty nodes); ordered for stable output
    pub departments: BTreeSet<String>,
}

impl NetworkNode {
    /// Course-offering node from a fact.
    pub fn course(fact: &TeachingFact) -> Self {
        Self {
            id: NodeId::Course(fact.offering_id),
            name: fact.course_code.clone(),
            department: Some(fact.department_code.clone()),
            title: Some(fact.course_title.clone()),
            term: Some(fact.term.clone()),
            year: Some(fact.year),
            departments: BTreeSet::new(),
        }
    }

    /// Faculty node from a fact. Department membership is accumulated by the
    /// builder as facts arrive, not set here.
    pub fn faculty(fact: &TeachingFact) -> Self {
        Self {
            id: NodeId::Faculty(fact.faculty_id),
            name: fact.faculty_name.clone(),
            department: None,
            title: None,
            term: None,
            year: None,
            departments: BTreeSet::new(),
        }
    }
}

/// Edge payload. Weight semantics depend on the view: multiplicity of
/// assignment rows (bipartite), shared offerings (faculty projection), or
/// shared faculty (course projection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub weight: f64,
}

impl Default for NetworkEdge {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

// ============================================================================
// View kinds
// ============================================================================

/// Which graph view to build from a window's facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    /// Faculty ↔ course-offering graph; edges only cross kinds
    Bipartite,
    /// Faculty–faculty co-teaching projection
    Faculty,
    /// Course–course shared-instructor projection
    Course,
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bipartite => write!(f, "bipartite"),
            Self::Faculty => write!(f, "faculty"),
            Self::Course => write!(f, "course"),
        }
    }
}

impl std::str::FromStr for ViewKind {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bipartite" => Ok(Self::Bipartite),
            "faculty" => Ok(Self::Faculty),
            "course" => Ok(Self::Course),
            other => Err(NetworkError::InvalidViewKind(other.to_string())),
        }
    }
}

// ============================================================================
// TeachingNetwork — petgraph wrapper with ID mapping
// ============================================================================

/// Wrapper around `petgraph::UnGraph` with bidirectional ID ↔ NodeIndex
/// mapping.
///
/// All three views are undirected. The `id_to_index` HashMap enables O(1)
/// lookups by node identity during construction and when joining metric
/// results back onto nodes.
#[derive(Debug, Clone)]
pub struct TeachingNetwork {
    /// The underlying undirected graph
    pub graph: UnGraph<NetworkNode, NetworkEdge>,
    /// Mapping from node identity to petgraph NodeIndex
    pub id_to_index: HashMap<NodeId, NodeIndex>,
    /// Which view this graph represents
    pub view: ViewKind,
}

impl TeachingNetwork {
    /// Create a new empty network for the given view.
    pub fn new(view: ViewKind) -> Self {
        Self {
            graph: UnGraph::default(),
            id_to_index: HashMap::new(),
            view,
        }
    }

    /// Add a node to the graph. Returns the NodeIndex.
    /// If a node with the same ID already exists, returns its existing index.
    pub fn add_node(&mut self, node: NetworkNode) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(&node.id) {
            return idx;
        }
        let id = node.id;
        let idx = self.graph.add_node(node);
        self.id_to_index.insert(id, idx);
        idx
    }

    /// Add `delta` to the weight of the edge between two nodes, creating the
    /// edge at weight `delta` if absent. Self-loops are never created.
    /// Returns `None` if either node is missing or `a == b`.
    pub fn upsert_edge(&mut self, a: NodeId, b: NodeId, delta: f64) -> Option<EdgeIndex> {
        if a == b {
            return None;
        }
        let a_idx = *self.id_to_index.get(&a)?;
        let b_idx = *self.id_to_index.get(&b)?;
        if let Some(edge) = self.graph.find_edge(a_idx, b_idx) {
            if let Some(payload) = self.graph.edge_weight_mut(edge) {
                payload.weight += delta;
            }
            Some(edge)
        } else {
            Some(self.graph.add_edge(a_idx, b_idx, NetworkEdge { weight: delta }))
        }
    }

    /// Get a reference to a node by its ID.
    pub fn get_node(&self, id: NodeId) -> Option<&NetworkNode> {
        let idx = self.id_to_index.get(&id)?;
        self.graph.node_weight(*idx)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_node_mut(&mut self, id: NodeId) -> Option<&mut NetworkNode> {
        let idx = self.id_to_index.get(&id)?;
        self.graph.node_weight_mut(*idx)
    }

    /// Get the NodeIndex for a given ID.
    pub fn get_index(&self, id: NodeId) -> Option<NodeIndex> {
        self.id_to_index.get(&id).copied()
    }

    /// Weight of the edge between two nodes, if present.
    pub fn edge_weight(&self, a: NodeId, b: NodeId) -> Option<f64> {
        let a_idx = *self.id_to_index.get(&a)?;
        let b_idx = *self.id_to_index.get(&b)?;
        let edge = self.graph.find_edge(a_idx, b_idx)?;
        self.graph.edge_weight(edge).map(|e| e.weight)
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of faculty nodes.
    pub fn faculty_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|n| n.id.is_faculty())
            .count()
    }

    /// Number of course-offering nodes.
    pub fn course_count(&self) -> usize {
        self.graph
            .node_weights()
            .filter(|n| n.id.is_course())
            .count()
    }

    /// Edge density: 2E / (N·(N−1)). Zero for graphs with fewer than two nodes.
    pub fn density(&self) -> f64 {
        let n = self.graph.node_count() as f64;
        if n < 2.0 {
            return 0.0;
        }
        2.0 * self.graph.edge_count() as f64 / (n * (n - 1.0))
    }

    /// Mean degree: 2E / N. Zero for the empty graph.
    pub fn mean_degree(&self) -> f64 {
        let n = self.graph.node_count() as f64;
        if n == 0.0 {
            return 0.0;
        }
        2.0 * self.graph.edge_count() as f64 / n
    }
}

// ============================================================================
// Output types
// ============================================================================

/// A built graph view plus accounting for facts the source had to skip.
/// Skipped rows are carried alongside the graph rather than logged and
/// forgotten, so downstream reports can surface data quality.
#[derive(Debug, Clone)]
pub struct BuiltNetwork {
    pub network: TeachingNetwork,
    /// Raw fact rows dropped at the record-source boundary
    pub skipped_facts: usize,
}

/// Per-node centrality measures. Every node of the analyzed graph gets an
/// entry; nodes outside the largest component or in degenerate graphs get
/// zeros, never a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CentralityScores {
    /// Degree centrality, normalized by (node_count − 1)
    pub degree: f64,
    /// Betweenness centrality on the largest connected component
    pub betweenness: f64,
    /// Closeness centrality on the largest connected component
    pub closeness: f64,
    /// Eigenvector centrality (weighted power iteration)
    pub eigenvector: f64,
}

impl Default for CentralityScores {
    fn default() -> Self {
        Self {
            degree: 0.0,
            betweenness: 0.0,
            closeness: 0.0,
            eigenvector: 0.0,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Tuning parameters for the analysis algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Eigenvector convergence tolerance, scaled by node count (default: 1e-6)
    pub eigenvector_tolerance: f64,
    /// Eigenvector maximum iterations before degrading to zeros (default: 1000)
    pub eigenvector_max_iterations: usize,
    /// Louvain resolution parameter (default: 1.0, higher = smaller communities)
    pub louvain_resolution: f64,
    /// How many top-degree faculty each evolution row reports (default: 10)
    pub top_faculty: usize,
    /// Width of generated evolution windows in years (default: 5)
    pub window_years: i32,
    /// Process evolution windows on the rayon pool (default: false)
    pub parallel_windows: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            eigenvector_tolerance: 1e-6,
            eigenvector_max_iterations: 1000,
            louvain_resolution: 1.0,
            top_faculty: 10,
            window_years: 5,
            parallel_windows: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
