//! Teaching-network analysis engine.
//!
//! Builds graph views over teaching records using petgraph and computes
//! centrality (degree, betweenness, closeness, eigenvector), community
//! structure (Louvain), temporal evolution, and interdisciplinary teaching
//! patterns on them.
//!
//! ## Architecture
//!
//! ```text
//! RecordSource ──► NetworkBuilder ──► TeachingNetwork (petgraph::UnGraph)
//!                                          │
//!                          ┌───────────────┼────────────────┐
//!                     centrality      communities      projections
//!                          │               │                │
//!                          └───── NetworkAnalyzer ──────────┘
//!                                          │
//!                        temporal / interdisciplinary / export
//! ```
//!
//! ## Modules
//!
//! - [`models`] — Data structures (NodeId, NetworkNode, TeachingNetwork, AnalysisConfig)
//! - [`builder`] — Fact → graph-view assembly for a year window
//! - [`centrality`] — Degree, betweenness, closeness, eigenvector
//! - [`community`] — Deterministic Louvain partitioning
//! - [`temporal`] — Per-window evolution rows
//! - [`interdisciplinary`] — Cross-department teaching detection
//! - [`export`] — Flat node/edge-list serialization
//! - [`analyzer`] — `NetworkAnalyzer` pipeline facade
//! - [`error`] — Error taxonomy for the analysis pipeline

pub mod analyzer;
pub mod builder;
pub mod centrality;
pub mod community;
pub mod error;
pub mod export;
pub mod interdisciplinary;
pub mod models;
pub mod temporal;

// Re-export primary types for convenience
pub use analyzer::{NetworkAnalysis, NetworkAnalyzer, SourceStats};
pub use builder::NetworkBuilder;
pub use centrality::{centrality, CentralityReport};
pub use community::{detect_communities, CommunityPartition};
pub use error::NetworkError;
pub use export::{graph_export, write_edge_list, write_json, EdgeRecord, GraphExport, NodeRecord};
pub use interdisciplinary::{identify_interdisciplinary, InterdisciplinaryFaculty};
pub use models::{
    AnalysisConfig, BuiltNetwork, CentralityScores, NetworkEdge, NetworkNode, NodeId,
    TeachingNetwork, ViewKind,
};
pub use temporal::{analyze_evolution, evolution_windows, FacultyRank, WindowStats};
