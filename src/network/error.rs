//! Error taxonomy for network construction.
//!
//! Only structural/input problems are errors here. Degraded numeric results
//! (eigenvector non-convergence) and skipped malformed facts are recovered
//! locally and reported inside result values, never through this enum.

/// Errors surfaced by the network layer.
#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// An unrecognized view name was requested. Fatal to that call.
    #[error("invalid view kind {0:?} (expected bipartite, faculty, or course)")]
    InvalidViewKind(String),

    /// The record source failed to produce facts.
    #[error(transparent)]
    Source(#[from] anyhow::Error),
}
