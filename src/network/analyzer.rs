//! Analysis facade tying the pipeline together.
//!
//! [`NetworkAnalyzer`] owns the builder and tuning config and runs the full
//! pipeline — build, centrality, communities — for one view and window, plus
//! the longitudinal and interdisciplinary analyses. All results are plain
//! data for a downstream formatter; nothing here renders text.

use std::sync::Arc;

use crate::network::builder::NetworkBuilder;
use crate::network::centrality::{centrality, CentralityReport};
use crate::network::community::{detect_communities, CommunityPartition};
use crate::network::error::NetworkError;
use crate::network::interdisciplinary::{identify_interdisciplinary, InterdisciplinaryFaculty};
use crate::network::models::{AnalysisConfig, CentralityScores, NetworkNode, TeachingNetwork, ViewKind};
use crate::network::temporal::{analyze_evolution, WindowStats};
use crate::records::{FactSummary, RecordSource, Window};

/// Full analysis of one view over one window.
#[derive(Debug, Clone)]
pub struct NetworkAnalysis {
    pub window: Window,
    pub network: TeachingNetwork,
    /// Malformed source rows dropped before the build
    pub skipped_facts: usize,
    pub centrality: CentralityReport,
    pub communities: CommunityPartition,
}

impl NetworkAnalysis {
    /// Top-k nodes by one centrality measure, descending; ties broken by
    /// node id ascending.
    pub fn top_nodes(
        &self,
        k: usize,
        measure: impl Fn(&CentralityScores) -> f64,
    ) -> Vec<(&NetworkNode, f64)> {
        let mut ranked: Vec<(&NetworkNode, f64)> = self
            .centrality
            .scores
            .iter()
            .filter_map(|(id, scores)| self.network.get_node(*id).map(|n| (n, measure(scores))))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.id.cmp(&b.0.id)));
        ranked.truncate(k);
        ranked
    }
}

/// Source-level counts for the stats surface.
#[derive(Debug, Clone)]
pub struct SourceStats {
    pub summary: FactSummary,
    pub skipped_facts: usize,
}

/// Coordinates record source, builder, and analysis algorithms.
pub struct NetworkAnalyzer {
    builder: NetworkBuilder,
    config: AnalysisConfig,
}

impl NetworkAnalyzer {
    pub fn new(source: Arc<dyn RecordSource>, config: AnalysisConfig) -> Self {
        Self {
            builder: NetworkBuilder::new(source),
            config,
        }
    }

    pub fn builder(&self) -> &NetworkBuilder {
        &self.builder
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Build one view and compute centrality and communities on it.
    ///
    /// Eigenvector convergence failure is recovered inside the metric step
    /// (zero scores) and logged here as a warning; it never fails the call.
    pub fn analyze(&self, view: ViewKind, window: Window) -> Result<NetworkAnalysis, NetworkError> {
        tracing::info!("Analyzing {view} view for window {window}");
        let built = self.builder.build(view, window)?;

        let centrality = centrality(&built.network, &self.config);
        if centrality.eigenvector_degraded {
            tracing::warn!(
                "Eigenvector centrality did not converge for {view} view, window {window}; \
                 scores substituted with zeros"
            );
        }

        let communities = detect_communities(&built.network, self.config.louvain_resolution);
        tracing::debug!(
            "Found {} communities (modularity {:.4})",
            communities.community_count,
            communities.modularity
        );

        Ok(NetworkAnalysis {
            window,
            network: built.network,
            skipped_facts: built.skipped_facts,
            centrality,
            communities,
        })
    }

    /// Per-window evolution rows, in the given window order.
    pub fn evolution(&self, windows: &[Window]) -> Result<Vec<WindowStats>, NetworkError> {
        analyze_evolution(&self.builder, windows, &self.config)
    }

    /// Faculty teaching across departments, over an existing bipartite view
    /// or a fresh unbounded one.
    pub fn interdisciplinary(
        &self,
        graph: Option<&TeachingNetwork>,
    ) -> Result<Vec<InterdisciplinaryFaculty>, NetworkError> {
        identify_interdisciplinary(&self.builder, graph)
    }

    /// Summarize the source facts for a window without building a graph.
    pub fn summarize(&self, window: Window) -> Result<SourceStats, NetworkError> {
        let batch = self.builder.fetch(window)?;
        Ok(SourceStats {
            summary: FactSummary::from_facts(&batch.facts),
            skipped_facts: batch.skipped,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
