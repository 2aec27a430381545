//! Graph construction from teaching facts.
//!
//! Builds the three graph views over a year window:
//! - **Bipartite** — faculty ↔ course-offering, one edge per distinct
//!   (faculty, offering) pair, weight = assignment-row multiplicity
//! - **Faculty projection** — faculty pairs co-teaching an offering,
//!   weight = number of shared offerings
//! - **Course projection** — offering pairs sharing an instructor,
//!   weight = number of shared faculty
//!
//! Every view for the same window is assembled from one identical filtered
//! fact slice; the builder re-applies the window filter itself rather than
//! trusting the record source to have done it.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::network::error::NetworkError;
use crate::network::models::{BuiltNetwork, NetworkNode, NodeId, TeachingNetwork, ViewKind};
use crate::records::{FactBatch, RecordSource, TeachingFact, Window};

/// Builds graph views on demand. Graphs are fresh per call — nothing is
/// cached or mutated incrementally across windows.
pub struct NetworkBuilder {
    source: Arc<dyn RecordSource>,
}

impl NetworkBuilder {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Fetch the fact batch for a window from the record source.
    ///
    /// Exposed so multi-view consumers (temporal analysis) can fetch once
    /// and assemble several views from the identical fact set.
    pub fn fetch(&self, window: Window) -> Result<FactBatch, NetworkError> {
        Ok(self.source.teaching_facts(window)?)
    }

    /// Build one view for a window.
    pub fn build(&self, view: ViewKind, window: Window) -> Result<BuiltNetwork, NetworkError> {
        let batch = self.fetch(window)?;
        let network = Self::assemble(view, window, &batch.facts);
        tracing::debug!(
            "Built {} view for window {window}: {} nodes, {} edges ({} facts skipped)",
            view,
            network.node_count(),
            network.edge_count(),
            batch.skipped
        );
        Ok(BuiltNetwork {
            network,
            skipped_facts: batch.skipped,
        })
    }

    /// Assemble a view from an already-fetched fact slice. Facts outside the
    /// window are ignored; an empty surviving set yields an empty graph.
    pub fn assemble(view: ViewKind, window: Window, facts: &[TeachingFact]) -> TeachingNetwork {
        match view {
            ViewKind::Bipartite => assemble_bipartite(window, facts),
            ViewKind::Faculty => assemble_faculty_projection(window, facts),
            ViewKind::Course => assemble_course_projection(window, facts),
        }
    }
}

// ============================================================================
// View assembly
// ============================================================================

fn assemble_bipartite(window: Window, facts: &[TeachingFact]) -> TeachingNetwork {
    let mut net = TeachingNetwork::new(ViewKind::Bipartite);
    for fact in facts.iter().filter(|f| window.contains(f.year)) {
        net.add_node(NetworkNode::faculty(fact));
        net.add_node(NetworkNode::course(fact));
        note_department(&mut net, fact);
        net.upsert_edge(
            NodeId::Faculty(fact.faculty_id),
            NodeId::Course(fact.offering_id),
            1.0,
        );
    }
    net
}

fn assemble_faculty_projection(window: Window, facts: &[TeachingFact]) -> TeachingNetwork {
    let mut net = TeachingNetwork::new(ViewKind::Faculty);

    // Faculty sets per offering; BTree containers keep pair enumeration
    // deterministic regardless of source ordering
    let mut by_offering: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for fact in facts.iter().filter(|f| window.contains(f.year)) {
        net.add_node(NetworkNode::faculty(fact));
        note_department(&mut net, fact);
        by_offering
            .entry(fact.offering_id)
            .or_default()
            .insert(fact.faculty_id);
    }

    for faculty in by_offering.values() {
        let members: Vec<i64> = faculty.iter().copied().collect();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                net.upsert_edge(
                    NodeId::Faculty(members[i]),
                    NodeId::Faculty(members[j]),
                    1.0,
                );
            }
        }
    }
    net
}

fn assemble_course_projection(window: Window, facts: &[TeachingFact]) -> TeachingNetwork {
    let mut net = TeachingNetwork::new(ViewKind::Course);

    // Offering sets per faculty member; each member contributes +1 to every
    // pair of offerings they teach, so accumulated weight = shared faculty
    let mut by_faculty: BTreeMap<i64, BTreeSet<i64>> = BTreeMap::new();
    for fact in facts.iter().filter(|f| window.contains(f.year)) {
        net.add_node(NetworkNode::course(fact));
        by_faculty
            .entry(fact.faculty_id)
            .or_default()
            .insert(fact.offering_id);
    }

    for offerings in by_faculty.values() {
        let members: Vec<i64> = offerings.iter().copied().collect();
        for i in 0..members.len() {
            for j in (i + 1)..members.len() {
                net.upsert_edge(NodeId::Course(members[i]), NodeId::Course(members[j]), 1.0);
            }
        }
    }
    net
}

/// Record the fact's department on its faculty node. Empty department codes
/// (a descriptive hole in the source row) never count as a department.
fn note_department(net: &mut TeachingNetwork, fact: &TeachingFact) {
    if fact.department_code.is_empty() {
        return;
    }
    if let Some(node) = net.get_node_mut(NodeId::Faculty(fact.faculty_id)) {
        node.departments.insert(fact.department_code.clone());
    }
}

// ============================================================================
// Tests
// ============================================================================
