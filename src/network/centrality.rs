//! Centrality measures over teaching networks.
//!
//! Four measures per node:
//! - **Degree** — neighbor count normalized by (n − 1)
//! - **Betweenness** — via `rustworkx_core::centrality::betweenness_centrality`,
//!   hop distances, normalized
//! - **Closeness** — BFS shortest paths, hop distances
//! - **Eigenvector** — weighted power iteration
//!
//! Disconnection policy: betweenness and closeness are computed on the
//! largest connected component only; nodes outside it score 0 on both. The
//! result mapping always has one entry per node of the full graph — a node
//! "far from everything" scores zero, it is never omitted.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::network::models::{AnalysisConfig, CentralityScores, NodeId, TeachingNetwork};

/// Centrality results for every node, plus a degradation marker.
#[derive(Debug, Clone)]
pub struct CentralityReport {
    /// One entry per node of the analyzed graph; ordered for stable output
    pub scores: BTreeMap<NodeId, CentralityScores>,
    /// True when eigenvector iteration failed to converge and zeros were
    /// substituted for every node. Callers log this; it is not an error.
    pub eigenvector_degraded: bool,
}

/// Compute all four centrality measures for every node of the graph.
///
/// Empty graphs produce an empty mapping. Single-node graphs score zero on
/// every measure.
pub fn centrality(net: &TeachingNetwork, config: &AnalysisConfig) -> CentralityReport {
    let g = &net.graph;
    let n = g.node_count();

    let mut scores: BTreeMap<NodeId, CentralityScores> = g
        .node_weights()
        .map(|node| (node.id, CentralityScores::default()))
        .collect();
    if n == 0 {
        return CentralityReport {
            scores,
            eigenvector_degraded: false,
        };
    }

    // Degree: neighbor count over (n − 1)
    if n > 1 {
        let denom = (n - 1) as f64;
        for idx in g.node_indices() {
            let degree = g.neighbors(idx).count() as f64;
            if let Some(entry) = scores.get_mut(&g[idx].id) {
                entry.degree = degree / denom;
            }
        }
    }

    // Betweenness and closeness restricted to the largest component
    let components = connected_components(g);
    let largest = largest_component(&components);

    let betweenness = betweenness_on_component(g, largest);
    let closeness = closeness_on_component(g, largest);
    for idx in g.node_indices() {
        if let Some(entry) = scores.get_mut(&g[idx].id) {
            entry.betweenness = betweenness[idx.index()];
            entry.closeness = closeness[idx.index()];
        }
    }

    // Eigenvector over the full graph, weighted
    let (eigen, degraded) = eigenvector_centrality(g, config);
    for idx in g.node_indices() {
        if let Some(entry) = scores.get_mut(&g[idx].id) {
            entry.eigenvector = eigen[idx.index()];
        }
    }

    CentralityReport {
        scores,
        eigenvector_degraded: degraded,
    }
}

// ============================================================================
// Connected components (BFS)
// ============================================================================

type Network = UnGraph<crate::network::models::NetworkNode, crate::network::models::NetworkEdge>;

/// Group node indices into connected components, in discovery order.
fn connected_components(g: &Network) -> Vec<Vec<NodeIndex>> {
    let n = g.node_count();
    let mut seen = vec![false; n];
    let mut components = Vec::new();

    for start in g.node_indices() {
        if seen[start.index()] {
            continue;
        }
        let mut members = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        seen[start.index()] = true;

        while let Some(current) = queue.pop_front() {
            members.push(current);
            for neighbor in g.neighbors(current) {
                if !seen[neighbor.index()] {
                    seen[neighbor.index()] = true;
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(members);
    }
    components
}

/// The largest component; size ties keep the earliest-discovered one so the
/// choice is stable for a given graph.
fn largest_component(components: &[Vec<NodeIndex>]) -> &[NodeIndex] {
    let mut best: &[NodeIndex] = &[];
    for component in components {
        if component.len() > best.len() {
            best = component;
        }
    }
    best
}

// ============================================================================
// Betweenness (rustworkx-core, on the largest component)
// ============================================================================

/// Betweenness per node index of the full graph; zero outside `component`.
fn betweenness_on_component(g: &Network, component: &[NodeIndex]) -> Vec<f64> {
    let mut result = vec![0.0; g.node_count()];
    if component.len() < 3 {
        // Normalized betweenness needs at least one pair routed through a
        // third node
        return result;
    }

    // Project the component into its own graph so rustworkx-core scores are
    // normalized against the component size
    let mut sub: UnGraph<(), ()> = UnGraph::default();
    let mut to_sub: HashMap<NodeIndex, NodeIndex> = HashMap::with_capacity(component.len());
    for &idx in component {
        to_sub.insert(idx, sub.add_node(()));
    }
    for edge in g.edge_references() {
        if let (Some(&a), Some(&b)) = (to_sub.get(&edge.source()), to_sub.get(&edge.target())) {
            sub.add_edge(a, b, ());
        }
    }

    let sub_scores = rustworkx_core::centrality::betweenness_centrality(
        &sub, false, // include_endpoints
        true,  // normalized
        200,   // parallel_threshold (sequential for small graphs)
    );

    for &idx in component {
        let sub_idx = to_sub[&idx];
        result[idx.index()] = sub_scores[sub_idx.index()].unwrap_or(0.0);
    }
    result
}

// ============================================================================
// Closeness (BFS hop distances, on the largest component)
// ============================================================================

/// Closeness per node index of the full graph; zero outside `component`.
/// For a node u in a component of size c: (c − 1) / Σ dist(u, v).
fn closeness_on_component(g: &Network, component: &[NodeIndex]) -> Vec<f64> {
    let mut result = vec![0.0; g.node_count()];
    let c = component.len();
    if c < 2 {
        return result;
    }
    let in_component: std::collections::HashSet<NodeIndex> = component.iter().copied().collect();

    for &start in component {
        let mut dist: HashMap<NodeIndex, usize> = HashMap::with_capacity(c);
        dist.insert(start, 0);
        let mut queue = VecDeque::new();
        queue.push_back(start);
        let mut total = 0usize;

        while let Some(current) = queue.pop_front() {
            let d = dist[&current];
            total += d;
            for neighbor in g.neighbors(current) {
                if in_component.contains(&neighbor) && !dist.contains_key(&neighbor) {
                    dist.insert(neighbor, d + 1);
                    queue.push_back(neighbor);
                }
            }
        }

        if total > 0 {
            result[start.index()] = (c - 1) as f64 / total as f64;
        }
    }
    result
}

// ============================================================================
// Eigenvector (weighted power iteration)
// ============================================================================

/// Weighted eigenvector centrality per node index, plus a degradation flag.
///
/// Power iteration on (A + I): start uniform, repeatedly add the weighted
/// neighbor sum, L2-normalize, and stop once the L1 change drops below
/// `n · tolerance`. An edgeless graph scores zero everywhere by definition;
/// hitting the iteration cap degrades every score to zero and sets the flag.
fn eigenvector_centrality(g: &Network, config: &AnalysisConfig) -> (Vec<f64>, bool) {
    let n = g.node_count();
    if n == 0 {
        return (vec![], false);
    }
    if g.edge_count() == 0 {
        return (vec![0.0; n], false);
    }

    // Undirected weighted adjacency
    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for edge in g.edge_references() {
        let s = edge.source().index();
        let t = edge.target().index();
        let w = edge.weight().weight;
        adj[s].push((t, w));
        adj[t].push((s, w));
    }

    let threshold = n as f64 * config.eigenvector_tolerance;
    let mut x = vec![1.0 / n as f64; n];

    for _ in 0..config.eigenvector_max_iterations {
        let xlast = x.clone();

        // x = xlast + A·xlast
        for (u, neighbors) in adj.iter().enumerate() {
            for &(v, w) in neighbors {
                x[v] += xlast[u] * w;
            }
        }

        let norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();
        let norm = if norm == 0.0 { 1.0 } else { norm };
        for v in x.iter_mut() {
            *v /= norm;
        }

        let delta: f64 = x.iter().zip(xlast.iter()).map(|(a, b)| (a - b).abs()).sum();
        if delta < threshold {
            return (x, false);
        }
    }

    (vec![0.0; n], true)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::models::{NetworkNode, ViewKind};
    use crate::records::TeachingFact;

    fn faculty_fact(faculty_id: i64) -> TeachingFact {
        TeachingFact {
            department_code: "CS".into(),
            faculty_id,
            faculty_name: format!("Faculty {faculty_id}"),
            course_code: "CS 101".into(),
            course_title: "Intro".into(),
            offering_id: 1,
            term: "Fall".into(),
            year: 2020,
        }
    }

    /// Faculty-projection style graph with the given weighted edges.
    fn make_network(nodes: &[i64], edges: &[(i64, i64, f64)]) -> TeachingNetwork {
        let mut net = TeachingNetwork::new(ViewKind::Faculty);
        for &id in nodes {
            net.add_node(NetworkNode::faculty(&faculty_fact(id)));
        }
        for &(a, b, w) in edges {
            net.upsert_edge(NodeId::Faculty(a), NodeId::Faculty(b), w);
        }
        net
    }

    fn make_path(n: i64) -> TeachingNetwork {
        let nodes: Vec<i64> = (1..=n).collect();
        let edges: Vec<(i64, i64, f64)> = (1..n).map(|i| (i, i + 1, 1.0)).collect();
        make_network(&nodes, &edges)
    }

    fn make_star(leaves: i64) -> TeachingNetwork {
        let nodes: Vec<i64> = (0..=leaves).collect();
        let edges: Vec<(i64, i64, f64)> = (1..=leaves).map(|i| (0, i, 1.0)).collect();
        make_network(&nodes, &edges)
    }

    fn score(report: &CentralityReport, id: i64) -> &CentralityScores {
        &report.scores[&NodeId::Faculty(id)]
    }

    #[test]
    fn test_empty_graph_empty_mapping() {
        let net = TeachingNetwork::new(ViewKind::Faculty);
        let report = centrality(&net, &AnalysisConfig::default());
        assert!(report.scores.is_empty());
        assert!(!report.eigenvector_degraded);
    }

    #[test]
    fn test_single_node_all_zero() {
        let net = make_network(&[1], &[]);
        let report = centrality(&net, &AnalysisConfig::default());
        assert_eq!(report.scores.len(), 1);
        assert_eq!(*score(&report, 1), CentralityScores::default());
    }

    #[test]
    fn test_path_degree_and_closeness() {
        let net = make_path(3); // 1 — 2 — 3
        let report = centrality(&net, &AnalysisConfig::default());

        assert!((score(&report, 2).degree - 1.0).abs() < 1e-12);
        assert!((score(&report, 1).degree - 0.5).abs() < 1e-12);

        // Middle: (3−1)/(1+1) = 1.0; ends: (3−1)/(1+2) = 2/3
        assert!((score(&report, 2).closeness - 1.0).abs() < 1e-12);
        assert!((score(&report, 1).closeness - 2.0 / 3.0).abs() < 1e-12);
        assert!((score(&report, 3).closeness - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_star_betweenness_center_is_one() {
        let net = make_star(4);
        let report = centrality(&net, &AnalysisConfig::default());

        // Every leaf pair routes through the center; normalized score is 1.0
        assert!((score(&report, 0).betweenness - 1.0).abs() < 1e-9);
        for leaf in 1..=4 {
            assert_eq!(score(&report, leaf).betweenness, 0.0);
        }
    }

    #[test]
    fn test_star_closeness_center_highest() {
        let net = make_star(3);
        let report = centrality(&net, &AnalysisConfig::default());
        assert!((score(&report, 0).closeness - 1.0).abs() < 1e-12);
        // Leaf: (4−1)/(1+2+2) = 0.6
        assert!((score(&report, 1).closeness - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_disconnected_zero_fills_outside_largest_component() {
        // Triangle 1-2-3 plus pair 10-11 plus isolated 20
        let net = make_network(
            &[1, 2, 3, 10, 11, 20],
            &[(1, 2, 1.0), (2, 3, 1.0), (1, 3, 1.0), (10, 11, 1.0)],
        );
        let report = centrality(&net, &AnalysisConfig::default());

        // Full mapping, no omissions
        assert_eq!(report.scores.len(), 6);

        // Outside the triangle: closeness and betweenness forced to zero,
        // degree still reflects the actual edges
        assert_eq!(score(&report, 10).closeness, 0.0);
        assert_eq!(score(&report, 11).closeness, 0.0);
        assert_eq!(score(&report, 10).betweenness, 0.0);
        assert!(score(&report, 10).degree > 0.0);

        // Fully isolated node scores zero degree too
        assert_eq!(score(&report, 20).degree, 0.0);
        assert_eq!(score(&report, 20).closeness, 0.0);
        assert_eq!(score(&report, 20).betweenness, 0.0);

        // Inside the triangle closeness is defined
        assert!(score(&report, 1).closeness > 0.0);
    }

    #[test]
    fn test_mapping_size_equals_node_count() {
        for net in [
            TeachingNetwork::new(ViewKind::Faculty),
            make_network(&[1, 2, 3], &[]),
            make_path(5),
        ] {
            let n = net.node_count();
            let report = centrality(&net, &AnalysisConfig::default());
            assert_eq!(report.scores.len(), n);
        }
    }

    #[test]
    fn test_eigenvector_triangle_uniform() {
        let net = make_network(&[1, 2, 3], &[(1, 2, 1.0), (2, 3, 1.0), (1, 3, 1.0)]);
        let report = centrality(&net, &AnalysisConfig::default());
        assert!(!report.eigenvector_degraded);

        let expected = 1.0 / 3.0_f64.sqrt();
        for id in 1..=3 {
            assert!((score(&report, id).eigenvector - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_eigenvector_respects_edge_weights() {
        // 0 is connected to both 1 and 2, but far more strongly to 1
        let net = make_network(&[0, 1, 2], &[(0, 1, 10.0), (0, 2, 1.0)]);
        let report = centrality(&net, &AnalysisConfig::default());
        assert!(!report.eigenvector_degraded);
        assert!(score(&report, 1).eigenvector > score(&report, 2).eigenvector);
    }

    #[test]
    fn test_eigenvector_edgeless_is_zero_not_degraded() {
        let net = make_network(&[1, 2, 3], &[]);
        let report = centrality(&net, &AnalysisConfig::default());
        assert!(!report.eigenvector_degraded);
        for id in 1..=3 {
            assert_eq!(score(&report, id).eigenvector, 0.0);
        }
    }

    #[test]
    fn test_eigenvector_degrades_to_zero_when_iteration_capped() {
        let net = make_path(4);
        let config = AnalysisConfig {
            eigenvector_max_iterations: 0,
            ..AnalysisConfig::default()
        };
        let report = centrality(&net, &config);
        assert!(report.eigenvector_degraded);
        for scores in report.scores.values() {
            assert_eq!(scores.eigenvector, 0.0);
            // Other measures unaffected by the degradation
            assert!(scores.degree >= 0.0);
        }
    }

    #[test]
    fn test_two_node_graph_betweenness_zero() {
        let net = make_network(&[1, 2], &[(1, 2, 1.0)]);
        let report = centrality(&net, &AnalysisConfig::default());
        assert_eq!(score(&report, 1).betweenness, 0.0);
        // Closeness of a connected pair is 1.0 each
        assert!((score(&report, 1).closeness - 1.0).abs() < 1e-12);
        assert!((score(&report, 2).closeness - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_component_size_tie_resolved_stably() {
        // Two disjoint pairs of equal size: the earliest-built pair wins
        let net = make_network(&[1, 2, 3, 4], &[(1, 2, 1.0), (3, 4, 1.0)]);
        let a = centrality(&net, &AnalysisConfig::default());
        let b = centrality(&net, &AnalysisConfig::default());
        for id in 1..=4 {
            assert_eq!(score(&a, id).closeness, score(&b, id).closeness);
        }
        assert!((score(&a, 1).closeness - 1.0).abs() < 1e-12);
        assert_eq!(score(&a, 3).closeness, 0.0);
    }
}
