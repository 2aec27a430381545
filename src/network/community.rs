//! Community detection — Louvain with deterministic tie-breaking.
//!
//! Two-phase Louvain: greedy local moves that maximize modularity gain,
//! then contraction of communities into super-nodes, repeated until a level
//! stops improving. Weighted throughout (projection edge weights count).
//!
//! Determinism: nodes are processed in ascending [`NodeId`] order, candidate
//! communities are scanned in ascending label order, and equal gains keep
//! the earlier (lower) label. Equal-gain merges therefore always prefer the
//! lower node identifier pairing, and repeated runs over the same graph
//! produce identical partitions. Final community ids are dense integers
//! from 0, ordered by each community's smallest member id.

use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, HashMap};

use crate::network::models::{NodeId, TeachingNetwork};

/// Local-move passes per level.
const MAX_PASSES: usize = 100;
/// A level must improve modularity by at least this much to be kept.
const MIN_IMPROVEMENT: f64 = 1e-7;

/// Result of a community detection run.
#[derive(Debug, Clone)]
pub struct CommunityPartition {
    /// Community id per node; dense ids starting at 0
    pub assignments: BTreeMap<NodeId, u32>,
    pub community_count: usize,
    /// Modularity Q of the returned partition
    pub modularity: f64,
}

impl CommunityPartition {
    fn empty() -> Self {
        Self {
            assignments: BTreeMap::new(),
            community_count: 0,
            modularity: 0.0,
        }
    }
}

/// Partition the graph into modularity-optimal communities.
///
/// Edgeless graphs (including single-node graphs) put every node in its own
/// community, ids 0..n−1 in ascending node-id order.
pub fn detect_communities(net: &TeachingNetwork, resolution: f64) -> CommunityPartition {
    let mut ids: Vec<NodeId> = net.graph.node_weights().map(|node| node.id).collect();
    ids.sort_unstable();
    let n = ids.len();
    if n == 0 {
        return CommunityPartition::empty();
    }

    let rank: HashMap<NodeId, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    // Level-0 graph in rank space (ranks follow ascending node ids)
    let mut base_edges: Vec<(usize, usize, f64)> = Vec::with_capacity(net.edge_count());
    for edge in net.graph.edge_references() {
        let u = rank[&net.graph[edge.source()].id];
        let v = rank[&net.graph[edge.target()].id];
        if u != v {
            base_edges.push((u.min(v), u.max(v), edge.weight().weight));
        }
    }
    base_edges.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let mut level = LevelGraph {
        n,
        edges: base_edges.clone(),
        self_loops: vec![0.0; n],
    };
    let m = level.total_weight();
    let base_strengths = level.strengths();

    if m == 0.0 {
        // No edges: singleton communities in ascending id order
        let assignments = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();
        return CommunityPartition {
            assignments,
            community_count: n,
            modularity: 0.0,
        };
    }

    // partition[rank] = node index in the current level graph
    let mut partition: Vec<usize> = (0..n).collect();

    // First level is always applied; later levels must keep improving
    let node2com = one_level(&level, resolution, m);
    let (contracted, relabel) = contract(&level, &node2com);
    for entry in partition.iter_mut() {
        *entry = relabel[node2com[*entry]];
    }
    level = contracted;
    let mut q = partition_modularity(&base_edges, &base_strengths, &partition, m, resolution);

    loop {
        let node2com = one_level(&level, resolution, m);
        let composed: Vec<usize> = partition.iter().map(|&c| node2com[c]).collect();
        let new_q = partition_modularity(&base_edges, &base_strengths, &composed, m, resolution);
        if new_q - q < MIN_IMPROVEMENT {
            break;
        }
        q = new_q;
        let (contracted, relabel) = contract(&level, &node2com);
        for entry in partition.iter_mut() {
            *entry = relabel[node2com[*entry]];
        }
        level = contracted;
    }

    let community_count = level.n;
    let assignments = ids
        .iter()
        .enumerate()
        .map(|(i, &id)| (id, partition[i] as u32))
        .collect();

    CommunityPartition {
        assignments,
        community_count,
        modularity: q,
    }
}

// ============================================================================
// Level graphs
// ============================================================================

/// One level of the contraction hierarchy. Node indices stay ordered by the
/// smallest original member id, which is what keeps tie-breaks anchored to
/// node identity across levels.
struct LevelGraph {
    n: usize,
    /// Inter-node edges (u < v) with accumulated weight
    edges: Vec<(usize, usize, f64)>,
    /// Intra-community weight folded into each super-node
    self_loops: Vec<f64>,
}

impl LevelGraph {
    /// Weighted degree per node; self-loops count twice.
    fn strengths(&self) -> Vec<f64> {
        let mut s = vec![0.0; self.n];
        for &(u, v, w) in &self.edges {
            s[u] += w;
            s[v] += w;
        }
        for (u, &w) in self.self_loops.iter().enumerate() {
            s[u] += 2.0 * w;
        }
        s
    }

    /// Total edge weight m; each edge and self-loop counted once.
    fn total_weight(&self) -> f64 {
        self.edges.iter().map(|e| e.2).sum::<f64>() + self.self_loops.iter().sum::<f64>()
    }
}

// ============================================================================
// Phase 1: greedy local moves
// ============================================================================

/// Move nodes between communities while any move improves modularity.
/// Returns the community label per node (labels are node indices).
fn one_level(level: &LevelGraph, resolution: f64, m: f64) -> Vec<usize> {
    let n = level.n;
    let strengths = level.strengths();
    let mut node2com: Vec<usize> = (0..n).collect();
    let mut sigma: Vec<f64> = strengths.clone();

    let mut adj: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
    for &(u, v, w) in &level.edges {
        adj[u].push((v, w));
        adj[v].push((u, w));
    }

    for _ in 0..MAX_PASSES {
        let mut moved = false;

        // Ascending node order; with the BTreeMap candidate scan below this
        // pins every equal-gain decision to the lowest label
        for u in 0..n {
            let cur = node2com[u];

            let mut neigh: BTreeMap<usize, f64> = BTreeMap::new();
            for &(v, w) in &adj[u] {
                *neigh.entry(node2com[v]).or_default() += w;
            }

            let ki = strengths[u];
            let degc = ki / (2.0 * m);
            let remove_cost = -neigh.get(&cur).copied().unwrap_or(0.0)
                + resolution * (sigma[cur] - ki) * degc;
            sigma[cur] -= ki;

            let mut best_com = cur;
            let mut best_gain = 0.0;
            for (&com, &dnc) in &neigh {
                let gain = remove_cost + dnc - resolution * sigma[com] * degc;
                if gain > best_gain {
                    best_gain = gain;
                    best_com = com;
                }
            }

            sigma[best_com] += ki;
            if best_com != cur {
                node2com[u] = best_com;
                moved = true;
            }
        }

        if !moved {
            break;
        }
    }

    node2com
}

// ============================================================================
// Phase 2: contraction
// ============================================================================

/// Contract communities into super-nodes. Returns the contracted graph and
/// the dense relabeling (community label → new node index), assigned in
/// order of each community's smallest member.
fn contract(level: &LevelGraph, node2com: &[usize]) -> (LevelGraph, Vec<usize>) {
    let mut relabel = vec![usize::MAX; level.n];
    let mut next = 0usize;
    for &com in node2com.iter() {
        if relabel[com] == usize::MAX {
            relabel[com] = next;
            next += 1;
        }
    }
    let k = next;

    let mut merged: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut self_loops = vec![0.0; k];
    for &(u, v, w) in &level.edges {
        let cu = relabel[node2com[u]];
        let cv = relabel[node2com[v]];
        if cu == cv {
            self_loops[cu] += w;
        } else {
            *merged.entry((cu.min(cv), cu.max(cv))).or_default() += w;
        }
    }
    for (u, &w) in level.self_loops.iter().enumerate() {
        if w != 0.0 {
            self_loops[relabel[node2com[u]]] += w;
        }
    }

    let edges = merged.into_iter().map(|((u, v), w)| (u, v, w)).collect();
    (
        LevelGraph {
            n: k,
            edges,
            self_loops,
        },
        relabel,
    )
}

// ============================================================================
// Modularity
// ============================================================================

/// Q = Σ_c [ w_in(c)/m − resolution · (σ(c)/2m)² ] over the level-0 graph.
fn partition_modularity(
    edges: &[(usize, usize, f64)],
    strengths: &[f64],
    partition: &[usize],
    m: f64,
    resolution: f64,
) -> f64 {
    if m == 0.0 {
        return 0.0;
    }

    let mut w_in: HashMap<usize, f64> = HashMap::new();
    for &(u, v, w) in edges {
        if partition[u] == partition[v] {
            *w_in.entry(partition[u]).or_default() += w;
        }
    }

    let mut sigma: HashMap<usize, f64> = HashMap::new();
    for (i, &ki) in strengths.iter().enumerate() {
        *sigma.entry(partition[i]).or_default() += ki;
    }

    let m2 = 2.0 * m;
    sigma
        .iter()
        .map(|(com, &s)| {
            let internal = w_in.get(com).copied().unwrap_or(0.0);
            internal / m - resolution * (s / m2) * (s / m2)
        })
        .sum()
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

    /// Two complete K`size` cliques joined by a single bridge edge.
    fn make_two_cliques(size: i64) -> TeachingNetwork {
        let mut edges = Vec::new();
        for base in [0, size] {
            for i in base..base + size {
                for j in (i + 1)..base + size {
                    edges.push((i + 1, j + 1, 1.0));
                }
            }
        }
        edges.push((1, size + 1, 1.0));
        let nodes: Vec<i64> = (1..=2 * size).collect();
        make_network(&nodes, &edges)
    }

    fn community(p: &CommunityPartition, id: i64) -> u32 {
        p.assignments[&NodeId::Faculty(id)]
    }

    #[test]
    fn test_empty_graph_empty_partition() {
        let net = TeachingNetwork::new(ViewKind::Faculty);
        let p = detect_communities(&net, 1.0);
        assert!(p.assignments.is_empty());
        assert_eq!(p.community_count, 0);
        assert_eq!(p.modularity, 0.0);
    }

    #[test]
    fn test_edgeless_graph_all_singletons() {
        let net = make_network(&[5, 2, 9, 7], &[]);
        let p = detect_communities(&net, 1.0);
        assert_eq!(p.community_count, 4);
        // Dense ids in ascending node-id order
        assert_eq!(community(&p, 2), 0);
        assert_eq!(community(&p, 5), 1);
        assert_eq!(community(&p, 7), 2);
        assert_eq!(community(&p, 9), 3);
    }

    #[test]
    fn test_single_node_is_community_zero() {
        let net = make_network(&[42], &[]);
        let p = detect_communities(&net, 1.0);
        assert_eq!(p.community_count, 1);
        assert_eq!(community(&p, 42), 0);
    }

    #[test]
    fn test_two_cliques_detects_two_communities() {
        let net = make_two_cliques(4);
        let p = detect_communities(&net, 1.0);

        assert_eq!(p.assignments.len(), 8);
        assert_eq!(p.community_count, 2);
        assert!(p.modularity > 0.0);

        let a = community(&p, 1);
        for id in 2..=4 {
            assert_eq!(community(&p, id), a);
        }
        let b = community(&p, 5);
        for id in 6..=8 {
            assert_eq!(community(&p, id), b);
        }
        assert_ne!(a, b);
        // Community holding the lowest node id gets id 0
        assert_eq!(a, 0);
        assert_eq!(b, 1);
    }

    #[test]
    fn test_complete_graph_single_community() {
        let mut edges = Vec::new();
        for i in 1..=5i64 {
            for j in (i + 1)..=5 {
                edges.push((i, j, 1.0));
            }
        }
        let net = make_network(&[1, 2, 3, 4, 5], &edges);
        let p = detect_communities(&net, 1.0);
        assert_eq!(p.community_count, 1);
        assert!(p.assignments.values().all(|&c| c == 0));
    }

    #[test]
    fn test_barbell_modularity_value() {
        // Two triangles joined by one edge; the triangle partition scores
        // Q = 2·(3/7 − (7/14)²) = 5/14
        let net = make_network(
            &[1, 2, 3, 4, 5, 6],
            &[
                (1, 2, 1.0),
                (1, 3, 1.0),
                (2, 3, 1.0),
                (4, 5, 1.0),
                (4, 6, 1.0),
                (5, 6, 1.0),
                (3, 4, 1.0),
            ],
        );
        let p = detect_communities(&net, 1.0);
        assert_eq!(p.community_count, 2);
        assert_eq!(community(&p, 1), community(&p, 2));
        assert_eq!(community(&p, 1), community(&p, 3));
        assert_eq!(community(&p, 4), community(&p, 5));
        assert!((p.modularity - 5.0 / 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_gain_prefers_lower_id_pairing() {
        // 4-cycle 1-2-3-4-1: node 1 can pair with 2 or 4 at identical gain.
        // The lower pairing wins, giving {1,2} and {3,4}.
        let net = make_network(
            &[1, 2, 3, 4],
            &[(1, 2, 1.0), (2, 3, 1.0), (3, 4, 1.0), (1, 4, 1.0)],
        );
        let p = detect_communities(&net, 1.0);
        assert_eq!(p.community_count, 2);
        assert_eq!(community(&p, 1), 0);
        assert_eq!(community(&p, 2), 0);
        assert_eq!(community(&p, 3), 1);
        assert_eq!(community(&p, 4), 1);
    }

    #[test]
    fn test_weights_bind_communities() {
        // Heavy pairs bridged by a light edge split along the weights
        let net = make_network(
            &[1, 2, 3, 4],
            &[(1, 2, 10.0), (3, 4, 10.0), (2, 3, 1.0)],
        );
        let p = detect_communities(&net, 1.0);
        assert_eq!(p.community_count, 2);
        assert_eq!(community(&p, 1), community(&p, 2));
        assert_eq!(community(&p, 3), community(&p, 4));
        assert_ne!(community(&p, 1), community(&p, 3));
    }

    #[test]
    fn test_repeated_runs_identical() {
        let net = make_two_cliques(3);
        let a = detect_communities(&net, 1.0);
        let b = detect_communities(&net, 1.0);
        assert_eq!(a.assignments, b.assignments);
        assert_eq!(a.community_count, b.community_count);
        assert!((a.modularity - b.modularity).abs() < f64::EPSILON);
    }

    #[test]
    fn test_community_ids_dense_from_zero() {
        let net = make_two_cliques(4);
        let p = detect_communities(&net, 1.0);
        let mut seen: Vec<u32> = p.assignments.values().copied().collect();
        seen.sort_unstable();
        seen.dedup();
        let expected: Vec<u32> = (0..p.community_count as u32).collect();
        assert_eq!(seen, expected);
    }
}
