//! Cross-department teaching detection.
//!
//! Scans the bipartite view for faculty whose offerings span at least two
//! departments. Teaching confined to one department is excluded outright,
//! not ranked low.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::network::builder::NetworkBuilder;
use crate::network::error::NetworkError;
use crate::network::models::{NodeId, TeachingNetwork, ViewKind};
use crate::records::Window;

/// One faculty member teaching across departments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterdisciplinaryFaculty {
    pub faculty_id: i64,
    pub display_name: String,
    pub department_codes: BTreeSet<String>,
    pub department_count: usize,
    /// Distinct offerings taught (bipartite degree)
    pub course_count: usize,
}

/// Find faculty teaching in two or more departments.
///
/// Results are sorted by department count descending, then course count
/// descending, then faculty id ascending. When no graph is supplied, a
/// bipartite view over all years is built from the record source.
pub fn identify_interdisciplinary(
    builder: &NetworkBuilder,
    graph: Option<&TeachingNetwork>,
) -> Result<Vec<InterdisciplinaryFaculty>, NetworkError> {
    let found = match graph {
        Some(net) => scan(net),
        None => {
            let built = builder.build(ViewKind::Bipartite, Window::unbounded())?;
            scan(&built.network)
        }
    };
    tracing::info!("Found {} faculty with interdisciplinary teaching", found.len());
    Ok(found)
}

fn scan(net: &TeachingNetwork) -> Vec<InterdisciplinaryFaculty> {
    let mut found: Vec<InterdisciplinaryFaculty> = net
        .graph
        .node_indices()
        .filter_map(|idx| {
            let node = &net.graph[idx];
            let NodeId::Faculty(faculty_id) = node.id else {
                return None;
            };
            if node.departments.len() < 2 {
                return None;
            }
            let course_count = net
                .graph
                .neighbors(idx)
                .filter(|&n| net.graph[n].id.is_course())
                .count();
            Some(InterdisciplinaryFaculty {
                faculty_id,
                display_name: node.name.clone(),
                department_codes: node.departments.clone(),
                department_count: node.departments.len(),
                course_count,
            })
        })
        .collect();

    found.sort_by(|a, b| {
        b.department_count
            .cmp(&a.department_count)
            .then(b.course_count.cmp(&a.course_count))
            .then(a.faculty_id.cmp(&b.faculty_id))
    });
    found
}

// ============================================================================
// Tests
// ============================================================================
