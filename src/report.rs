//! Text report assembly.
//!
//! Renders the analysis results into the plain-text report surfaces. The
//! analysis core only produces mappings and sequences; everything
//! presentation-shaped lives here.

use std::collections::BTreeMap;

use crate::network::{InterdisciplinaryFaculty, NetworkAnalysis, SourceStats, ViewKind, WindowStats};

const HEAVY_RULE_WIDTH: usize = 80;
const STATS_RULE_WIDTH: usize = 60;

fn heavy_rule() -> String {
    "=".repeat(HEAVY_RULE_WIDTH)
}

fn light_rule() -> String {
    "-".repeat(HEAVY_RULE_WIDTH)
}

/// Comprehensive report over one analyzed view: source statistics, network
/// shape, centrality rankings, community structure, and interdisciplinary
/// teaching.
pub fn analysis_report(
    source: &SourceStats,
    analysis: &NetworkAnalysis,
    interdisciplinary: &[InterdisciplinaryFaculty],
    top_n: usize,
) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy_rule());
    lines.push("COURSE AND FACULTY NETWORK ANALYSIS REPORT".to_string());
    lines.push(heavy_rule());
    lines.push(String::new());

    push_source_section(&mut lines, source);
    push_network_section(&mut lines, analysis);
    push_centrality_section(&mut lines, analysis, top_n);
    push_community_section(&mut lines, analysis);
    push_interdisciplinary_section(&mut lines, interdisciplinary, top_n);

    lines.join("\n")
}

fn push_source_section(lines: &mut Vec<String>, source: &SourceStats) {
    lines.push("SOURCE STATISTICS".to_string());
    lines.push(light_rule());
    lines.push(format!("Total Departments: {}", source.summary.departments));
    lines.push(format!("Total Faculty: {}", source.summary.faculty));
    lines.push(format!("Total Courses: {}", source.summary.courses));
    lines.push(format!("Total Course Offerings: {}", source.summary.offerings));
    lines.push(format!(
        "Total Teaching Assignments: {}",
        source.summary.assignments
    ));
    match source.summary.year_range {
        Some((lo, hi)) => lines.push(format!("Year Range: {lo} - {hi}")),
        None => lines.push("Year Range: n/a".to_string()),
    }
    if source.skipped_facts > 0 {
        lines.push(format!(
            "Malformed rows skipped: {}",
            source.skipped_facts
        ));
    }
    lines.push(String::new());
}

fn push_network_section(lines: &mut Vec<String>, analysis: &NetworkAnalysis) {
    let net = &analysis.network;
    lines.push(format!(
        "NETWORK STATISTICS ({} view, window {})",
        net.view, analysis.window
    ));
    lines.push(light_rule());
    lines.push(format!("Total Nodes: {}", net.node_count()));
    lines.push(format!("Total Edges: {}", net.edge_count()));
    lines.push(format!("Network Density: {:.4}", net.density()));
    lines.push(format!("Average Degree: {:.2}", net.mean_degree()));
    if net.view == ViewKind::Bipartite {
        lines.push(format!("Faculty Nodes: {}", net.faculty_count()));
        lines.push(format!("Offering Nodes: {}", net.course_count()));
    }
    if analysis.skipped_facts > 0 {
        lines.push(format!(
            "Malformed rows skipped: {}",
            analysis.skipped_facts
        ));
    }
    lines.push(String::new());
}

fn push_centrality_section(lines: &mut Vec<String>, analysis: &NetworkAnalysis, top_n: usize) {
    lines.push("CENTRALITY".to_string());
    lines.push(light_rule());

    let measures: [(&str, fn(&crate::network::CentralityScores) -> f64); 4] = [
        ("Degree", |s| s.degree),
        ("Betweenness", |s| s.betweenness),
        ("Closeness", |s| s.closeness),
        ("Eigenvector", |s| s.eigenvector),
    ];

    for (label, measure) in measures {
        let top = analysis.top_nodes(top_n, measure);
        if top.is_empty() {
            continue;
        }
        lines.push(format!("Top {} by {} Centrality:", top.len(), label));
        for (i, (node, score)) in top.iter().enumerate() {
            lines.push(format!("{}. {}: {:.4}", i + 1, node.name, score));
        }
        lines.push(String::new());
    }

    if analysis.centrality.eigenvector_degraded {
        lines.push("(eigenvector centrality did not converge; scores zeroed)".to_string());
        lines.push(String::new());
    }
}

fn push_community_section(lines: &mut Vec<String>, analysis: &NetworkAnalysis) {
    lines.push("COMMUNITY STRUCTURE".to_string());
    lines.push(light_rule());
    lines.push(format!(
        "Communities: {}",
        analysis.communities.community_count
    ));
    lines.push(format!("Modularity: {:.4}", analysis.communities.modularity));

    let mut sizes: BTreeMap<u32, usize> = BTreeMap::new();
    for &community in analysis.communities.assignments.values() {
        *sizes.entry(community).or_default() += 1;
    }
    let mut ranked: Vec<(u32, usize)> = sizes.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (community, size) in ranked.iter().take(5) {
        lines.push(format!("Community {community}: {size} members"));
    }
    lines.push(String::new());
}

fn push_interdisciplinary_section(
    lines: &mut Vec<String>,
    interdisciplinary: &[InterdisciplinaryFaculty],
    top_n: usize,
) {
    lines.push("INTERDISCIPLINARY TEACHING".to_string());
    lines.push(light_rule());
    lines.push(format!(
        "Faculty teaching in multiple departments: {}",
        interdisciplinary.len()
    ));
    if interdisciplinary.is_empty() {
        lines.push(String::new());
        return;
    }

    lines.push(String::new());
    lines.push(format!(
        "Top {} most interdisciplinary faculty:",
        interdisciplinary.len().min(top_n)
    ));
    for (i, faculty) in interdisciplinary.iter().take(top_n).enumerate() {
        lines.push(format!(
            "{}. {}: {} departments, {} courses",
            i + 1,
            faculty.display_name,
            faculty.department_count,
            faculty.course_count
        ));
        let departments: Vec<&str> = faculty
            .department_codes
            .iter()
            .map(String::as_str)
            .collect();
        lines.push(format!("   Departments: {}", departments.join(", ")));
    }
    lines.push(String::new());
}

/// Per-window evolution report.
pub fn evolution_report(rows: &[WindowStats]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push(heavy_rule());
    lines.push("TEMPORAL EVOLUTION".to_string());
    lines.push(heavy_rule());

    for row in rows {
        lines.push(String::new());
        lines.push(format!("Period {}:", row.window));
        lines.push(format!(
            "  Faculty: {}, Offerings: {}",
            row.faculty_count, row.offering_count
        ));
        lines.push(format!(
            "  Nodes: {}, Edges: {}",
            row.node_count, row.edge_count
        ));
        lines.push(format!(
            "  Density: {:.4}, Mean Degree: {:.2}",
            row.density, row.mean_degree
        ));
        lines.push(format!(
            "  Collaboration Edges: {}, Communities: {}",
            row.collaboration_edge_count, row.community_count
        ));
        if !row.top_faculty.is_empty() {
            let names: Vec<String> = row
                .top_faculty
                .iter()
                .take(3)
                .map(|f| format!("{} ({:.3})", f.display_name, f.degree))
                .collect();
            lines.push(format!("  Top Faculty: {}", names.join(", ")));
        }
        if row.skipped_facts > 0 {
            lines.push(format!("  Malformed rows skipped: {}", row.skipped_facts));
        }
    }
    lines.push(String::new());

    lines.join("\n")
}

/// Standalone interdisciplinary listing.
pub fn interdisciplinary_report(
    interdisciplinary: &[InterdisciplinaryFaculty],
    top_n: usize,
) -> String {
    let mut lines: Vec<String> = Vec::new();
    lines.push(heavy_rule());
    lines.push("INTERDISCIPLINARY TEACHING".to_string());
    lines.push(heavy_rule());
    lines.push(String::new());
    push_interdisciplinary_section(&mut lines, interdisciplinary, top_n);
    lines.join("\n")
}

/// Compact source statistics block.
pub fn stats_report(source: &SourceStats) -> String {
    let rule = "=".repeat(STATS_RULE_WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push(rule.clone());
    lines.push("SOURCE STATISTICS".to_string());
    lines.push(rule.clone());
    lines.push(format!("Departments:          {}", source.summary.departments));
    lines.push(format!("Faculty:              {}", source.summary.faculty));
    lines.push(format!("Courses:              {}", source.summary.courses));
    lines.push(format!("Course Offerings:     {}", source.summary.offerings));
    lines.push(format!("Teaching Assignments: {}", source.summary.assignments));
    match source.summary.year_range {
        Some((lo, hi)) => lines.push(format!("Year Range:           {lo} - {hi}")),
        None => lines.push("Year Range:           n/a".to_string()),
    }
    if source.skipped_facts > 0 {
        lines.push(format!("Malformed Rows:       {}", source.skipped_facts));
    }
    lines.push(rule);

    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================
