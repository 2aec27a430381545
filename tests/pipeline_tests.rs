//! End-to-end pipeline tests
//!
//! Drive the full path from a facts file on disk through the record source,
//! graph views, metrics, communities, evolution, interdisciplinary scan, and
//! export, without any external services.
//! Run with: cargo test --test pipeline_tests

use std::io::Write;
use std::sync::Arc;

use coursegraph::network::{
    graph_export, AnalysisConfig, NetworkAnalyzer, NodeId, ViewKind,
};
use coursegraph::records::{
    generate_facts, JsonRecordSource, MemoryRecordSource, SampleSpec, TeachingFact, Window,
};

fn fact(dept: &str, faculty_id: i64, offering_id: i64, year: i32) -> TeachingFact {
    TeachingFact {
        department_code: dept.into(),
        faculty_id,
        faculty_name: format!("Faculty {faculty_id}"),
        course_code: format!("{dept} {offering_id}"),
        course_title: format!("Course {offering_id}"),
        offering_id,
        term: "Fall".into(),
        year,
    }
}

fn memory_analyzer(facts: Vec<TeachingFact>) -> NetworkAnalyzer {
    NetworkAnalyzer::new(
        Arc::new(MemoryRecordSource::new(facts)),
        AnalysisConfig::default(),
    )
}

#[test]
fn test_json_file_to_analysis_with_malformed_rows() {
    // Two good rows, one missing faculty_id, one missing year
    let json = r#"[
        {"department_code":"CS","faculty_id":1,"faculty_name":"Adams, Kim",
         "course_code":"CS 101","course_title":"Intro","offering_id":10,
         "term":"Fall","year":2020},
        {"department_code":"CS","faculty_id":2,"faculty_name":"Beck, Lee",
         "course_code":"CS 101","course_title":"Intro","offering_id":10,
         "term":"Fall","year":2020},
        {"department_code":"CS","faculty_id":null,"course_code":"CS 210",
         "offering_id":11,"term":"Fall","year":2020},
        {"department_code":"CS","faculty_id":3,"offering_id":12,"term":"Fall"}
    ]"#;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("facts.json");
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let analyzer = NetworkAnalyzer::new(
        Arc::new(JsonRecordSource::new(&path)),
        AnalysisConfig::default(),
    );

    let analysis = analyzer
        .analyze(ViewKind::Bipartite, Window::unbounded())
        .unwrap();

    // Malformed rows skipped with accounting, never dropped silently
    assert_eq!(analysis.skipped_facts, 2);
    // 2 faculty + 1 offering survive
    assert_eq!(analysis.network.node_count(), 3);
    assert_eq!(analysis.network.faculty_count(), 2);
    assert_eq!(analysis.network.course_count(), 1);

    let stats = analyzer.summarize(Window::unbounded()).unwrap();
    assert_eq!(stats.skipped_facts, 2);
    assert_eq!(stats.summary.faculty, 2);
}

#[test]
fn test_bipartite_node_identity_invariant() {
    // Same faculty id across years and departments maps to one node
    let analyzer = memory_analyzer(vec![
        fact("CS", 1, 10, 2019),
        fact("MATH", 1, 11, 2020),
        fact("CS", 2, 10, 2019),
        fact("CS", 2, 12, 2021),
    ]);
    let analysis = analyzer
        .analyze(ViewKind::Bipartite, Window::unbounded())
        .unwrap();

    // 2 faculty + 3 offerings
    assert_eq!(analysis.network.node_count(), 5);
    assert_eq!(analysis.network.faculty_count(), 2);
    assert_eq!(analysis.network.course_count(), 3);
}

#[test]
fn test_interdisciplinary_scenario() {
    // F1 teaches CS 101 (O1, 2020), CS 102 (O2, 2020), MATH 201 (O3, 2021)
    let analyzer = memory_analyzer(vec![
        fact("CS", 1, 1, 2020),
        fact("CS", 1, 2, 2020),
        fact("MATH", 1, 3, 2021),
    ]);
    let analysis = analyzer
        .analyze(ViewKind::Bipartite, Window::years(2020, 2021))
        .unwrap();
    let found = analyzer
        .interdisciplinary(Some(&analysis.network))
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].faculty_id, 1);
    assert_eq!(found[0].department_count, 2);
    assert_eq!(found[0].course_count, 3);
}

#[test]
fn test_projection_weights_and_symmetry() {
    // F1 and F2 share two offerings; F3 shares one with F1
    let analyzer = memory_analyzer(vec![
        fact("CS", 1, 1, 2020),
        fact("CS", 2, 1, 2020),
        fact("CS", 1, 2, 2020),
        fact("CS", 2, 2, 2020),
        fact("CS", 1, 3, 2020),
        fact("CS", 3, 3, 2020),
    ]);
    let analysis = analyzer
        .analyze(ViewKind::Faculty, Window::unbounded())
        .unwrap();
    let net = &analysis.network;

    assert_eq!(net.edge_weight(NodeId::Faculty(1), NodeId::Faculty(2)), Some(2.0));
    assert_eq!(net.edge_weight(NodeId::Faculty(2), NodeId::Faculty(1)), Some(2.0));
    assert_eq!(net.edge_weight(NodeId::Faculty(1), NodeId::Faculty(3)), Some(1.0));
    assert_eq!(net.edge_weight(NodeId::Faculty(2), NodeId::Faculty(3)), None);
}

#[test]
fn test_empty_window_flows_through_whole_pipeline() {
    let analyzer = memory_analyzer(vec![fact("CS", 1, 1, 2020)]);
    let window = Window::years(1900, 1901);

    for view in [ViewKind::Bipartite, ViewKind::Faculty, ViewKind::Course] {
        let analysis = analyzer.analyze(view, window).unwrap();
        assert_eq!(analysis.network.node_count(), 0);
        assert!(analysis.centrality.scores.is_empty());
        assert!(analysis.communities.assignments.is_empty());
        assert_eq!(analysis.communities.community_count, 0);
    }

    let rows = analyzer.evolution(&[window]).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].node_count, 0);
    assert_eq!(rows[0].community_count, 0);

    // Single-department faculty, so no interdisciplinary entries either
    let found = analyzer.interdisciplinary(None).unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_evolution_preserves_requested_window_order() {
    let analyzer = memory_analyzer(vec![
        fact("CS", 1, 1, 2018),
        fact("CS", 2, 1, 2018),
        fact("CS", 3, 2, 2022),
    ]);
    // Overlapping and non-monotonic on purpose
    let windows = [
        Window::years(2022, 2022),
        Window::years(2018, 2022),
        Window::years(2018, 2018),
    ];
    let rows = analyzer.evolution(&windows).unwrap();

    assert_eq!(rows[0].window, windows[0]);
    assert_eq!(rows[1].window, windows[1]);
    assert_eq!(rows[2].window, windows[2]);
    assert_eq!(rows[0].faculty_count, 1);
    assert_eq!(rows[1].faculty_count, 3);
    assert_eq!(rows[2].faculty_count, 2);
}

#[test]
fn test_repeated_runs_are_identical() {
    let facts: Vec<TeachingFact> = generate_facts(&SampleSpec {
        start_year: 2018,
        end_year: 2021,
        offerings_per_term: 20,
        seed: 7,
    });

    let run = || {
        let analyzer = NetworkAnalyzer::new(
            Arc::new(MemoryRecordSource::new(facts.clone())),
            AnalysisConfig::default(),
        );
        let analysis = analyzer
            .analyze(ViewKind::Faculty, Window::unbounded())
            .unwrap();
        let export = serde_json::to_string(&graph_export(&analysis.network, Window::unbounded()))
            .unwrap();
        let interdisciplinary = analyzer.interdisciplinary(None).unwrap();
        (
            analysis.centrality.scores.clone(),
            analysis.communities.assignments.clone(),
            analysis.communities.community_count,
            export,
            interdisciplinary,
        )
    };

    let (scores_a, communities_a, count_a, export_a, inter_a) = run();
    let (scores_b, communities_b, count_b, export_b, inter_b) = run();

    assert_eq!(communities_a, communities_b);
    assert_eq!(count_a, count_b);
    assert_eq!(export_a, export_b);
    assert_eq!(inter_a, inter_b);
    for (id, a) in &scores_a {
        let b = &scores_b[id];
        assert_eq!(a.degree, b.degree);
        assert_eq!(a.betweenness, b.betweenness);
        assert_eq!(a.closeness, b.closeness);
        assert_eq!(a.eigenvector, b.eigenvector);
    }
}

#[test]
fn test_sample_generator_feeds_pipeline() {
    let facts = generate_facts(&SampleSpec {
        start_year: 2020,
        end_year: 2022,
        offerings_per_term: 30,
        seed: 42,
    });
    assert!(!facts.is_empty());

    let analyzer = memory_analyzer(facts);
    let analysis = analyzer
        .analyze(ViewKind::Bipartite, Window::unbounded())
        .unwrap();

    assert!(analysis.network.faculty_count() > 0);
    assert!(analysis.network.course_count() > 0);
    assert_eq!(analysis.skipped_facts, 0);

    // Co-teaching exists in generated data, so the projection has edges
    let faculty = analyzer
        .analyze(ViewKind::Faculty, Window::unbounded())
        .unwrap();
    assert!(faculty.network.edge_count() > 0);
    assert!(faculty.communities.community_count > 0);
}

#[test]
fn test_view_kind_parse_failure_is_fatal() {
    let err = "covfefe".parse::<ViewKind>().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("covfefe"));
    assert!(message.contains("bipartite"));
}

#[test]
fn test_export_round_trip_through_file() {
    let analyzer = memory_analyzer(vec![
        fact("CS", 1, 1, 2020),
        fact("CS", 2, 1, 2020),
        fact("MATH", 1, 2, 2021),
    ]);
    let analysis = analyzer
        .analyze(ViewKind::Bipartite, Window::unbounded())
        .unwrap();
    let export = graph_export(&analysis.network, Window::unbounded());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bipartite.json");
    coursegraph::network::write_json(&export, &path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value["view"], "bipartite");
    assert_eq!(value["node_count"], 5);
    assert_eq!(value["nodes"].as_array().unwrap().len(), 5);
    assert_eq!(value["edges"].as_array().unwrap().len(), 3);
}
