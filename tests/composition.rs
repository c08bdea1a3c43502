// Composition tests — the full chain from records to a written edge list.
//
//   CSV -> filters -> aggregate -> vectors -> dedup -> similarity -> edges
//
// Filesystem side effects go to temporary directories.

use chrono::{TimeZone, Utc};

use subsim::graph::edges::{read_edge_list, write_edge_list};
use subsim::ingest::filter::remove_exact_duplicates;
use subsim::ingest::records::{load_posts, PostRecord};
use subsim::output::report::write_run_report;
use subsim::pipeline::{run, EngineParams};

fn posts(user: &str, sub: &str, n: usize) -> Vec<PostRecord> {
    (0..n)
        .map(|i| {
            PostRecord::new(
                user,
                sub,
                Utc.timestamp_opt(1_690_000_000 + i as i64 * 3600, 0).unwrap(),
            )
        })
        .collect()
}

// ============================================================
// Scenarios
// ============================================================

#[test]
fn three_user_scenario_writes_no_edges() {
    // A: 3 posts in X. B: 3 in X, 3 in Y. C: same as A.
    let mut records = posts("A", "X", 3);
    records.extend(posts("B", "X", 3));
    records.extend(posts("B", "Y", 3));
    records.extend(posts("C", "X", 3));

    let output = run(&records, &EngineParams::default()).unwrap();
    assert_eq!(output.report.users_vectorized, 3);
    assert_eq!(output.report.users_after_dedup, 2);
    assert_eq!(output.report.duplicates_removed(), 1);
    assert!(output.graph.edges.is_empty());

    let stats = output.report.similarity.unwrap();
    assert_eq!(stats.pairs, 1);
    assert!((stats.mean - 0.7071).abs() < 1e-3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edges.txt");
    write_edge_list(&output.graph.edges, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn all_identical_users_produce_no_edges() {
    let mut records = Vec::new();
    for user in ["u1", "u2", "u3", "u4"] {
        records.extend(posts(user, "X", 2));
        records.extend(posts(user, "Y", 1));
    }
    let output = run(&records, &EngineParams::default()).unwrap();
    assert_eq!(output.report.users_after_dedup, 1);
    assert!(output.graph.edges.is_empty());
    assert!(output.report.similarity.is_none());
}

#[test]
fn proportional_counts_deduplicate() {
    let mut records = posts("heavy", "X", 9);
    records.extend(posts("light", "X", 3));
    let output = run(&records, &EngineParams::default()).unwrap();
    assert_eq!(output.report.users_after_dedup, 1);
}

#[test]
fn everyone_a_lurker_is_not_an_error() {
    let mut records = posts("a", "X", 1);
    records.extend(posts("b", "Y", 2));
    let output = run(&records, &EngineParams::default()).unwrap();
    assert_eq!(output.report.lurkers_dropped, 2);
    assert_eq!(output.report.users_vectorized, 0);
    assert!(output.graph.edges.is_empty());
}

#[test]
fn invalid_params_are_rejected_before_work() {
    let params = EngineParams {
        duplicate_threshold: 2.0,
        ..EngineParams::default()
    };
    assert!(run(&posts("a", "X", 5), &params).is_err());
}

// ============================================================
// Chain: CSV -> pipeline -> edge list -> report
// ============================================================

#[test]
fn csv_to_edge_list_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("posts.csv");

    let mut csv = String::from("author_name,subreddit,post_created_time\n");
    let mut add = |user: &str, sub: &str, n: usize| {
        for i in 0..n {
            csv.push_str(&format!("{user},{sub},2023-05-{:02} 12:00:00\n", i + 1));
        }
    };
    // Two close gaming profiles, two close programming profiles, one mixed
    // user, one lurker and one bot-like copy of gamer1.
    add("gamer1", "games", 6);
    add("gamer1", "pcgaming", 4);
    add("gamer2", "games", 5);
    add("gamer2", "pcgaming", 4);
    add("gamer1_alt", "games", 3);
    add("gamer1_alt", "pcgaming", 2);
    add("dev1", "rust", 5);
    add("dev1", "programming", 5);
    add("dev2", "rust", 4);
    add("dev2", "programming", 5);
    add("mixed", "games", 3);
    add("mixed", "rust", 3);
    add("lurker", "rust", 2);
    // An exact duplicate row
    add("dev1", "rust", 1);
    std::fs::write(&csv_path, csv).unwrap();

    let records = remove_exact_duplicates(load_posts(&csv_path).unwrap());
    let output = run(&records, &EngineParams::default()).unwrap();

    assert_eq!(output.report.lurkers_dropped, 1);
    assert_eq!(output.report.vocabulary_size, 4);
    assert_eq!(output.report.users_vectorized, 6);
    // gamer1_alt posts in the same 3:2 shape as gamer1 and sorts after it
    assert_eq!(output.report.users_after_dedup, 5);

    let edge_path = dir.path().join("out").join("edges.txt");
    write_edge_list(&output.graph.edges, &edge_path).unwrap();
    let pairs = read_edge_list(&edge_path).unwrap();
    assert_eq!(
        pairs,
        vec![
            ("dev1".to_string(), "dev2".to_string()),
            ("gamer1".to_string(), "gamer2".to_string()),
        ]
    );

    let report_path = dir.path().join("out").join("report.json");
    write_run_report(&output.report, &report_path).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["edges"], 2);
    assert_eq!(json["params"]["lurker_threshold"], 3);
    assert!(json["similarity"]["median"].is_number());
}

#[test]
fn rerunning_overwrites_previous_edges() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edges.txt");

    let mut records = posts("a", "X", 3);
    records.extend(posts("a", "Y", 2));
    records.extend(posts("b", "X", 4));
    records.extend(posts("b", "Y", 3));

    let loose = EngineParams {
        edge_threshold: 0.5,
        ..EngineParams::default()
    };
    let output = run(&records, &loose).unwrap();
    write_edge_list(&output.graph.edges, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "a b\n");

    let strict = EngineParams {
        edge_threshold: 1.0,
        duplicate_threshold: 1.0,
        ..EngineParams::default()
    };
    let output = run(&records, &strict).unwrap();
    write_edge_list(&output.graph.edges, &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}
