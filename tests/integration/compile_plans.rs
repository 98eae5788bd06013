//! End-to-end plan compilation through the file-based parser API

use tempfile::TempDir;

use weft::models::node::NodeKind;
use weft::plan::{ContingentPlanParser, PlanError, PlanParser};

use crate::helpers::{test_environment, write_fixture, BRANCHING_PLAN};

#[test]
fn test_produce_esterel_from_file() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let plan = write_fixture(&dir, "plan.txt", BRANCHING_PLAN);
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    let delivered = parser
        .produce_esterel(&plan, &environment, 0)
        .expect("plan should compile");

    // no knowledge store configured, so both steps succeed trivially
    assert!(delivered);

    let graph = parser.graph();
    assert_eq!(graph.count_kind(NodeKind::Branch), 1);
    // the shared tail action is one node reached from both arms
    let tails = graph
        .nodes()
        .iter()
        .filter(|node| node.signature() == "goto_waypoint kenny wp1 wp2")
        .count();
    assert_eq!(tails, 1);

    let filter = parser.filter().expect("filter should be derived");
    assert_eq!(filter.entries.len(), 1);
    assert_eq!(filter.entries[0].predicate, "door_open");
}

#[test]
fn test_missing_plan_file_is_io_error() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    let err = parser
        .prepare_plan(&dir.path().join("absent.txt"), &environment, 0)
        .unwrap_err();

    assert!(matches!(err, PlanError::Io { .. }));
    assert!(parser.graph().is_empty());
}

#[test]
fn test_parse_error_reports_offending_line() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let plan = write_fixture(
        &dir,
        "bad.txt",
        "localise kenny\ngoto_waypoint kenny wp0\n",
    );
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    let err = parser.prepare_plan(&plan, &environment, 0).unwrap_err();

    match err {
        PlanError::MalformedLine { line, tokens, .. } => {
            assert_eq!(line, 2);
            assert_eq!(tokens[0], "goto_waypoint");
        }
        other => panic!("expected MalformedLine, got {other:?}"),
    }
    assert!(parser.graph().is_empty());
}

#[test]
fn test_reset_between_unrelated_plans() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let first = write_fixture(&dir, "first.txt", "open_door kenny wp1\n");
    let second = write_fixture(&dir, "second.txt", "localise kenny\n");
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    parser.prepare_plan(&first, &environment, 0).unwrap();
    parser.reset();
    parser.prepare_plan(&second, &environment, 0).unwrap();

    let graph = parser.graph();
    assert!(graph.nodes().iter().all(|node| node.name != "open_door"));
    assert_eq!(graph.count_kind(NodeKind::Action), 1);
    assert_eq!(graph.nodes()[0].id, 0);
}

#[test]
fn test_multi_pass_parse_keeps_ids_disjoint() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let primary = write_fixture(&dir, "primary.txt", "goto_waypoint kenny wp0 wp1\n");
    let secondary = write_fixture(&dir, "secondary.txt", "open_door kenny wp1\n");
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    parser.prepare_plan(&primary, &environment, 0).unwrap();
    let free = parser.graph().nodes().iter().map(|n| n.id).max().unwrap() + 1;
    parser.prepare_plan(&secondary, &environment, free).unwrap();

    let mut ids: Vec<usize> = parser.graph().nodes().iter().map(|n| n.id).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total, "node ids must never collide across passes");
}
