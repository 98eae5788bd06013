//! Filter derivation and knowledge-store degradation behavior

use tempfile::TempDir;

use weft::knowledge::KnowledgeClient;
use weft::models::filter::NotificationKind;
use weft::plan::{ContingentPlanParser, PlanError, PlanParser};

use crate::helpers::{test_environment, write_fixture};

const TWO_BRANCH_PLAN: &str = "\
branch-start door_open wp1
open_door kenny wp1
branch-end
branch-start not door_open wp1
localise kenny
branch-end
";

#[test]
fn test_filter_deduplicates_predicates_across_branches() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let plan = write_fixture(&dir, "plan.txt", TWO_BRANCH_PLAN);
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    parser.prepare_plan(&plan, &environment, 0).unwrap();
    parser.generate_filter().unwrap();

    let filter = parser.filter().expect("filter should be derived");
    // both branches test the same grounded predicate; it is watched once
    assert_eq!(filter.entries.len(), 1);
    assert_eq!(filter.entries[0].predicate, "door_open");
    assert_eq!(filter.entries[0].arguments, vec!["wp1"]);
    assert_eq!(filter.entries[0].notification, NotificationKind::Known);
}

#[test]
fn test_unreachable_knowledge_store_degrades_not_fails() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let plan = write_fixture(&dir, "plan.txt", TWO_BRANCH_PLAN);
    let environment = test_environment();

    // nothing listens here; the request fails fast
    let client = KnowledgeClient::new("http://127.0.0.1:9").expect("client should build");
    let mut parser = ContingentPlanParser::with_knowledge(client);

    let delivered = parser
        .produce_esterel(&plan, &environment, 0)
        .expect("parse must still succeed");

    assert!(!delivered, "filter delivery should have failed");
    // the graph stays valid and dispatchable
    assert!(!parser.graph().is_empty());
    assert!(parser.filter().is_some());
}

#[test]
fn test_generate_filter_reports_store_failure() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let plan = write_fixture(&dir, "plan.txt", TWO_BRANCH_PLAN);
    let environment = test_environment();

    let client = KnowledgeClient::new("http://127.0.0.1:9").expect("client should build");
    let mut parser = ContingentPlanParser::with_knowledge(client);
    parser.prepare_plan(&plan, &environment, 0).unwrap();

    let err = parser.generate_filter().unwrap_err();
    assert!(matches!(err, PlanError::KnowledgeStore { .. }));
}

#[test]
fn test_requested_notification_kind_flows_into_entries() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let plan = write_fixture(&dir, "plan.txt", TWO_BRANCH_PLAN);
    let environment = test_environment();

    let mut parser = ContingentPlanParser::new();
    parser.set_notification(NotificationKind::Changed);
    parser.prepare_plan(&plan, &environment, 0).unwrap();
    parser.generate_filter().unwrap();

    let filter = parser.filter().unwrap();
    assert!(filter
        .entries
        .iter()
        .all(|entry| entry.notification == NotificationKind::Changed));
}
