//! Shared fixtures for plan compilation integration tests

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

use weft::environment::PlanningEnvironment;

pub const DOMAIN: &str = r#"
types: [robot, waypoint]
objects:
  kenny: robot
  wp0: waypoint
  wp1: waypoint
  wp2: waypoint
predicates:
  robot_at: [robot, waypoint]
  door_open: [waypoint]
actions:
  goto_waypoint: [robot, waypoint, waypoint]
  open_door: [robot, waypoint]
  localise: [robot]
"#;

/// A branching plan whose arms re-converge on a shared tail action
pub const BRANCHING_PLAN: &str = "\
goto_waypoint kenny wp0 wp1
branch-start door_open wp1
open_door kenny wp1
goto_waypoint kenny wp1 wp2
branch-else
localise kenny
goto_waypoint kenny wp1 wp2
branch-end
";

pub fn test_environment() -> PlanningEnvironment {
    PlanningEnvironment::from_yaml(DOMAIN).expect("domain fixture should be valid")
}

pub fn write_fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write fixture");
    path
}
