//! Planning environment: declared types, objects, predicates and actions
//!
//! Loaded from a YAML domain description and queried read-only by the
//! plan builder during grounding. Action, predicate and type names are
//! matched case-insensitively; object identifiers are case-sensitive.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Snapshot of the planning domain a plan is grounded against.
///
/// ```yaml
/// types: [robot, waypoint]
/// objects:
///   kenny: robot
/// predicates:
///   robot_at: [robot, waypoint]
/// actions:
///   goto_waypoint: [robot, waypoint, waypoint]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanningEnvironment {
    /// Declared object types
    #[serde(default)]
    pub types: Vec<String>,
    /// Grounded objects: name to type
    #[serde(default)]
    pub objects: BTreeMap<String, String>,
    /// Declared predicates: name to parameter types
    #[serde(default)]
    pub predicates: BTreeMap<String, Vec<String>>,
    /// Declared actions (operators): name to parameter types
    #[serde(default)]
    pub actions: BTreeMap<String, Vec<String>>,
}

impl PlanningEnvironment {
    /// Load and validate a domain description file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read domain file: {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid domain file: {}", path.display()))
    }

    /// Parse a domain description (for testing without the file system)
    pub fn from_yaml(content: &str) -> Result<Self> {
        let raw: Self = serde_yaml::from_str(content).context("Invalid domain YAML")?;
        let env = raw.normalized();
        let problems = env.validate();
        if !problems.is_empty() {
            bail!("Invalid domain description:\n  {}", problems.join("\n  "));
        }
        Ok(env)
    }

    /// Lowercase every name that is matched case-insensitively. Object
    /// names keep their casing; their declared types do not.
    fn normalized(self) -> Self {
        let lower_all = |v: Vec<String>| v.into_iter().map(|s| s.to_lowercase()).collect();
        Self {
            types: lower_all(self.types),
            objects: self
                .objects
                .into_iter()
                .map(|(name, ty)| (name, ty.to_lowercase()))
                .collect(),
            predicates: self
                .predicates
                .into_iter()
                .map(|(name, params)| (name.to_lowercase(), lower_all(params)))
                .collect(),
            actions: self
                .actions
                .into_iter()
                .map(|(name, params)| (name.to_lowercase(), lower_all(params)))
                .collect(),
        }
    }

    /// Collect every problem in the domain rather than stopping at the first
    fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.types.iter().any(|t| t.is_empty()) {
            problems.push("type names cannot be empty".to_string());
        }

        for (object, ty) in &self.objects {
            if object.is_empty() {
                problems.push("object names cannot be empty".to_string());
            }
            if !self.types.contains(ty) {
                problems.push(format!("object `{object}` has undeclared type `{ty}`"));
            }
        }

        for (predicate, params) in &self.predicates {
            if predicate.is_empty() {
                problems.push("predicate names cannot be empty".to_string());
            }
            for ty in params {
                if !self.types.contains(ty) {
                    problems.push(format!(
                        "predicate `{predicate}` uses undeclared parameter type `{ty}`"
                    ));
                }
            }
        }

        for (action, params) in &self.actions {
            if action.is_empty() {
                problems.push("action names cannot be empty".to_string());
            }
            for ty in params {
                if !self.types.contains(ty) {
                    problems.push(format!(
                        "action `{action}` uses undeclared parameter type `{ty}`"
                    ));
                }
            }
        }

        problems
    }

    /// Parameter types of a declared action, looked up case-insensitively
    pub fn action(&self, name: &str) -> Option<&[String]> {
        self.actions.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    /// Parameter types of a declared predicate, looked up case-insensitively
    pub fn predicate(&self, name: &str) -> Option<&[String]> {
        self.predicates.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    /// Declared type of a grounded object; object names are case-sensitive
    pub fn object_type(&self, name: &str) -> Option<&str> {
        self.objects.get(name).map(String::as_str)
    }
}
