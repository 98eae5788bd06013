//! Grounding of action signatures and branch conditions
//!
//! Resolves the symbolic tokens of a plan line against the declared
//! predicates, actions and objects of the planning environment. Any name
//! the environment does not declare is fatal: skipping it silently would
//! produce a graph that dispatches the wrong action.

use crate::environment::PlanningEnvironment;
use crate::models::condition::{Condition, GroundedPredicate};

use super::error::PlanError;
use super::tokenizer::{normalize, strip_parens};

/// A grounded action signature resolved from an action line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSignature {
    /// Normalized action name
    pub name: String,
    /// Grounded arguments, original casing preserved
    pub arguments: Vec<String>,
}

impl ActionSignature {
    /// Identity fragment used in node registry keys
    pub fn key(&self) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.arguments.join(" "))
        }
    }
}

/// Why grounding failed. The builder attaches the line number and the
/// offending tokens when converting to a [`PlanError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroundingError {
    UnknownSymbol(String),
    Malformed(String),
}

impl GroundingError {
    pub(crate) fn at(self, line: usize, tokens: &[String]) -> PlanError {
        match self {
            GroundingError::UnknownSymbol(symbol) => PlanError::UnknownSymbol { line, symbol },
            GroundingError::Malformed(reason) => PlanError::MalformedLine {
                line,
                tokens: tokens.to_vec(),
                reason,
            },
        }
    }
}

/// Ground an action line (`name arg1 arg2 ...`) against the environment.
pub fn ground_action(
    tokens: &[String],
    environment: &PlanningEnvironment,
) -> Result<ActionSignature, GroundingError> {
    let Some(first) = tokens.first() else {
        return Err(GroundingError::Malformed("empty action line".to_string()));
    };
    let name = normalize(strip_parens(first));
    let params = environment
        .action(&name)
        .ok_or_else(|| GroundingError::UnknownSymbol(name.clone()))?;
    let arguments = ground_arguments(&tokens[1..], params, environment)?;
    Ok(ActionSignature { name, arguments })
}

/// Ground a branch condition (`[not] predicate arg1 ...`).
///
/// Exactly one polarity-qualified grounded predicate is supported; richer
/// boolean combinations are rejected rather than guessed at.
pub fn ground_condition(
    tokens: &[String],
    environment: &PlanningEnvironment,
) -> Result<Condition, GroundingError> {
    let mut stripped: Vec<String> = tokens
        .iter()
        .map(|token| strip_parens(token).to_string())
        .filter(|token| !token.is_empty())
        .collect();

    if stripped.is_empty() {
        return Err(GroundingError::Malformed("empty condition".to_string()));
    }

    let negated = normalize(&stripped[0]) == "not";
    if negated {
        stripped.remove(0);
        if stripped.is_empty() {
            return Err(GroundingError::Malformed(
                "nothing follows `not`".to_string(),
            ));
        }
    }

    let name = normalize(&stripped[0]);
    let params = environment
        .predicate(&name)
        .ok_or_else(|| GroundingError::UnknownSymbol(name.clone()))?;
    let arguments = ground_arguments(&stripped[1..], params, environment)?;

    Ok(Condition::new(
        GroundedPredicate::new(name, arguments),
        negated,
    ))
}

/// Match literal argument tokens positionally against declared parameter
/// types.
fn ground_arguments(
    tokens: &[String],
    params: &[String],
    environment: &PlanningEnvironment,
) -> Result<Vec<String>, GroundingError> {
    if tokens.len() != params.len() {
        return Err(GroundingError::Malformed(format!(
            "expected {} arguments, got {}",
            params.len(),
            tokens.len()
        )));
    }

    let mut arguments = Vec::with_capacity(tokens.len());
    for (token, expected) in tokens.iter().zip(params) {
        let object = strip_parens(token);
        let declared = environment
            .object_type(object)
            .ok_or_else(|| GroundingError::UnknownSymbol(object.to_string()))?;
        if declared != expected {
            return Err(GroundingError::Malformed(format!(
                "argument `{object}` has type {declared}, expected {expected}"
            )));
        }
        arguments.push(object.to_string());
    }

    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_env() -> PlanningEnvironment {
        PlanningEnvironment::from_yaml(
            r#"
types: [robot, waypoint]
objects:
  kenny: robot
  wp0: waypoint
  wp1: waypoint
predicates:
  robot_at: [robot, waypoint]
  door_open: [waypoint]
actions:
  goto_waypoint: [robot, waypoint, waypoint]
"#,
        )
        .unwrap()
    }

    fn tokens(line: &str) -> Vec<String> {
        line.split(' ').map(String::from).collect()
    }

    #[test]
    fn test_ground_action() {
        let sig = ground_action(&tokens("GOTO_WAYPOINT kenny wp0 wp1"), &test_env()).unwrap();
        assert_eq!(sig.name, "goto_waypoint");
        assert_eq!(sig.arguments, vec!["kenny", "wp0", "wp1"]);
        assert_eq!(sig.key(), "goto_waypoint kenny wp0 wp1");
    }

    #[test]
    fn test_ground_action_unknown_name() {
        let err = ground_action(&tokens("teleport kenny wp0"), &test_env()).unwrap_err();
        assert_eq!(err, GroundingError::UnknownSymbol("teleport".to_string()));
    }

    #[test]
    fn test_ground_action_arity_mismatch() {
        let err = ground_action(&tokens("goto_waypoint kenny wp0"), &test_env()).unwrap_err();
        assert_eq!(
            err,
            GroundingError::Malformed("expected 3 arguments, got 2".to_string())
        );
    }

    #[test]
    fn test_ground_action_type_mismatch() {
        let err = ground_action(&tokens("goto_waypoint wp0 wp0 wp1"), &test_env()).unwrap_err();
        assert!(matches!(err, GroundingError::Malformed(_)));
    }

    #[test]
    fn test_ground_condition_positive() {
        let cond = ground_condition(&tokens("door_open wp1"), &test_env()).unwrap();
        assert!(!cond.negated);
        assert_eq!(cond.predicate.name, "door_open");
        assert_eq!(cond.predicate.arguments, vec!["wp1"]);
    }

    #[test]
    fn test_ground_condition_negated() {
        let cond = ground_condition(&tokens("not robot_at kenny wp0"), &test_env()).unwrap();
        assert!(cond.negated);
        assert_eq!(cond.predicate.name, "robot_at");
    }

    #[test]
    fn test_ground_condition_with_parens() {
        let cond = ground_condition(&tokens("(not (door_open wp1))"), &test_env()).unwrap();
        assert!(cond.negated);
        assert_eq!(cond.predicate.key(), "door_open wp1");
    }

    #[test]
    fn test_ground_condition_unknown_predicate() {
        let err = ground_condition(&tokens("door_locked wp1"), &test_env()).unwrap_err();
        assert_eq!(err, GroundingError::UnknownSymbol("door_locked".to_string()));
    }

    #[test]
    fn test_ground_condition_unknown_object() {
        let err = ground_condition(&tokens("door_open wp9"), &test_env()).unwrap_err();
        assert_eq!(err, GroundingError::UnknownSymbol("wp9".to_string()));
    }

    #[test]
    fn test_ground_condition_bare_not() {
        let err = ground_condition(&tokens("not"), &test_env()).unwrap_err();
        assert!(matches!(err, GroundingError::Malformed(_)));
    }
}
