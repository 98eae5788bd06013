//! Grounded predicate conditions guarding branch edges

use serde::{Deserialize, Serialize};

/// A predicate with its argument bindings resolved against the
/// planning environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundedPredicate {
    pub name: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

impl GroundedPredicate {
    pub fn new(name: String, arguments: Vec<String>) -> Self {
        Self { name, arguments }
    }

    /// Stable identity string used for filter deduplication
    pub fn key(&self) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.arguments.join(" "))
        }
    }
}

impl std::fmt::Display for GroundedPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A polarity-qualified grounded predicate.
///
/// The two edges leaving a branch node carry a condition and its mutual
/// negation, so at most one of them is taken per branch outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub predicate: GroundedPredicate,
    #[serde(default)]
    pub negated: bool,
}

impl Condition {
    pub fn new(predicate: GroundedPredicate, negated: bool) -> Self {
        Self { predicate, negated }
    }

    /// The mutual negation of this condition
    pub fn negation(&self) -> Self {
        Self {
            predicate: self.predicate.clone(),
            negated: !self.negated,
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "(not ({}))", self.predicate)
        } else {
            write!(f, "({})", self.predicate)
        }
    }
}
