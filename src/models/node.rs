//! Graph node types for the dispatch graph

use serde::{Deserialize, Serialize};

use super::edge::EdgeId;

/// Identifier of a node, unique for the lifetime of one parser.
///
/// Ids are assigned monotonically starting at the `free_action_id` base of
/// the parse pass that created the node, and are never reused while the
/// plan is live.
pub type NodeId = usize;

/// What a node represents in the control-flow graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A grounded action instance to dispatch
    Action,
    /// A decision point guarded by an observed condition
    Branch,
    /// An explicit convergence point for arms that end on different nodes
    Merge,
    /// Terminal marker; carries no outgoing edges
    End,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Action => write!(f, "action"),
            NodeKind::Branch => write!(f, "branch"),
            NodeKind::Merge => write!(f, "merge"),
            NodeKind::End => write!(f, "end"),
        }
    }
}

/// A node in the dispatch graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanNode {
    pub id: NodeId,
    /// Normalized action name; for branch nodes, the tested predicate name
    pub name: String,
    /// Grounded arguments, original casing preserved
    #[serde(default)]
    pub arguments: Vec<String>,
    pub kind: NodeKind,
    /// Outgoing edge ids in dispatch evaluation order.
    /// On a branch node the then-arm edge precedes the else-arm edge.
    #[serde(default)]
    pub outgoing: Vec<EdgeId>,
}

impl PlanNode {
    /// Human-readable action signature, e.g. `goto_waypoint kenny wp0 wp1`
    pub fn signature(&self) -> String {
        if self.arguments.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.arguments.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_with_arguments() {
        let node = PlanNode {
            id: 3,
            name: "goto_waypoint".to_string(),
            arguments: vec!["kenny".to_string(), "wp0".to_string()],
            kind: NodeKind::Action,
            outgoing: Vec::new(),
        };
        assert_eq!(node.signature(), "goto_waypoint kenny wp0");
    }

    #[test]
    fn test_signature_without_arguments() {
        let node = PlanNode {
            id: 0,
            name: "end".to_string(),
            arguments: Vec::new(),
            kind: NodeKind::End,
            outgoing: Vec::new(),
        };
        assert_eq!(node.signature(), "end");
    }
}
