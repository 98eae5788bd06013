//! Graph edge types for the dispatch graph

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::node::NodeId;

/// Identifier of an edge; edges are owned by the graph arena.
pub type EdgeId = usize;

/// A directed edge connecting a source node to a destination node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEdge {
    pub id: EdgeId,
    pub source: NodeId,
    /// Destination node. `None` while the destination key is still
    /// pending; patched by the graph when the node is registered.
    pub target: Option<NodeId>,
    /// Guard on edges leaving a branch node; `None` means unconditional
    #[serde(default)]
    pub condition: Option<Condition>,
}
