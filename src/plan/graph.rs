//! Dispatch graph: node/edge arena, identity registry and incoming index
//!
//! Nodes are looked up by identity key before allocation, which is how
//! disjoint branch arms converge on a shared continuation. Edges may be
//! recorded before their destination node exists (the textual order of
//! branch arms does not match graph dependency order); such edges are
//! parked in the incoming index and patched when the destination key is
//! registered.

use std::collections::HashMap;

use crate::models::condition::Condition;
use crate::models::edge::{EdgeId, PlanEdge};
use crate::models::node::{NodeId, NodeKind, PlanNode};

#[derive(Debug, Clone, Default)]
pub struct DispatchGraph {
    /// Insertion-ordered node arena
    nodes: Vec<PlanNode>,
    /// Edge arena; an edge id is its position here
    edges: Vec<PlanEdge>,
    /// Identity key to node id (content-addressed dedup registry)
    registry: HashMap<String, NodeId>,
    /// Identity key to the edges targeting that key, pending or patched
    incoming: HashMap<String, Vec<EdgeId>>,
    /// Node id to arena position. Ids carry a free-action offset, so they
    /// are not arena positions themselves.
    index: HashMap<NodeId, usize>,
    /// Base for the next allocated node id
    id_base: usize,
    /// Ids allocated since the base was last set
    allocated: usize,
}

impl DispatchGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the id base for a parse pass. Node ids created afterwards start
    /// at `free_action_id` and increment from there, so they cannot
    /// collide with ids assigned by a previous pass.
    pub fn set_id_base(&mut self, free_action_id: usize) {
        self.id_base = free_action_id;
        self.allocated = 0;
    }

    /// The id the next created node will receive
    pub fn next_id(&self) -> NodeId {
        self.id_base + self.allocated
    }

    pub fn lookup(&self, key: &str) -> Option<NodeId> {
        self.registry.get(key).copied()
    }

    /// Create a node for `key`, register it, and patch any edges already
    /// recorded against that key.
    pub fn add_node(
        &mut self,
        key: &str,
        name: String,
        arguments: Vec<String>,
        kind: NodeKind,
    ) -> NodeId {
        let id = self.next_id();
        self.allocated += 1;
        self.index.insert(id, self.nodes.len());
        self.nodes.push(PlanNode {
            id,
            name,
            arguments,
            kind,
            outgoing: Vec::new(),
        });
        self.registry.insert(key.to_string(), id);

        // patch forward references now that the destination exists
        if let Some(edge_ids) = self.incoming.get(key) {
            for &edge_id in edge_ids {
                if self.edges[edge_id].target.is_none() {
                    self.edges[edge_id].target = Some(id);
                }
            }
        }

        id
    }

    /// Record an edge from `source` to the node registered under
    /// `target_key`, deferring resolution if that key is not registered
    /// yet.
    pub fn connect(
        &mut self,
        source: NodeId,
        target_key: &str,
        condition: Option<Condition>,
    ) -> EdgeId {
        let id = self.edges.len();
        let target = self.lookup(target_key);
        self.edges.push(PlanEdge {
            id,
            source,
            target,
            condition,
        });
        self.incoming
            .entry(target_key.to_string())
            .or_default()
            .push(id);
        if let Some(&position) = self.index.get(&source) {
            self.nodes[position].outgoing.push(id);
        }
        id
    }

    /// Reorder a branch node's outgoing edges so the then-arm edge comes
    /// first, giving any downstream dispatcher a stable evaluation order
    /// regardless of textual interleaving.
    pub fn order_branch_edges(&mut self, branch: NodeId, then_condition: &Condition) {
        if let Some(&position) = self.index.get(&branch) {
            let edges = &self.edges;
            self.nodes[position].outgoing.sort_by_key(|&edge_id| {
                match edges[edge_id].condition.as_ref() {
                    Some(condition) if condition == then_condition => 0,
                    _ => 1,
                }
            });
        }
    }

    pub fn node(&self, id: NodeId) -> Option<&PlanNode> {
        self.index.get(&id).map(|&position| &self.nodes[position])
    }

    pub fn edge(&self, id: EdgeId) -> Option<&PlanEdge> {
        self.edges.get(id)
    }

    /// All nodes in creation order
    pub fn nodes(&self) -> &[PlanNode] {
        &self.nodes
    }

    /// All edges in creation order
    pub fn edges(&self) -> &[PlanEdge] {
        &self.edges
    }

    /// Edges recorded against an identity key, pending or patched
    pub fn incoming(&self, key: &str) -> &[EdgeId] {
        self.incoming.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes of a given kind
    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|node| node.kind == kind).count()
    }

    /// Drop every node, edge and index entry
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.registry.clear();
        self.incoming.clear();
        self.index.clear();
        self.id_base = 0;
        self.allocated = 0;
    }
}
