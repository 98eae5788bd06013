//! Line-by-line construction of the dispatch graph
//!
//! One parser instance owns the node/edge arena and the id counter for
//! the lifetime of a parse. Branch arms are parsed in textual order; a
//! branch-context stack tracks the decision point each arm hangs off, and
//! the registry merges arms that converge on the same grounded action.

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;
use uuid::Uuid;

use crate::environment::PlanningEnvironment;
use crate::knowledge::KnowledgeClient;
use crate::models::condition::Condition;
use crate::models::filter::{FilterEntry, FilterRequest, NotificationKind};
use crate::models::node::{NodeId, NodeKind};

use super::conditions;
use super::error::PlanError;
use super::graph::DispatchGraph;
use super::parser::PlanParser;
use super::tokenizer;

/// Parser for the branching plans a contingent planner writes out.
///
/// The graph accumulates across `prepare_plan` calls so a later pass can
/// converge on nodes from an earlier one; call [`PlanParser::reset`]
/// between unrelated plans.
pub struct ContingentPlanParser {
    graph: DispatchGraph,
    filter: Option<FilterRequest>,
    notification: NotificationKind,
    knowledge: Option<KnowledgeClient>,
    plan_id: Uuid,
}

impl ContingentPlanParser {
    pub fn new() -> Self {
        Self {
            graph: DispatchGraph::new(),
            filter: None,
            notification: NotificationKind::default(),
            knowledge: None,
            plan_id: Uuid::new_v4(),
        }
    }

    /// Parser that pushes generated filters to a knowledge store
    pub fn with_knowledge(knowledge: KnowledgeClient) -> Self {
        Self {
            knowledge: Some(knowledge),
            ..Self::new()
        }
    }

    /// Notification kind requested for generated filter entries
    pub fn set_notification(&mut self, notification: NotificationKind) {
        self.notification = notification;
    }

    pub fn graph(&self) -> &DispatchGraph {
        &self.graph
    }

    /// The filter request derived by the last `generate_filter` call
    pub fn filter(&self) -> Option<&FilterRequest> {
        self.filter.as_ref()
    }

    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    /// Parse plan text into the graph (for testing without the file
    /// system). Runs against a copy and commits only on success, so a
    /// failed parse never exposes a partial graph.
    pub fn prepare_plan_content(
        &mut self,
        content: &str,
        environment: &PlanningEnvironment,
        free_action_id: usize,
    ) -> Result<(), PlanError> {
        let mut scratch = self.graph.clone();
        scratch.set_id_base(free_action_id);

        let mut assembler = Assembler {
            graph: &mut scratch,
            environment,
            stack: Vec::new(),
            pred: None,
        };
        assembler.run(content)?;

        self.graph = scratch;
        Ok(())
    }
}

impl Default for ContingentPlanParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanParser for ContingentPlanParser {
    fn reset(&mut self) {
        self.graph.clear();
        self.filter = None;
        self.plan_id = Uuid::new_v4();
    }

    fn prepare_plan(
        &mut self,
        path: &Path,
        environment: &PlanningEnvironment,
        free_action_id: usize,
    ) -> Result<(), PlanError> {
        let content = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), free_action_id, "parsing plan");
        self.prepare_plan_content(&content, environment, free_action_id)
    }

    fn generate_filter(&mut self) -> Result<(), PlanError> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for edge in self.graph.edges() {
            if let Some(condition) = &edge.condition {
                let predicate = &condition.predicate;
                if seen.insert(predicate.key()) {
                    entries.push(FilterEntry::new(predicate, self.notification));
                }
            }
        }

        let request = FilterRequest::new(self.plan_id, entries);
        debug!(entries = request.entries.len(), "derived filter request");

        let result = match &self.knowledge {
            Some(client) if !request.is_empty() => client.update_filter(&request),
            _ => Ok(()),
        };
        self.filter = Some(request);
        result
    }
}

/// One open branch construct during parsing
struct BranchFrame {
    branch_node: NodeId,
    /// Line of the branch-start, reported if the construct is left open
    line: usize,
    condition: Condition,
    /// Guard waiting to be attached to the first edge leaving the branch
    /// node in the arm currently being parsed
    pending: Option<Condition>,
    /// Unconsumed then-arm guard saved when branch-else arrives before
    /// any then-arm action consumed it
    then_leftover: Option<Condition>,
    in_else: bool,
    /// Last node of the then arm, recorded at branch-else
    then_tail: Option<NodeId>,
}

/// Mutable parse state threaded through one `prepare_plan` pass. The
/// arena and id counter live in the graph, so nested branches share them
/// without any global state.
struct Assembler<'a> {
    graph: &'a mut DispatchGraph,
    environment: &'a PlanningEnvironment,
    stack: Vec<BranchFrame>,
    /// Current predecessor: the node the next directive attaches to
    pred: Option<NodeId>,
}

impl Assembler<'_> {
    fn run(&mut self, content: &str) -> Result<(), PlanError> {
        for (index, raw) in content.lines().enumerate() {
            let line = index + 1;
            if raw.trim_start().starts_with(';') {
                continue;
            }
            let tokens = tokenizer::split(raw, ' ');
            if tokens.is_empty() {
                continue;
            }

            match tokenizer::normalize(&tokens[0]).as_str() {
                "branch-start" => self.branch_start(line, &tokens)?,
                "branch-else" => self.branch_else(line)?,
                "branch-end" => self.branch_end(line, &tokens)?,
                _ => self.action(line, &tokens)?,
            }
        }

        if let Some(frame) = self.stack.last() {
            return Err(PlanError::UnbalancedBranch {
                line: frame.line,
                token: "branch-start left open".to_string(),
            });
        }

        self.finish();
        Ok(())
    }

    /// Identity-key context: ids of the enclosing open branches. Both
    /// arms of one construct share it (so convergent tails merge), while
    /// the same action under a sibling branch or at another nesting level
    /// keys differently and stays a separate node.
    fn scope(&self) -> String {
        self.stack
            .iter()
            .map(|frame| format!("b{}/", frame.branch_node))
            .collect()
    }

    fn action(&mut self, line: usize, tokens: &[String]) -> Result<(), PlanError> {
        let signature = conditions::ground_action(tokens, self.environment)
            .map_err(|err| err.at(line, tokens))?;
        let key = format!("{}{}", self.scope(), signature.key());

        let node = match self.graph.lookup(&key) {
            Some(existing) => {
                debug!(line, key = %key, id = existing, "reusing node");
                existing
            }
            None => self
                .graph
                .add_node(&key, signature.name, signature.arguments, NodeKind::Action),
        };

        self.attach(node, &key);
        Ok(())
    }

    fn branch_start(&mut self, line: usize, tokens: &[String]) -> Result<(), PlanError> {
        if tokens.len() < 2 {
            return Err(PlanError::MalformedLine {
                line,
                tokens: tokens.to_vec(),
                reason: "branch-start requires a condition".to_string(),
            });
        }
        let condition = conditions::ground_condition(&tokens[1..], self.environment)
            .map_err(|err| err.at(line, tokens))?;

        // branch nodes are decision points, never deduplicated; the key
        // is synthetic and unique
        let key = format!("{}branch#{}", self.scope(), self.graph.next_id());
        let node = self.graph.add_node(
            &key,
            condition.predicate.name.clone(),
            condition.predicate.arguments.clone(),
            NodeKind::Branch,
        );
        self.attach(node, &key);

        debug!(line, condition = %condition, "opened branch");
        self.stack.push(BranchFrame {
            branch_node: node,
            line,
            pending: Some(condition.clone()),
            then_leftover: None,
            condition,
            in_else: false,
            then_tail: None,
        });
        Ok(())
    }

    fn branch_else(&mut self, line: usize) -> Result<(), PlanError> {
        let pred = self.pred;
        let frame = match self.stack.last_mut() {
            Some(frame) if !frame.in_else => frame,
            Some(_) => {
                return Err(PlanError::UnbalancedBranch {
                    line,
                    token: "duplicate branch-else".to_string(),
                })
            }
            None => {
                return Err(PlanError::UnbalancedBranch {
                    line,
                    token: "branch-else".to_string(),
                })
            }
        };

        frame.in_else = true;
        frame.then_tail = pred;
        frame.then_leftover = frame.pending.take();
        frame.pending = Some(frame.condition.negation());
        self.pred = Some(frame.branch_node);
        Ok(())
    }

    fn branch_end(&mut self, line: usize, tokens: &[String]) -> Result<(), PlanError> {
        let frame = self.stack.pop().ok_or(PlanError::UnbalancedBranch {
            line,
            token: "branch-end".to_string(),
        })?;
        let branch = frame.branch_node;

        let (then_tail, then_leftover, else_tail, else_leftover) = if frame.in_else {
            (
                frame.then_tail.unwrap_or(branch),
                frame.then_leftover,
                self.pred.unwrap_or(branch),
                frame.pending,
            )
        } else {
            // no else arm: the negated outcome jumps straight past the
            // construct
            (
                self.pred.unwrap_or(branch),
                frame.pending,
                branch,
                Some(frame.condition.negation()),
            )
        };

        if then_tail == branch && else_tail == branch {
            return Err(PlanError::MalformedLine {
                line,
                tokens: tokens.to_vec(),
                reason: "branch construct has no actions".to_string(),
            });
        }

        if then_tail == else_tail {
            // both arms converged on the same node by key; it is the
            // convergence point
            self.pred = Some(then_tail);
        } else {
            let key = format!("{}merge#{}", self.scope(), self.graph.next_id());
            let node = self
                .graph
                .add_node(&key, "merge".to_string(), Vec::new(), NodeKind::Merge);

            // an arm that is the branch node itself never consumed its
            // guard; it travels on the edge into the merge point
            let condition = (then_tail == branch).then_some(then_leftover).flatten();
            self.graph.connect(then_tail, &key, condition);
            let condition = (else_tail == branch).then_some(else_leftover).flatten();
            self.graph.connect(else_tail, &key, condition);

            self.pred = Some(node);
        }

        self.graph.order_branch_edges(branch, &frame.condition);
        debug!(line, branch, "closed branch");
        Ok(())
    }

    /// Wire the current predecessor to `node` and advance.
    fn attach(&mut self, node: NodeId, key: &str) {
        if let Some(pred) = self.pred {
            let condition = self.arm_condition(pred);
            self.graph.connect(pred, key, condition);
        }
        self.pred = Some(node);
    }

    /// Take the pending arm guard if `pred` is the branch node owning the
    /// arm currently being parsed.
    fn arm_condition(&mut self, pred: NodeId) -> Option<Condition> {
        match self.stack.last_mut() {
            Some(frame) if frame.branch_node == pred => frame.pending.take(),
            _ => None,
        }
    }

    /// Connect the final predecessor to the terminal end marker.
    fn finish(&mut self) {
        if let Some(pred) = self.pred {
            let key = format!("end#{}", self.graph.next_id());
            self.graph
                .add_node(&key, "end".to_string(), Vec::new(), NodeKind::End);
            self.graph.connect(pred, &key, None);
        }
    }
}
