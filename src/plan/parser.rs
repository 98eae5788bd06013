//! The contract shared by planner back-ends
//!
//! A parser owns the graph it produces. `reset` is the boundary between
//! unrelated plans; `prepare_plan` may be called repeatedly to accumulate
//! parse passes with non-overlapping id ranges into one graph.

use std::path::Path;

use crate::environment::PlanningEnvironment;

use super::error::PlanError;

pub trait PlanParser {
    /// Discard all graph and filter state, returning the parser to the
    /// state of a freshly-constructed instance. Must be called before
    /// re-parsing an unrelated plan; skipping it leaves the previous
    /// plan's nodes in the graph.
    fn reset(&mut self);

    /// Read plan text from `path` and build it into the graph. On failure
    /// the previously-committed graph is left untouched; no partial graph
    /// is ever exposed.
    fn prepare_plan(
        &mut self,
        path: &Path,
        environment: &PlanningEnvironment,
        free_action_id: usize,
    ) -> Result<(), PlanError>;

    /// Derive the knowledge-store filter for every branch condition in
    /// the graph and push it to the configured collaborator, batched.
    fn generate_filter(&mut self) -> Result<(), PlanError>;

    /// Full pipeline: parse, then derive and push filters.
    ///
    /// Returns `Ok(true)` when both steps succeed and `Ok(false)` when
    /// the graph is valid but the knowledge store was unavailable; in the
    /// latter case the graph is dispatchable but branch conditions will
    /// never be resolved at runtime, and the caller decides whether to
    /// tolerate that.
    fn produce_esterel(
        &mut self,
        path: &Path,
        environment: &PlanningEnvironment,
        free_action_id: usize,
    ) -> Result<bool, PlanError> {
        self.prepare_plan(path, environment, free_action_id)?;
        match self.generate_filter() {
            Ok(()) => Ok(true),
            Err(PlanError::KnowledgeStore { reason }) => {
                tracing::warn!(reason = %reason, "filter step failed; graph remains dispatchable");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }
}
