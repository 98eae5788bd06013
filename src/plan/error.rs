//! Structured parse failures
//!
//! Parse-time variants are fatal to the current parse: the builder aborts
//! immediately and the previously-committed graph stays untouched. A
//! silently-incomplete contingent plan could make the dispatcher execute
//! the wrong action under a real branch outcome, so there is no
//! best-effort mode.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlanError {
    /// An action, predicate or object name not declared in the environment
    #[error("line {line}: unknown symbol `{symbol}`")]
    UnknownSymbol { line: usize, symbol: String },

    /// A branch-else or branch-end without an open branch-start, or a
    /// branch-start left open at end of input
    #[error("line {line}: unbalanced branch: {token}")]
    UnbalancedBranch { line: usize, token: String },

    /// A line whose token structure cannot be interpreted
    #[error("line {line}: malformed line ({reason}): {}", .tokens.join(" "))]
    MalformedLine {
        line: usize,
        tokens: Vec<String>,
        reason: String,
    },

    /// The filter request could not be delivered. The graph remains valid
    /// and dispatchable, but branch conditions will never be resolved.
    #[error("knowledge store unavailable: {reason}")]
    KnowledgeStore { reason: String },

    /// The plan file could not be read
    #[error("failed to read plan file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_identify_line_and_tokens() {
        let err = PlanError::UnknownSymbol {
            line: 7,
            symbol: "teleport".to_string(),
        };
        assert_eq!(err.to_string(), "line 7: unknown symbol `teleport`");

        let err = PlanError::MalformedLine {
            line: 2,
            tokens: vec!["branch-start".to_string()],
            reason: "branch-start requires a condition".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("line 2"));
        assert!(msg.contains("branch-start"));
    }
}
