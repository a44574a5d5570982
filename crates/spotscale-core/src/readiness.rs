//! Aggregate readiness over a group's instances
//!
//! A group is ready for scaling when every reported instance is running.
//! State vocabularies differ per provider, so the comparison is
//! case-insensitive against the one value they share; every non-running
//! state (pending, terminating, stopped, ...) counts the same: not ready.

use crate::provider::NodeStatus;

/// The state value all providers converge on for a healthy instance.
const RUNNING_STATE: &str = "running";

/// Readiness verdict for a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessReport {
    pub count: i64,
    pub ready: bool,
}

/// Fold per-instance state into a single verdict.
///
/// An empty instance list is ready with count 0: a group with nothing in it
/// has nothing blocking a scaling action.
pub fn aggregate(nodes: &[NodeStatus]) -> ReadinessReport {
    ReadinessReport {
        count: nodes.len() as i64,
        ready: nodes
            .iter()
            .all(|node| node.raw_state.eq_ignore_ascii_case(RUNNING_STATE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, state: &str) -> NodeStatus {
        NodeStatus {
            id: id.to_string(),
            raw_state: state.to_string(),
        }
    }

    #[test]
    fn empty_group_is_ready_with_count_zero() {
        let report = aggregate(&[]);
        assert_eq!(
            report,
            ReadinessReport {
                count: 0,
                ready: true
            }
        );
    }

    #[test]
    fn running_is_matched_case_insensitively() {
        for state in ["running", "Running", "RUNNING"] {
            let report = aggregate(&[node("i-1", state)]);
            assert!(report.ready, "state {state:?} should be ready");
            assert_eq!(report.count, 1);
        }
    }

    #[test]
    fn any_non_running_instance_fails_the_group() {
        for state in ["pending", "terminating", "stopped", "STOPPING", ""] {
            let nodes = [node("i-1", "running"), node("i-2", state), node("i-3", "RUNNING")];
            let report = aggregate(&nodes);
            assert!(!report.ready, "state {state:?} should not be ready");
            assert_eq!(report.count, 3);
        }
    }
}
