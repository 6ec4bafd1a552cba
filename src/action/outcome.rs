//! Action outcomes
//!
//! Three terminal states and nothing in between: success with a margin,
//! plain failure, or botch with a severity for the caller to interpret.

use serde::{Deserialize, Serialize};

use crate::dice::adjudicate::AdjudicatedResult;
use crate::dice::roll::RollResult;

/// Final outcome of a resolved action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionOutcome {
    /// The action succeeded with this many net successes
    Success(i32),
    /// Zero net successes: the action failed, period
    Failure,
    /// Ones outnumbered raw successes: catastrophic failure
    Botch(u32),
}

impl ActionOutcome {
    pub fn from_adjudicated(adj: &AdjudicatedResult) -> Self {
        if adj.botch {
            ActionOutcome::Botch(adj.botch_severity)
        } else if adj.net_successes > 0 {
            ActionOutcome::Success(adj.net_successes)
        } else {
            ActionOutcome::Failure
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Success(_))
    }

    pub fn is_botch(&self) -> bool {
        matches!(self, ActionOutcome::Botch(_))
    }

    /// Net successes, zero for failure and botch alike
    pub fn net_successes(&self) -> i32 {
        match self {
            ActionOutcome::Success(net) => *net,
            _ => 0,
        }
    }
}

/// One resolved roll: the outcome plus the raw dice for display
///
/// `roll` is `None` when no dice were touched (reflexive actions, trivial
/// shortcuts, automatic hits).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: ActionOutcome,
    pub roll: Option<RollResult>,
}

impl Resolution {
    pub fn automatic(net: i32) -> Self {
        Self {
            outcome: ActionOutcome::Success(net),
            roll: None,
        }
    }
}

/// Qualitative degree of a success, for callers presenting outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DegreeOfSuccess {
    Marginal,
    Moderate,
    Complete,
    Exceptional,
    Phenomenal,
}

impl DegreeOfSuccess {
    /// Map net successes to a degree; `None` below one net success
    pub fn from_net(net: i32) -> Option<Self> {
        match net {
            i32::MIN..=0 => None,
            1 => Some(DegreeOfSuccess::Marginal),
            2 => Some(DegreeOfSuccess::Moderate),
            3 => Some(DegreeOfSuccess::Complete),
            4 => Some(DegreeOfSuccess::Exceptional),
            _ => Some(DegreeOfSuccess::Phenomenal),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adj(net: i32, botch: bool, severity: u32) -> AdjudicatedResult {
        AdjudicatedResult {
            net_successes: net,
            botch,
            botch_severity: severity,
        }
    }

    #[test]
    fn test_outcome_from_adjudicated() {
        assert_eq!(
            ActionOutcome::from_adjudicated(&adj(2, false, 0)),
            ActionOutcome::Success(2)
        );
        assert_eq!(
            ActionOutcome::from_adjudicated(&adj(0, false, 0)),
            ActionOutcome::Failure
        );
        assert_eq!(
            ActionOutcome::from_adjudicated(&adj(-2, true, 2)),
            ActionOutcome::Botch(2)
        );
    }

    #[test]
    fn test_degree_ladder() {
        assert_eq!(DegreeOfSuccess::from_net(0), None);
        assert_eq!(DegreeOfSuccess::from_net(1), Some(DegreeOfSuccess::Marginal));
        assert_eq!(DegreeOfSuccess::from_net(3), Some(DegreeOfSuccess::Complete));
        assert_eq!(
            DegreeOfSuccess::from_net(5),
            Some(DegreeOfSuccess::Phenomenal)
        );
        assert_eq!(
            DegreeOfSuccess::from_net(9),
            Some(DegreeOfSuccess::Phenomenal)
        );
    }
}
