//! Extended actions: success accumulated across rounds
//!
//! One simple resolution per round feeds an accumulator until the target
//! is met, a round botches (all progress lost, task dead), or the round
//! limit runs out. Teamwork pools several participants' rounds into the
//! same accumulator; one botch ruins the attempt for everyone.

use serde::{Deserialize, Serialize};

use crate::core::config::RuleVariant;
use crate::core::error::{EngineError, Result};
use crate::dice::adjudicate::AdjudicatedResult;
use crate::dice::adjudicate::{adjudicate, adjudicate_with_floor};
use crate::dice::roll::{roll_pool, Difficulty, RollResult, RollRules};
use crate::dice::roller::DiceRoller;

use crate::action::simple::SimpleOptions;

/// Where a multi-round task currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExtendedStatus {
    InProgress,
    /// Accumulated successes reached the target
    Succeeded,
    /// Round limit exhausted short of the target, or task abandoned
    Failed,
    /// A round botched; accumulated progress was discarded
    Botched(u32),
}

impl ExtendedStatus {
    pub fn is_concluded(&self) -> bool {
        !matches!(self, ExtendedStatus::InProgress)
    }
}

/// Mutable accumulator for one extended task
///
/// Owned by whoever tracks the task across rounds; discard it once the
/// task concludes or is abandoned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedActionState {
    required: u32,
    accumulated: i32,
    rounds_used: u32,
    round_limit: Option<u32>,
    status: ExtendedStatus,
}

impl ExtendedActionState {
    /// A task needing `required` total successes, optionally within a
    /// round limit (no limit means time is not pressing).
    pub fn new(required: u32, round_limit: Option<u32>) -> Result<Self> {
        if required == 0 {
            return Err(EngineError::MisconfiguredExtended(
                "task requires at least one success".to_string(),
            ));
        }
        if round_limit == Some(0) {
            return Err(EngineError::MisconfiguredExtended(
                "round limit of zero leaves no rounds to roll".to_string(),
            ));
        }
        Ok(Self {
            required,
            accumulated: 0,
            rounds_used: 0,
            round_limit,
            status: ExtendedStatus::InProgress,
        })
    }

    pub fn accumulated(&self) -> i32 {
        self.accumulated
    }

    pub fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    pub fn required(&self) -> u32 {
        self.required
    }

    pub fn status(&self) -> ExtendedStatus {
        self.status
    }

    /// Fold one round's adjudicated roll into the task
    pub fn record_round(&mut self, adj: &AdjudicatedResult) -> ExtendedStatus {
        self.record_team_round(std::slice::from_ref(adj))
    }

    /// Fold one round from several participants working together.
    ///
    /// Net successes sum into the shared accumulator. If ANY participant
    /// botches, the whole accumulated total is discarded and the task
    /// fails for the group.
    pub fn record_team_round(&mut self, results: &[AdjudicatedResult]) -> ExtendedStatus {
        if self.status.is_concluded() {
            return self.status;
        }

        self.rounds_used += 1;

        if let Some(worst) = results
            .iter()
            .filter(|r| r.botch)
            .max_by_key(|r| r.botch_severity)
        {
            tracing::debug!(
                "extended task botched after {} rounds, {} successes discarded",
                self.rounds_used,
                self.accumulated
            );
            self.accumulated = 0;
            self.status = ExtendedStatus::Botched(worst.botch_severity);
            return self.status;
        }

        let round_total: i32 = results.iter().map(|r| r.net_successes).sum();
        self.accumulated += round_total;

        if self.accumulated >= self.required as i32 {
            self.status = ExtendedStatus::Succeeded;
        } else if let Some(limit) = self.round_limit {
            if self.rounds_used >= limit {
                self.status = ExtendedStatus::Failed;
            }
        }
        self.status
    }

    /// Walk away from the task; progress is discarded
    pub fn abandon(&mut self) {
        if !self.status.is_concluded() {
            self.accumulated = 0;
            self.status = ExtendedStatus::Failed;
        }
    }
}

/// Roll and record one round of an extended action.
///
/// Returns the raw roll alongside the updated status so callers can show
/// the dice.
pub fn resolve_extended_round(
    roller: &mut dyn DiceRoller,
    pool: i32,
    difficulty: Difficulty,
    variant: &RuleVariant,
    opts: SimpleOptions,
    state: &mut ExtendedActionState,
) -> Result<(ExtendedStatus, RollResult)> {
    let rules = RollRules::with_variant(opts.specialty, variant);
    let roll = roll_pool(roller, pool, difficulty, rules)?;

    // Per-round rolls carry no threshold of their own; the accumulation
    // target is the only requirement. Willpower still floors the round.
    let adj = if opts.willpower {
        adjudicate_with_floor(&roll, 0, 1)?
    } else {
        adjudicate(&roll, 0)?
    };

    Ok((state.record_round(&adj), roll))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adj(net: i32) -> AdjudicatedResult {
        AdjudicatedResult {
            net_successes: net,
            botch: false,
            botch_severity: 0,
        }
    }

    fn botched(severity: u32) -> AdjudicatedResult {
        AdjudicatedResult {
            net_successes: -(severity as i32),
            botch: true,
            botch_severity: severity,
        }
    }

    #[test]
    fn test_accumulates_to_success() {
        let mut state = ExtendedActionState::new(5, None).unwrap();
        assert_eq!(state.record_round(&adj(2)), ExtendedStatus::InProgress);
        assert_eq!(state.record_round(&adj(2)), ExtendedStatus::InProgress);
        assert_eq!(state.record_round(&adj(1)), ExtendedStatus::Succeeded);
        assert_eq!(state.accumulated(), 5);
        assert_eq!(state.rounds_used(), 3);
    }

    #[test]
    fn test_botch_discards_progress() {
        // Three successes banked, then a botch: everything gone
        let mut state = ExtendedActionState::new(5, None).unwrap();
        state.record_round(&adj(2));
        state.record_round(&adj(1));
        let status = state.record_round(&botched(1));
        assert_eq!(status, ExtendedStatus::Botched(1));
        assert_eq!(state.accumulated(), 0);
    }

    #[test]
    fn test_round_limit_exhaustion_fails() {
        let mut state = ExtendedActionState::new(10, Some(2)).unwrap();
        assert_eq!(state.record_round(&adj(3)), ExtendedStatus::InProgress);
        assert_eq!(state.record_round(&adj(3)), ExtendedStatus::Failed);
        // Banked progress survives a plain failure, unlike a botch
        assert_eq!(state.accumulated(), 6);
    }

    #[test]
    fn test_success_on_last_allowed_round() {
        let mut state = ExtendedActionState::new(4, Some(2)).unwrap();
        state.record_round(&adj(2));
        assert_eq!(state.record_round(&adj(2)), ExtendedStatus::Succeeded);
    }

    #[test]
    fn test_concluded_state_ignores_further_rounds() {
        let mut state = ExtendedActionState::new(2, None).unwrap();
        state.record_round(&adj(2));
        assert_eq!(state.status(), ExtendedStatus::Succeeded);
        assert_eq!(state.record_round(&adj(3)), ExtendedStatus::Succeeded);
        assert_eq!(state.rounds_used(), 1);
    }

    #[test]
    fn test_teamwork_sums_the_round() {
        let mut state = ExtendedActionState::new(10, None).unwrap();
        state.record_team_round(&[adj(2), adj(3)]);
        assert_eq!(state.accumulated(), 5);
    }

    #[test]
    fn test_teamwork_botch_ruins_everyone() {
        let mut state = ExtendedActionState::new(10, None).unwrap();
        state.record_team_round(&[adj(2), adj(3)]);
        let status = state.record_team_round(&[adj(4), botched(2)]);
        assert_eq!(status, ExtendedStatus::Botched(2));
        assert_eq!(state.accumulated(), 0);
    }

    #[test]
    fn test_abandon_discards() {
        let mut state = ExtendedActionState::new(5, None).unwrap();
        state.record_round(&adj(3));
        state.abandon();
        assert_eq!(state.status(), ExtendedStatus::Failed);
        assert_eq!(state.accumulated(), 0);
    }

    #[test]
    fn test_zero_required_rejected() {
        assert!(matches!(
            ExtendedActionState::new(0, None),
            Err(EngineError::MisconfiguredExtended(_))
        ));
    }

    #[test]
    fn test_zero_round_limit_rejected() {
        assert!(matches!(
            ExtendedActionState::new(5, Some(0)),
            Err(EngineError::MisconfiguredExtended(_))
        ));
    }

    #[test]
    fn test_rolled_round_feeds_state() {
        use crate::dice::roller::ScriptedRoller;

        let mut state = ExtendedActionState::new(3, None).unwrap();
        let mut roller = ScriptedRoller::new(&[8, 7, 2, 9, 6, 3]);
        let (status, roll) = resolve_extended_round(
            &mut roller,
            3,
            Difficulty::STANDARD,
            &RuleVariant::classic(),
            SimpleOptions::default(),
            &mut state,
        )
        .unwrap();
        assert_eq!(status, ExtendedStatus::InProgress);
        assert_eq!(roll.successes, 2);
        let (status, _) = resolve_extended_round(
            &mut roller,
            3,
            Difficulty::STANDARD,
            &RuleVariant::classic(),
            SimpleOptions::default(),
            &mut state,
        )
        .unwrap();
        assert_eq!(status, ExtendedStatus::Succeeded);
    }
}
