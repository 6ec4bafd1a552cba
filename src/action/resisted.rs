//! Resisted actions and sustained contests
//!
//! Both sides roll; the resister's net successes subtract from the
//! actor's. Subtraction happens strictly AFTER each side's own botch
//! determination, so a botched resister hands their deficit to the actor.

use serde::{Deserialize, Serialize};

use crate::core::config::RuleVariant;
use crate::core::error::{EngineError, Result};
use crate::dice::adjudicate::{adjudicate, adjudicate_with_floor, AdjudicatedResult};
use crate::dice::roll::{roll_pool, Difficulty, RollResult, RollRules};
use crate::dice::roller::DiceRoller;

use crate::action::outcome::ActionOutcome;
use crate::action::simple::SimpleOptions;

/// One side of a resisted roll: pool, difficulty, and roll options
#[derive(Debug, Clone, Copy)]
pub struct SidePool {
    pub pool: i32,
    pub difficulty: Difficulty,
    pub opts: SimpleOptions,
}

impl SidePool {
    pub fn new(pool: i32, difficulty: Difficulty) -> Self {
        Self {
            pool,
            difficulty,
            opts: SimpleOptions::default(),
        }
    }

    fn adjudicated(
        &self,
        roller: &mut dyn DiceRoller,
        variant: &RuleVariant,
    ) -> Result<(RollResult, AdjudicatedResult)> {
        let rules = RollRules::with_variant(self.opts.specialty, variant);
        let roll = roll_pool(roller, self.pool, self.difficulty, rules)?;
        let threshold = self.opts.required.saturating_sub(1) as i32;
        let adj = if self.opts.willpower {
            adjudicate_with_floor(&roll, threshold, 1)?
        } else {
            adjudicate(&roll, threshold)?
        };
        Ok((roll, adj))
    }
}

/// Full record of a resisted exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResistedResolution {
    /// The actor's outcome after the resister's subtraction
    pub outcome: ActionOutcome,
    /// Actor successes surviving the subtraction, floored at zero
    pub margin: i32,
    pub actor_roll: RollResult,
    pub resister_roll: RollResult,
    pub actor: AdjudicatedResult,
    pub resister: AdjudicatedResult,
}

/// Resolve a resisted action: actor first, then resister, then the
/// subtraction.
///
/// Each side adjudicates independently and may independently botch. An
/// actor botch is reported as the actor's outcome regardless of margin.
pub fn resolve_resisted(
    roller: &mut dyn DiceRoller,
    actor: SidePool,
    resister: SidePool,
    variant: &RuleVariant,
) -> Result<ResistedResolution> {
    let (actor_roll, actor_adj) = actor.adjudicated(roller, variant)?;
    let (resister_roll, resister_adj) = resister.adjudicated(roller, variant)?;

    let margin = (actor_adj.net_successes - resister_adj.net_successes).max(0);

    let outcome = if actor_adj.botch {
        ActionOutcome::Botch(actor_adj.botch_severity)
    } else if margin > 0 {
        ActionOutcome::Success(margin)
    } else {
        ActionOutcome::Failure
    };

    Ok(ResistedResolution {
        outcome,
        margin,
        actor_roll,
        resister_roll,
        actor: actor_adj,
        resister: resister_adj,
    })
}

/// Who a sustained contest belongs to at any moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContestStatus {
    InProgress,
    /// Running total crossed the initiator's positive target
    InitiatorWon,
    /// Running total crossed the opponent's negative target
    OpponentWon,
    /// Round limit exhausted with no winner, or both sides botched
    Stalemate,
    /// One side botched; the contest collapses in the other's favor
    Botched {
        initiator_botched: bool,
        severity: u32,
    },
}

impl ContestStatus {
    pub fn is_concluded(&self) -> bool {
        !matches!(self, ContestStatus::InProgress)
    }
}

/// Signed tug-of-war accumulator for an extended, resisted contest
///
/// Each round both sides roll; the signed margin moves the running total
/// toward the initiator's positive target or the opponent's negative one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestState {
    initiator_target: i32,
    opponent_target: i32,
    total: i32,
    rounds_used: u32,
    round_limit: Option<u32>,
    status: ContestStatus,
}

impl ContestState {
    /// Symmetric targets: first to push the total past `target` in their
    /// direction wins
    pub fn new(target: u32, round_limit: Option<u32>) -> Result<Self> {
        Self::with_targets(target as i32, -(target as i32), round_limit)
    }

    /// Asymmetric targets, e.g. +5 for the initiator, -3 for a weaker
    /// opponent position
    pub fn with_targets(
        initiator_target: i32,
        opponent_target: i32,
        round_limit: Option<u32>,
    ) -> Result<Self> {
        if initiator_target <= 0 || opponent_target >= 0 {
            return Err(EngineError::MisconfiguredExtended(
                "contest targets must straddle zero".to_string(),
            ));
        }
        if round_limit == Some(0) {
            return Err(EngineError::MisconfiguredExtended(
                "round limit of zero leaves no rounds to roll".to_string(),
            ));
        }
        Ok(Self {
            initiator_target,
            opponent_target,
            total: 0,
            rounds_used: 0,
            round_limit,
            status: ContestStatus::InProgress,
        })
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    pub fn status(&self) -> ContestStatus {
        self.status
    }

    /// Fold one round's two adjudicated rolls into the running total
    pub fn record_round(
        &mut self,
        initiator: &AdjudicatedResult,
        opponent: &AdjudicatedResult,
    ) -> ContestStatus {
        if self.status.is_concluded() {
            return self.status;
        }

        self.rounds_used += 1;

        match (initiator.botch, opponent.botch) {
            (true, true) => {
                // Mutual collapse; nobody takes the prize
                self.status = ContestStatus::Stalemate;
                return self.status;
            }
            (true, false) => {
                self.status = ContestStatus::Botched {
                    initiator_botched: true,
                    severity: initiator.botch_severity,
                };
                return self.status;
            }
            (false, true) => {
                self.status = ContestStatus::Botched {
                    initiator_botched: false,
                    severity: opponent.botch_severity,
                };
                return self.status;
            }
            (false, false) => {}
        }

        self.total += initiator.net_successes - opponent.net_successes;

        if self.total >= self.initiator_target {
            self.status = ContestStatus::InitiatorWon;
        } else if self.total <= self.opponent_target {
            self.status = ContestStatus::OpponentWon;
        } else if let Some(limit) = self.round_limit {
            if self.rounds_used >= limit {
                self.status = ContestStatus::Stalemate;
            }
        }
        self.status
    }
}

/// Roll both sides and record one contest round
pub fn resolve_contest_round(
    roller: &mut dyn DiceRoller,
    initiator: SidePool,
    opponent: SidePool,
    variant: &RuleVariant,
    state: &mut ContestState,
) -> Result<(ContestStatus, RollResult, RollResult)> {
    let (initiator_roll, initiator_adj) = initiator.adjudicated(roller, variant)?;
    let (opponent_roll, opponent_adj) = opponent.adjudicated(roller, variant)?;
    let status = state.record_round(&initiator_adj, &opponent_adj);
    Ok((status, initiator_roll, opponent_roll))
}
