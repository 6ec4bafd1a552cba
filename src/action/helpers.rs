//! Helper rules orbiting the action shapes
//!
//! Complementary rolls, retry frustration, splitting a turn across
//! several actions, and restating a steep difficulty as a threshold.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::dice::roll::Difficulty;

use crate::action::outcome::ActionOutcome;

/// Difficulty relief earned by a complementary roll feeding another
/// action: -1 per success past the first, capped at -3.
///
/// A single success helps nobody.
pub fn complementary_modifier(outcome: &ActionOutcome) -> i32 {
    match outcome {
        ActionOutcome::Success(net) if *net >= 2 => -((net - 1).min(3)),
        _ => 0,
    }
}

/// Caller-side tally of failed attempts at conceptually the same task.
///
/// Each prior plain failure adds +1 difficulty on the retry; a genuinely
/// different approach resets the count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryTracker {
    failures: u32,
}

impl RetryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Note an attempt's outcome; only plain failures frustrate
    pub fn record(&mut self, outcome: &ActionOutcome) {
        if matches!(outcome, ActionOutcome::Failure) {
            self.failures += 1;
        }
    }

    /// A materially different tactic wipes the slate
    pub fn fresh_approach(&mut self) {
        self.failures = 0;
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    /// Difficulty for the next attempt; the ±3 adjustment cap applies
    pub fn difficulty_for_retry(&self, base: Difficulty) -> Difficulty {
        base.adjusted(self.failures as i32)
    }
}

/// Dice available to a turn split across several actions: the LOWEST of
/// the candidate pools, divided among the actions however the caller
/// likes.
pub fn multiple_action_pool(pools: &[i32]) -> Result<i32> {
    let mut lowest = i32::MAX;
    for &pool in pools {
        if pool < 0 {
            return Err(EngineError::InvalidPool(pool));
        }
        lowest = lowest.min(pool);
    }
    if pools.is_empty() {
        return Ok(0);
    }
    Ok(lowest)
}

/// Check a proposed division of the shared pool among the actions
pub fn validate_pool_split(shared_pool: i32, split: &[i32]) -> Result<()> {
    let mut total = 0i32;
    for &part in split {
        if part < 0 {
            return Err(EngineError::InvalidPool(part));
        }
        total += part;
    }
    if total > shared_pool {
        return Err(EngineError::InvalidPool(shared_pool - total));
    }
    Ok(())
}

/// Restate a difficulty past the die cap as a capped difficulty plus a
/// success requirement: difficulty 10 becomes difficulty 9 demanding two
/// successes, 11 demands three, and so on.
pub fn trade_difficulty_for_requirement(raw_difficulty: i32) -> Result<(Difficulty, u32)> {
    if raw_difficulty < Difficulty::MIN as i32 {
        return Err(EngineError::InvalidDifficulty(raw_difficulty));
    }
    let cap = (Difficulty::MAX - 1) as i32;
    if raw_difficulty <= cap {
        return Ok((Difficulty::new(raw_difficulty)?, 1));
    }
    let required = 1 + (raw_difficulty - cap) as u32;
    Ok((Difficulty::new(cap)?, required))
}
