//! Threshold and botch adjudication
//!
//! The order here is a rule of the game, not an implementation choice:
//! botch is determined from the RAW roll, and threshold subtraction only
//! shapes the success count used for the outcome. The two steps are
//! separate functions so the order stays enforceable and testable.

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::dice::roll::RollResult;

/// Net outcome of a roll after threshold subtraction and 1s-cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjudicatedResult {
    /// Negative only on a botch, where it carries the severity deficit
    pub net_successes: i32,
    pub botch: bool,
    pub botch_severity: u32,
}

impl AdjudicatedResult {
    /// Successes usable for accumulation or subtraction by a non-botched
    /// side; a botched side contributes its negative deficit as-is
    pub fn signed_net(&self) -> i32 {
        self.net_successes
    }
}

/// Step one: the threshold claims its share of rolled successes.
///
/// Applied before ones cancel anything, and never to the counts the botch
/// check reads.
pub fn apply_threshold(successes: u32, threshold: u32) -> u32 {
    successes.saturating_sub(threshold)
}

/// Step two: botch check on the raw, pre-threshold counts.
///
/// Returns the flag and the severity (how far the ones outran the
/// successes).
pub fn determine_botch(successes: u32, ones: u32) -> (bool, u32) {
    if ones > successes {
        (true, ones - successes)
    } else {
        (false, 0)
    }
}

/// Adjudicate a roll against an optional success threshold.
///
/// On a botch the reported net is the raw deficit (`successes - ones`,
/// negative) so severity survives into resisted subtraction. Otherwise the
/// net is the post-threshold successes minus ones, floored at zero: zero
/// net without a botch is a plain failure, nothing worse.
pub fn adjudicate(result: &RollResult, threshold: i32) -> Result<AdjudicatedResult> {
    if threshold < 0 {
        return Err(EngineError::InvalidThreshold(threshold));
    }

    let after_threshold = apply_threshold(result.successes, threshold as u32);
    let (botch, botch_severity) = determine_botch(result.successes, result.ones);

    let net_successes = if botch {
        result.successes as i32 - result.ones as i32
    } else {
        (after_threshold as i32 - result.ones as i32).max(0)
    };

    Ok(AdjudicatedResult {
        net_successes,
        botch,
        botch_severity,
    })
}

/// Adjudicate with manufactured floor successes that cannot be canceled.
///
/// A willpower spend buys one such success. Floor successes are added
/// after the normal 1s-subtraction; a positive floor also overrides a
/// botch from the rolled portion, since the bought success stands on
/// its own.
pub fn adjudicate_with_floor(
    result: &RollResult,
    threshold: i32,
    floor: u32,
) -> Result<AdjudicatedResult> {
    let rolled = adjudicate(result, threshold)?;
    if floor == 0 {
        return Ok(rolled);
    }

    if rolled.botch {
        Ok(AdjudicatedResult {
            net_successes: floor as i32,
            botch: false,
            botch_severity: 0,
        })
    } else {
        Ok(AdjudicatedResult {
            net_successes: rolled.net_successes + floor as i32,
            botch: false,
            botch_severity: 0,
        })
    }
}
