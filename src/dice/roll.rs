//! Pool rolling: N d10s against a difficulty
//!
//! The atomic unit of action. Each die at or above the difficulty is a
//! success; each 1 is counted separately for the adjudicator to cancel
//! with. Tens can earn bonus dice, and a bonus ten chains another.

use serde::{Deserialize, Serialize};

use crate::core::config::RuleVariant;
use crate::core::error::{EngineError, Result};
use crate::dice::roller::DiceRoller;

/// Minimum face value that counts as a success
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 10;

    /// Standard difficulty for unremarkable tasks
    pub const STANDARD: Difficulty = Difficulty(6);

    pub fn new(value: i32) -> Result<Self> {
        if value < Self::MIN as i32 || value > Self::MAX as i32 {
            return Err(EngineError::InvalidDifficulty(value));
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Situational adjustment: at most ±3 from this base, then kept in range
    pub fn adjusted(&self, modifier: i32) -> Difficulty {
        let clamped = modifier.clamp(-3, 3);
        let value = (self.0 as i32 + clamped).clamp(Self::MIN as i32, Self::MAX as i32);
        Difficulty(value as u8)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Per-roll flags controlling bonus dice from tens
#[derive(Debug, Clone, Copy, Default)]
pub struct RollRules {
    /// The roll is made under an applicable specialty: tens earn a bonus die
    pub specialty: bool,
    /// Variant: tens always earn a bonus die
    pub tens_always_explode: bool,
    /// Variant: ones showing on bonus dice do not count against successes
    pub bonus_ones_harmless: bool,
}

impl RollRules {
    /// Combine a per-roll specialty flag with campaign-level switches
    pub fn with_variant(specialty: bool, variant: &RuleVariant) -> Self {
        Self {
            specialty,
            tens_always_explode: variant.tens_always_explode,
            bonus_ones_harmless: variant.bonus_ones_harmless,
        }
    }
}

/// Raw result of one pool roll, immutable once produced
///
/// `successes` and `ones` are pre-adjudication counts: no threshold has
/// been subtracted and no ones have canceled anything yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    /// Every face drawn: pool dice first, bonus dice appended in draw order
    pub values: Vec<u8>,
    /// Dice at or above the difficulty, bonus dice included
    pub successes: u32,
    /// Dice showing 1 (bonus dice included unless played harmless)
    pub ones: u32,
    /// Bonus dice earned from tens
    pub bonus_rolls: u32,
}

impl RollResult {
    /// A roll of no dice at all: the no-chance case
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            successes: 0,
            ones: 0,
            bonus_rolls: 0,
        }
    }
}

/// Roll `pool` d10s against `difficulty`.
///
/// A pool of 0 is legal and draws nothing: the task simply has no chance.
/// A negative pool is a caller bug and is rejected.
pub fn roll_pool(
    roller: &mut dyn DiceRoller,
    pool: i32,
    difficulty: Difficulty,
    rules: RollRules,
) -> Result<RollResult> {
    if pool < 0 {
        return Err(EngineError::InvalidPool(pool));
    }

    let explode = rules.specialty || rules.tens_always_explode;
    let mut result = RollResult {
        values: Vec::with_capacity(pool as usize),
        successes: 0,
        ones: 0,
        bonus_rolls: 0,
    };

    let mut pool_left = pool as u32;
    let mut bonus_left = 0u32;

    while pool_left > 0 || bonus_left > 0 {
        let is_bonus = if pool_left > 0 {
            pool_left -= 1;
            false
        } else {
            bonus_left -= 1;
            true
        };

        let face = roller.next_d10();
        result.values.push(face);

        if face >= difficulty.value() {
            result.successes += 1;
        }
        if face == 1 && !(is_bonus && rules.bonus_ones_harmless) {
            result.ones += 1;
        }
        if face == 10 && explode {
            bonus_left += 1;
            result.bonus_rolls += 1;
        }
    }

    tracing::trace!(
        "rolled {} dice at difficulty {}: {} successes, {} ones",
        result.values.len(),
        difficulty.value(),
        result.successes,
        result.ones
    );

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::roller::ScriptedRoller;

    fn diff(value: i32) -> Difficulty {
        Difficulty::new(value).unwrap()
    }

    #[test]
    fn test_difficulty_bounds() {
        assert!(Difficulty::new(2).is_ok());
        assert!(Difficulty::new(10).is_ok());
        assert_eq!(Difficulty::new(1), Err(EngineError::InvalidDifficulty(1)));
        assert_eq!(Difficulty::new(11), Err(EngineError::InvalidDifficulty(11)));
    }

    #[test]
    fn test_difficulty_adjustment_clamps_to_three() {
        let base = Difficulty::STANDARD;
        assert_eq!(base.adjusted(5).value(), 9);
        assert_eq!(base.adjusted(-5).value(), 3);
        assert_eq!(base.adjusted(2).value(), 8);
    }

    #[test]
    fn test_difficulty_adjustment_stays_in_range() {
        assert_eq!(diff(9).adjusted(3).value(), 10);
        assert_eq!(diff(3).adjusted(-3).value(), 2);
    }

    #[test]
    fn test_basic_counting() {
        // 8 and 6 succeed at difficulty 6; 1 is a one; 5 is plain failure
        let mut roller = ScriptedRoller::new(&[8, 6, 1, 5]);
        let result = roll_pool(&mut roller, 4, diff(6), RollRules::default()).unwrap();
        assert_eq!(result.successes, 2);
        assert_eq!(result.ones, 1);
        assert_eq!(result.bonus_rolls, 0);
        assert_eq!(result.values, vec![8, 6, 1, 5]);
    }

    #[test]
    fn test_zero_pool_draws_nothing() {
        let mut roller = ScriptedRoller::new(&[]);
        let result = roll_pool(&mut roller, 0, diff(6), RollRules::default()).unwrap();
        assert_eq!(result, RollResult::empty());
    }

    #[test]
    fn test_negative_pool_rejected() {
        let mut roller = ScriptedRoller::new(&[]);
        let err = roll_pool(&mut roller, -2, diff(6), RollRules::default());
        assert_eq!(err, Err(EngineError::InvalidPool(-2)));
    }

    #[test]
    fn test_ten_without_specialty_does_not_explode() {
        let mut roller = ScriptedRoller::new(&[10, 3]);
        let result = roll_pool(&mut roller, 2, diff(6), RollRules::default()).unwrap();
        assert_eq!(result.successes, 1);
        assert_eq!(result.bonus_rolls, 0);
        assert_eq!(roller.remaining(), 0);
    }

    #[test]
    fn test_specialty_ten_chains_bonus_dice() {
        // Pool of 1: the 10 earns a bonus die, the bonus 10 chains another
        let rules = RollRules {
            specialty: true,
            ..Default::default()
        };
        let mut roller = ScriptedRoller::new(&[10, 10, 7]);
        let result = roll_pool(&mut roller, 1, diff(6), rules).unwrap();
        assert_eq!(result.successes, 3);
        assert_eq!(result.bonus_rolls, 2);
        assert_eq!(result.values, vec![10, 10, 7]);
    }

    #[test]
    fn test_bonus_one_counts_by_default() {
        let rules = RollRules {
            specialty: true,
            ..Default::default()
        };
        let mut roller = ScriptedRoller::new(&[10, 1]);
        let result = roll_pool(&mut roller, 1, diff(6), rules).unwrap();
        assert_eq!(result.successes, 1);
        assert_eq!(result.ones, 1);
    }

    #[test]
    fn test_bonus_one_harmless_under_variant() {
        let rules = RollRules::with_variant(false, &RuleVariant::house());
        let mut roller = ScriptedRoller::new(&[10, 1]);
        let result = roll_pool(&mut roller, 1, diff(6), rules).unwrap();
        assert_eq!(result.successes, 1);
        assert_eq!(result.ones, 0);
        // A pool one still counts even under the variant
        let mut roller = ScriptedRoller::new(&[1]);
        let result = roll_pool(&mut roller, 1, diff(6), rules).unwrap();
        assert_eq!(result.ones, 1);
    }

    #[test]
    fn test_every_die_accounted_for() {
        use crate::dice::roller::SeededRoller;

        let mut roller = SeededRoller::from_seed(99);
        for pool in 0..12 {
            for difficulty in 2..=10 {
                let result =
                    roll_pool(&mut roller, pool, diff(difficulty), RollRules::default()).unwrap();
                let below: u32 = result
                    .values
                    .iter()
                    .filter(|&&v| v != 1 && v < difficulty as u8)
                    .count() as u32;
                assert_eq!(
                    result.successes + below + result.ones,
                    result.values.len() as u32
                );
            }
        }
    }
}
