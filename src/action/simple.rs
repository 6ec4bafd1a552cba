//! Simple and reflexive actions
//!
//! A simple action is one roll needing one success unless the task
//! demands more. A reflexive action takes no time and no roll at all;
//! soak rolls are the reflexive exception and reuse the simple path.

use crate::core::config::RuleVariant;
use crate::core::error::Result;
use crate::dice::adjudicate::{adjudicate, adjudicate_with_floor};
use crate::dice::roll::{roll_pool, Difficulty, RollRules};
use crate::dice::roller::DiceRoller;

use crate::action::outcome::{ActionOutcome, Resolution};

/// Options for a simple, single-roll action
#[derive(Debug, Clone, Copy)]
pub struct SimpleOptions {
    /// Net successes the task demands; everything beyond the first is
    /// subtracted from the roll before ones cancel
    pub required: u32,
    /// Roll benefits from an applicable specialty
    pub specialty: bool,
    /// One willpower point spent for an uncancelable success
    pub willpower: bool,
    /// Trivial and unresisted: succeed without touching the dice
    pub trivial: bool,
}

impl Default for SimpleOptions {
    fn default() -> Self {
        Self {
            required: 1,
            specialty: false,
            willpower: false,
            trivial: false,
        }
    }
}

impl SimpleOptions {
    /// Demand more than a single success
    pub fn requiring(required: u32) -> Self {
        Self {
            required,
            ..Default::default()
        }
    }
}

/// Resolve a simple action: one roll, adjudicated, done.
///
/// A task demanding N successes subtracts the N-1 beyond the first as a
/// threshold; the botch check still reads the raw roll.
pub fn resolve_simple(
    roller: &mut dyn DiceRoller,
    pool: i32,
    difficulty: Difficulty,
    variant: &RuleVariant,
    opts: SimpleOptions,
) -> Result<Resolution> {
    if opts.trivial {
        return Ok(Resolution::automatic(1));
    }

    let rules = RollRules::with_variant(opts.specialty, variant);
    let roll = roll_pool(roller, pool, difficulty, rules)?;

    let threshold = opts.required.saturating_sub(1) as i32;
    let adj = if opts.willpower {
        adjudicate_with_floor(&roll, threshold, 1)?
    } else {
        adjudicate(&roll, threshold)?
    };

    Ok(Resolution {
        outcome: ActionOutcome::from_adjudicated(&adj),
        roll: Some(roll),
    })
}

/// Resolve a reflexive action: instant, automatic, no dice.
///
/// Soak rolls are reflexive in fiction but mechanically a simple roll;
/// they go through `resolve_simple` with a damage-derived difficulty.
pub fn resolve_reflexive() -> Resolution {
    Resolution::automatic(1)
}
