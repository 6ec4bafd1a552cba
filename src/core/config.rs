//! Rule-variant configuration
//!
//! House rules are explicit values passed into resolver calls, never
//! process-wide state, so variant behavior stays testable parameter by
//! parameter.

use serde::{Deserialize, Serialize};

/// Which table a participant sits on, for initiative tie-break purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Side {
    Player,
    #[default]
    Npc,
    Boss,
}

/// How residual initiative ties are resolved once roll, rating, wits and
/// dexterity are all equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TieBreakPolicy {
    /// Stable fallback on participant id only
    #[default]
    IdOrder,
    /// Players win ties against ordinary opposition; bosses win ties
    /// against everyone. Id order settles same-side ties.
    FavorPlayers,
}

/// House-rule switches for a campaign
///
/// The default is the baseline tabletop rules. `house()` is the table
/// variant where tens always earn a bonus die and those bonus dice cannot
/// backfire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuleVariant {
    /// Tens trigger a bonus die on every roll, specialty or not
    pub tens_always_explode: bool,
    /// Ones showing on bonus dice do not cancel successes
    pub bonus_ones_harmless: bool,
    /// Initiative tie policy
    pub tie_break: TieBreakPolicy,
}

impl RuleVariant {
    /// Baseline tabletop rules: bonus dice only from specialties, bonus
    /// ones cancel like any other, ties fall back to id order
    pub fn classic() -> Self {
        Self::default()
    }

    /// House variant: tens always explode, bonus ones are harmless,
    /// players win initiative ties except against bosses
    pub fn house() -> Self {
        Self {
            tens_always_explode: true,
            bonus_ones_harmless: true,
            tie_break: TieBreakPolicy::FavorPlayers,
        }
    }
}
