//! Status effects: combat conditions with end-of-round expiries
//!
//! Effects are set by combat outcomes or external triggers (spells,
//! weapon effects) and consumed by the round pipeline as difficulty
//! modifiers. Expiry is "end of the named round"; explicit recovery
//! clears an effect early.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::types::Round;

/// Conditions a combatant can suffer during a fight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    /// Too rattled to act; set when post-soak damage beats stamina
    Stunned,
    /// Cannot see: no declared defense, harder sight-dependent rolls
    Blinded,
    /// Restrained but still straining against it
    ImmobilizedPartial,
    /// Held completely; attacks land automatically
    ImmobilizedFull,
    /// On the ground
    KnockedDown,
}

/// Active effects for one combatant, each with an optional expiry round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSet {
    active: HashMap<StatusEffect, Option<Round>>,
}

impl StatusSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect; `expires_end_of` of `None` means it persists until
    /// explicitly recovered. Re-adding overwrites the expiry.
    pub fn add(&mut self, effect: StatusEffect, expires_end_of: Option<Round>) {
        self.active.insert(effect, expires_end_of);
    }

    pub fn contains(&self, effect: StatusEffect) -> bool {
        self.active.contains_key(&effect)
    }

    /// Explicit recovery action; returns whether the effect was present
    pub fn recover(&mut self, effect: StatusEffect) -> bool {
        self.active.remove(&effect).is_some()
    }

    /// End-of-round bookkeeping: clear every effect whose expiry names
    /// this round
    pub fn expire_round(&mut self, round: Round) {
        self.active.retain(|_, expiry| *expiry != Some(round));
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = StatusEffect> + '_ {
        self.active.keys().copied()
    }

    /// Restrained at all, partially or fully
    pub fn is_immobilized(&self) -> bool {
        self.contains(StatusEffect::ImmobilizedPartial)
            || self.contains(StatusEffect::ImmobilizedFull)
    }

    /// Can this combatant take an action this round?
    pub fn can_act(&self) -> bool {
        !self.contains(StatusEffect::Stunned)
    }

    /// Can this combatant declare a defense?
    pub fn can_defend(&self) -> bool {
        self.can_act() && !self.contains(StatusEffect::Blinded)
    }
}
