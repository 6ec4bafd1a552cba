//! Combatant profile: the slice of a character sheet combat needs
//!
//! Trait names stay outside the engine. A profile carries already-derived
//! pools, the ratings the initiative chain reads, soak permissions, and
//! the owned health track and status set.

use serde::{Deserialize, Serialize};

use crate::combat::health::{DamageKind, HealthTrack};
use crate::combat::status::StatusSet;
use crate::core::config::Side;
use crate::core::types::CombatantId;

/// Which damage kinds this creature may soak
///
/// Ordinary mortals soak bashing only; sturdier things soak more.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoakCapability {
    pub bashing: bool,
    pub lethal: bool,
    pub aggravated: bool,
}

impl SoakCapability {
    pub fn mortal() -> Self {
        Self {
            bashing: true,
            lethal: false,
            aggravated: false,
        }
    }

    pub fn supernatural() -> Self {
        Self {
            bashing: true,
            lethal: true,
            aggravated: false,
        }
    }

    pub fn allows(&self, kind: DamageKind) -> bool {
        match kind {
            DamageKind::Bashing => self.bashing,
            DamageKind::Lethal => self.lethal,
            DamageKind::Aggravated => self.aggravated,
        }
    }
}

impl Default for SoakCapability {
    fn default() -> Self {
        Self::mortal()
    }
}

/// One combatant's combat-relevant state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantProfile {
    pub id: CombatantId,
    pub side: Side,
    /// Trait-derived pools, situational modifiers already folded in
    pub attack_pool: i32,
    pub defense_pool: i32,
    pub soak_pool: i32,
    /// Soak pool for psychic trauma
    pub willpower_pool: i32,
    pub stamina: i32,
    pub dexterity: i32,
    pub wits: i32,
    pub soak_capability: SoakCapability,
    pub health: HealthTrack,
    pub statuses: StatusSet,
}

impl CombatantProfile {
    pub fn new(side: Side) -> Self {
        Self {
            id: CombatantId::new(),
            side,
            attack_pool: 0,
            defense_pool: 0,
            soak_pool: 0,
            willpower_pool: 0,
            stamina: 0,
            dexterity: 0,
            wits: 0,
            soak_capability: SoakCapability::default(),
            health: HealthTrack::new(),
            statuses: StatusSet::new(),
        }
    }

    /// A base pool with the current wound penalty folded in, floored at
    /// zero; an incapacitated combatant has no pool at all
    pub fn penalized(&self, base_pool: i32) -> i32 {
        match self.health.dice_penalty() {
            Some(penalty) => (base_pool + penalty).max(0),
            None => 0,
        }
    }

    pub fn effective_attack_pool(&self) -> i32 {
        self.penalized(self.attack_pool)
    }

    pub fn effective_defense_pool(&self) -> i32 {
        self.penalized(self.defense_pool)
    }

    pub fn can_fight(&self) -> bool {
        !self.health.is_incapacitated() && self.statuses.can_act()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::status::StatusEffect;

    fn brawler() -> CombatantProfile {
        let mut profile = CombatantProfile::new(Side::Player);
        profile.attack_pool = 6;
        profile.defense_pool = 5;
        profile.soak_pool = 3;
        profile.stamina = 3;
        profile.dexterity = 3;
        profile.wits = 2;
        profile
    }

    #[test]
    fn test_mortals_soak_bashing_only() {
        let capability = SoakCapability::mortal();
        assert!(capability.allows(DamageKind::Bashing));
        assert!(!capability.allows(DamageKind::Lethal));
        assert!(!capability.allows(DamageKind::Aggravated));
    }

    #[test]
    fn test_wound_penalty_erodes_pools() {
        let mut profile = brawler();
        assert_eq!(profile.effective_attack_pool(), 6);
        profile.health.apply_damage(DamageKind::Lethal, 4);
        assert_eq!(profile.effective_attack_pool(), 4);
        profile.health.apply_damage(DamageKind::Lethal, 2);
        assert_eq!(profile.effective_attack_pool(), 1);
    }

    #[test]
    fn test_incapacitated_has_no_pool() {
        let mut profile = brawler();
        profile.health.apply_damage(DamageKind::Lethal, 7);
        assert_eq!(profile.effective_attack_pool(), 0);
        assert!(!profile.can_fight());
    }

    #[test]
    fn test_penalty_never_goes_below_zero() {
        let mut profile = brawler();
        profile.attack_pool = 1;
        profile.health.apply_damage(DamageKind::Bashing, 5);
        assert_eq!(profile.effective_attack_pool(), 0);
    }

    #[test]
    fn test_stunned_combatant_cannot_fight() {
        let mut profile = brawler();
        profile.statuses.add(StatusEffect::Stunned, Some(2));
        assert!(!profile.can_fight());
    }
}
