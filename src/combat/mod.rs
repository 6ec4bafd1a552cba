pub mod combatant;
pub mod constants;
pub mod health;
pub mod initiative;
pub mod round;
pub mod status;

pub use combatant::{CombatantProfile, SoakCapability};
pub use health::{DamageKind, HealthLevel, HealthTrack, HEALTH_BOXES};
pub use initiative::{declaration_order, rank, roll_initiative, InitiativeEntry};
pub use round::{
    AttackDeclaration, CombatRound, Complication, ComplicationSource, DefenseDeclaration,
    DefenseKind, FullDefensePool, ReboundStrike, RoundPhase, RoundReport,
};
pub use status::{StatusEffect, StatusSet};
