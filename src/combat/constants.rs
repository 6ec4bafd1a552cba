//! Combat tunables in one place

use crate::dice::roll::Difficulty;

/// Base difficulty of an attack roll unless a weapon or method overrides
pub const BASE_ATTACK_DIFFICULTY: Difficulty = Difficulty::STANDARD;

/// Soak difficulty by damage kind
pub const SOAK_DIFFICULTY_BASHING: u8 = 6;
pub const SOAK_DIFFICULTY_LETHAL: u8 = 7;
pub const SOAK_DIFFICULTY_AGGRAVATED: u8 = 8;

/// Attacker's difficulty shift against a downed or partially restrained
/// target
pub const PRONE_TARGET_SHIFT: i32 = -2;

/// Difficulty shift for sight-dependent rolls made while blinded
pub const BLINDED_SHIFT: i32 = 2;

/// Rebound chains (parry beats attack, counter gets parried, ...) stop
/// at this depth
pub const MAX_REBOUND_DEPTH: u8 = 4;

/// Full defense loses one die per attack faced beyond the first
pub const FULL_DEFENSE_DECAY: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soak_difficulties_escalate_by_kind() {
        assert!(SOAK_DIFFICULTY_BASHING < SOAK_DIFFICULTY_LETHAL);
        assert!(SOAK_DIFFICULTY_LETHAL < SOAK_DIFFICULTY_AGGRAVATED);
    }

    #[test]
    fn test_rebound_depth_is_bounded() {
        assert!(MAX_REBOUND_DEPTH >= 1);
    }
}
