//! Combat round pipeline: Attack, Defense, Damage, in that order
//!
//! One `CombatRound` walks a single attacker-defender pair through the
//! round. Steps must be invoked in order; a step out of order is an
//! error, not a silent reshuffle. Different pairs are independent and
//! may resolve in parallel as long as each owns its roller; damage to
//! one combatant is serialized by resolving their incoming attacks in a
//! fixed order.

use serde::{Deserialize, Serialize};

use crate::action::outcome::{ActionOutcome, Resolution};
use crate::action::simple::{resolve_simple, SimpleOptions};
use crate::combat::combatant::CombatantProfile;
use crate::combat::constants::{
    BASE_ATTACK_DIFFICULTY, BLINDED_SHIFT, FULL_DEFENSE_DECAY, MAX_REBOUND_DEPTH,
    PRONE_TARGET_SHIFT, SOAK_DIFFICULTY_AGGRAVATED, SOAK_DIFFICULTY_BASHING,
    SOAK_DIFFICULTY_LETHAL,
};
use crate::combat::health::{DamageKind, HealthTrack};
use crate::combat::status::StatusEffect;
use crate::core::config::RuleVariant;
use crate::core::error::{EngineError, Result};
use crate::core::types::{CombatantId, Round};
use crate::dice::roll::Difficulty;
use crate::dice::roller::DiceRoller;

/// Phases of one combat round, in the only legal order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    InitiativeDetermined,
    ActionDeclared,
    AttackRolled,
    DefenseRolled,
    DamageApplied,
    RoundComplete,
}

/// How a defender answers an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseKind {
    Dodge,
    Block,
    /// Parrying can turn the attack back on the attacker
    Parry,
}

/// Attacker's declared strike
#[derive(Debug, Clone, Copy)]
pub struct AttackDeclaration {
    /// Weapon or method override of the base difficulty 6
    pub difficulty: Option<Difficulty>,
    pub damage_kind: DamageKind,
    /// Extra damage levels from the weapon, added once the attack lands
    pub bonus_damage: u32,
    /// Attack targets the mind; the target soaks with willpower
    pub psychic: bool,
    /// Needs eyes on the target (most attacks do)
    pub sight_dependent: bool,
    pub specialty: bool,
    /// Attacker is ready to parry a rebound coming back
    pub parry_counters: bool,
}

impl AttackDeclaration {
    pub fn new(damage_kind: DamageKind) -> Self {
        Self {
            difficulty: None,
            damage_kind,
            bonus_damage: 0,
            psychic: false,
            sight_dependent: true,
            specialty: false,
            parry_counters: false,
        }
    }
}

impl Default for AttackDeclaration {
    fn default() -> Self {
        Self::new(DamageKind::Bashing)
    }
}

/// Defender's declared answer, if any
#[derive(Debug, Clone, Copy)]
pub struct DefenseDeclaration {
    pub kind: DefenseKind,
    /// Commit the whole round to defense; pool dwindles per extra attack
    pub full_defense: bool,
    pub specialty: bool,
    /// Damage kind of the defender's own weapon on a rebound
    pub rebound_damage_kind: DamageKind,
}

impl DefenseDeclaration {
    pub fn new(kind: DefenseKind) -> Self {
        Self {
            kind,
            full_defense: false,
            specialty: false,
            rebound_damage_kind: DamageKind::Bashing,
        }
    }
}

/// Dwindling full-defense pool shared across every attack faced this
/// round: full pool against the first, one die less per attack after
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullDefensePool {
    base_pool: i32,
    faced: i32,
}

impl FullDefensePool {
    pub fn new(base_pool: i32) -> Self {
        Self {
            base_pool,
            faced: 0,
        }
    }

    /// Pool for the next attack faced; never below zero
    pub fn next_pool(&mut self) -> i32 {
        let pool = (self.base_pool - self.faced * FULL_DEFENSE_DECAY).max(0);
        self.faced += 1;
        pool
    }

    pub fn attacks_faced(&self) -> i32 {
        self.faced
    }
}

/// Which step a botch fell out of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplicationSource {
    Attack,
    Defense,
    Soak,
    Rebound,
}

/// Botch fallout. The engine reports the severity; what it means in the
/// story is the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Complication {
    pub combatant: CombatantId,
    pub source: ComplicationSource,
    pub severity: u32,
}

/// One link in a parry-rebound chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReboundStrike {
    pub striker: CombatantId,
    pub resolution: Resolution,
    /// Carried-over margin added to the strike's successes
    pub bonus: u32,
}

/// What a rebound chain finally delivered
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ReboundFallout {
    strikes: Vec<ReboundStrike>,
    /// Pre-soak damage levels landing on the original attacker
    damage_to_attacker: u32,
    damage_kind: DamageKind,
}

/// Everything that happened to one attacker-defender pair in a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: Round,
    pub attacker: CombatantId,
    pub defender: CombatantId,
    pub attacker_outcome: ActionOutcome,
    pub defender_outcome: Option<ActionOutcome>,
    pub attack: Resolution,
    pub defense: Option<Resolution>,
    pub soak: Option<Resolution>,
    /// Post-soak levels that landed on the defender
    pub damage_applied: u32,
    pub damage_kind: DamageKind,
    pub rebound_strikes: Vec<ReboundStrike>,
    /// Post-soak levels a rebound landed on the attacker
    pub rebound_damage: u32,
    pub attacker_health: HealthTrack,
    pub defender_health: HealthTrack,
    pub statuses_changed: Vec<(CombatantId, StatusEffect)>,
    pub complications: Vec<Complication>,
}

/// State machine for one attacker-defender pair in one round
#[derive(Debug, Clone)]
pub struct CombatRound {
    round: Round,
    phase: RoundPhase,
    attack_decl: AttackDeclaration,
    defense_decl: Option<DefenseDeclaration>,
    attack: Option<Resolution>,
    attack_raw_successes: u32,
    defense: Option<Resolution>,
    /// Attack successes surviving the defense subtraction
    surviving: u32,
    rebound: ReboundFallout,
    soak: Option<Resolution>,
    damage_applied: u32,
    rebound_damage: u32,
    statuses_changed: Vec<(CombatantId, StatusEffect)>,
    complications: Vec<Complication>,
}

impl CombatRound {
    /// Start the pipeline for a pair once initiative has ordered the
    /// round
    pub fn new(round: Round) -> Self {
        Self {
            round,
            phase: RoundPhase::InitiativeDetermined,
            attack_decl: AttackDeclaration::default(),
            defense_decl: None,
            attack: None,
            attack_raw_successes: 0,
            defense: None,
            surviving: 0,
            rebound: ReboundFallout::default(),
            soak: None,
            damage_applied: 0,
            rebound_damage: 0,
            statuses_changed: Vec::new(),
            complications: Vec::new(),
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn expect_phase(&self, expected: RoundPhase) -> Result<()> {
        if self.phase != expected {
            return Err(EngineError::IllegalStateTransition {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", self.phase),
            });
        }
        Ok(())
    }

    /// Declare the attack and the defender's answer for this exchange
    pub fn declare(
        &mut self,
        attack: AttackDeclaration,
        defense: Option<DefenseDeclaration>,
    ) -> Result<()> {
        self.expect_phase(RoundPhase::InitiativeDetermined)?;
        self.attack_decl = attack;
        self.defense_decl = defense;
        self.phase = RoundPhase::ActionDeclared;
        Ok(())
    }

    /// Roll the attack.
    ///
    /// A stunned attacker swings at nothing; a fully immobilized target
    /// is hit without dice. Otherwise the base difficulty shifts for the
    /// attacker's blindness and the target's predicament, within the
    /// usual ±3.
    pub fn roll_attack(
        &mut self,
        roller: &mut dyn DiceRoller,
        attacker: &CombatantProfile,
        defender: &CombatantProfile,
        variant: &RuleVariant,
    ) -> Result<ActionOutcome> {
        self.expect_phase(RoundPhase::ActionDeclared)?;
        let decl = self.attack_decl;

        let resolution = if !attacker.statuses.can_act() {
            Resolution {
                outcome: ActionOutcome::Failure,
                roll: None,
            }
        } else if defender.statuses.contains(StatusEffect::ImmobilizedFull) {
            Resolution::automatic(1)
        } else {
            let base = decl.difficulty.unwrap_or(BASE_ATTACK_DIFFICULTY);
            let mut shift = 0;
            if decl.sight_dependent && attacker.statuses.contains(StatusEffect::Blinded) {
                shift += BLINDED_SHIFT;
            }
            if defender.statuses.contains(StatusEffect::KnockedDown)
                || defender.statuses.contains(StatusEffect::ImmobilizedPartial)
            {
                shift += PRONE_TARGET_SHIFT;
            }
            let opts = SimpleOptions {
                specialty: decl.specialty,
                ..Default::default()
            };
            resolve_simple(
                roller,
                attacker.effective_attack_pool(),
                base.adjusted(shift),
                variant,
                opts,
            )?
        };

        self.attack_raw_successes = match &resolution.roll {
            Some(roll) => roll.successes,
            None => resolution.outcome.net_successes().max(0) as u32,
        };

        if let ActionOutcome::Botch(severity) = resolution.outcome {
            self.complications.push(Complication {
                combatant: attacker.id,
                source: ComplicationSource::Attack,
                severity,
            });
        }

        let outcome = resolution.outcome;
        self.attack = Some(resolution);
        self.phase = RoundPhase::AttackRolled;
        Ok(outcome)
    }

    /// Roll the declared defense, subtract it from the attack, and play
    /// out any parry rebound.
    ///
    /// Pass the round's `FullDefensePool` when the defender committed to
    /// full defense. A blinded or stunned defender cannot defend no
    /// matter what was declared.
    pub fn roll_defense(
        &mut self,
        roller: &mut dyn DiceRoller,
        attacker: &CombatantProfile,
        defender: &CombatantProfile,
        variant: &RuleVariant,
        mut full_defense: Option<&mut FullDefensePool>,
    ) -> Result<Option<ActionOutcome>> {
        self.expect_phase(RoundPhase::AttackRolled)?;

        // Subtraction happens after each side's own botch call; a botched
        // attack brings its deficit along
        let attack_net = match self.attack.as_ref().map(|a| a.outcome) {
            Some(ActionOutcome::Success(net)) => net,
            Some(ActionOutcome::Botch(severity)) => -(severity as i32),
            _ => 0,
        };
        let attack_was_rolled = self.attack.as_ref().is_some_and(|a| a.roll.is_some());

        let mut defense_outcome = None;
        let mut defense_net = 0i32;
        let mut defense_raw = 0u32;
        let mut parried = false;
        let mut rebound_kind = DamageKind::Bashing;

        if let Some(decl) = self.defense_decl {
            if !defender.statuses.can_defend() {
                tracing::debug!("declared defense dropped: defender cannot defend this round");
            } else {
                let base_pool = match full_defense.as_deref_mut() {
                    Some(pool) if decl.full_defense => pool.next_pool(),
                    _ => defender.defense_pool,
                };
                let opts = SimpleOptions {
                    specialty: decl.specialty,
                    ..Default::default()
                };
                let resolution = resolve_simple(
                    roller,
                    defender.penalized(base_pool),
                    Difficulty::STANDARD,
                    variant,
                    opts,
                )?;

                defense_raw = resolution.roll.as_ref().map(|r| r.successes).unwrap_or(0);
                defense_net = match resolution.outcome {
                    ActionOutcome::Success(net) => net,
                    ActionOutcome::Failure => 0,
                    ActionOutcome::Botch(severity) => {
                        self.complications.push(Complication {
                            combatant: defender.id,
                            source: ComplicationSource::Defense,
                            severity,
                        });
                        -(severity as i32)
                    }
                };
                defense_outcome = Some(resolution.outcome);
                self.defense = Some(resolution);
                parried = decl.kind == DefenseKind::Parry;
                rebound_kind = decl.rebound_damage_kind;
            }
        }

        self.surviving = (attack_net - defense_net).max(0) as u32;

        // Parry rebound: defense successes strictly past the attack's raw
        // successes turn the blow back on the attacker
        if parried && attack_was_rolled && defense_raw > self.attack_raw_successes {
            let bonus = defense_raw - self.attack_raw_successes;
            self.rebound = resolve_rebound(
                roller,
                defender,
                attacker,
                rebound_kind,
                self.attack_decl.parry_counters,
                bonus,
                1,
                variant,
                &mut self.complications,
            )?;
        }

        self.phase = RoundPhase::DefenseRolled;
        Ok(defense_outcome)
    }

    /// Soak and apply the round's damage: the surviving attack to the
    /// defender, any rebound fallout to the attacker.
    pub fn apply_damage(
        &mut self,
        roller: &mut dyn DiceRoller,
        attacker: &mut CombatantProfile,
        defender: &mut CombatantProfile,
        variant: &RuleVariant,
    ) -> Result<()> {
        self.expect_phase(RoundPhase::DefenseRolled)?;
        let decl = self.attack_decl;

        if self.surviving > 0 {
            let levels = self.surviving + decl.bonus_damage;
            let (soak, applied) = settle_damage(
                roller,
                defender,
                decl.damage_kind,
                levels,
                decl.psychic,
                self.round,
                variant,
                &mut self.complications,
                &mut self.statuses_changed,
            )?;
            self.soak = soak;
            self.damage_applied = applied;
        }

        if self.rebound.damage_to_attacker > 0 {
            let (_, applied) = settle_damage(
                roller,
                attacker,
                self.rebound.damage_kind,
                self.rebound.damage_to_attacker,
                false,
                self.round,
                variant,
                &mut self.complications,
                &mut self.statuses_changed,
            )?;
            self.rebound_damage = applied;
        }

        tracing::debug!(
            "round {} damage: {} levels to defender, {} rebounded",
            self.round,
            self.damage_applied,
            self.rebound_damage
        );

        self.phase = RoundPhase::DamageApplied;
        Ok(())
    }

    /// Close the round: expire end-of-round statuses on both sides and
    /// hand back the full report.
    pub fn complete(
        &mut self,
        attacker: &mut CombatantProfile,
        defender: &mut CombatantProfile,
    ) -> Result<RoundReport> {
        self.expect_phase(RoundPhase::DamageApplied)?;

        attacker.statuses.expire_round(self.round);
        defender.statuses.expire_round(self.round);
        self.phase = RoundPhase::RoundComplete;

        // Present in every path that reaches DamageApplied
        let attack = self.attack.clone().expect("attack resolved before damage");

        Ok(RoundReport {
            round: self.round,
            attacker: attacker.id,
            defender: defender.id,
            attacker_outcome: attack.outcome,
            defender_outcome: self.defense.as_ref().map(|d| d.outcome),
            attack,
            defense: self.defense.clone(),
            soak: self.soak.clone(),
            damage_applied: self.damage_applied,
            damage_kind: self.attack_decl.damage_kind,
            rebound_strikes: self.rebound.strikes.clone(),
            rebound_damage: self.rebound_damage,
            attacker_health: attacker.health,
            defender_health: defender.health,
            statuses_changed: self.statuses_changed.clone(),
            complications: self.complications.clone(),
        })
    }
}

/// Soak difficulty for a damage kind
fn soak_difficulty(kind: DamageKind) -> Difficulty {
    let value = match kind {
        DamageKind::Bashing => SOAK_DIFFICULTY_BASHING,
        DamageKind::Lethal => SOAK_DIFFICULTY_LETHAL,
        DamageKind::Aggravated => SOAK_DIFFICULTY_AGGRAVATED,
    };
    // The constants stay within the legal range
    Difficulty::new(value as i32).unwrap_or(Difficulty::STANDARD)
}

/// Soak pending damage and mark what gets through on the health track.
///
/// Soak is reflexive in fiction but rolls like a simple action. Wound
/// penalties do not erode soak. Post-soak damage past the target's
/// stamina leaves them stunned until the end of the next round.
#[allow(clippy::too_many_arguments)]
fn settle_damage(
    roller: &mut dyn DiceRoller,
    target: &mut CombatantProfile,
    kind: DamageKind,
    levels: u32,
    psychic: bool,
    round: Round,
    variant: &RuleVariant,
    complications: &mut Vec<Complication>,
    statuses_changed: &mut Vec<(CombatantId, StatusEffect)>,
) -> Result<(Option<Resolution>, u32)> {
    let mut remaining = levels;
    let mut soak_resolution = None;

    if target.soak_capability.allows(kind) {
        let pool = if psychic {
            target.willpower_pool
        } else {
            target.soak_pool
        };
        let resolution = resolve_simple(
            roller,
            pool,
            soak_difficulty(kind),
            variant,
            SimpleOptions::default(),
        )?;
        match resolution.outcome {
            ActionOutcome::Success(net) => {
                remaining = remaining.saturating_sub(net.max(0) as u32);
            }
            ActionOutcome::Failure => {}
            ActionOutcome::Botch(severity) => {
                complications.push(Complication {
                    combatant: target.id,
                    source: ComplicationSource::Soak,
                    severity,
                });
            }
        }
        soak_resolution = Some(resolution);
    }

    if remaining > 0 {
        target.health.apply_damage(kind, remaining);
        if remaining as i32 > target.stamina {
            target.statuses.add(StatusEffect::Stunned, Some(round + 1));
            statuses_changed.push((target.id, StatusEffect::Stunned));
        }
    }

    Ok((soak_resolution, remaining))
}

/// Play out a parry rebound chain.
///
/// The striker makes a fresh full-pool melee roll whose successes carry
/// the parry's margin as a bonus. If the target is themselves set to
/// parry and out-parries the strike, the chain recurses with the roles
/// swapped, up to the depth guard.
#[allow(clippy::too_many_arguments)]
fn resolve_rebound(
    roller: &mut dyn DiceRoller,
    striker: &CombatantProfile,
    target: &CombatantProfile,
    damage_kind: DamageKind,
    target_parries: bool,
    bonus: u32,
    depth: u8,
    variant: &RuleVariant,
    complications: &mut Vec<Complication>,
) -> Result<ReboundFallout> {
    let mut fallout = ReboundFallout {
        damage_kind,
        ..Default::default()
    };

    let resolution = resolve_simple(
        roller,
        striker.effective_attack_pool(),
        BASE_ATTACK_DIFFICULTY,
        variant,
        SimpleOptions::default(),
    )?;
    let strike_raw = resolution.roll.as_ref().map(|r| r.successes).unwrap_or(0);
    let strike_net = match resolution.outcome {
        ActionOutcome::Success(net) => net + bonus as i32,
        ActionOutcome::Failure => bonus as i32,
        ActionOutcome::Botch(severity) => {
            complications.push(Complication {
                combatant: striker.id,
                source: ComplicationSource::Rebound,
                severity,
            });
            fallout.strikes.push(ReboundStrike {
                striker: striker.id,
                resolution,
                bonus,
            });
            return Ok(fallout);
        }
    };

    fallout.strikes.push(ReboundStrike {
        striker: striker.id,
        resolution,
        bonus,
    });

    if target_parries && target.statuses.can_defend() && depth < MAX_REBOUND_DEPTH {
        let parry = resolve_simple(
            roller,
            target.effective_defense_pool(),
            Difficulty::STANDARD,
            variant,
            SimpleOptions::default(),
        )?;
        let parry_raw = parry.roll.as_ref().map(|r| r.successes).unwrap_or(0);
        let parry_net = parry.outcome.net_successes();

        fallout.strikes.push(ReboundStrike {
            striker: target.id,
            resolution: parry,
            bonus: 0,
        });

        if parry_raw > strike_raw {
            // Out-parried: the chain turns around again
            let nested = resolve_rebound(
                roller,
                target,
                striker,
                damage_kind,
                true,
                parry_raw - strike_raw,
                depth + 1,
                variant,
                complications,
            )?;
            fallout.strikes.extend(nested.strikes);
            // Whatever the nested chain delivered landed on this frame's
            // striker, not on the original attacker
            fallout.damage_to_attacker = 0;
            return Ok(fallout);
        }

        let surviving = (strike_net - parry_net).max(0) as u32;
        fallout.damage_to_attacker = surviving;
        return Ok(fallout);
    }

    fallout.damage_to_attacker = strike_net.max(0) as u32;
    Ok(fallout)
}
