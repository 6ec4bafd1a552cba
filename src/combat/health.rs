//! Health track: seven boxes from Bruised down to Incapacitated
//!
//! Damage fills from the shallowest empty box. More severe damage kinds
//! sit above lighter ones, so the track always reads aggravated, then
//! lethal, then bashing, then empty. Overflow escalates instead of
//! vanishing: bashing past a full track upgrades existing bashing to
//! lethal, and anything landing on a track with nothing left to upgrade
//! kills.

use serde::{Deserialize, Serialize};

/// Kind of damage occupying a health box, lightest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum DamageKind {
    #[default]
    Bashing,
    Lethal,
    Aggravated,
}

/// Named injury levels, healthiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthLevel {
    Uninjured,
    Bruised,
    Hurt,
    Injured,
    Wounded,
    Mauled,
    Crippled,
    Incapacitated,
    Dead,
}

impl HealthLevel {
    /// Dice-pool penalty while at this level; `None` means no actions at
    /// all
    pub fn dice_penalty(&self) -> Option<i32> {
        match self {
            HealthLevel::Uninjured | HealthLevel::Bruised => Some(0),
            HealthLevel::Hurt | HealthLevel::Injured => Some(-1),
            HealthLevel::Wounded | HealthLevel::Mauled => Some(-2),
            HealthLevel::Crippled => Some(-5),
            HealthLevel::Incapacitated | HealthLevel::Dead => None,
        }
    }

    fn from_filled_boxes(filled: u32) -> Self {
        match filled {
            0 => HealthLevel::Uninjured,
            1 => HealthLevel::Bruised,
            2 => HealthLevel::Hurt,
            3 => HealthLevel::Injured,
            4 => HealthLevel::Wounded,
            5 => HealthLevel::Mauled,
            6 => HealthLevel::Crippled,
            _ => HealthLevel::Incapacitated,
        }
    }
}

/// Number of damage boxes between Uninjured and Dead
pub const HEALTH_BOXES: u32 = 7;

/// Per-character injury state
///
/// Only the damage step of a combat round and explicit healing-clock
/// calls mutate this; nothing ever rolls it back implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HealthTrack {
    bashing: u32,
    lethal: u32,
    aggravated: u32,
    dead: bool,
}

impl HealthTrack {
    pub fn new() -> Self {
        Self::default()
    }

    fn filled(&self) -> u32 {
        self.bashing + self.lethal + self.aggravated
    }

    pub fn current_level(&self) -> HealthLevel {
        if self.dead {
            HealthLevel::Dead
        } else {
            HealthLevel::from_filled_boxes(self.filled())
        }
    }

    /// Dice-pool penalty at the current level, for callers deriving pools
    pub fn dice_penalty(&self) -> Option<i32> {
        self.current_level().dice_penalty()
    }

    pub fn is_incapacitated(&self) -> bool {
        self.current_level() >= HealthLevel::Incapacitated
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// The seven boxes as the track reads on the sheet: aggravated
    /// shallowest, then lethal, then bashing, then empty
    pub fn boxes(&self) -> [Option<DamageKind>; HEALTH_BOXES as usize] {
        let mut boxes = [None; HEALTH_BOXES as usize];
        let mut index = 0usize;
        for _ in 0..self.aggravated {
            boxes[index] = Some(DamageKind::Aggravated);
            index += 1;
        }
        for _ in 0..self.lethal {
            boxes[index] = Some(DamageKind::Lethal);
            index += 1;
        }
        for _ in 0..self.bashing {
            boxes[index] = Some(DamageKind::Bashing);
            index += 1;
        }
        boxes
    }

    fn count_mut(&mut self, kind: DamageKind) -> &mut u32 {
        match kind {
            DamageKind::Bashing => &mut self.bashing,
            DamageKind::Lethal => &mut self.lethal,
            DamageKind::Aggravated => &mut self.aggravated,
        }
    }

    fn count(&self, kind: DamageKind) -> u32 {
        match kind {
            DamageKind::Bashing => self.bashing,
            DamageKind::Lethal => self.lethal,
            DamageKind::Aggravated => self.aggravated,
        }
    }

    /// Apply `levels` of damage of one kind, one box at a time.
    ///
    /// Returns the level the track lands on. A dead track stays dead.
    pub fn apply_damage(&mut self, kind: DamageKind, levels: u32) -> HealthLevel {
        for _ in 0..levels {
            if self.dead {
                break;
            }
            self.apply_one(kind);
        }
        self.current_level()
    }

    fn apply_one(&mut self, kind: DamageKind) {
        if self.filled() < HEALTH_BOXES {
            *self.count_mut(kind) += 1;
            return;
        }

        // Track is full: escalate instead of discarding
        match kind {
            DamageKind::Bashing => {
                if self.bashing > 0 {
                    self.bashing -= 1;
                    self.lethal += 1;
                } else {
                    self.dead = true;
                }
            }
            DamageKind::Lethal => {
                if self.bashing > 0 {
                    self.bashing -= 1;
                    self.lethal += 1;
                } else {
                    self.dead = true;
                }
            }
            DamageKind::Aggravated => {
                if self.bashing > 0 {
                    self.bashing -= 1;
                    self.aggravated += 1;
                } else if self.lethal > 0 {
                    self.lethal -= 1;
                    self.aggravated += 1;
                } else {
                    self.dead = true;
                }
            }
        }
    }

    /// Healing clock: clear one box of the given kind, if any.
    ///
    /// Returns false when there was nothing of that kind to heal. Death
    /// is terminal; no healing applies.
    pub fn heal_one(&mut self, kind: DamageKind) -> bool {
        if self.dead || self.count(kind) == 0 {
            return false;
        }
        *self.count_mut(kind) -= 1;
        true
    }

    /// Clear several boxes of one kind; returns how many actually healed
    pub fn heal(&mut self, kind: DamageKind, levels: u32) -> u32 {
        let mut healed = 0;
        for _ in 0..levels {
            if !self.heal_one(kind) {
                break;
            }
            healed += 1;
        }
        healed
    }

    /// Deterioration clock: an untreated, incapacitated character's
    /// bashing festers into lethal, one box per call.
    ///
    /// Returns whether anything changed. The caller drives the cadence;
    /// the engine keeps no time of its own.
    pub fn deteriorate(&mut self) -> bool {
        if self.dead || !self.is_incapacitated() || self.bashing == 0 {
            return false;
        }
        self.bashing -= 1;
        self.lethal += 1;
        true
    }
}
