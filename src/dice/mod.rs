pub mod adjudicate;
pub mod roll;
pub mod roller;

pub use adjudicate::{adjudicate, adjudicate_with_floor, AdjudicatedResult};
pub use roll::{roll_pool, Difficulty, RollResult, RollRules};
pub use roller::{DiceRoller, ScriptedRoller, SeededRoller};
