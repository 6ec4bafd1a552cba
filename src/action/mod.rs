pub mod extended;
pub mod helpers;
pub mod outcome;
pub mod resisted;
pub mod simple;

pub use extended::{resolve_extended_round, ExtendedActionState, ExtendedStatus};
pub use helpers::{
    complementary_modifier, multiple_action_pool, trade_difficulty_for_requirement, RetryTracker,
};
pub use outcome::{ActionOutcome, DegreeOfSuccess, Resolution};
pub use resisted::{
    resolve_contest_round, resolve_resisted, ContestState, ContestStatus, ResistedResolution,
    SidePool,
};
pub use simple::{resolve_reflexive, resolve_simple, SimpleOptions};
