//! Chronicle Engine - deterministic dice-pool rules resolution
//!
//! Roll d10s, count successes, let the ones bite. The engine decides the
//! outcome of contested and uncontested actions, and resolves combat as
//! a specialization of the same action model. Character sheets, trait
//! names and presentation live with the caller; the engine sees pools,
//! difficulties and explicit round state, nothing else.

pub mod action;
pub mod combat;
pub mod core;
pub mod dice;
