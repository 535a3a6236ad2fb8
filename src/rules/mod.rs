//! Board rules: summoning, keywords, damage, movement, draws, turns and
//! combat.
//!
//! Every mutation goes through [`Rules`], which borrows the battle state
//! together with the presentation sink and the target picker for the
//! duration of one action.

mod combat;
mod engine;

pub use combat::AttackResult;
pub use engine::{DrawOutcome, Rules};
