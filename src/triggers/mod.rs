//! Trigger kinds and the per-player turn schedule.
//!
//! ## Key Components
//!
//! - [`UnitTrigger`]: the moment a unit's abilities react to
//! - [`TurnHook`]: one scheduled reaction (row reset, keyword decay, unit ability)
//! - [`TurnSchedule`]: ordered hook lists per player and turn phase
//!
//! Event-style triggers (OnSummon, OnDeath, OnKill, OnDamage, OnAttack) are
//! fired directly by the rules as those events happen. Only turn-phase
//! reactions live in the schedule.

mod event;
mod registry;

pub use event::{TurnPhase, UnitTrigger};
pub use registry::{TurnHook, TurnSchedule};
