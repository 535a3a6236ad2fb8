//! Trigger kinds.
//!
//! Unit abilities name the moment they react to with a [`UnitTrigger`].
//! Turn hooks run at one of the two [`TurnPhase`]s of each player's turn.

use serde::{Deserialize, Serialize};

/// The moment a unit's abilities fire.
///
/// A unit binds to the trigger of its first ability when summoned; all of
/// its abilities then run in order whenever that trigger fires.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitTrigger {
    /// Never fires. Used for aura-only abilities such as Empowering.
    #[default]
    None,
    OnSummon,
    OnDeath,
    OnKill,
    OnDamage,
    OnAttack,
    StartOfTurn,
    EndOfTurn,
}

impl UnitTrigger {
    /// The turn phase this trigger is scheduled on, if any.
    ///
    /// ```
    /// use row_battle::triggers::{TurnPhase, UnitTrigger};
    ///
    /// assert_eq!(UnitTrigger::StartOfTurn.turn_phase(), Some(TurnPhase::Start));
    /// assert_eq!(UnitTrigger::OnDeath.turn_phase(), None);
    /// ```
    #[must_use]
    pub const fn turn_phase(self) -> Option<TurnPhase> {
        match self {
            UnitTrigger::StartOfTurn => Some(TurnPhase::Start),
            UnitTrigger::EndOfTurn => Some(TurnPhase::End),
            _ => None,
        }
    }
}

impl std::fmt::Display for UnitTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Which end of a player's turn a hook runs on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Start,
    End,
}
