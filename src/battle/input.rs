//! Input intents.
//!
//! The presentation layer turns pointer activity into [`Intent`]s. Drag
//! positions never reach the rules; only presses and releases do. The
//! session keeps at most one [`Selection`] and ends it on release, cancel
//! or turn end.

use serde::{Deserialize, Serialize};

use crate::core::{CardInstanceId, PlayerId, UnitId};
use crate::effects::CastResult;
use crate::rules::AttackResult;

/// What a primary press landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PressTarget {
    Card(CardInstanceId),
    Unit(UnitId),
    Hero(PlayerId),
    TurnButton,
}

/// A gameplay intent from one player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    PrimaryPress(PressTarget),
    /// The primary button came up. `over_hand` is set when the pointer is
    /// back over the hand area, which puts a dragged card back.
    Release { over_hand: bool },
    /// Cancel the current selection.
    SecondaryPress,
    EndTurn,
}

/// The object currently held by the pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Card(CardInstanceId),
    Unit(UnitId),
}

/// What handling an intent did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    /// Not this player's turn, or the battle is not running.
    Discarded,
    /// Accepted but changed nothing.
    Ignored,
    Selected(Selection),
    Cancelled,
    TurnEnded,
    Cast(CastResult),
    Attacked(AttackResult),
}
