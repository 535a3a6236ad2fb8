//! Battle orchestration.
//!
//! - `BattleState`: everything the rules read and write
//! - `BattleSession`: the turn controller, owning the state and its
//!   collaborators
//! - `TurnPolicy` / `CommanderAi`: how each side takes its turns
//! - `Intent`: player input, routed by the session

mod commander;
mod input;
mod session;
mod state;

pub use commander::{CommanderAi, TurnPolicy, DEFAULT_AGGRESSION_THRESHOLD};
pub use input::{Intent, IntentOutcome, PressTarget, Selection};
pub use session::{BattleSession, TurnStage};
pub use state::{BattleOutcome, BattleState};
