//! Board model: heroes, rows, units and their stats.
//!
//! - [`Hero`]: one side, with mana, hitpoints, rows, hand and deck
//! - [`Row`]: ordered, bounded unit list with row-level keywords
//! - [`Unit`]: a live unit and its [`StatState`]

mod hero;
mod row;
mod stats;
mod unit;

pub use hero::Hero;
pub use row::{Row, RowId};
pub use stats::StatState;
pub use unit::{AuraGrant, Unit};
