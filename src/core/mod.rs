//! Core battle types: ids, players, RNG, configuration, errors.
//!
//! Everything here is independent of the rules themselves and is shared by
//! every other module.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{CardInstanceId, IdAllocator, UnitId};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use config::BattleConfig;
pub use error::{BattleError, ConfigError, Result};
