//! Error types.
//!
//! Only API misuse and bad configuration are errors. Ordinary game outcomes
//! such as "no legal targets" or "not enough mana" are reported through
//! result enums (`CastResult`, `EffectFailure`, `AttackResult`) instead.

use thiserror::Error;

use super::{CardInstanceId, PlayerId, UnitId};

/// Errors raised by the battle API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    #[error("unit not found: {0}")]
    UnitNotFound(UnitId),

    #[error("card {card} is not in {player}'s hand")]
    CardNotInHand {
        card: CardInstanceId,
        player: PlayerId,
    },

    #[error("{0} is not the active player")]
    NotActivePlayer(PlayerId),

    #[error("the battle is over")]
    BattleOver,

    #[error("the battle has not started")]
    NotStarted,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Problems found while validating configuration or card data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("ai display time {0} is outside 0.5..=1.65 seconds")]
    DisplayTime(f32),

    #[error("card set '{0}' is empty")]
    EmptyCardSet(String),

    #[error("card '{card}' in set '{set}' summons but has no unit template")]
    MissingSummonData { set: String, card: String },

    #[error("card '{card}' in set '{set}': {reason}")]
    InvalidCard {
        set: String,
        card: String,
        reason: String,
    },
}

/// Result type for battle operations.
pub type Result<T> = std::result::Result<T, BattleError>;
