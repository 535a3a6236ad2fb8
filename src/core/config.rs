//! Battle configuration.
//!
//! `BattleConfig` carries every tunable the rules read: hero hitpoints,
//! mana economy, zone capacities, turn timing and the RNG seed. Values are
//! built with `with_*` setters and checked with [`BattleConfig::validate`].

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Tunables for a single battle.
///
/// ## Example
///
/// ```
/// use row_battle::core::BattleConfig;
///
/// let config = BattleConfig::default()
///     .with_hitpoints_cap(40)
///     .with_mana_regen(3)
///     .with_seed(7);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.hitpoints_cap, 40);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Starting and maximum hero hitpoints (25..=50).
    pub hitpoints_cap: i32,

    /// Ceiling the mana cap grows toward (10..=20).
    pub mana_cap: i32,

    /// Mana cap growth per own turn start (1..=2).
    pub mana_growth_per_turn: i32,

    /// Usable mana regained per own turn start (1..=4).
    pub mana_regen_per_turn: i32,

    /// Cards a hand can hold before draws start burning.
    pub max_hand_size: usize,

    /// Units a row can hold before summons are dropped.
    pub max_units_per_row: usize,

    /// Cards each side draws when the battle starts.
    pub starting_draw: u32,

    /// Seconds before a turn ends on its own (60..=120).
    pub turn_time_limit_secs: u32,

    /// Seconds the commander shows a card before casting it (0.5..=1.65).
    pub ai_display_secs: f32,

    /// Seed for every random decision in the battle.
    pub seed: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            hitpoints_cap: 30,
            mana_cap: 10,
            mana_growth_per_turn: 1,
            mana_regen_per_turn: 2,
            max_hand_size: 7,
            max_units_per_row: 6,
            starting_draw: 0,
            turn_time_limit_secs: 90,
            ai_display_secs: 1.0,
            seed: 0,
        }
    }
}

impl BattleConfig {
    /// Set the hero hitpoints cap.
    #[must_use]
    pub fn with_hitpoints_cap(mut self, hitpoints: i32) -> Self {
        self.hitpoints_cap = hitpoints;
        self
    }

    /// Set the mana cap ceiling.
    #[must_use]
    pub fn with_mana_cap(mut self, cap: i32) -> Self {
        self.mana_cap = cap;
        self
    }

    /// Set the mana cap growth per turn.
    #[must_use]
    pub fn with_mana_growth(mut self, growth: i32) -> Self {
        self.mana_growth_per_turn = growth;
        self
    }

    /// Set the usable mana regained per turn.
    #[must_use]
    pub fn with_mana_regen(mut self, regen: i32) -> Self {
        self.mana_regen_per_turn = regen;
        self
    }

    /// Set the opening draw.
    #[must_use]
    pub fn with_starting_draw(mut self, cards: u32) -> Self {
        self.starting_draw = cards;
        self
    }

    /// Set the turn time limit.
    #[must_use]
    pub fn with_turn_time_limit(mut self, secs: u32) -> Self {
        self.turn_time_limit_secs = secs;
        self
    }

    /// Set how long the commander displays a card.
    #[must_use]
    pub fn with_ai_display_secs(mut self, secs: f32) -> Self {
        self.ai_display_secs = secs;
        self
    }

    /// Set the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every field against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("hitpoints_cap", self.hitpoints_cap, 25, 50)?;
        check_range("mana_cap", self.mana_cap, 10, 20)?;
        check_range("mana_growth_per_turn", self.mana_growth_per_turn, 1, 2)?;
        check_range("mana_regen_per_turn", self.mana_regen_per_turn, 1, 4)?;
        check_range("turn_time_limit_secs", self.turn_time_limit_secs as i32, 60, 120)?;

        if self.max_hand_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_hand_size",
                value: 0,
                min: 1,
                max: i32::MAX,
            });
        }
        if self.max_units_per_row == 0 {
            return Err(ConfigError::OutOfRange {
                field: "max_units_per_row",
                value: 0,
                min: 1,
                max: i32::MAX,
            });
        }
        if !(0.5..=1.65).contains(&self.ai_display_secs) {
            return Err(ConfigError::DisplayTime(self.ai_display_secs));
        }

        Ok(())
    }
}

fn check_range(field: &'static str, value: i32, min: i32, max: i32) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
