//! Derived unit stats.
//!
//! A unit's health and attack are never stored directly. They are computed
//! from the template's base values plus temporary bonuses, the Legion aura
//! bonus and a lost-health counter:
//!
//! ```text
//! health_cap     = base_health + temporary_health_bonus
//! current_health = health_cap - lost_health
//! current_attack = max(0, base_attack + temporary_attack_bonus + legion_bonus)
//! ```

use serde::{Deserialize, Serialize};

/// Stat block for one unit.
///
/// ## Example
///
/// ```
/// use row_battle::board::StatState;
///
/// let mut stats = StatState::new(5, 2);
/// stats.adjust_lost_health(3);
/// assert_eq!(stats.current_health(), 2);
///
/// // Healing never pushes past the cap
/// stats.adjust_lost_health(-10);
/// assert_eq!(stats.current_health(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatState {
    pub base_health: i32,
    pub base_attack: i32,
    lost_health: i32,
    pub temporary_health_bonus: i32,
    pub temporary_attack_bonus: i32,
    pub legion_bonus: i32,
}

impl StatState {
    /// Fresh stats with no bonuses and no damage.
    #[must_use]
    pub fn new(base_health: i32, base_attack: i32) -> Self {
        Self {
            base_health,
            base_attack,
            lost_health: 0,
            temporary_health_bonus: 0,
            temporary_attack_bonus: 0,
            legion_bonus: 0,
        }
    }

    #[must_use]
    pub fn lost_health(&self) -> i32 {
        self.lost_health
    }

    #[must_use]
    pub fn current_health_cap(&self) -> i32 {
        self.base_health + self.temporary_health_bonus
    }

    #[must_use]
    pub fn current_health(&self) -> i32 {
        self.current_health_cap() - self.lost_health
    }

    #[must_use]
    pub fn current_attack(&self) -> i32 {
        (self.base_attack + self.temporary_attack_bonus + self.legion_bonus).max(0)
    }

    /// True if the unit is below its health cap.
    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.lost_health > 0
    }

    /// Add damage (positive) or healing (negative).
    ///
    /// Lost health never drops below zero.
    pub fn adjust_lost_health(&mut self, delta: i32) {
        self.lost_health = (self.lost_health + delta).max(0);
    }
}
