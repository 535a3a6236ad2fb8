//! Heroes.
//!
//! The hero is one side of the battle: its hitpoints, mana pool, fatigue
//! counter, three rows, hand and deck. Turn-start and turn-end reactions
//! are kept in the battle's `TurnSchedule`, not on the hero.

use serde::{Deserialize, Serialize};

use crate::cards::{Deck, Hand, UnitRange};
use crate::core::{BattleConfig, PlayerId, UnitId};

use super::row::{Row, RowId};

/// One side of the battle.
///
/// ## Example
///
/// ```
/// use row_battle::board::Hero;
/// use row_battle::core::{BattleConfig, PlayerId};
///
/// let mut hero = Hero::new(PlayerId::FIRST, &BattleConfig::default());
/// hero.mana_turn_increment();
/// assert_eq!(hero.mana_cap(), 1);
/// assert_eq!(hero.usable_mana(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub player: PlayerId,
    hitpoints: i32,
    hitpoints_cap: i32,
    /// Ceiling the mana cap grows toward.
    mana_ceiling: i32,
    mana_growth: i32,
    mana_regen: i32,
    mana_cap: i32,
    usable_mana: i32,
    fatigue_counter: u32,
    rows: [Row; 3],
    pub hand: Hand,
    pub deck: Deck,
}

impl Hero {
    /// Create a hero at full health with an empty board.
    #[must_use]
    pub fn new(player: PlayerId, config: &BattleConfig) -> Self {
        let row = |range| Row::new(RowId::new(player, range), config.max_units_per_row);
        Self {
            player,
            hitpoints: config.hitpoints_cap,
            hitpoints_cap: config.hitpoints_cap,
            mana_ceiling: config.mana_cap,
            mana_growth: config.mana_growth_per_turn,
            mana_regen: config.mana_regen_per_turn,
            mana_cap: 0,
            usable_mana: 0,
            fatigue_counter: 0,
            rows: [
                row(UnitRange::Melee),
                row(UnitRange::Ranged),
                row(UnitRange::Siege),
            ],
            hand: Hand::new(config.max_hand_size),
            deck: Deck::new(),
        }
    }

    /// Restore battle-start values. The caller refills the deck.
    pub fn reset(&mut self) {
        self.hitpoints = self.hitpoints_cap;
        self.mana_cap = 0;
        self.usable_mana = 0;
        self.fatigue_counter = 0;
        for row in &mut self.rows {
            row.clear();
        }
        self.hand.clear();
        self.deck.clear();
    }

    // === Hitpoints ===

    #[must_use]
    pub fn hitpoints(&self) -> i32 {
        self.hitpoints
    }

    #[must_use]
    pub fn hitpoints_cap(&self) -> i32 {
        self.hitpoints_cap
    }

    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.hitpoints <= 0
    }

    #[must_use]
    pub fn is_damaged(&self) -> bool {
        self.hitpoints < self.hitpoints_cap
    }

    /// Lose hitpoints. Returns true if this hit killed the hero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = !self.is_dead();
        self.hitpoints = self.hitpoints.saturating_sub(amount);
        was_alive && self.is_dead()
    }

    /// Regain hitpoints, up to the cap.
    pub fn heal(&mut self, amount: i32) {
        self.hitpoints = self.hitpoints.saturating_add(amount).min(self.hitpoints_cap);
    }

    /// Take fatigue damage for drawing from an empty deck.
    ///
    /// Deals `2^n` where `n` counts previous empty draws, then bumps the
    /// counter. Damage saturates at `i32::MAX` once the power no longer
    /// fits. Returns the damage dealt.
    pub fn fatigue(&mut self) -> i32 {
        let damage = 1_i32
            .checked_shl(self.fatigue_counter)
            .filter(|d| *d > 0)
            .unwrap_or(i32::MAX);
        self.fatigue_counter = self.fatigue_counter.saturating_add(1);
        self.take_damage(damage);
        damage
    }

    #[must_use]
    pub fn fatigue_counter(&self) -> u32 {
        self.fatigue_counter
    }

    // === Mana ===

    #[must_use]
    pub fn mana_cap(&self) -> i32 {
        self.mana_cap
    }

    #[must_use]
    pub fn usable_mana(&self) -> i32 {
        self.usable_mana
    }

    /// Own-turn-start mana growth and regeneration.
    pub fn mana_turn_increment(&mut self) {
        if self.mana_cap < self.mana_ceiling {
            self.mana_cap = (self.mana_cap + self.mana_growth).min(self.mana_ceiling);
        }
        self.usable_mana = (self.usable_mana + self.mana_regen).clamp(0, self.mana_cap);
    }

    #[must_use]
    pub fn can_cast(&self, cost: i32) -> bool {
        self.usable_mana - cost >= 0
    }

    pub fn consume_mana(&mut self, amount: i32) {
        self.usable_mana -= amount;
    }

    /// Regain usable mana, clamped to the current cap.
    pub fn replenish(&mut self, amount: i32) {
        self.usable_mana = (self.usable_mana + amount).clamp(0, self.mana_cap);
    }

    /// Pay an extra `amount` on top of `cost` if the pool allows it.
    pub fn manathirst(&mut self, cost: i32, amount: i32) -> bool {
        if self.usable_mana - cost >= amount {
            self.consume_mana(amount);
            true
        } else {
            false
        }
    }

    // === Rows ===

    #[must_use]
    pub fn row(&self, range: UnitRange) -> &Row {
        &self.rows[range.index()]
    }

    pub fn row_mut(&mut self, range: UnitRange) -> &mut Row {
        &mut self.rows[range.index()]
    }

    /// Rows front to back.
    pub fn rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Every unit on this side, row by row.
    #[must_use]
    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.rows.iter().flat_map(|r| r.units().iter().copied()).collect()
    }

    /// The row holding a unit, if any.
    #[must_use]
    pub fn find_unit(&self, unit: UnitId) -> Option<UnitRange> {
        self.rows
            .iter()
            .find(|r| r.contains(unit))
            .map(|r| r.id.range)
    }
}
