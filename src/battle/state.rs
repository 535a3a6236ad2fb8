//! Battle state.
//!
//! `BattleState` owns everything the rules mutate: both heroes (with their
//! rows, hands and decks), the unit arena, the turn schedule, the active
//! side and the RNG. It is constructed explicitly per battle and passed by
//! reference; there is no global board.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Hero, Row, RowId, Unit};
use crate::cards::CardData;
use crate::core::{BattleConfig, GameRng, IdAllocator, PlayerId, PlayerMap, UnitId};
use crate::keywords::Keyword;
use crate::triggers::TurnSchedule;

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Won { winner: PlayerId },
}

/// Everything the rules read and write during one battle.
#[derive(Clone, Debug)]
pub struct BattleState {
    pub config: BattleConfig,
    pub heroes: PlayerMap<Hero>,
    /// Live units by id. Dead units are removed at the end of their death
    /// cascade.
    pub units: FxHashMap<UnitId, Unit>,
    pub schedule: TurnSchedule,
    pub active: PlayerId,
    /// Turns started so far.
    pub turn: u32,
    pub rng: GameRng,
    pub ids: IdAllocator,
    pub outcome: Option<BattleOutcome>,
    /// Deck lists used to refill each side at battle start.
    pub deck_lists: PlayerMap<Vec<Arc<CardData>>>,
}

impl BattleState {
    /// Create a battle with empty decks.
    #[must_use]
    pub fn new(config: BattleConfig) -> Self {
        let heroes = PlayerMap::new(|player| Hero::new(player, &config));
        Self {
            rng: GameRng::new(config.seed),
            config,
            heroes,
            units: FxHashMap::default(),
            schedule: TurnSchedule::new(),
            active: PlayerId::FIRST,
            turn: 0,
            ids: IdAllocator::default(),
            outcome: None,
            deck_lists: PlayerMap::default(),
        }
    }

    /// Set a side's deck list (builder pattern).
    #[must_use]
    pub fn with_deck(mut self, player: PlayerId, cards: Vec<Arc<CardData>>) -> Self {
        self.deck_lists[player] = cards;
        self
    }

    #[must_use]
    pub fn hero(&self, player: PlayerId) -> &Hero {
        &self.heroes[player]
    }

    pub fn hero_mut(&mut self, player: PlayerId) -> &mut Hero {
        &mut self.heroes[player]
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// A unit that exists and is not dying.
    #[must_use]
    pub fn live_unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id).filter(|u| u.is_alive())
    }

    #[must_use]
    pub fn row(&self, id: RowId) -> &Row {
        self.heroes[id.owner].row(id.range)
    }

    pub fn row_mut(&mut self, id: RowId) -> &mut Row {
        self.heroes[id.owner].row_mut(id.range)
    }

    /// Live units in a row, in placement order.
    #[must_use]
    pub fn row_units(&self, id: RowId) -> Vec<UnitId> {
        self.row(id)
            .units()
            .iter()
            .copied()
            .filter(|u| self.live_unit(*u).is_some())
            .collect()
    }

    /// True if any live unit in the row holds the keyword.
    #[must_use]
    pub fn row_has_holder(&self, id: RowId, keyword: Keyword) -> bool {
        self.row(id)
            .units()
            .iter()
            .filter_map(|u| self.live_unit(*u))
            .any(|u| u.has(keyword))
    }

    /// True if any of a side's rows has a live holder of the keyword.
    #[must_use]
    pub fn side_has_holder(&self, player: PlayerId, keyword: Keyword) -> bool {
        self.heroes[player]
            .rows()
            .any(|row| self.row_has_holder(row.id, keyword))
    }

    /// Every live unit on a side, row by row.
    #[must_use]
    pub fn side_units(&self, player: PlayerId) -> Vec<UnitId> {
        self.heroes[player]
            .unit_ids()
            .into_iter()
            .filter(|u| self.live_unit(*u).is_some())
            .collect()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.map(|BattleOutcome::Won { winner }| winner)
    }
}
