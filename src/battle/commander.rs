//! Turn policies and the scripted commander AI.
//!
//! A side is driven either by external intents (`TurnPolicy::Human`) or by
//! [`CommanderAi`], which plays at most one card per turn and then sends
//! every ready unit into an attack.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::core::{CardInstanceId, PlayerId, UnitId};
use crate::effects::TargetRef;
use crate::keywords::Keyword;
use crate::rules::{AttackResult, Rules};

use super::state::BattleState;

/// Enemy attack above which the AI trades instead of going face.
pub const DEFAULT_AGGRESSION_THRESHOLD: i32 = 5;

/// How a side takes its turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPolicy {
    /// Wait for intents and an end-turn signal.
    #[default]
    Human,
    /// Play scripted decisions, then end the turn.
    Commander(CommanderAi),
}

/// Scripted opponent.
///
/// ```
/// use row_battle::battle::CommanderAi;
///
/// let ai = CommanderAi::new().with_aggression_threshold(3);
/// assert_eq!(ai.aggression_threshold, 3);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommanderAi {
    pub aggression_threshold: i32,
}

impl Default for CommanderAi {
    fn default() -> Self {
        Self {
            aggression_threshold: DEFAULT_AGGRESSION_THRESHOLD,
        }
    }
}

impl CommanderAi {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_aggression_threshold(mut self, threshold: i32) -> Self {
        self.aggression_threshold = threshold;
        self
    }

    /// The card to play this turn: the first card in hand, if affordable.
    #[must_use]
    pub fn pick_card(&self, state: &BattleState, player: PlayerId) -> Option<CardInstanceId> {
        let hero = state.hero(player);
        let card = hero.hand.first()?;
        hero.can_cast(card.cost()).then_some(card.id)
    }

    /// What `attacker` should hit, if anything.
    ///
    /// A valid Defending enemy comes first. Otherwise the first valid enemy
    /// unit is attacked when the trade is acceptable, and the enemy hero is
    /// attacked when it is not. With no valid enemy unit the hero is the
    /// only option.
    #[must_use]
    pub fn choose_attack(&self, rules: &Rules<'_>, attacker: UnitId) -> Option<TargetRef> {
        let unit = rules.state.live_unit(attacker).filter(|u| u.can_attack())?;
        let enemy = unit.owner.opponent();
        let hero = TargetRef::Hero(enemy);

        let valid: Vec<UnitId> = rules
            .state
            .side_units(enemy)
            .into_iter()
            .filter(|id| rules.is_valid_target(attacker, TargetRef::Unit(*id)))
            .collect();

        let defending = valid.iter().copied().find(|id| {
            rules
                .state
                .live_unit(*id)
                .is_some_and(|u| u.has(Keyword::Defending))
        });
        if let Some(id) = defending {
            return Some(TargetRef::Unit(id));
        }

        let Some(first) = valid.first().and_then(|id| rules.state.live_unit(*id)) else {
            return rules.is_valid_target(attacker, hero).then_some(hero);
        };

        let trade = first.current_health() == unit.current_attack()
            || unit.current_health() >= first.current_attack()
            || first.current_attack() > self.aggression_threshold;
        if trade {
            Some(TargetRef::Unit(first.id))
        } else {
            Some(hero)
        }
    }

    /// Attack with every ready friendly unit, in board order. Returns the
    /// number of attacks that resolved.
    pub fn run_attacks(&self, rules: &mut Rules<'_>, player: PlayerId) -> usize {
        let mut resolved = 0;
        for id in rules.state.side_units(player) {
            if rules.state.is_over() {
                break;
            }
            let Some(target) = self.choose_attack(rules, id) else {
                continue;
            };
            match rules.attack(id, target) {
                AttackResult::Resolved { target, .. } => {
                    debug!("{player}'s {id} attacks {target}");
                    resolved += 1;
                }
                other => debug!("{player}'s {id} could not attack {target}: {other:?}"),
            }
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::cards::{Card, CardData, UnitData, UnitRange};
    use crate::core::BattleConfig;
    use crate::presentation::{NoPicker, NullPresentation};

    const AI: PlayerId = PlayerId::SECOND;
    const FOE: PlayerId = PlayerId::FIRST;

    struct Board {
        state: BattleState,
        view: NullPresentation,
        picker: NoPicker,
    }

    impl Board {
        fn new() -> Self {
            let mut state = BattleState::new(BattleConfig::default());
            state.active = AI;
            Self {
                state,
                view: NullPresentation::new(),
                picker: NoPicker,
            }
        }

        fn rules(&mut self) -> Rules<'_> {
            Rules::new(&mut self.state, &mut self.view, &mut self.picker)
        }

        fn put(&mut self, owner: PlayerId, data: UnitData) -> UnitId {
            let id = self.rules().summon(owner, &Arc::new(data), 1)[0];
            if let Some(unit) = self.state.unit_mut(id) {
                unit.has_attacked = false;
            }
            id
        }
    }

    #[test]
    fn test_pick_card_needs_mana() {
        let mut board = Board::new();
        let ai = CommanderAi::new();
        assert_eq!(ai.pick_card(&board.state, AI), None);

        let id = board.state.ids.next_card();
        let card = Card::new(id, Arc::new(CardData::new("Spark", 1)), AI);
        assert!(board.state.hero_mut(AI).hand.insert(card).is_ok());
        assert_eq!(ai.pick_card(&board.state, AI), None);

        board.state.hero_mut(AI).mana_turn_increment();
        assert_eq!(ai.pick_card(&board.state, AI), Some(id));
    }

    #[test]
    fn test_defending_first() {
        let mut board = Board::new();
        let me = board.put(AI, UnitData::new("Brute", 3, 3));
        board.put(FOE, UnitData::new("Weak", 1, 1));
        let wall = board.put(FOE, UnitData::new("Wall", 0, 9).with_keyword(Keyword::Defending));

        let ai = CommanderAi::new();
        assert_eq!(ai.choose_attack(&board.rules(), me), Some(TargetRef::Unit(wall)));
    }

    #[test]
    fn test_bad_trade_goes_face() {
        let mut board = Board::new();
        let me = board.put(AI, UnitData::new("Glass", 2, 1));
        board.put(FOE, UnitData::new("Bruiser", 4, 6));

        let ai = CommanderAi::new();
        assert_eq!(ai.choose_attack(&board.rules(), me), Some(TargetRef::Hero(FOE)));

        let eager = CommanderAi::new().with_aggression_threshold(3);
        assert!(matches!(eager.choose_attack(&board.rules(), me), Some(TargetRef::Unit(_))));
    }

    #[test]
    fn test_out_of_reach_goes_face() {
        let mut board = Board::new();
        let me = board.put(AI, UnitData::new("Footman", 2, 2));
        board.put(FOE, UnitData::new("Archer", 1, 1).with_range(UnitRange::Ranged));

        let ai = CommanderAi::new();
        assert_eq!(ai.choose_attack(&board.rules(), me), Some(TargetRef::Hero(FOE)));
    }

    #[test]
    fn test_run_attacks() {
        let mut board = Board::new();
        board.put(AI, UnitData::new("A", 2, 2));
        board.put(AI, UnitData::new("B", 3, 2));
        let sleepy = board.rules().summon(AI, &Arc::new(UnitData::new("Fresh", 5, 5)), 1)[0];

        let ai = CommanderAi::new();
        let attacks = ai.run_attacks(&mut board.rules(), AI);
        assert_eq!(attacks, 2);
        assert_eq!(board.state.hero(FOE).hitpoints(), 25);
        assert!(board.state.unit(sleepy).is_some_and(|u| !u.can_attack()));
    }
}
