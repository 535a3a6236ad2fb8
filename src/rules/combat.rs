//! Unit combat.
//!
//! ## Target legality
//!
//! A unit's range decides which enemy rows it reaches: Melee reaches the
//! Melee row, Ranged adds the Ranged row and Siege reaches all three. A
//! Defending unit in any reachable row means only Defending units may be
//! attacked, and any Defending unit on a side protects its hero. Shrouded
//! units cannot be attacked at all. Flying and Confused attackers ignore
//! every one of these rules.
//!
//! ## Attack order
//!
//! OnAttack fires first. Unit-vs-unit damage is simultaneous, then OnDamage
//! fires for the attacker and the defender, then OnKill for whichever side
//! killed the other. OnFire burns the attacker's own hero afterwards.

use log::debug;

use crate::board::RowId;
use crate::core::UnitId;
use crate::effects::TargetRef;
use crate::keywords::Keyword;
use crate::triggers::UnitTrigger;

use super::engine::Rules;

/// Result of an attack attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackResult {
    /// The attack happened against `target`, which differs from the
    /// requested target when a Confused attacker was redirected.
    Resolved {
        target: TargetRef,
        attacker_died: bool,
        target_died: bool,
    },
    /// The attacker cannot attack right now.
    NotReady,
    /// The requested target is not legal for this attacker.
    InvalidTarget,
}

/// Percent roll at or below which a Confused attacker keeps its target.
const CONFUSED_KEEP: u8 = 10;
/// Percent roll below which a Confused attacker stays near its target.
const CONFUSED_NEAR: u8 = 50;

impl Rules<'_> {
    /// True if `attacker` may attack `target` under the legality rules.
    #[must_use]
    pub fn is_valid_target(&self, attacker: UnitId, target: TargetRef) -> bool {
        let Some(unit) = self.state.live_unit(attacker) else {
            return false;
        };
        let enemy = unit.owner.opponent();

        match target {
            TargetRef::Row(_) => false,
            TargetRef::Hero(player) => {
                if player != enemy {
                    return false;
                }
                if unit.has(Keyword::Flying) || unit.has(Keyword::Confused) {
                    return true;
                }
                !self.state.side_has_holder(player, Keyword::Defending)
            }
            TargetRef::Unit(id) => {
                let Some(defender) = self.state.live_unit(id) else {
                    return false;
                };
                if defender.owner != enemy {
                    return false;
                }
                if unit.has(Keyword::Flying) || unit.has(Keyword::Confused) {
                    return true;
                }
                if defender.has(Keyword::Shrouded) {
                    return false;
                }

                let reach = unit.range.reach();
                if !reach.contains(&defender.range) {
                    return false;
                }
                if defender.has(Keyword::Defending) {
                    return true;
                }
                !reach.iter().any(|range| {
                    self.state
                        .row_has_holder(RowId::new(enemy, *range), Keyword::Defending)
                })
            }
        }
    }

    /// Pick the target a Confused attacker actually hits.
    pub fn confused_target(&mut self, attacker: UnitId, target: TargetRef) -> TargetRef {
        let Some(enemy) = self.state.live_unit(attacker).map(|u| u.owner.opponent()) else {
            return target;
        };
        let roll = self.state.rng.roll_percent();
        if roll <= CONFUSED_KEEP {
            return target;
        }

        let target_row = match target {
            TargetRef::Unit(id) => self.state.live_unit(id).map(|u| u.row()),
            _ => None,
        };

        let pool: Vec<TargetRef> = if roll < CONFUSED_NEAR {
            match target_row {
                Some(row) => self
                    .state
                    .row_units(row)
                    .into_iter()
                    .map(TargetRef::Unit)
                    .filter(|t| *t != target)
                    .collect(),
                None => self
                    .state
                    .side_units(enemy)
                    .into_iter()
                    .map(TargetRef::Unit)
                    .collect(),
            }
        } else {
            let mut all: Vec<TargetRef> = self
                .state
                .side_units(enemy)
                .into_iter()
                .filter(|id| {
                    target_row.map_or(true, |row| {
                        self.state.unit(*id).map(|u| u.row()) != Some(row)
                    })
                })
                .map(TargetRef::Unit)
                .collect();
            if target_row.is_some() {
                all.push(TargetRef::Hero(enemy));
            }
            all
        };

        match self.state.rng.choose(&pool) {
            Some(redirect) => {
                debug!("{attacker} is confused and attacks {redirect} instead of {target}");
                *redirect
            }
            None => target,
        }
    }

    /// Attack with a unit.
    ///
    /// The attacker must pass the selection rule and the target must be
    /// legal. A Confused attacker may then be redirected.
    pub fn attack(&mut self, attacker: UnitId, target: TargetRef) -> AttackResult {
        let Some(unit) = self.state.live_unit(attacker) else {
            return AttackResult::NotReady;
        };
        if !unit.can_attack() {
            return AttackResult::NotReady;
        }
        if !self.is_valid_target(attacker, target) {
            debug!("{attacker} cannot attack {target}");
            return AttackResult::InvalidTarget;
        }
        let owner = unit.owner;
        let target = if unit.has(Keyword::Confused) {
            self.confused_target(attacker, target)
        } else {
            target
        };

        self.fire_trigger(attacker, UnitTrigger::OnAttack);

        let power = self.state.live_unit(attacker).map_or(0, |u| u.current_attack());
        let mut attacker_died = false;
        let mut target_died = false;

        match target {
            TargetRef::Hero(player) => {
                if let Some(unit) = self.state.unit_mut(attacker) {
                    unit.last_attacked = Some(target);
                }
                debug!("{attacker} attacks {player}'s hero for {power}");
                target_died = self.damage_hero(player, power);
                if target_died {
                    self.fire_trigger(attacker, UnitTrigger::OnKill);
                }
                self.fire_trigger(attacker, UnitTrigger::OnDamage);
            }
            TargetRef::Unit(defender) => {
                self.remove_unit_keyword(attacker, Keyword::Shrouded);
                if let Some(unit) = self.state.unit_mut(attacker) {
                    unit.last_attacked = Some(target);
                }
                let retaliation = match self.state.unit_mut(defender) {
                    Some(unit) => {
                        unit.last_attacked = Some(TargetRef::Unit(attacker));
                        unit.current_attack()
                    }
                    None => 0,
                };
                debug!("{attacker} attacks {defender}");

                target_died = self.damage_unit(defender, power);
                attacker_died = self.damage_unit(attacker, retaliation)
                    || self.state.live_unit(attacker).is_none();
                target_died |= self.state.live_unit(defender).is_none();

                self.fire_trigger(attacker, UnitTrigger::OnDamage);
                self.fire_trigger(defender, UnitTrigger::OnDamage);
                if target_died {
                    self.fire_trigger(attacker, UnitTrigger::OnKill);
                }
                if attacker_died {
                    self.fire_trigger(defender, UnitTrigger::OnKill);
                }
            }
            TargetRef::Row(_) => return AttackResult::InvalidTarget,
        }

        if let Some(burn) = self
            .state
            .live_unit(attacker)
            .and_then(|u| u.keywords.duration(Keyword::OnFire))
        {
            let burn = burn.max(1);
            debug!("{attacker} is on fire; {owner}'s hero takes {burn}");
            self.damage_hero(owner, burn);
        }

        if let Some(unit) = self.state.units.get_mut(&attacker).filter(|u| u.is_alive()) {
            unit.has_attacked = true;
        }

        AttackResult::Resolved {
            target,
            attacker_died,
            target_died,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::battle::BattleState;
    use crate::cards::{UnitData, UnitRange};
    use crate::core::{BattleConfig, PlayerId};
    use crate::keywords::PERMANENT;
    use crate::presentation::{NoPicker, NullPresentation};

    const ME: PlayerId = PlayerId::FIRST;
    const THEM: PlayerId = PlayerId::SECOND;

    struct Board {
        state: BattleState,
    }

    impl Board {
        fn new() -> Self {
            Self {
                state: BattleState::new(BattleConfig::default().with_seed(5)),
            }
        }

        fn run<R>(&mut self, f: impl FnOnce(&mut Rules<'_>) -> R) -> R {
            let mut view = NullPresentation::new();
            let mut picker = NoPicker;
            let mut rules = Rules::new(&mut self.state, &mut view, &mut picker);
            f(&mut rules)
        }

        fn put(&mut self, owner: PlayerId, data: UnitData) -> UnitId {
            let data = Arc::new(data);
            let id = self.run(|r| r.summon(owner, &data, 1)[0]);
            self.state.unit_mut(id).unwrap().has_attacked = false;
            id
        }
    }

    #[test]
    fn test_reach_rule() {
        let mut board = Board::new();
        let melee = board.put(ME, UnitData::new("Grunt", 2, 2));
        let siege = board.put(ME, UnitData::new("Catapult", 2, 2).with_range(UnitRange::Siege));
        let back = board.put(THEM, UnitData::new("Archer", 1, 1).with_range(UnitRange::Ranged));

        board.run(|r| {
            assert!(!r.is_valid_target(melee, TargetRef::Unit(back)));
            assert!(r.is_valid_target(siege, TargetRef::Unit(back)));
            assert!(r.is_valid_target(melee, TargetRef::Hero(THEM)));
            assert!(!r.is_valid_target(melee, TargetRef::Hero(ME)));
        });
    }

    #[test]
    fn test_defending_protects() {
        let mut board = Board::new();
        let siege = board.put(ME, UnitData::new("Catapult", 2, 2).with_range(UnitRange::Siege));
        let guard = board.put(
            THEM,
            UnitData::new("Guard", 1, 4).with_keyword(Keyword::Defending),
        );
        let back = board.put(THEM, UnitData::new("Archer", 1, 1).with_range(UnitRange::Ranged));

        board.run(|r| {
            assert!(r.is_valid_target(siege, TargetRef::Unit(guard)));
            assert!(!r.is_valid_target(siege, TargetRef::Unit(back)));
            assert!(!r.is_valid_target(siege, TargetRef::Hero(THEM)));

            r.add_unit_keyword(siege, Keyword::Flying, PERMANENT);
            assert!(r.is_valid_target(siege, TargetRef::Hero(THEM)));
        });
    }

    #[test]
    fn test_shrouded_untargetable() {
        let mut board = Board::new();
        let attacker = board.put(ME, UnitData::new("Grunt", 2, 2));
        let hidden = board.put(THEM, UnitData::new("Rogue", 1, 1).with_keyword(Keyword::Shrouded));
        board.run(|r| assert!(!r.is_valid_target(attacker, TargetRef::Unit(hidden))));
    }

    #[test]
    fn test_unit_trade() {
        let mut board = Board::new();
        let attacker = board.put(ME, UnitData::new("Grunt", 3, 2));
        let defender = board.put(THEM, UnitData::new("Wall", 2, 5));

        let result = board.run(|r| r.attack(attacker, TargetRef::Unit(defender)));
        assert_eq!(
            result,
            AttackResult::Resolved {
                target: TargetRef::Unit(defender),
                attacker_died: true,
                target_died: false,
            }
        );
        assert!(board.state.unit(attacker).is_none());
        let wall = board.state.unit(defender).unwrap();
        assert_eq!(wall.current_health(), 2);
        assert_eq!(wall.last_attacked, Some(TargetRef::Unit(attacker)));
    }

    #[test]
    fn test_hero_attack_and_flag() {
        let mut board = Board::new();
        let attacker = board.put(ME, UnitData::new("Grunt", 3, 2));

        let first = board.run(|r| r.attack(attacker, TargetRef::Hero(THEM)));
        assert!(matches!(first, AttackResult::Resolved { target_died: false, .. }));
        assert_eq!(board.state.hero(THEM).hitpoints(), 27);
        assert!(board.state.unit(attacker).unwrap().has_attacked);

        let second = board.run(|r| r.attack(attacker, TargetRef::Hero(THEM)));
        assert_eq!(second, AttackResult::NotReady);
    }

    #[test]
    fn test_on_fire_burns_own_hero() {
        let mut board = Board::new();
        let attacker = board.put(ME, UnitData::new("Imp", 1, 3));
        board.run(|r| {
            r.add_unit_keyword(attacker, Keyword::OnFire, 2);
            r.attack(attacker, TargetRef::Hero(THEM));
        });
        assert_eq!(board.state.hero(ME).hitpoints(), 28);
    }

    #[test]
    fn test_attack_removes_shrouded() {
        let mut board = Board::new();
        let attacker = board.put(ME, UnitData::new("Rogue", 1, 3).with_keyword(Keyword::Shrouded));
        let defender = board.put(THEM, UnitData::new("Wall", 0, 5));
        board.run(|r| r.attack(attacker, TargetRef::Unit(defender)));
        assert!(!board.state.unit(attacker).unwrap().has(Keyword::Shrouded));
    }

    #[test]
    fn test_confused_stays_on_enemy_side() {
        let mut board = Board::new();
        let attacker = board.put(ME, UnitData::new("Drunk", 1, 20));
        let a = board.put(THEM, UnitData::new("A", 0, 20));
        let b = board.put(THEM, UnitData::new("B", 0, 20).with_range(UnitRange::Ranged));
        board.put(ME, UnitData::new("Friend", 0, 20));

        board.run(|r| {
            r.add_unit_keyword(attacker, Keyword::Confused, 5);
            for _ in 0..30 {
                let picked = r.confused_target(attacker, TargetRef::Unit(a));
                assert!(
                    picked == TargetRef::Unit(a)
                        || picked == TargetRef::Unit(b)
                        || picked == TargetRef::Hero(THEM)
                );
            }
        });
    }
}
