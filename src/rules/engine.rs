//! The rules mutation context.
//!
//! `Rules` borrows the battle state together with the presentation and
//! target-picking collaborators for the length of one rules operation. All
//! board mutations go through it, so ordering guarantees hold in one place:
//!
//! - summoning adds base keywords, then applies Empowering, then recomputes
//!   Legion, then binds the unit's ability trigger;
//! - a unit's death runs its whole cascade (OnDeath, row removal, aura
//!   cleanup, Reincarnate, hook removal, visual teardown) before control
//!   returns to the caller;
//! - timed keywords register a decay hook on the next turn start of
//!   whichever side is due next.

use std::sync::Arc;

use log::{debug, warn};

use crate::battle::{BattleOutcome, BattleState};
use crate::board::{RowId, Unit};
use crate::cards::{UnitData, UnitRange};
use crate::core::{CardInstanceId, PlayerId, UnitId};
use crate::effects::{EffectContext, EffectInterpreter, EffectParams, TargetRef};
use crate::keywords::{AddOutcome, DecayBinding, DecayOutcome, Keyword, KeywordHolder, PERMANENT};
use crate::presentation::{Presentation, TargetPicker};
use crate::triggers::{TurnHook, TurnPhase, UnitTrigger};

/// What a single draw produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// The card went to the hand.
    Drawn(CardInstanceId),
    /// The hand was full and the card was burned.
    Burned(CardInstanceId),
    /// The deck was empty and the hero took this much fatigue damage.
    Fatigue(i32),
}

/// Mutable view of a battle plus its collaborators.
pub struct Rules<'a> {
    pub state: &'a mut BattleState,
    pub view: &'a mut dyn Presentation,
    pub picker: &'a mut dyn TargetPicker,
}

impl<'a> Rules<'a> {
    pub fn new(
        state: &'a mut BattleState,
        view: &'a mut dyn Presentation,
        picker: &'a mut dyn TargetPicker,
    ) -> Self {
        Self {
            state,
            view,
            picker,
        }
    }

    // === Summoning ===

    /// Summon `count` copies of a template into its owner's row for the
    /// template's range. Copies that do not fit are dropped.
    pub fn summon(&mut self, owner: PlayerId, data: &Arc<UnitData>, count: i32) -> Vec<UnitId> {
        let mut placed = Vec::new();
        for _ in 0..count.max(0) {
            if let Some(id) = self.spawn_unit(owner, Arc::clone(data), data.range) {
                placed.push(id);
            }
        }
        placed
    }

    /// Place one unit in a specific row.
    pub fn spawn_unit(
        &mut self,
        owner: PlayerId,
        data: Arc<UnitData>,
        range: UnitRange,
    ) -> Option<UnitId> {
        let row = RowId::new(owner, range);
        if self.state.row(row).is_full() {
            debug!("{row} is full; '{}' is not summoned", data.name);
            return None;
        }
        let id = self.state.ids.next_unit();
        let mut unit = Unit::new(id, data, owner);
        unit.range = range;
        self.place_unit(unit)
    }

    fn place_unit(&mut self, unit: Unit) -> Option<UnitId> {
        let id = unit.id;
        let owner = unit.owner;
        let row = unit.row();
        if !self.state.row_mut(row).add(id) {
            debug!("{row} is full; {unit} is not summoned");
            return None;
        }

        debug!("{unit} summoned into {row}");
        self.view.unit_spawned(&unit);
        let data = Arc::clone(&unit.data);
        self.state.units.insert(id, unit);

        for keyword in data.base_keywords.iter() {
            self.add_unit_keyword(id, keyword, PERMANENT);
        }
        self.grant_empowering(id);
        self.receive_empowering(id);
        self.recompute_legion(owner);

        match data.binding_trigger() {
            Some(UnitTrigger::OnSummon) => self.run_abilities(id),
            Some(trigger) => {
                if let Some(phase) = trigger.turn_phase() {
                    self.state
                        .schedule
                        .register(owner, phase, TurnHook::Ability(id));
                }
            }
            None => {}
        }
        Some(id)
    }

    // === Abilities ===

    /// Run a unit's abilities if it is bound to `trigger`.
    ///
    /// Dead units only answer OnDeath.
    pub fn fire_trigger(&mut self, id: UnitId, trigger: UnitTrigger) {
        let Some(unit) = self.state.unit(id) else {
            return;
        };
        if unit.binding != Some(trigger) || trigger == UnitTrigger::None {
            return;
        }
        if unit.is_dead && trigger != UnitTrigger::OnDeath {
            return;
        }
        debug!("{id} triggers on {trigger}");
        self.run_abilities(id);
    }

    /// Run every ability of a unit in order.
    ///
    /// Stunned units do nothing. A failed gate stops the remaining
    /// abilities; any other failure is logged and skipped.
    pub fn run_abilities(&mut self, id: UnitId) {
        let Some(unit) = self.state.unit(id) else {
            return;
        };
        if unit.has(Keyword::Stunned) {
            debug!("{id} is stunned; abilities skipped");
            return;
        }
        let data = Arc::clone(&unit.data);
        let mut ctx = EffectContext::for_unit(unit.owner, id);

        for ability in &data.abilities {
            if self.state.is_over() {
                break;
            }
            let params = EffectParams::from_ability(ability);
            match EffectInterpreter::apply(self, &mut ctx, &params) {
                Ok(()) => {}
                Err(failure) if ability.kind.is_gate() => {
                    debug!("{id}: {} gate failed ({failure})", ability.kind);
                    break;
                }
                Err(failure) => debug!("{id}: {} failed ({failure})", ability.kind),
            }
        }
    }

    // === Keywords ===

    /// Give a unit a keyword. Dead or missing units are ignored.
    pub fn add_unit_keyword(&mut self, id: UnitId, keyword: Keyword, duration: i32) -> AddOutcome {
        let active = self.state.active;
        let Some(unit) = self.state.units.get_mut(&id).filter(|u| u.is_alive()) else {
            return AddOutcome::Ignored;
        };
        let owner = unit.owner;
        let binding = DecayBinding::choose(owner, active);
        let outcome = unit
            .keywords
            .add(keyword, duration, binding, keyword.stacks_on_unit());

        self.track_keyword(KeywordHolder::Unit(id), owner, keyword, duration, binding, outcome);
        if outcome == AddOutcome::Added {
            match keyword {
                Keyword::Legion => self.recompute_legion(owner),
                Keyword::Empowering => self.grant_empowering(id),
                _ => {}
            }
        }
        outcome
    }

    /// Take a keyword off a unit. Returns false if it was not held.
    pub fn remove_unit_keyword(&mut self, id: UnitId, keyword: Keyword) -> bool {
        let Some(unit) = self.state.units.get_mut(&id) else {
            return false;
        };
        if unit.keywords.remove(keyword).is_none() {
            return false;
        }
        let holder = KeywordHolder::Unit(id);
        self.keyword_gone(holder, keyword);
        self.unit_lost_keyword(id, keyword);
        true
    }

    /// Give a row a keyword.
    pub fn add_row_keyword(&mut self, row: RowId, keyword: Keyword, duration: i32) -> AddOutcome {
        let binding = DecayBinding::choose(row.owner, self.state.active);
        let outcome = self
            .state
            .row_mut(row)
            .keywords
            .add(keyword, duration, binding, keyword.stacks_on_row());
        self.track_keyword(KeywordHolder::Row(row), row.owner, keyword, duration, binding, outcome);
        outcome
    }

    pub fn remove_row_keyword(&mut self, row: RowId, keyword: Keyword) -> bool {
        if self.state.row_mut(row).keywords.remove(keyword).is_none() {
            return false;
        }
        self.keyword_gone(KeywordHolder::Row(row), keyword);
        true
    }

    #[must_use]
    pub fn row_locked(&self, row: RowId) -> bool {
        self.state.row(row).keywords.has(Keyword::Locked)
    }

    fn track_keyword(
        &mut self,
        holder: KeywordHolder,
        owner: PlayerId,
        keyword: Keyword,
        duration: i32,
        binding: DecayBinding,
        outcome: AddOutcome,
    ) {
        match outcome {
            AddOutcome::Ignored => return,
            AddOutcome::Added => {
                debug!("{holder} gains {keyword} ({duration})");
                self.view.keyword_shown(holder, keyword);
            }
            AddOutcome::Extended => {
                debug!("{holder}'s {keyword} is extended");
                self.state.schedule.unregister_decay(holder, keyword);
            }
        }

        let timed = outcome == AddOutcome::Extended || duration != PERMANENT;
        if timed && keyword.decays() {
            self.state.schedule.register(
                binding.player(owner),
                TurnPhase::Start,
                TurnHook::Decay { holder, keyword },
            );
        }
    }

    fn keyword_gone(&mut self, holder: KeywordHolder, keyword: Keyword) {
        debug!("{holder} loses {keyword}");
        self.state.schedule.unregister_decay(holder, keyword);
        self.view.keyword_cleared(holder, keyword);
    }

    fn unit_lost_keyword(&mut self, id: UnitId, keyword: Keyword) {
        match keyword {
            Keyword::Legion => {
                if let Some(owner) = self.state.unit(id).map(|u| u.owner) {
                    self.recompute_legion(owner);
                }
            }
            Keyword::Empowering => self.strip_empowering(id),
            _ => {}
        }
    }

    fn holds(&self, holder: KeywordHolder, keyword: Keyword) -> bool {
        match holder {
            KeywordHolder::Unit(id) => self.state.unit(id).is_some_and(|u| u.has(keyword)),
            KeywordHolder::Row(row) => self.state.row(row).keywords.has(keyword),
        }
    }

    /// Tick one keyword registration.
    pub fn decay_keyword(&mut self, holder: KeywordHolder, keyword: Keyword) {
        let outcome = match holder {
            KeywordHolder::Unit(id) => match self.state.units.get_mut(&id) {
                Some(unit) => unit.keywords.decay(keyword),
                None => DecayOutcome::Unchanged,
            },
            KeywordHolder::Row(row) => self.state.row_mut(row).keywords.decay(keyword),
        };

        match outcome {
            DecayOutcome::Remaining(left) => debug!("{holder}'s {keyword} has {left} left"),
            DecayOutcome::Expired => {
                self.keyword_gone(holder, keyword);
                if let KeywordHolder::Unit(id) = holder {
                    self.unit_lost_keyword(id, keyword);
                }
            }
            DecayOutcome::Unchanged => {
                if !self.holds(holder, keyword) {
                    self.state.schedule.unregister_decay(holder, keyword);
                }
            }
        }
    }

    // === Auras ===

    /// Set every Legion holder's bonus to the number of other friendly
    /// holders. Units without Legion get no bonus.
    pub fn recompute_legion(&mut self, owner: PlayerId) {
        let side = self.state.side_units(owner);
        let holders = side
            .iter()
            .filter(|id| self.state.unit(**id).is_some_and(|u| u.has(Keyword::Legion)))
            .count() as i32;
        let bonus = (holders - 1).max(0);

        for id in side {
            if let Some(unit) = self.state.unit_mut(id) {
                unit.stats.legion_bonus = if unit.has(Keyword::Legion) { bonus } else { 0 };
            }
        }
    }

    fn grant_empowering(&mut self, holder: UnitId) {
        let Some((amount, row)) = self
            .state
            .live_unit(holder)
            .and_then(|u| u.empowering_amount().map(|a| (a, u.row())))
        else {
            return;
        };
        for id in self.state.row_units(row) {
            if id == holder {
                continue;
            }
            if let Some(unit) = self.state.unit_mut(id) {
                if !unit.aura_grants.iter().any(|g| g.source == holder) {
                    unit.receive_aura(holder, amount);
                }
            }
        }
    }

    fn receive_empowering(&mut self, id: UnitId) {
        let Some(row) = self.state.live_unit(id).map(Unit::row) else {
            return;
        };
        let grants: Vec<(UnitId, i32)> = self
            .state
            .row_units(row)
            .into_iter()
            .filter(|h| *h != id)
            .filter_map(|h| {
                self.state
                    .unit(h)
                    .and_then(Unit::empowering_amount)
                    .map(|amount| (h, amount))
            })
            .collect();

        if let Some(unit) = self.state.unit_mut(id) {
            for (source, amount) in grants {
                if !unit.aura_grants.iter().any(|g| g.source == source) {
                    unit.receive_aura(source, amount);
                }
            }
        }
    }

    fn strip_empowering(&mut self, source: UnitId) {
        for unit in self.state.units.values_mut() {
            unit.revoke_aura(source);
        }
    }

    // === Damage and healing ===

    /// Damage a hero or unit. Returns true if the hit killed it.
    pub fn damage(&mut self, target: TargetRef, amount: i32) -> bool {
        match target {
            TargetRef::Hero(player) => self.damage_hero(player, amount),
            TargetRef::Unit(id) => self.damage_unit(id, amount),
            TargetRef::Row(row) => {
                warn!("cannot damage {row}");
                false
            }
        }
    }

    pub fn damage_hero(&mut self, player: PlayerId, amount: i32) -> bool {
        let killed = self.state.hero_mut(player).take_damage(amount);
        debug!(
            "{player}'s hero takes {amount} ({} left)",
            self.state.hero(player).hitpoints()
        );
        self.settle_hero(player);
        killed
    }

    fn settle_hero(&mut self, player: PlayerId) {
        if self.state.hero(player).is_dead() && self.state.outcome.is_none() {
            debug!("{player}'s hero has fallen");
            self.state.outcome = Some(BattleOutcome::Won {
                winner: player.opponent(),
            });
        }
    }

    /// Damage a unit through Shielded and Vulnerable.
    ///
    /// Shielded absorbs the whole hit and is used up. Vulnerable doubles
    /// the hit and stays. Returns true if the unit died.
    pub fn damage_unit(&mut self, id: UnitId, amount: i32) -> bool {
        let (shielded, vulnerable) = match self.state.live_unit(id) {
            Some(unit) => (unit.has(Keyword::Shielded), unit.has(Keyword::Vulnerable)),
            None => return false,
        };
        if shielded {
            debug!("{id}'s shield absorbs {amount}");
            self.remove_unit_keyword(id, Keyword::Shielded);
            return false;
        }

        let amount = if vulnerable { amount * 2 } else { amount };
        let Some(unit) = self.state.unit_mut(id) else {
            return false;
        };
        unit.stats.adjust_lost_health(amount);
        let health = unit.current_health();
        debug!("{id} takes {amount} ({health} health left)");

        if health <= 0 {
            self.kill(id);
            true
        } else {
            false
        }
    }

    /// Heal a hero (up to its cap) or a living unit.
    pub fn heal(&mut self, target: TargetRef, amount: i32) {
        match target {
            TargetRef::Hero(player) => {
                self.state.hero_mut(player).heal(amount);
                debug!("{player}'s hero heals {amount}");
            }
            TargetRef::Unit(id) => {
                if let Some(unit) = self.state.units.get_mut(&id).filter(|u| u.is_alive()) {
                    unit.stats.adjust_lost_health(-amount);
                    debug!("{id} heals {amount}");
                }
            }
            TargetRef::Row(row) => warn!("cannot heal {row}"),
        }
    }

    // === Death ===

    /// Run the death cascade for a unit.
    pub fn kill(&mut self, id: UnitId) {
        let Some(unit) = self.state.unit_mut(id) else {
            return;
        };
        if unit.is_dead {
            return;
        }
        unit.is_dead = true;
        let owner = unit.owner;
        let row = unit.row();
        let data = Arc::clone(&unit.data);
        let copies = unit
            .keywords
            .duration(Keyword::Reincarnate)
            .map_or(0, |d| if d == PERMANENT { 1 } else { d.max(0) });
        debug!("{unit} dies");

        self.fire_trigger(id, UnitTrigger::OnDeath);
        self.state.row_mut(row).remove(id);
        self.recompute_legion(owner);
        self.strip_empowering(id);

        for _ in 0..copies {
            self.reincarnate(owner, &data, row.range);
        }

        self.state.schedule.unregister_unit(id);
        self.view.unit_destroyed(id);
        self.state.units.remove(&id);
    }

    fn reincarnate(&mut self, owner: PlayerId, data: &Arc<UnitData>, range: UnitRange) {
        if self.state.row(RowId::new(owner, range)).is_full() {
            return;
        }
        let id = self.state.ids.next_unit();
        let mut copy = Unit::new(id, Arc::clone(data), owner);
        copy.range = range;
        let cap = copy.stats.current_health_cap();
        copy.stats.adjust_lost_health(cap - 1);

        if self.place_unit(copy).is_some() {
            self.remove_unit_keyword(id, Keyword::Reincarnate);
            debug!("{id} rises as a reincarnation");
        }
    }

    // === Movement ===

    /// Move a unit to another of its owner's rows.
    ///
    /// Refused (returning false) when the destination is full or is the
    /// unit's current row. Empowering grants are rebuilt around the move.
    pub fn move_unit(&mut self, id: UnitId, to: UnitRange) -> bool {
        let Some(unit) = self.state.live_unit(id) else {
            return false;
        };
        let owner = unit.owner;
        let from = unit.row();
        let dest = RowId::new(owner, to);
        if from == dest {
            return false;
        }
        if self.state.row(dest).is_full() {
            debug!("{dest} is full; {id} stays in {from}");
            return false;
        }

        self.strip_empowering(id);
        self.state.row_mut(from).remove(id);
        self.state.row_mut(dest).add(id);
        if let Some(unit) = self.state.unit_mut(id) {
            unit.revoke_all_auras();
            unit.range = to;
        }
        debug!("{id} moves from {from} to {dest}");

        self.grant_empowering(id);
        self.receive_empowering(id);
        self.recompute_legion(owner);
        true
    }

    /// Move a unit one row further back.
    pub fn push(&mut self, id: UnitId) -> bool {
        match self.state.live_unit(id).and_then(|u| u.range.further()) {
            Some(to) => self.move_unit(id, to),
            None => false,
        }
    }

    /// Move a unit one row closer to the front.
    pub fn pull(&mut self, id: UnitId) -> bool {
        match self.state.live_unit(id).and_then(|u| u.range.closer()) {
            Some(to) => self.move_unit(id, to),
            None => false,
        }
    }

    // === Cards ===

    /// Draw one card for a player.
    pub fn draw(&mut self, player: PlayerId) -> DrawOutcome {
        let hero = self.state.hero_mut(player);
        let Some(card) = hero.deck.draw() else {
            let damage = hero.fatigue();
            debug!("{player} draws from an empty deck and takes {damage} fatigue");
            self.settle_hero(player);
            return DrawOutcome::Fatigue(damage);
        };

        let id = card.id;
        match hero.hand.insert(card) {
            Ok(()) => {
                debug!("{player} draws {id}");
                DrawOutcome::Drawn(id)
            }
            Err(burned) => {
                debug!("{player}'s hand is full; {burned} burns");
                DrawOutcome::Burned(id)
            }
        }
    }

    /// Burn up to `count` random cards from a hand, never `except`.
    pub fn burn_from_hand(
        &mut self,
        player: PlayerId,
        count: i32,
        except: Option<CardInstanceId>,
    ) -> usize {
        let mut burned = 0;
        for _ in 0..count.max(0) {
            let candidates: Vec<CardInstanceId> = self
                .state
                .hero(player)
                .hand
                .ids()
                .into_iter()
                .filter(|id| Some(*id) != except)
                .collect();
            let Some(index) = self.state.rng.pick_index(candidates.len()) else {
                break;
            };
            if let Some(card) = self.state.hero_mut(player).hand.remove(candidates[index]) {
                debug!("{player} burns {card} from hand");
                burned += 1;
            }
        }
        burned
    }

    /// Burn up to `count` cards off the top of a deck.
    pub fn burn_from_deck(&mut self, player: PlayerId, count: i32) -> usize {
        let mut burned = 0;
        for _ in 0..count.max(0) {
            let Some(card) = self.state.hero_mut(player).deck.draw() else {
                break;
            };
            debug!("{player} burns {card} from deck");
            burned += 1;
        }
        burned
    }

    // === Turns ===

    /// Start-of-turn rules for `player`: draw, mana, then scheduled hooks.
    pub fn start_of_turn(&mut self, player: PlayerId) {
        self.draw(player);
        let hero = self.state.hero_mut(player);
        hero.mana_turn_increment();
        debug!(
            "{player} starts turn with {}/{} mana",
            hero.usable_mana(),
            hero.mana_cap()
        );
        self.run_hooks(player, TurnPhase::Start);
    }

    pub fn end_of_turn(&mut self, player: PlayerId) {
        self.run_hooks(player, TurnPhase::End);
    }

    fn run_hooks(&mut self, player: PlayerId, phase: TurnPhase) {
        for hook in self.state.schedule.hooks(player, phase) {
            if self.state.is_over() {
                break;
            }
            if !self.state.schedule.is_registered(player, phase, &hook) {
                continue;
            }
            match hook {
                TurnHook::ResetRow(row) => {
                    for id in self.state.row_units(row) {
                        if let Some(unit) = self.state.unit_mut(id) {
                            unit.has_attacked = false;
                        }
                    }
                }
                TurnHook::Decay { holder, keyword } => self.decay_keyword(holder, keyword),
                TurnHook::Ability(id) => {
                    if self.state.live_unit(id).is_some() {
                        self.run_abilities(id);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardData, EffectKind, SummonAbility};
    use crate::core::BattleConfig;
    use crate::effects::TargetSpec;
    use crate::presentation::{NoPicker, RecordingPresentation, VisualEvent};

    const ME: PlayerId = PlayerId::FIRST;

    fn unit(name: &str, attack: i32, health: i32) -> Arc<UnitData> {
        Arc::new(UnitData::new(name, attack, health))
    }

    fn with_rules<R>(state: &mut BattleState, f: impl FnOnce(&mut Rules<'_>) -> R) -> R {
        let mut view = RecordingPresentation::new();
        let mut picker = NoPicker;
        let mut rules = Rules::new(state, &mut view, &mut picker);
        f(&mut rules)
    }

    #[test]
    fn test_summon_overflow_dropped() {
        let mut state = BattleState::new(BattleConfig::default());
        let data = unit("Grunt", 1, 1);
        let placed = with_rules(&mut state, |r| r.summon(ME, &data, 8));
        assert_eq!(placed.len(), 6);
        assert_eq!(state.row(RowId::new(ME, UnitRange::Melee)).len(), 6);
    }

    #[test]
    fn test_shield_then_vulnerable() {
        let mut state = BattleState::new(BattleConfig::default());
        let data = unit("Knight", 1, 5);
        with_rules(&mut state, |r| {
            let id = r.summon(ME, &data, 1)[0];
            r.add_unit_keyword(id, Keyword::Shielded, PERMANENT);
            r.add_unit_keyword(id, Keyword::Vulnerable, 2);

            assert!(!r.damage_unit(id, 3));
            assert!(!r.state.unit(id).unwrap().has(Keyword::Shielded));
            assert_eq!(r.state.unit(id).unwrap().current_health(), 5);

            assert!(!r.damage_unit(id, 2));
            assert_eq!(r.state.unit(id).unwrap().current_health(), 1);
            assert!(r.state.unit(id).unwrap().has(Keyword::Vulnerable));
        });
    }

    #[test]
    fn test_death_removes_unit() {
        let mut state = BattleState::new(BattleConfig::default());
        let data = unit("Grunt", 1, 2);
        let mut view = RecordingPresentation::new();
        let mut picker = NoPicker;
        let id = {
            let mut rules = Rules::new(&mut state, &mut view, &mut picker);
            let id = rules.summon(ME, &data, 1)[0];
            assert!(rules.damage_unit(id, 2));
            id
        };
        assert!(state.unit(id).is_none());
        assert!(state.row(RowId::new(ME, UnitRange::Melee)).is_empty());
        assert!(view.events.contains(&VisualEvent::UnitDestroyed(id)));
    }

    #[test]
    fn test_legion_counts_other_holders() {
        let mut state = BattleState::new(BattleConfig::default());
        let legion = Arc::new(UnitData::new("Legionary", 1, 3).with_keyword(Keyword::Legion));
        let plain = unit("Grunt", 1, 1);
        with_rules(&mut state, |r| {
            let a = r.summon(ME, &legion, 1)[0];
            let b = r.summon(ME, &legion, 1)[0];
            let c = r.summon(ME, &plain, 1)[0];
            assert_eq!(r.state.unit(a).unwrap().current_attack(), 2);
            assert_eq!(r.state.unit(b).unwrap().current_attack(), 2);
            assert_eq!(r.state.unit(c).unwrap().current_attack(), 1);

            r.kill(b);
            assert_eq!(r.state.unit(a).unwrap().current_attack(), 1);
        });
    }

    #[test]
    fn test_empowering_grant_and_strip() {
        let mut state = BattleState::new(BattleConfig::default());
        let banner = Arc::new(
            UnitData::new("Banner", 0, 4)
                .with_keyword(Keyword::Empowering)
                .with_ability(
                    SummonAbility::new(UnitTrigger::None, EffectKind::BuffAttack, TargetSpec::CURRENT_ROW)
                        .with_attributes(0, 2, 0),
                ),
        );
        let grunt = unit("Grunt", 1, 3);
        with_rules(&mut state, |r| {
            let early = r.summon(ME, &grunt, 1)[0];
            let holder = r.summon(ME, &banner, 1)[0];
            let late = r.summon(ME, &grunt, 1)[0];
            assert_eq!(r.state.unit(early).unwrap().current_attack(), 3);
            assert_eq!(r.state.unit(late).unwrap().current_attack(), 3);
            assert_eq!(r.state.unit(holder).unwrap().current_attack(), 0);

            assert!(r.push(late));
            assert_eq!(r.state.unit(late).unwrap().current_attack(), 1);

            r.kill(holder);
            assert_eq!(r.state.unit(early).unwrap().current_attack(), 1);
        });
    }

    #[test]
    fn test_reincarnate_copy() {
        let mut state = BattleState::new(BattleConfig::default());
        let phoenix = Arc::new(UnitData::new("Phoenix", 2, 4).with_keyword(Keyword::Reincarnate));
        with_rules(&mut state, |r| {
            let id = r.summon(ME, &phoenix, 1)[0];
            r.kill(id);
            let row = r.state.row_units(RowId::new(ME, UnitRange::Melee));
            assert_eq!(row.len(), 1);
            let copy = r.state.unit(row[0]).unwrap();
            assert_eq!(copy.current_health(), 1);
            assert!(!copy.has(Keyword::Reincarnate));
        });
    }

    #[test]
    fn test_move_into_full_row_refused() {
        let mut state = BattleState::new(BattleConfig::default());
        let melee = unit("Grunt", 1, 1);
        let ranged = Arc::new(UnitData::new("Archer", 1, 1).with_range(UnitRange::Ranged));
        with_rules(&mut state, |r| {
            let id = r.summon(ME, &melee, 1)[0];
            r.summon(ME, &ranged, 6);
            assert!(!r.push(id));
            assert_eq!(r.state.unit(id).unwrap().range, UnitRange::Melee);
            assert!(!r.pull(id));
        });
    }

    #[test]
    fn test_draw_fatigue_and_burn() {
        let mut state = BattleState::new(BattleConfig::default());
        with_rules(&mut state, |r| {
            assert_eq!(r.draw(ME), DrawOutcome::Fatigue(1));
            assert_eq!(r.draw(ME), DrawOutcome::Fatigue(2));
            assert_eq!(r.state.hero(ME).hitpoints(), 27);
        });

        let card = Arc::new(CardData::new("Spark", 1));
        let mut state = BattleState::new(BattleConfig::default());
        for _ in 0..8 {
            let id = state.ids.next_card();
            state
                .hero_mut(ME)
                .deck
                .push_back(crate::cards::Card::new(id, Arc::clone(&card), ME));
        }
        with_rules(&mut state, |r| {
            for _ in 0..7 {
                assert!(matches!(r.draw(ME), DrawOutcome::Drawn(_)));
            }
            assert!(matches!(r.draw(ME), DrawOutcome::Burned(_)));
            assert_eq!(r.state.hero(ME).hand.len(), 7);
            assert!(r.state.hero(ME).deck.is_empty());
        });
    }

    #[test]
    fn test_keyword_decay_schedule() {
        let mut state = BattleState::new(BattleConfig::default());
        let data = unit("Grunt", 1, 3);
        with_rules(&mut state, |r| {
            let id = r.summon(ME, &data, 1)[0];
            r.add_unit_keyword(id, Keyword::Stunned, 2);
            let hook = TurnHook::Decay {
                holder: KeywordHolder::Unit(id),
                keyword: Keyword::Stunned,
            };
            assert!(r.state.schedule.is_registered(ME, TurnPhase::Start, &hook));

            r.decay_keyword(KeywordHolder::Unit(id), Keyword::Stunned);
            assert!(r.state.unit(id).unwrap().has(Keyword::Stunned));
            r.decay_keyword(KeywordHolder::Unit(id), Keyword::Stunned);
            assert!(!r.state.unit(id).unwrap().has(Keyword::Stunned));
            assert!(!r.state.schedule.is_registered(ME, TurnPhase::Start, &hook));
        });
    }

    #[test]
    fn test_hero_death_ends_battle() {
        let mut state = BattleState::new(BattleConfig::default());
        with_rules(&mut state, |r| {
            assert!(r.damage_hero(ME, 30));
            assert_eq!(r.state.winner(), Some(ME.opponent()));
        });
    }
}
