//! Turn schedule.
//!
//! Each player has an ordered list of hooks for the start of their turn and
//! another for the end. The turn controller runs a player's list in
//! registration order. Hooks are plain data, so removing one is an exact
//! match on its value and a dead unit can never leave a dangling entry
//! behind once [`TurnSchedule::unregister_unit`] has run.

use serde::{Deserialize, Serialize};

use crate::board::RowId;
use crate::core::{PlayerId, PlayerMap, UnitId};
use crate::keywords::{Keyword, KeywordHolder};

use super::event::TurnPhase;

/// One scheduled turn reaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnHook {
    /// Clear the has-attacked flag of every unit in a row.
    ResetRow(RowId),
    /// Tick a timed keyword down by one.
    Decay {
        holder: KeywordHolder,
        keyword: Keyword,
    },
    /// Run a unit's StartOfTurn / EndOfTurn abilities.
    Ability(UnitId),
}

impl TurnHook {
    /// True if this hook belongs to the given unit.
    #[must_use]
    pub fn concerns_unit(&self, unit: UnitId) -> bool {
        match self {
            TurnHook::Ability(id) => *id == unit,
            TurnHook::Decay {
                holder: KeywordHolder::Unit(id),
                ..
            } => *id == unit,
            _ => false,
        }
    }
}

/// Ordered per-player turn hooks.
///
/// ## Example
///
/// ```
/// use row_battle::core::{PlayerId, UnitId};
/// use row_battle::keywords::{Keyword, KeywordHolder};
/// use row_battle::triggers::{TurnHook, TurnPhase, TurnSchedule};
///
/// let mut schedule = TurnSchedule::new();
/// let hook = TurnHook::Decay {
///     holder: KeywordHolder::Unit(UnitId(3)),
///     keyword: Keyword::Stunned,
/// };
/// schedule.register(PlayerId::FIRST, TurnPhase::Start, hook);
/// assert_eq!(schedule.hooks(PlayerId::FIRST, TurnPhase::Start), vec![hook]);
///
/// schedule.unregister_unit(UnitId(3));
/// assert!(schedule.hooks(PlayerId::FIRST, TurnPhase::Start).is_empty());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnSchedule {
    start: PlayerMap<Vec<TurnHook>>,
    end: PlayerMap<Vec<TurnHook>>,
}

impl TurnSchedule {
    /// Create an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, player: PlayerId, phase: TurnPhase) -> &Vec<TurnHook> {
        match phase {
            TurnPhase::Start => &self.start[player],
            TurnPhase::End => &self.end[player],
        }
    }

    fn list_mut(&mut self, player: PlayerId, phase: TurnPhase) -> &mut Vec<TurnHook> {
        match phase {
            TurnPhase::Start => &mut self.start[player],
            TurnPhase::End => &mut self.end[player],
        }
    }

    /// Append a hook to a player's list.
    pub fn register(&mut self, player: PlayerId, phase: TurnPhase, hook: TurnHook) {
        self.list_mut(player, phase).push(hook);
    }

    /// Remove the decay registration for `(holder, keyword)` wherever it is.
    ///
    /// Returns true if an entry was removed.
    pub fn unregister_decay(&mut self, holder: KeywordHolder, keyword: Keyword) -> bool {
        let target = TurnHook::Decay { holder, keyword };
        let mut removed = false;
        for (_, list) in self.start.iter_mut().chain(self.end.iter_mut()) {
            if let Some(pos) = list.iter().position(|h| *h == target) {
                list.remove(pos);
                removed = true;
            }
        }
        removed
    }

    /// Drop every hook that belongs to a unit.
    pub fn unregister_unit(&mut self, unit: UnitId) {
        for (_, list) in self.start.iter_mut().chain(self.end.iter_mut()) {
            list.retain(|h| !h.concerns_unit(unit));
        }
    }

    /// Check whether a hook is still registered.
    ///
    /// The turn controller runs a snapshot of the list, so hooks removed
    /// mid-run are checked here before they fire.
    #[must_use]
    pub fn is_registered(&self, player: PlayerId, phase: TurnPhase, hook: &TurnHook) -> bool {
        self.list(player, phase).contains(hook)
    }

    /// Snapshot a player's hooks for one phase, in registration order.
    #[must_use]
    pub fn hooks(&self, player: PlayerId, phase: TurnPhase) -> Vec<TurnHook> {
        self.list(player, phase).clone()
    }

    /// Total number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.start
            .iter()
            .chain(self.end.iter())
            .map(|(_, list)| list.len())
            .sum()
    }

    /// True if no hook is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every hook.
    pub fn clear(&mut self) {
        for (_, list) in self.start.iter_mut().chain(self.end.iter_mut()) {
            list.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::UnitRange;

    fn decay(unit: u32, keyword: Keyword) -> TurnHook {
        TurnHook::Decay {
            holder: KeywordHolder::Unit(UnitId(unit)),
            keyword,
        }
    }

    #[test]
    fn test_registration_order() {
        let mut schedule = TurnSchedule::new();
        let p0 = PlayerId::FIRST;
        let row = RowId::new(p0, UnitRange::Melee);

        schedule.register(p0, TurnPhase::Start, TurnHook::ResetRow(row));
        schedule.register(p0, TurnPhase::Start, decay(1, Keyword::Stunned));
        schedule.register(p0, TurnPhase::Start, TurnHook::Ability(UnitId(1)));

        let hooks = schedule.hooks(p0, TurnPhase::Start);
        assert_eq!(hooks.len(), 3);
        assert_eq!(hooks[0], TurnHook::ResetRow(row));
        assert_eq!(hooks[2], TurnHook::Ability(UnitId(1)));
        assert!(schedule.hooks(p0.opponent(), TurnPhase::Start).is_empty());
    }

    #[test]
    fn test_unregister_decay_exact_match() {
        let mut schedule = TurnSchedule::new();
        let p1 = PlayerId::SECOND;
        schedule.register(p1, TurnPhase::Start, decay(1, Keyword::Stunned));
        schedule.register(p1, TurnPhase::Start, decay(1, Keyword::Confused));
        schedule.register(p1, TurnPhase::Start, decay(2, Keyword::Stunned));

        assert!(schedule.unregister_decay(KeywordHolder::Unit(UnitId(1)), Keyword::Stunned));
        assert!(!schedule.unregister_decay(KeywordHolder::Unit(UnitId(1)), Keyword::Stunned));

        let hooks = schedule.hooks(p1, TurnPhase::Start);
        assert_eq!(hooks, vec![decay(1, Keyword::Confused), decay(2, Keyword::Stunned)]);
    }

    #[test]
    fn test_unregister_unit_clears_all_phases() {
        let mut schedule = TurnSchedule::new();
        let p0 = PlayerId::FIRST;
        schedule.register(p0, TurnPhase::Start, decay(4, Keyword::OnFire));
        schedule.register(p0.opponent(), TurnPhase::Start, decay(4, Keyword::Vulnerable));
        schedule.register(p0, TurnPhase::End, TurnHook::Ability(UnitId(4)));
        schedule.register(p0, TurnPhase::End, TurnHook::Ability(UnitId(5)));

        schedule.unregister_unit(UnitId(4));

        assert_eq!(schedule.len(), 1);
        assert!(schedule.is_registered(p0, TurnPhase::End, &TurnHook::Ability(UnitId(5))));
        assert!(!schedule.is_registered(p0, TurnPhase::End, &TurnHook::Ability(UnitId(4))));
    }

    #[test]
    fn test_row_decay_holder() {
        let mut schedule = TurnSchedule::new();
        let row = RowId::new(PlayerId::FIRST, UnitRange::Siege);
        let hook = TurnHook::Decay {
            holder: KeywordHolder::Row(row),
            keyword: Keyword::Locked,
        };
        schedule.register(PlayerId::SECOND, TurnPhase::Start, hook);

        // Row hooks are not unit hooks
        schedule.unregister_unit(UnitId(0));
        assert_eq!(schedule.len(), 1);

        schedule.clear();
        assert!(schedule.is_empty());
    }
}
