//! Per-holder keyword ledger.
//!
//! Each unit and each row owns a [`KeywordLedger`]: an ordered list of
//! [`KeywordState`]s with at most one entry per keyword. The ledger only
//! tracks durations and bindings. Scheduling the decay itself is the job of
//! the turn schedule in `triggers`, which holds one registration per timed
//! keyword.
//!
//! ## Durations
//!
//! - `-1` is permanent and never decays (innate keywords).
//! - `D > 0` loses one per firing of its bound turn start and is removed
//!   when it reaches zero.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::RowId;
use crate::core::{PlayerId, UnitId};

use super::keyword::{Keyword, KeywordSet};

/// Duration value for keywords that never decay.
pub const PERMANENT: i32 = -1;

/// Something that can hold keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeywordHolder {
    Unit(UnitId),
    Row(RowId),
}

impl std::fmt::Display for KeywordHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeywordHolder::Unit(id) => write!(f, "{}", id),
            KeywordHolder::Row(row) => write!(f, "{}", row),
        }
    }
}

/// Which turn start a timed keyword ticks on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecayBinding {
    /// The holder's owner's turn start.
    OwnerTurnStart,
    /// The owner's opponent's turn start.
    EnemyTurnStart,
}

impl DecayBinding {
    /// Binding for a keyword applied while `active` is taking its turn.
    ///
    /// ```
    /// use row_battle::core::PlayerId;
    /// use row_battle::keywords::DecayBinding;
    ///
    /// let owner = PlayerId::FIRST;
    /// assert_eq!(DecayBinding::choose(owner, owner), DecayBinding::OwnerTurnStart);
    /// assert_eq!(DecayBinding::choose(owner, owner.opponent()), DecayBinding::EnemyTurnStart);
    /// ```
    #[must_use]
    pub fn choose(owner: PlayerId, active: PlayerId) -> Self {
        if owner == active {
            DecayBinding::OwnerTurnStart
        } else {
            DecayBinding::EnemyTurnStart
        }
    }

    /// The player whose turn start fires this binding.
    #[must_use]
    pub fn player(self, owner: PlayerId) -> PlayerId {
        match self {
            DecayBinding::OwnerTurnStart => owner,
            DecayBinding::EnemyTurnStart => owner.opponent(),
        }
    }
}

/// One active keyword on a holder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordState {
    pub keyword: Keyword,
    pub duration: i32,
    /// `None` for permanent keywords.
    pub binding: Option<DecayBinding>,
}

impl KeywordState {
    /// True if this keyword never expires.
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        self.duration == PERMANENT
    }
}

/// What happened when a keyword was added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new entry was created.
    Added,
    /// An existing stacking entry gained one turn and must be re-bound.
    Extended,
    /// The keyword was already present and does not stack.
    Ignored,
}

/// What happened when a keyword was decayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecayOutcome {
    /// The keyword has turns left.
    Remaining(i32),
    /// The keyword ran out and was removed.
    Expired,
    /// The keyword is permanent, exempt, or absent.
    Unchanged,
}

/// Ordered keyword entries for one holder.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordLedger {
    states: SmallVec<[KeywordState; 4]>,
}

impl KeywordLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether a keyword is held.
    #[must_use]
    pub fn has(&self, keyword: Keyword) -> bool {
        self.states.iter().any(|s| s.keyword == keyword)
    }

    /// Look up a keyword's state.
    #[must_use]
    pub fn get(&self, keyword: Keyword) -> Option<&KeywordState> {
        self.states.iter().find(|s| s.keyword == keyword)
    }

    /// Remaining duration of a keyword, if held.
    #[must_use]
    pub fn duration(&self, keyword: Keyword) -> Option<i32> {
        self.get(keyword).map(|s| s.duration)
    }

    /// Add a keyword.
    ///
    /// `stacks` decides whether a duplicate add extends the existing entry.
    /// Permanent entries are never extended. `binding` is recorded for new
    /// timed entries and replaces the binding of an extended one.
    pub fn add(
        &mut self,
        keyword: Keyword,
        duration: i32,
        binding: DecayBinding,
        stacks: bool,
    ) -> AddOutcome {
        if let Some(existing) = self.states.iter_mut().find(|s| s.keyword == keyword) {
            if !stacks || existing.is_permanent() {
                return AddOutcome::Ignored;
            }
            existing.duration += 1;
            existing.binding = Some(binding);
            return AddOutcome::Extended;
        }

        let binding = (duration != PERMANENT).then_some(binding);
        self.states.push(KeywordState {
            keyword,
            duration,
            binding,
        });
        AddOutcome::Added
    }

    /// Remove a keyword, returning its state if it was held.
    pub fn remove(&mut self, keyword: Keyword) -> Option<KeywordState> {
        let pos = self.states.iter().position(|s| s.keyword == keyword)?;
        Some(self.states.remove(pos))
    }

    /// Tick a keyword down by one turn.
    ///
    /// A keyword whose duration reaches zero (or was added at zero) is
    /// removed.
    pub fn decay(&mut self, keyword: Keyword) -> DecayOutcome {
        let Some(pos) = self.states.iter().position(|s| s.keyword == keyword) else {
            return DecayOutcome::Unchanged;
        };

        let state = &mut self.states[pos];
        if state.is_permanent() || !keyword.decays() {
            return DecayOutcome::Unchanged;
        }

        if state.duration > 0 {
            state.duration -= 1;
        }
        if state.duration <= 0 {
            self.states.remove(pos);
            DecayOutcome::Expired
        } else {
            DecayOutcome::Remaining(state.duration)
        }
    }

    /// All held keywords as a set.
    #[must_use]
    pub fn keywords(&self) -> KeywordSet {
        self.states.iter().map(|s| s.keyword).collect()
    }

    /// Iterate states in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &KeywordState> {
        self.states.iter()
    }

    /// Number of held keywords.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// True if no keyword is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Drop every keyword.
    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWN: DecayBinding = DecayBinding::OwnerTurnStart;

    #[test]
    fn test_add_and_query() {
        let mut ledger = KeywordLedger::new();
        assert_eq!(ledger.add(Keyword::Stunned, 2, OWN, true), AddOutcome::Added);

        assert!(ledger.has(Keyword::Stunned));
        assert_eq!(ledger.duration(Keyword::Stunned), Some(2));
        assert_eq!(ledger.get(Keyword::Stunned).unwrap().binding, Some(OWN));
    }

    #[test]
    fn test_permanent_has_no_binding() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Flying, PERMANENT, OWN, false);
        let state = ledger.get(Keyword::Flying).unwrap();
        assert!(state.is_permanent());
        assert_eq!(state.binding, None);
    }

    #[test]
    fn test_stacking_extends() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Vulnerable, 1, OWN, true);
        let outcome = ledger.add(Keyword::Vulnerable, 3, DecayBinding::EnemyTurnStart, true);

        assert_eq!(outcome, AddOutcome::Extended);
        assert_eq!(ledger.duration(Keyword::Vulnerable), Some(2));
        assert_eq!(
            ledger.get(Keyword::Vulnerable).unwrap().binding,
            Some(DecayBinding::EnemyTurnStart)
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_non_stacking_ignored() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Shielded, 2, OWN, false);
        assert_eq!(ledger.add(Keyword::Shielded, 5, OWN, false), AddOutcome::Ignored);
        assert_eq!(ledger.duration(Keyword::Shielded), Some(2));
    }

    #[test]
    fn test_permanent_not_extended() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Stunned, PERMANENT, OWN, true);
        assert_eq!(ledger.add(Keyword::Stunned, 1, OWN, true), AddOutcome::Ignored);
        assert_eq!(ledger.duration(Keyword::Stunned), Some(PERMANENT));
    }

    #[test]
    fn test_decay_to_expiry() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Confused, 3, OWN, true);

        assert_eq!(ledger.decay(Keyword::Confused), DecayOutcome::Remaining(2));
        assert_eq!(ledger.decay(Keyword::Confused), DecayOutcome::Remaining(1));
        assert_eq!(ledger.decay(Keyword::Confused), DecayOutcome::Expired);
        assert!(!ledger.has(Keyword::Confused));
        assert_eq!(ledger.decay(Keyword::Confused), DecayOutcome::Unchanged);
    }

    #[test]
    fn test_zero_duration_expires_on_first_tick() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::OnFire, 0, OWN, true);
        assert_eq!(ledger.decay(Keyword::OnFire), DecayOutcome::Expired);
    }

    #[test]
    fn test_permanent_and_reincarnate_never_decay() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Defending, PERMANENT, OWN, false);
        ledger.add(Keyword::Reincarnate, 2, OWN, true);

        for _ in 0..5 {
            assert_eq!(ledger.decay(Keyword::Defending), DecayOutcome::Unchanged);
            assert_eq!(ledger.decay(Keyword::Reincarnate), DecayOutcome::Unchanged);
        }
        assert_eq!(ledger.duration(Keyword::Reincarnate), Some(2));
    }

    #[test]
    fn test_keyword_set_and_order() {
        let mut ledger = KeywordLedger::new();
        ledger.add(Keyword::Legion, PERMANENT, OWN, false);
        ledger.add(Keyword::Flying, PERMANENT, OWN, false);

        let order: Vec<_> = ledger.iter().map(|s| s.keyword).collect();
        assert_eq!(order, vec![Keyword::Legion, Keyword::Flying]);
        assert!(ledger.keywords().contains(Keyword::Flying));

        ledger.remove(Keyword::Legion);
        assert_eq!(ledger.len(), 1);
        ledger.clear();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_binding_player() {
        let owner = PlayerId::SECOND;
        assert_eq!(DecayBinding::OwnerTurnStart.player(owner), owner);
        assert_eq!(DecayBinding::EnemyTurnStart.player(owner), PlayerId::FIRST);
    }
}
