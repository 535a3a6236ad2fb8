//! Scripted collaborators for tests and replays.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::board::Unit;
use crate::cards::{Card, CardData};
use crate::core::{CardInstanceId, UnitId};
use crate::effects::{PickMask, TargetRef};
use crate::keywords::{Keyword, KeywordHolder};

use super::{DisplayHandle, Presentation, TargetPicker};

/// One recorded presentation call.
#[derive(Clone, Debug, PartialEq)]
pub enum VisualEvent {
    UnitSpawned(UnitId),
    UnitDestroyed(UnitId),
    KeywordShown(KeywordHolder, Keyword),
    KeywordCleared(KeywordHolder, Keyword),
    CastFailed(CardInstanceId),
    DisplayStarted {
        handle: DisplayHandle,
        card: String,
        secs: f32,
    },
}

/// Records every call it receives.
///
/// Displays finish immediately unless built with
/// [`RecordingPresentation::with_manual_displays`], in which case they stay
/// pending until [`RecordingPresentation::finish_displays`] runs.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresentation {
    pub events: Vec<VisualEvent>,
    manual: bool,
    next_handle: u32,
    finished: FxHashSet<DisplayHandle>,
}

impl RecordingPresentation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep displays pending until finished by hand (builder pattern).
    #[must_use]
    pub fn with_manual_displays(mut self) -> Self {
        self.manual = true;
        self
    }

    /// Mark every display started so far as finished.
    pub fn finish_displays(&mut self) {
        for handle in 0..self.next_handle {
            self.finished.insert(DisplayHandle(handle));
        }
    }

    /// Count events matching a predicate.
    #[must_use]
    pub fn count(&self, pred: impl Fn(&VisualEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presentation for RecordingPresentation {
    fn unit_spawned(&mut self, unit: &Unit) {
        self.events.push(VisualEvent::UnitSpawned(unit.id));
    }

    fn unit_destroyed(&mut self, unit: UnitId) {
        self.events.push(VisualEvent::UnitDestroyed(unit));
    }

    fn keyword_shown(&mut self, holder: KeywordHolder, keyword: Keyword) {
        self.events.push(VisualEvent::KeywordShown(holder, keyword));
    }

    fn keyword_cleared(&mut self, holder: KeywordHolder, keyword: Keyword) {
        self.events.push(VisualEvent::KeywordCleared(holder, keyword));
    }

    fn cast_failed(&mut self, card: &Card) {
        self.events.push(VisualEvent::CastFailed(card.id));
    }

    fn begin_display(&mut self, card: &CardData, secs: f32) -> DisplayHandle {
        let handle = DisplayHandle(self.next_handle);
        self.next_handle += 1;
        self.events.push(VisualEvent::DisplayStarted {
            handle,
            card: card.name.clone(),
            secs,
        });
        handle
    }

    fn display_complete(&mut self, handle: DisplayHandle) -> bool {
        !self.manual || self.finished.contains(&handle)
    }
}

/// Answers picks from a queue and remembers what was asked.
///
/// ## Example
///
/// ```
/// use row_battle::core::PlayerId;
/// use row_battle::effects::{PickMask, TargetRef};
/// use row_battle::presentation::{ScriptedPicker, TargetPicker};
///
/// let mut picker = ScriptedPicker::new().with_pick(TargetRef::Hero(PlayerId::SECOND));
/// assert_eq!(picker.pick(PickMask::ENEMY_HERO), Some(TargetRef::Hero(PlayerId::SECOND)));
/// assert_eq!(picker.pick(PickMask::ENEMY_HERO), None);
/// assert_eq!(picker.requests.len(), 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedPicker {
    picks: VecDeque<TargetRef>,
    pub requests: Vec<PickMask>,
}

impl ScriptedPicker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a pick (builder pattern).
    #[must_use]
    pub fn with_pick(mut self, target: TargetRef) -> Self {
        self.picks.push_back(target);
        self
    }

    /// Queue a pick.
    pub fn push(&mut self, target: TargetRef) {
        self.picks.push_back(target);
    }

    /// Picks not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.picks.len()
    }
}

impl TargetPicker for ScriptedPicker {
    fn pick(&mut self, mask: PickMask) -> Option<TargetRef> {
        self.requests.push(mask);
        self.picks.pop_front()
    }
}
