//! Collaborator boundary to the presentation layer.
//!
//! The rules never render anything. They call out through two traits:
//!
//! - [`Presentation`]: fire-and-forget visual notifications, plus the
//!   two-phase card display the commander waits on
//! - [`TargetPicker`]: "which object is the pointer on", constrained to a
//!   [`PickMask`]
//!
//! Every `Presentation` method has a no-op default, so a front end only
//! implements what it draws. [`NullPresentation`] is the headless choice;
//! [`RecordingPresentation`] and [`ScriptedPicker`] drive tests.

mod scripted;

pub use scripted::{RecordingPresentation, ScriptedPicker, VisualEvent};

use serde::{Deserialize, Serialize};

use crate::board::Unit;
use crate::cards::{Card, CardData};
use crate::core::UnitId;
use crate::effects::{PickMask, TargetRef};
use crate::keywords::{Keyword, KeywordHolder};

/// Handle for an in-flight card display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DisplayHandle(pub u32);

impl DisplayHandle {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Visual side effects of rules events.
pub trait Presentation {
    /// A unit entered the board.
    fn unit_spawned(&mut self, _unit: &Unit) {}

    /// A unit's visual should be torn down.
    fn unit_destroyed(&mut self, _unit: UnitId) {}

    /// A keyword icon should appear.
    fn keyword_shown(&mut self, _holder: KeywordHolder, _keyword: Keyword) {}

    /// A keyword icon should disappear.
    fn keyword_cleared(&mut self, _holder: KeywordHolder, _keyword: Keyword) {}

    /// A cast was refused and the card goes back to the hand.
    fn cast_failed(&mut self, _card: &Card) {}

    /// Start showing a card for `secs` seconds.
    fn begin_display(&mut self, card: &CardData, secs: f32) -> DisplayHandle;

    /// Whether a display started with [`Presentation::begin_display`] has
    /// finished.
    fn display_complete(&mut self, handle: DisplayHandle) -> bool;
}

/// Pointer picking, used by Chosen targeting and unit attacks.
pub trait TargetPicker {
    /// The object under the pointer, if it falls in `mask`.
    fn pick(&mut self, mask: PickMask) -> Option<TargetRef>;
}

/// Headless presentation: draws nothing, displays finish at once.
#[derive(Clone, Debug, Default)]
pub struct NullPresentation {
    next_handle: u32,
}

impl NullPresentation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presentation for NullPresentation {
    fn begin_display(&mut self, _card: &CardData, _secs: f32) -> DisplayHandle {
        let handle = DisplayHandle(self.next_handle);
        self.next_handle += 1;
        handle
    }

    fn display_complete(&mut self, _handle: DisplayHandle) -> bool {
        true
    }
}

/// A picker with nothing under the pointer.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPicker;

impl TargetPicker for NoPicker {
    fn pick(&mut self, _mask: PickMask) -> Option<TargetRef> {
        None
    }
}
