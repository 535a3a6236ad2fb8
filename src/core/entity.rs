//! Identifiers for runtime board objects.
//!
//! Templates (`UnitData`, `CardData`) are shared and immutable. Every time one
//! is instantiated on the board or in a hand it receives a fresh id from an
//! [`IdAllocator`], so two copies of the same unit are never confused.
//!
//! ```
//! use row_battle::core::{IdAllocator, UnitId};
//!
//! let mut ids = IdAllocator::default();
//! let a: UnitId = ids.next_unit();
//! let b: UnitId = ids.next_unit();
//! assert_ne!(a, b);
//! ```

use serde::{Deserialize, Serialize};

/// A unit standing in one of the six rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// A card sitting in a deck or hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardInstanceId(pub u32);

impl std::fmt::Display for CardInstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Monotonic allocator for unit and card instance ids.
///
/// Ids are never reused within a battle, even after the object is gone.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next_unit: u32,
    next_card: u32,
}

impl IdAllocator {
    /// Allocate the next unit id.
    pub fn next_unit(&mut self) -> UnitId {
        let id = UnitId(self.next_unit);
        self.next_unit += 1;
        id
    }

    /// Allocate the next card instance id.
    pub fn next_card(&mut self) -> CardInstanceId {
        let id = CardInstanceId(self.next_card);
        self.next_card += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_is_monotonic() {
        let mut ids = IdAllocator::default();
        let u0 = ids.next_unit();
        let u1 = ids.next_unit();
        let c0 = ids.next_card();

        assert_eq!(u0, UnitId(0));
        assert_eq!(u1, UnitId(1));
        assert_eq!(c0, CardInstanceId(0));
        assert_eq!(ids.next_unit(), UnitId(2));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", UnitId(7)), "Unit(7)");
        assert_eq!(format!("{}", CardInstanceId(3)), "Card(3)");
    }

    #[test]
    fn test_ids_serialize() {
        let id = UnitId(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: UnitId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
