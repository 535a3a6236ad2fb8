//! Rows.
//!
//! Each side has three rows, one per [`UnitRange`]. A row keeps its units in
//! placement order and can hold row-level keywords such as Locked.

use serde::{Deserialize, Serialize};

use crate::cards::UnitRange;
use crate::core::{PlayerId, UnitId};
use crate::keywords::KeywordLedger;

/// Identifies one row on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RowId {
    pub owner: PlayerId,
    pub range: UnitRange,
}

impl RowId {
    #[must_use]
    pub const fn new(owner: PlayerId, range: UnitRange) -> Self {
        Self { owner, range }
    }
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} row", self.owner, self.range)
    }
}

/// An ordered, capacity-bounded list of units.
///
/// A unit id appears in at most one row at a time; moving is a remove from
/// one row followed by an add to another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    units: Vec<UnitId>,
    pub keywords: KeywordLedger,
    capacity: usize,
}

impl Row {
    /// Create an empty row.
    #[must_use]
    pub fn new(id: RowId, capacity: usize) -> Self {
        Self {
            id,
            units: Vec::with_capacity(capacity),
            keywords: KeywordLedger::new(),
            capacity,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.units.len() >= self.capacity
    }

    #[must_use]
    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    /// Units in placement order.
    #[must_use]
    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    /// Append a unit. Returns false if the row is full.
    pub fn add(&mut self, unit: UnitId) -> bool {
        if self.is_full() || self.contains(unit) {
            return false;
        }
        self.units.push(unit);
        true
    }

    /// Remove a unit. Returns false if it was not here.
    pub fn remove(&mut self, unit: UnitId) -> bool {
        match self.units.iter().position(|u| *u == unit) {
            Some(pos) => {
                self.units.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Empty the row and its keywords.
    pub fn clear(&mut self) {
        self.units.clear();
        self.keywords.clear();
    }
}
