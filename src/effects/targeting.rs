//! Target specifiers and target references.
//!
//! A [`TargetSpec`] is a bitset over three independent axes plus modifiers:
//!
//! | Axis | Bits |
//! |---|---|
//! | who | `FRIENDLY`, `ENEMY` (`EITHER` = both) |
//! | what | `SINGLE`, `ROW`, `HERO`, `MELEE_ROW`, `RANGED_ROW`, `SIEGE_ROW` |
//! | how | `CHOSEN`, `CURRENT_ROW`, `LAST_ATTACKED`, `PERSISTENT`, `BOUNCE`, `SELF` |
//! | modifier | `SAVE_FOR_PERSISTENT` |
//!
//! Resolution turns a spec into a list of [`TargetRef`]s. A `TargetRef` is a
//! tagged reference to a hero, unit or row, looked up by pattern match.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::RowId;
use crate::cards::UnitRange;
use crate::core::{PlayerId, UnitId};

/// Bitset describing what an effect targets.
///
/// ## Example
///
/// ```
/// use row_battle::effects::{Qualifier, TargetSpec};
///
/// let spec = TargetSpec::ENEMY | TargetSpec::ALL_ROWS | TargetSpec::SINGLE;
/// assert!(spec.contains(TargetSpec::MELEE_ROW));
/// assert_eq!(spec.who(), TargetSpec::ENEMY);
/// assert_eq!(spec.qualifier(), Qualifier::Single);
/// assert_eq!(spec.bits(), 1024 | 448 | 1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetSpec(u16);

impl TargetSpec {
    pub const NONE: TargetSpec = TargetSpec(0);
    pub const SINGLE: TargetSpec = TargetSpec(1);
    pub const BOUNCE: TargetSpec = TargetSpec(1 << 1);
    pub const SELF: TargetSpec = TargetSpec(1 << 2);
    pub const CHOSEN: TargetSpec = TargetSpec(1 << 3);
    pub const HERO: TargetSpec = TargetSpec(1 << 4);
    pub const ROW: TargetSpec = TargetSpec(1 << 5);
    pub const MELEE_ROW: TargetSpec = TargetSpec(1 << 6);
    pub const RANGED_ROW: TargetSpec = TargetSpec(1 << 7);
    pub const SIEGE_ROW: TargetSpec = TargetSpec(1 << 8);
    pub const FRIENDLY: TargetSpec = TargetSpec(1 << 9);
    pub const ENEMY: TargetSpec = TargetSpec(1 << 10);
    pub const CURRENT_ROW: TargetSpec = TargetSpec(1 << 11);
    pub const PERSISTENT: TargetSpec = TargetSpec(1 << 12);
    pub const LAST_ATTACKED: TargetSpec = TargetSpec(1 << 13);
    pub const SAVE_FOR_PERSISTENT: TargetSpec = TargetSpec(1 << 14);

    pub const ALL_ROWS: TargetSpec = TargetSpec(
        Self::MELEE_ROW.0 | Self::RANGED_ROW.0 | Self::SIEGE_ROW.0,
    );
    pub const EITHER: TargetSpec = TargetSpec(Self::FRIENDLY.0 | Self::ENEMY.0);

    const MASK: u16 = (1 << 15) - 1;

    /// Build from raw bits, dropping unknown bits.
    #[must_use]
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// True if every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: TargetSpec) -> bool {
        self.0 & other.0 == other.0
    }

    /// True if any bit of `other` is set.
    #[must_use]
    pub const fn intersects(self, other: TargetSpec) -> bool {
        self.0 & other.0 != 0
    }

    #[must_use]
    pub const fn intersection(self, other: TargetSpec) -> TargetSpec {
        TargetSpec(self.0 & other.0)
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The who axis.
    #[must_use]
    pub const fn who(self) -> TargetSpec {
        self.intersection(Self::EITHER)
    }

    /// The row axis.
    #[must_use]
    pub const fn rows(self) -> TargetSpec {
        self.intersection(Self::ALL_ROWS)
    }

    /// True for a spec that is exactly `SELF`.
    #[must_use]
    pub const fn is_self_only(self) -> bool {
        self.0 == Self::SELF.0
    }

    /// True if the spec asks to save hit targets for later effects.
    #[must_use]
    pub const fn saves(self) -> bool {
        self.contains(Self::SAVE_FOR_PERSISTENT)
    }

    /// How an effect spreads over its candidates.
    #[must_use]
    pub fn qualifier(self) -> Qualifier {
        let q = self.intersection(Self::SINGLE | Self::BOUNCE | Self::ROW);
        if q == Self::SINGLE {
            Qualifier::Single
        } else if q == Self::BOUNCE {
            Qualifier::Bounce
        } else if q == Self::ROW {
            Qualifier::Row
        } else {
            Qualifier::All
        }
    }
}

impl std::ops::BitOr for TargetSpec {
    type Output = TargetSpec;

    fn bitor(self, rhs: TargetSpec) -> TargetSpec {
        TargetSpec(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TargetSpec {
    fn bitor_assign(&mut self, rhs: TargetSpec) {
        self.0 |= rhs.0;
    }
}

impl std::fmt::Display for TargetSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const NAMES: [&str; 15] = [
            "Single",
            "Bounce",
            "Self",
            "Chosen",
            "Hero",
            "Row",
            "MeleeRow",
            "RangedRow",
            "SiegeRow",
            "Friendly",
            "Enemy",
            "CurrentRow",
            "Persistent",
            "LastAttacked",
            "SaveForPersistent",
        ];
        if self.is_empty() {
            return write!(f, "None");
        }
        let names: Vec<&str> = NAMES
            .iter()
            .enumerate()
            .filter(|(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, name)| *name)
            .collect();
        write!(f, "{}", names.join("|"))
    }
}

/// How an effect applies to a candidate list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Qualifier {
    /// One candidate.
    Single,
    /// Up to N distinct random candidates.
    Bounce,
    /// Row-wide.
    Row,
    /// No qualifier: every candidate.
    All,
}

/// A tagged reference to something an effect can act on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetRef {
    Hero(PlayerId),
    Unit(UnitId),
    Row(RowId),
}

impl TargetRef {
    /// The unit id, if this is a unit.
    #[must_use]
    pub fn unit(self) -> Option<UnitId> {
        match self {
            TargetRef::Unit(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_hero(self) -> bool {
        matches!(self, TargetRef::Hero(_))
    }
}

impl std::fmt::Display for TargetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetRef::Hero(player) => write!(f, "{} hero", player),
            TargetRef::Unit(id) => write!(f, "{}", id),
            TargetRef::Row(row) => write!(f, "{}", row),
        }
    }
}

/// A resolved candidate list.
pub type Targets = SmallVec<[TargetRef; 8]>;

/// Categories a pointer pick may land on.
///
/// Derived from a spec's who and what axes, from the picker's point of
/// view (friendly means the caster's side).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PickMask(u8);

impl PickMask {
    pub const FRIENDLY_ROW: PickMask = PickMask(1);
    pub const ENEMY_ROW: PickMask = PickMask(1 << 1);
    pub const FRIENDLY_UNIT: PickMask = PickMask(1 << 2);
    pub const ENEMY_UNIT: PickMask = PickMask(1 << 3);
    pub const FRIENDLY_HERO: PickMask = PickMask(1 << 4);
    pub const ENEMY_HERO: PickMask = PickMask(1 << 5);

    #[must_use]
    pub const fn empty() -> Self {
        PickMask(0)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn union(self, other: PickMask) -> PickMask {
        PickMask(self.0 | other.0)
    }

    #[must_use]
    pub const fn contains(self, other: PickMask) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Derive the pick mask for a spec.
    ///
    /// Returns `None` when the what axis is not one of Row, Single, Hero or
    /// Hero|Single, or the who axis is empty.
    ///
    /// ```
    /// use row_battle::effects::{PickMask, TargetSpec};
    ///
    /// let mask = PickMask::for_spec(TargetSpec::CHOSEN | TargetSpec::SINGLE | TargetSpec::ENEMY);
    /// assert_eq!(mask, Some(PickMask::ENEMY_UNIT));
    ///
    /// let both = PickMask::for_spec(TargetSpec::HERO | TargetSpec::SINGLE | TargetSpec::EITHER).unwrap();
    /// assert!(both.contains(PickMask::FRIENDLY_HERO));
    /// assert!(both.contains(PickMask::ENEMY_UNIT));
    /// ```
    #[must_use]
    pub fn for_spec(spec: TargetSpec) -> Option<PickMask> {
        let what = spec.intersection(TargetSpec::ROW | TargetSpec::SINGLE | TargetSpec::HERO);
        let (friendly, enemy) = if what == TargetSpec::ROW {
            (Self::FRIENDLY_ROW, Self::ENEMY_ROW)
        } else if what == TargetSpec::SINGLE {
            (Self::FRIENDLY_UNIT, Self::ENEMY_UNIT)
        } else if what == TargetSpec::HERO {
            (Self::FRIENDLY_HERO, Self::ENEMY_HERO)
        } else if what == TargetSpec::HERO | TargetSpec::SINGLE {
            (
                Self::FRIENDLY_HERO.union(Self::FRIENDLY_UNIT),
                Self::ENEMY_HERO.union(Self::ENEMY_UNIT),
            )
        } else {
            return None;
        };

        let who = spec.who();
        let mask = if who == TargetSpec::EITHER {
            friendly.union(enemy)
        } else if who == TargetSpec::FRIENDLY {
            friendly
        } else if who == TargetSpec::ENEMY {
            enemy
        } else {
            return None;
        };
        Some(mask)
    }

    /// The category a reference falls in, seen from `caster`.
    #[must_use]
    pub fn category(target_owner: PlayerId, caster: PlayerId, kind: PickKind) -> PickMask {
        let friendly = target_owner == caster;
        match (kind, friendly) {
            (PickKind::Row, true) => Self::FRIENDLY_ROW,
            (PickKind::Row, false) => Self::ENEMY_ROW,
            (PickKind::Unit, true) => Self::FRIENDLY_UNIT,
            (PickKind::Unit, false) => Self::ENEMY_UNIT,
            (PickKind::Hero, true) => Self::FRIENDLY_HERO,
            (PickKind::Hero, false) => Self::ENEMY_HERO,
        }
    }
}

/// Kind of a picked object, for [`PickMask::category`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickKind {
    Row,
    Unit,
    Hero,
}

/// Row ranges selected by a spec's row axis.
///
/// Returns `None` for row combinations the board query does not handle
/// (Melee with Ranged, or Melee with Siege).
#[must_use]
pub fn row_ranges(spec: TargetSpec) -> Option<&'static [UnitRange]> {
    const NO_ROWS: &[UnitRange] = &[];
    const MELEE: &[UnitRange] = &[UnitRange::Melee];
    const RANGED: &[UnitRange] = &[UnitRange::Ranged];
    const SIEGE: &[UnitRange] = &[UnitRange::Siege];
    const BACK: &[UnitRange] = &[UnitRange::Ranged, UnitRange::Siege];
    const ALL: &[UnitRange] = &UnitRange::ALL;

    let rows = spec.rows();
    if rows.is_empty() {
        Some(NO_ROWS)
    } else if rows == TargetSpec::MELEE_ROW {
        Some(MELEE)
    } else if rows == TargetSpec::RANGED_ROW {
        Some(RANGED)
    } else if rows == TargetSpec::SIEGE_ROW {
        Some(SIEGE)
    } else if rows == TargetSpec::RANGED_ROW | TargetSpec::SIEGE_ROW {
        Some(BACK)
    } else if rows == TargetSpec::ALL_ROWS {
        Some(ALL)
    } else {
        None
    }
}
