//! Keyword identities and keyword sets.
//!
//! A keyword's index is its bit position. Card data refers to keywords by
//! index (an "inflict keyword 3" effect inflicts Confused), and unit templates
//! carry their innate keywords as a [`KeywordSet`] bitmask.

use serde::{Deserialize, Serialize};

/// A named status a unit or row can hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Keyword {
    Stunned = 0,
    Vulnerable = 1,
    OnFire = 2,
    Confused = 3,
    Flying = 4,
    Shielded = 5,
    Warden = 6,
    Defending = 7,
    Legion = 8,
    Cleave = 9,
    Silenced = 10,
    Siphon = 11,
    Shrouded = 12,
    Reincarnate = 13,
    Reveal = 14,
    Locked = 15,
    Empowering = 16,
}

impl Keyword {
    /// Every keyword in index order.
    pub const ALL: [Keyword; 17] = [
        Keyword::Stunned,
        Keyword::Vulnerable,
        Keyword::OnFire,
        Keyword::Confused,
        Keyword::Flying,
        Keyword::Shielded,
        Keyword::Warden,
        Keyword::Defending,
        Keyword::Legion,
        Keyword::Cleave,
        Keyword::Silenced,
        Keyword::Siphon,
        Keyword::Shrouded,
        Keyword::Reincarnate,
        Keyword::Reveal,
        Keyword::Locked,
        Keyword::Empowering,
    ];

    /// Bit index of this keyword.
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Single-bit mask for this keyword.
    #[must_use]
    pub const fn flag(self) -> u32 {
        1 << (self as u8)
    }

    /// Decode a keyword from a card attribute.
    ///
    /// ```
    /// use row_battle::keywords::Keyword;
    ///
    /// assert_eq!(Keyword::from_index(3), Some(Keyword::Confused));
    /// assert_eq!(Keyword::from_index(17), None);
    /// assert_eq!(Keyword::from_index(-1), None);
    /// ```
    #[must_use]
    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Whether re-adding this keyword to a unit extends its duration.
    ///
    /// Every other keyword ignores a duplicate add.
    #[must_use]
    pub const fn stacks_on_unit(self) -> bool {
        matches!(
            self,
            Keyword::Confused
                | Keyword::Vulnerable
                | Keyword::Stunned
                | Keyword::Reincarnate
                | Keyword::OnFire
        )
    }

    /// Whether re-adding this keyword to a row extends its duration.
    #[must_use]
    pub const fn stacks_on_row(self) -> bool {
        matches!(self, Keyword::Locked)
    }

    /// Reincarnate counts copies rather than turns, so it never ticks down.
    #[must_use]
    pub const fn decays(self) -> bool {
        !matches!(self, Keyword::Reincarnate)
    }
}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A set of keywords stored as a bitmask.
///
/// ## Example
///
/// ```
/// use row_battle::keywords::{Keyword, KeywordSet};
///
/// let set = KeywordSet::empty()
///     .with(Keyword::Flying)
///     .with(Keyword::Shielded);
///
/// assert!(set.contains(Keyword::Flying));
/// assert!(!set.contains(Keyword::Stunned));
/// assert_eq!(set.iter().collect::<Vec<_>>(), vec![Keyword::Flying, Keyword::Shielded]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeywordSet(pub u32);

impl KeywordSet {
    const MASK: u32 = (1 << 17) - 1;

    /// The empty set.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Build from raw bits, dropping bits that name no keyword.
    #[must_use]
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::MASK)
    }

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Add a keyword, builder style.
    #[must_use]
    pub const fn with(self, keyword: Keyword) -> Self {
        Self(self.0 | keyword.flag())
    }

    /// Add a keyword.
    pub fn insert(&mut self, keyword: Keyword) {
        self.0 |= keyword.flag();
    }

    /// Remove a keyword.
    pub fn remove(&mut self, keyword: Keyword) {
        self.0 &= !keyword.flag();
    }

    /// Check for a keyword.
    #[must_use]
    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & keyword.flag() != 0
    }

    /// True if no keyword is set.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 & Self::MASK == 0
    }

    /// Iterate keywords in index order.
    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl FromIterator<Keyword> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = Keyword>>(iter: I) -> Self {
        let mut set = Self::empty();
        for k in iter {
            set.insert(k);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_flag() {
        for (i, k) in Keyword::ALL.iter().enumerate() {
            assert_eq!(k.index() as usize, i);
            assert_eq!(k.flag(), 1 << i);
            assert_eq!(Keyword::from_index(i as i32), Some(*k));
        }
    }

    #[test]
    fn test_stacking_kinds() {
        let stacking: Vec<_> = Keyword::ALL.iter().filter(|k| k.stacks_on_unit()).collect();
        assert_eq!(
            stacking,
            vec![
                &Keyword::Stunned,
                &Keyword::Vulnerable,
                &Keyword::OnFire,
                &Keyword::Confused,
                &Keyword::Reincarnate
            ]
        );
        assert!(Keyword::Locked.stacks_on_row());
        assert!(!Keyword::Shielded.stacks_on_row());
    }

    #[test]
    fn test_reincarnate_does_not_decay() {
        assert!(!Keyword::Reincarnate.decays());
        assert!(Keyword::Stunned.decays());
    }

    #[test]
    fn test_set_truncates_unknown_bits() {
        let set = KeywordSet::from_bits_truncate(u32::MAX);
        assert_eq!(set.iter().count(), Keyword::ALL.len());
        assert_eq!(set.bits(), (1 << 17) - 1);
    }

    #[test]
    fn test_set_insert_remove() {
        let mut set = KeywordSet::empty();
        assert!(set.is_empty());
        set.insert(Keyword::Legion);
        assert!(set.contains(Keyword::Legion));
        set.remove(Keyword::Legion);
        assert!(set.is_empty());
    }

    #[test]
    fn test_set_from_iter() {
        let set: KeywordSet = [Keyword::Defending, Keyword::Warden].into_iter().collect();
        assert_eq!(set.bits(), Keyword::Defending.flag() | Keyword::Warden.flag());
    }
}
