//! Card database.
//!
//! The `CardDatabase` holds named card sets: a debug set, one set per
//! school, and one per [`Commander`]. Sets are checked once with
//! [`CardDatabase::validate`]. A set that fails is logged and dropped, so a
//! bad data file never stops a battle from starting.

use std::sync::Arc;

use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::ConfigError;

use super::definition::{CardData, Commander, School};

/// Name of a card set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardSet {
    Debug,
    School(School),
    Commander(Commander),
}

impl std::fmt::Display for CardSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CardSet::Debug => write!(f, "Debug"),
            CardSet::School(school) => write!(f, "{:?}", school),
            CardSet::Commander(commander) => write!(f, "{:?}", commander),
        }
    }
}

/// Named card sets.
///
/// ## Example
///
/// ```
/// use row_battle::cards::{CardData, CardDatabase, CardSet, Commander};
///
/// let mut db = CardDatabase::new();
/// db.insert(CardSet::Commander(Commander::Summoner), vec![CardData::new("Bolt", 1)]);
/// db.insert(CardSet::Commander(Commander::DarkLord), vec![]);
///
/// let errors = db.validate();
/// assert_eq!(errors.len(), 1);
/// assert_eq!(db.deck_for(Commander::Summoner).len(), 1);
/// assert!(db.deck_for(Commander::DarkLord).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardDatabase {
    sets: FxHashMap<CardSet, Vec<Arc<CardData>>>,
}

impl CardDatabase {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a set.
    pub fn insert(&mut self, set: CardSet, cards: Vec<CardData>) {
        self.sets
            .insert(set, cards.into_iter().map(Arc::new).collect());
    }

    /// Look up a set.
    #[must_use]
    pub fn get(&self, set: CardSet) -> Option<&[Arc<CardData>]> {
        self.sets.get(&set).map(Vec::as_slice)
    }

    /// The deck list for a commander.
    ///
    /// Empty when the set is missing or was dropped by validation.
    #[must_use]
    pub fn deck_for(&self, commander: Commander) -> &[Arc<CardData>] {
        self.get(CardSet::Commander(commander)).unwrap_or(&[])
    }

    /// Number of sets held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Check every set, dropping the ones that fail.
    ///
    /// Returns one error per dropped set.
    pub fn validate(&mut self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut names: Vec<CardSet> = self.sets.keys().copied().collect();
        names.sort_by_key(ToString::to_string);

        for set in names {
            let Some(cards) = self.sets.get(&set) else {
                continue;
            };
            match validate_set(set, cards) {
                Ok(()) => {
                    let list: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
                    debug!("card set {}: {}", set, list.join("; "));
                }
                Err(err) => {
                    warn!("dropping card set {}: {}", set, err);
                    self.sets.remove(&set);
                    errors.push(err);
                }
            }
        }
        errors
    }
}

fn validate_set(set: CardSet, cards: &[Arc<CardData>]) -> Result<(), ConfigError> {
    if cards.is_empty() {
        return Err(ConfigError::EmptyCardSet(set.to_string()));
    }
    for card in cards {
        if card.summons() && card.summon.is_none() {
            return Err(ConfigError::MissingSummonData {
                set: set.to_string(),
                card: card.name.clone(),
            });
        }
        card.validate().map_err(|reason| ConfigError::InvalidCard {
            set: set.to_string(),
            card: card.name.clone(),
            reason,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{EffectKind, SpellEffect, UnitData};
    use crate::effects::TargetSpec;

    fn summon_card(with_unit: bool) -> CardData {
        let card = CardData::new("Call Wolves", 3)
            .with_effect(SpellEffect::new(EffectKind::Summon, TargetSpec::NONE).with_attributes(2, 0, 0, 0));
        if with_unit {
            card.with_summon(UnitData::new("Wolf", 2, 2))
        } else {
            card
        }
    }

    #[test]
    fn test_valid_sets_kept() {
        let mut db = CardDatabase::new();
        db.insert(CardSet::Debug, vec![summon_card(true), CardData::new("Bolt", 1)]);
        db.insert(CardSet::School(School::Fire), vec![CardData::new("Ember", 0)]);

        assert!(db.validate().is_empty());
        assert_eq!(db.len(), 2);
        assert_eq!(db.get(CardSet::Debug).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_summon_data_dropped() {
        let mut db = CardDatabase::new();
        db.insert(CardSet::Commander(Commander::EasternPrince), vec![summon_card(false)]);

        let errors = db.validate();
        assert_eq!(
            errors,
            vec![ConfigError::MissingSummonData {
                set: "EasternPrince".into(),
                card: "Call Wolves".into(),
            }]
        );
        assert!(db.deck_for(Commander::EasternPrince).is_empty());
    }

    #[test]
    fn test_empty_and_invalid_sets() {
        let mut db = CardDatabase::new();
        db.insert(CardSet::School(School::Water), vec![]);
        db.insert(CardSet::School(School::Chaos), vec![CardData::new("Overpriced", 30)]);
        db.insert(CardSet::Debug, vec![CardData::new("Fine", 2)]);

        let errors = db.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.contains(&ConfigError::EmptyCardSet("Water".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidCard { card, .. } if card == "Overpriced")));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_unknown_commander_is_empty() {
        let db = CardDatabase::new();
        assert!(db.deck_for(Commander::DarkLord).is_empty());
    }
}
