//! Card and unit templates.
//!
//! Templates are immutable once loaded. A [`CardData`] describes a castable
//! card: its cost and an ordered list of [`SpellEffect`]s. Cards that put a
//! unit on the board also carry a [`UnitData`] describing the summoned unit
//! and its [`SummonAbility`] list.
//!
//! Effects and abilities both use the same shape: an [`EffectKind`], a
//! [`TargetSpec`] and a handful of small numeric attributes whose meaning
//! depends on the kind. The interpreter normalises both into
//! `EffectParams` before running them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::effects::TargetSpec;
use crate::keywords::KeywordSet;
use crate::triggers::UnitTrigger;

/// The row class a unit fights from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UnitRange {
    #[default]
    Melee,
    Ranged,
    Siege,
}

impl UnitRange {
    /// All ranges, front to back.
    pub const ALL: [UnitRange; 3] = [UnitRange::Melee, UnitRange::Ranged, UnitRange::Siege];

    /// Row index, front to back.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The next row back, if any.
    #[must_use]
    pub const fn further(self) -> Option<UnitRange> {
        match self {
            UnitRange::Melee => Some(UnitRange::Ranged),
            UnitRange::Ranged => Some(UnitRange::Siege),
            UnitRange::Siege => None,
        }
    }

    /// The next row forward, if any.
    #[must_use]
    pub const fn closer(self) -> Option<UnitRange> {
        match self {
            UnitRange::Melee => None,
            UnitRange::Ranged => Some(UnitRange::Melee),
            UnitRange::Siege => Some(UnitRange::Ranged),
        }
    }

    /// Rows an attacker of this range can reach.
    ///
    /// ```
    /// use row_battle::cards::UnitRange;
    ///
    /// assert_eq!(UnitRange::Melee.reach(), &[UnitRange::Melee]);
    /// assert_eq!(UnitRange::Siege.reach().len(), 3);
    /// ```
    #[must_use]
    pub const fn reach(self) -> &'static [UnitRange] {
        match self {
            UnitRange::Melee => &[UnitRange::Melee],
            UnitRange::Ranged => &[UnitRange::Melee, UnitRange::Ranged],
            UnitRange::Siege => &[UnitRange::Melee, UnitRange::Ranged, UnitRange::Siege],
        }
    }
}

impl std::fmt::Display for UnitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Magic school a card belongs to.
///
/// Hybrid schools combine two of the four primaries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum School {
    #[default]
    Creation,
    Fire,
    Water,
    Chaos,
    Balance,
    Restoration,
    Conjuration,
    Elemental,
    Light,
    Dark,
    Commander,
}

impl School {
    /// The primary schools a school is made of.
    #[must_use]
    pub const fn primaries(self) -> &'static [School] {
        match self {
            School::Creation => &[School::Creation],
            School::Fire => &[School::Fire],
            School::Water => &[School::Water],
            School::Chaos => &[School::Chaos],
            School::Balance => &[School::Creation, School::Fire],
            School::Restoration => &[School::Creation, School::Water],
            School::Conjuration => &[School::Creation, School::Chaos],
            School::Elemental => &[School::Fire, School::Water],
            School::Light => &[School::Fire, School::Chaos],
            School::Dark => &[School::Water, School::Chaos],
            School::Commander => &[],
        }
    }
}

/// Card rarity tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CardTier {
    #[default]
    Novice,
    Adept,
    Master,
    Legendary,
}

/// The AI opponents, each with its own card set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commander {
    EasternPrince,
    Summoner,
    DarkLord,
}

impl Commander {
    pub const ALL: [Commander; 3] = [
        Commander::EasternPrince,
        Commander::Summoner,
        Commander::DarkLord,
    ];
}

/// What an effect does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    Summon,
    FlatDamageInstant,
    RandomDamageInstant,
    DrawToHand,
    DrawAndPlay,
    Replenish,
    BurnFromHand,
    BurnFromDeck,
    Inflict,
    Heal,
    BuffHealth,
    BuffAttack,
    SwapStats,
    Destroy,
    Manathirst,
    SummonCopy,
    GainCopy,
    Pull,
    Push,
    /// Gate: later effects run only if the requirement holds.
    RequiredState,
    /// Gate: later effects run only if a target holds a keyword.
    RequiredKeyword,
}

impl EffectKind {
    /// Gate effects abort the rest of the list when unmet.
    #[must_use]
    pub const fn is_gate(self) -> bool {
        matches!(self, EffectKind::RequiredState | EffectKind::RequiredKeyword)
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// One effect on a card.
///
/// | Attribute | Meaning |
/// |---|---|
/// | `one` | summon or copy count, damage, random minimum, manathirst, burn count |
/// | `two` | random maximum |
/// | `three` | heal, draw, replenish, health buff, keyword index |
/// | `four` | bounce hits, attack buff, inflict duration |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellEffect {
    pub kind: EffectKind,
    pub target: TargetSpec,
    pub one: i32,
    pub two: i32,
    pub three: i32,
    pub four: i32,
}

impl SpellEffect {
    /// Create an effect with all attributes zero.
    #[must_use]
    pub const fn new(kind: EffectKind, target: TargetSpec) -> Self {
        Self {
            kind,
            target,
            one: 0,
            two: 0,
            three: 0,
            four: 0,
        }
    }

    /// Set all four attributes (builder pattern).
    #[must_use]
    pub fn with_attributes(mut self, one: i32, two: i32, three: i32, four: i32) -> Self {
        self.one = one;
        self.two = two;
        self.three = three;
        self.four = four;
        self
    }

    /// Check attribute ranges.
    pub fn validate(&self) -> Result<(), String> {
        check_attr("one", self.one, 0, 20)?;
        check_attr("two", self.two, 0, 20)?;
        check_attr("three", self.three, 0, 20)?;
        check_attr("four", self.four, -1, 20)
    }
}

/// One ability on a unit template.
///
/// | Attribute | Meaning |
/// |---|---|
/// | `one` | heal, draw, replenish, required keyword index |
/// | `two` | attack buff, damage, inflicted keyword index |
/// | `three` | health buff, inflict duration |
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonAbility {
    pub trigger: UnitTrigger,
    pub kind: EffectKind,
    pub target: TargetSpec,
    pub one: i32,
    pub two: i32,
    pub three: i32,
}

impl SummonAbility {
    /// Create an ability with all attributes zero.
    #[must_use]
    pub const fn new(trigger: UnitTrigger, kind: EffectKind, target: TargetSpec) -> Self {
        Self {
            trigger,
            kind,
            target,
            one: 0,
            two: 0,
            three: 0,
        }
    }

    /// Set all three attributes (builder pattern).
    #[must_use]
    pub fn with_attributes(mut self, one: i32, two: i32, three: i32) -> Self {
        self.one = one;
        self.two = two;
        self.three = three;
        self
    }

    /// Check attribute ranges.
    pub fn validate(&self) -> Result<(), String> {
        check_attr("one", self.one, -5, 20)?;
        check_attr("two", self.two, -5, 20)?;
        check_attr("three", self.three, -5, 20)
    }
}

fn check_attr(name: &str, value: i32, min: i32, max: i32) -> Result<(), String> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(format!("attribute {name} = {value} is outside {min}..={max}"))
    }
}

/// Template for a unit on the board.
///
/// ## Example
///
/// ```
/// use row_battle::cards::{UnitData, UnitRange};
/// use row_battle::keywords::Keyword;
///
/// let knight = UnitData::new("Knight", 3, 4)
///     .with_range(UnitRange::Melee)
///     .with_keyword(Keyword::Defending);
///
/// assert!(knight.base_keywords.contains(Keyword::Defending));
/// assert!(knight.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitData {
    pub name: String,
    /// Art reference, opaque to the rules.
    pub art: String,
    pub base_attack: i32,
    pub base_health: i32,
    pub range: UnitRange,
    /// Innate keywords, each added permanently on summon.
    pub base_keywords: KeywordSet,
    pub abilities: Vec<SummonAbility>,
}

impl UnitData {
    /// Create a melee unit template with no keywords or abilities.
    #[must_use]
    pub fn new(name: impl Into<String>, attack: i32, health: i32) -> Self {
        Self {
            name: name.into(),
            art: String::new(),
            base_attack: attack,
            base_health: health,
            range: UnitRange::Melee,
            base_keywords: KeywordSet::empty(),
            abilities: Vec::new(),
        }
    }

    /// Set the range (builder pattern).
    #[must_use]
    pub fn with_range(mut self, range: UnitRange) -> Self {
        self.range = range;
        self
    }

    /// Set the art reference (builder pattern).
    #[must_use]
    pub fn with_art(mut self, art: impl Into<String>) -> Self {
        self.art = art.into();
        self
    }

    /// Add an innate keyword (builder pattern).
    #[must_use]
    pub fn with_keyword(mut self, keyword: crate::keywords::Keyword) -> Self {
        self.base_keywords.insert(keyword);
        self
    }

    /// Append an ability (builder pattern).
    #[must_use]
    pub fn with_ability(mut self, ability: SummonAbility) -> Self {
        self.abilities.push(ability);
        self
    }

    /// The trigger a summoned unit binds to: that of its first ability.
    #[must_use]
    pub fn binding_trigger(&self) -> Option<UnitTrigger> {
        self.abilities.first().map(|a| a.trigger)
    }

    /// Check stat and ability ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=16).contains(&self.base_attack) {
            return Err(format!("base attack {} is outside 0..=16", self.base_attack));
        }
        if !(1..=16).contains(&self.base_health) {
            return Err(format!("base health {} is outside 1..=16", self.base_health));
        }
        for ability in &self.abilities {
            ability.validate()?;
        }
        Ok(())
    }
}

/// Template for a castable card.
///
/// ## Example
///
/// ```
/// use row_battle::cards::{CardData, EffectKind, SpellEffect, UnitData};
/// use row_battle::effects::TargetSpec;
///
/// let card = CardData::new("Raise Footman", 2)
///     .with_effect(SpellEffect::new(EffectKind::Summon, TargetSpec::NONE).with_attributes(1, 0, 0, 0))
///     .with_summon(UnitData::new("Footman", 2, 2));
///
/// assert!(card.validate().is_ok());
/// assert_eq!(card.summon.as_ref().unwrap().name, "Footman");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,
    pub description: String,
    /// Art reference, opaque to the rules.
    pub art: String,
    pub school: School,
    pub tier: CardTier,
    pub cost: i32,
    pub effects: Vec<SpellEffect>,
    /// Unit summoned by `Summon` effects.
    pub summon: Option<Arc<UnitData>>,
}

impl CardData {
    /// Create a card with no effects.
    #[must_use]
    pub fn new(name: impl Into<String>, cost: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            art: String::new(),
            school: School::default(),
            tier: CardTier::default(),
            cost,
            effects: Vec::new(),
            summon: None,
        }
    }

    /// Set the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the school (builder pattern).
    #[must_use]
    pub fn with_school(mut self, school: School) -> Self {
        self.school = school;
        self
    }

    /// Set the tier (builder pattern).
    #[must_use]
    pub fn with_tier(mut self, tier: CardTier) -> Self {
        self.tier = tier;
        self
    }

    /// Append an effect (builder pattern).
    #[must_use]
    pub fn with_effect(mut self, effect: SpellEffect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Attach the summoned unit template (builder pattern).
    #[must_use]
    pub fn with_summon(mut self, unit: UnitData) -> Self {
        self.summon = Some(Arc::new(unit));
        self
    }

    /// True if any effect summons this card's unit.
    #[must_use]
    pub fn summons(&self) -> bool {
        self.effects.iter().any(|e| e.kind == EffectKind::Summon)
    }

    /// Check cost, effect attributes and summon data.
    pub fn validate(&self) -> Result<(), String> {
        if !(0..=20).contains(&self.cost) {
            return Err(format!("mana cost {} is outside 0..=20", self.cost));
        }
        for effect in &self.effects {
            effect.validate()?;
        }
        if let Some(unit) = &self.summon {
            unit.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::Keyword;

    #[test]
    fn test_range_steps() {
        assert_eq!(UnitRange::Melee.further(), Some(UnitRange::Ranged));
        assert_eq!(UnitRange::Siege.further(), None);
        assert_eq!(UnitRange::Melee.closer(), None);
        assert_eq!(UnitRange::Siege.closer(), Some(UnitRange::Ranged));
        assert_eq!(UnitRange::Ranged.reach(), &[UnitRange::Melee, UnitRange::Ranged]);
    }

    #[test]
    fn test_hybrid_schools() {
        assert_eq!(School::Dark.primaries(), &[School::Water, School::Chaos]);
        assert_eq!(School::Fire.primaries(), &[School::Fire]);
        assert!(School::Commander.primaries().is_empty());
    }

    #[test]
    fn test_spell_attribute_ranges() {
        let ok = SpellEffect::new(EffectKind::Inflict, TargetSpec::NONE).with_attributes(0, 0, 3, -1);
        assert!(ok.validate().is_ok());

        let bad = SpellEffect::new(EffectKind::Inflict, TargetSpec::NONE).with_attributes(0, 0, 3, -2);
        assert!(bad.validate().unwrap_err().contains("four"));
    }

    #[test]
    fn test_ability_attribute_ranges() {
        let ability = SummonAbility::new(UnitTrigger::OnDeath, EffectKind::Heal, TargetSpec::NONE)
            .with_attributes(-5, 20, 0);
        assert!(ability.validate().is_ok());
        assert!(ability.with_attributes(-6, 0, 0).validate().is_err());
    }

    #[test]
    fn test_unit_validation() {
        assert!(UnitData::new("Wall", 0, 8).validate().is_ok());
        assert!(UnitData::new("Ghost", 2, 0).validate().is_err());
        assert!(UnitData::new("Titan", 17, 5).validate().is_err());
    }

    #[test]
    fn test_binding_trigger_is_first_ability() {
        let unit = UnitData::new("Priest", 1, 3)
            .with_ability(SummonAbility::new(
                UnitTrigger::StartOfTurn,
                EffectKind::Heal,
                TargetSpec::SELF,
            ))
            .with_ability(SummonAbility::new(
                UnitTrigger::OnDeath,
                EffectKind::DrawToHand,
                TargetSpec::FRIENDLY,
            ));
        assert_eq!(unit.binding_trigger(), Some(UnitTrigger::StartOfTurn));
        assert_eq!(UnitData::new("Plain", 1, 1).binding_trigger(), None);
    }

    #[test]
    fn test_card_summons() {
        let card = CardData::new("Call", 3)
            .with_effect(SpellEffect::new(EffectKind::Summon, TargetSpec::NONE))
            .with_summon(UnitData::new("Wolf", 2, 1).with_keyword(Keyword::Legion));
        assert!(card.summons());
        assert!(!CardData::new("Bolt", 1).summons());
        assert!(CardData::new("Greedy", 21).validate().is_err());
    }

    #[test]
    fn test_card_serde() {
        let card = CardData::new("Spark", 1)
            .with_description("A quick jolt.")
            .with_school(School::Fire)
            .with_summon(UnitData::new("Ember", 1, 1).with_art("ember_unit"))
            .with_effect(
                SpellEffect::new(EffectKind::FlatDamageInstant, TargetSpec::ENEMY | TargetSpec::HERO)
                    .with_attributes(2, 0, 0, 0),
            );
        let json = serde_json::to_string(&card).unwrap();
        let back: CardData = serde_json::from_str(&json).unwrap();
        assert_eq!(card, back);
    }
}
