//! Effect parameters, sources and failures.
//!
//! Card effects (`SpellEffect`) and unit abilities (`SummonAbility`) pack
//! their numbers into anonymous attribute slots, and the two encodings put
//! the same meaning in different slots. Both are normalised into
//! [`EffectParams`] so one interpreter serves both.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::RowId;
use crate::cards::{CardData, EffectKind, SpellEffect, SummonAbility, UnitData};
use crate::core::{CardInstanceId, PlayerId, UnitId};
use crate::keywords::Keyword;

use super::targeting::{TargetRef, TargetSpec, Targets};

/// Why an effect did not resolve.
///
/// These are ordinary game outcomes. A failed card effect aborts the cast;
/// a failed ability is logged and skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EffectFailure {
    #[error("no legal targets")]
    NoTargets,

    #[error("{0} is locked")]
    RowLocked(RowId),

    #[error("card has no unit to summon")]
    MissingSummonData,

    #[error("no target holds {0}")]
    RequirementUnmet(Keyword),

    #[error("not enough mana left to pay {needed}")]
    ManathirstUnmet { needed: i32 },

    #[error("{0} is not specified")]
    NotSpecified(&'static str),

    #[error("target spec {0} is not valid here")]
    InvalidTarget(TargetSpec),

    #[error("attribute {0} does not name a keyword")]
    UnknownKeyword(i32),
}

/// One effect with its attributes decoded by meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectParams {
    pub kind: EffectKind,
    pub target: TargetSpec,
    /// Summons, copies or burns.
    pub count: i32,
    /// Flat damage, or the minimum of a random roll.
    pub damage: i32,
    /// Maximum of a random damage roll.
    pub damage_max: i32,
    pub heal: i32,
    pub draw: i32,
    pub replenish: i32,
    pub health_buff: i32,
    pub attack_buff: i32,
    /// Raw keyword index; see [`EffectParams::keyword`].
    pub keyword_index: i32,
    pub duration: i32,
    pub bounce_hits: i32,
    pub manathirst: i32,
}

impl EffectParams {
    /// Decode a card effect.
    ///
    /// ```
    /// use row_battle::cards::{EffectKind, SpellEffect};
    /// use row_battle::effects::{EffectParams, TargetSpec};
    ///
    /// let bolt = SpellEffect::new(EffectKind::FlatDamageInstant, TargetSpec::ENEMY | TargetSpec::BOUNCE)
    ///     .with_attributes(2, 0, 0, 3);
    /// let params = EffectParams::from_spell(&bolt);
    /// assert_eq!(params.damage, 2);
    /// assert_eq!(params.bounce_hits, 3);
    /// ```
    #[must_use]
    pub fn from_spell(effect: &SpellEffect) -> Self {
        Self {
            kind: effect.kind,
            target: effect.target,
            count: effect.one,
            damage: effect.one,
            damage_max: effect.two,
            heal: effect.three,
            draw: effect.three,
            replenish: effect.three,
            health_buff: effect.three,
            attack_buff: effect.four,
            keyword_index: effect.three,
            duration: effect.four,
            bounce_hits: effect.four,
            manathirst: effect.one,
        }
    }

    /// Decode a unit ability.
    ///
    /// Abilities copy one unit at a time and bounce a single hit.
    #[must_use]
    pub fn from_ability(ability: &SummonAbility) -> Self {
        let keyword_index = if ability.kind == EffectKind::RequiredKeyword {
            ability.one
        } else {
            ability.two
        };
        Self {
            kind: ability.kind,
            target: ability.target,
            count: 1,
            damage: ability.two,
            damage_max: ability.two,
            heal: ability.one,
            draw: 0,
            replenish: ability.one,
            health_buff: ability.three,
            attack_buff: ability.two,
            keyword_index,
            duration: ability.three,
            bounce_hits: 1,
            manathirst: 0,
        }
    }

    /// The keyword named by the keyword attribute.
    pub fn keyword(&self) -> Result<Keyword, EffectFailure> {
        Keyword::from_index(self.keyword_index)
            .ok_or(EffectFailure::UnknownKeyword(self.keyword_index))
    }
}

/// Who is producing an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectSource {
    /// A card being cast from its owner's hand.
    Card {
        owner: PlayerId,
        card: CardInstanceId,
        cost: i32,
    },
    /// A unit ability.
    Unit { owner: PlayerId, unit: UnitId },
}

impl EffectSource {
    #[must_use]
    pub fn owner(self) -> PlayerId {
        match self {
            EffectSource::Card { owner, .. } | EffectSource::Unit { owner, .. } => owner,
        }
    }

    #[must_use]
    pub fn unit(self) -> Option<UnitId> {
        match self {
            EffectSource::Unit { unit, .. } => Some(unit),
            EffectSource::Card { .. } => None,
        }
    }

    #[must_use]
    pub fn card(self) -> Option<CardInstanceId> {
        match self {
            EffectSource::Card { card, .. } => Some(card),
            EffectSource::Unit { .. } => None,
        }
    }
}

/// Per-resolution scratch state.
///
/// Lives for one cast or one ability run. `persistent` threads targets
/// from an earlier effect to a later one.
#[derive(Clone, Debug)]
pub struct EffectContext {
    pub source: EffectSource,
    pub persistent: Targets,
    /// The unit a Summon effect places.
    pub summon: Option<Arc<UnitData>>,
}

impl EffectContext {
    #[must_use]
    pub fn for_card(owner: PlayerId, card: CardInstanceId, data: &CardData) -> Self {
        Self {
            source: EffectSource::Card {
                owner,
                card,
                cost: data.cost,
            },
            persistent: Targets::new(),
            summon: data.summon.clone(),
        }
    }

    #[must_use]
    pub fn for_unit(owner: PlayerId, unit: UnitId) -> Self {
        Self {
            source: EffectSource::Unit { owner, unit },
            persistent: Targets::new(),
            summon: None,
        }
    }

    /// Save a hit target when the spec asks for it.
    pub fn save(&mut self, spec: TargetSpec, target: TargetRef) {
        if spec.saves() && !self.persistent.contains(&target) {
            self.persistent.push(target);
        }
    }
}
