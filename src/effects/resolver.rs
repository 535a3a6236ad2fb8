//! Target resolution.
//!
//! `TargetResolver` turns a [`TargetSpec`] plus the caster's context into a
//! concrete candidate list. Resolution tries, in order:
//!
//! 1. A keyword-filtered board query, when the caller asks for holders of a
//!    keyword (heroes never qualify).
//! 2. Exactly one "how" bit: `CHOSEN` asks the [`TargetPicker`],
//!    `PERSISTENT` reuses targets saved earlier in the same cast, and
//!    `CURRENT_ROW` / `LAST_ATTACKED` read the source unit's own state.
//! 3. Otherwise a board query over the who and row axes, plus the hero
//!    when `HERO` is set.
//!
//! An empty result is a failure, not an empty success. Board query results
//! are shuffled before they are returned, so callers taking "the first"
//! candidate get a uniformly random one.

use log::{trace, warn};

use crate::battle::BattleState;
use crate::board::RowId;
use crate::core::{PlayerId, UnitId};
use crate::keywords::Keyword;
use crate::presentation::TargetPicker;

use super::effect::EffectFailure;
use super::targeting::{row_ranges, PickKind, PickMask, TargetRef, TargetSpec, Targets};

/// Everything the resolver needs to know about the caster.
#[derive(Clone, Copy, Debug)]
pub struct TargetQuery<'q> {
    pub spec: TargetSpec,
    /// The side casting or owning the ability.
    pub caster: PlayerId,
    /// The unit whose ability is resolving, if any.
    pub source: Option<UnitId>,
    /// Only return units holding this keyword.
    pub keyword: Option<Keyword>,
    /// Targets saved earlier in the same cast.
    pub persistent: &'q [TargetRef],
}

impl<'q> TargetQuery<'q> {
    /// A query with no source unit, keyword filter or saved targets.
    #[must_use]
    pub fn new(spec: TargetSpec, caster: PlayerId) -> Self {
        Self {
            spec,
            caster,
            source: None,
            keyword: None,
            persistent: &[],
        }
    }

    #[must_use]
    pub fn with_source(mut self, unit: UnitId) -> Self {
        self.source = Some(unit);
        self
    }

    #[must_use]
    pub fn with_keyword(mut self, keyword: Keyword) -> Self {
        self.keyword = Some(keyword);
        self
    }

    #[must_use]
    pub fn with_persistent(mut self, persistent: &'q [TargetRef]) -> Self {
        self.persistent = persistent;
        self
    }
}

/// Resolves target specs against the board.
pub struct TargetResolver;

impl TargetResolver {
    /// Resolve a query to a non-empty candidate list.
    pub fn resolve(
        state: &mut BattleState,
        picker: &mut dyn TargetPicker,
        query: &TargetQuery<'_>,
    ) -> Result<Targets, EffectFailure> {
        let spec = query.spec;

        if let Some(keyword) = query.keyword {
            return Self::query_board(state, query.caster, spec, Some(keyword));
        }

        let how = spec.intersection(
            TargetSpec::CHOSEN
                | TargetSpec::PERSISTENT
                | TargetSpec::CURRENT_ROW
                | TargetSpec::LAST_ATTACKED,
        );

        if how == TargetSpec::CHOSEN {
            return Self::chosen(state, picker, query);
        }
        if how == TargetSpec::PERSISTENT {
            return Self::persistent(state, query.persistent);
        }
        if let Some(source) = query.source {
            if how == TargetSpec::CURRENT_ROW {
                return Self::current_row(state, source, spec.contains(TargetSpec::SELF));
            }
            if how == TargetSpec::LAST_ATTACKED {
                return Self::last_attacked(state, source);
            }
        }

        Self::query_board(state, query.caster, spec, None)
    }

    fn chosen(
        state: &BattleState,
        picker: &mut dyn TargetPicker,
        query: &TargetQuery<'_>,
    ) -> Result<Targets, EffectFailure> {
        let Some(mask) = PickMask::for_spec(query.spec) else {
            warn!("no pick mask for chosen target spec {}", query.spec);
            return Err(EffectFailure::InvalidTarget(query.spec));
        };

        let picked = picker.pick(mask).ok_or(EffectFailure::NoTargets)?;
        let category = match picked {
            TargetRef::Hero(player) => PickMask::category(player, query.caster, PickKind::Hero),
            TargetRef::Row(row) => PickMask::category(row.owner, query.caster, PickKind::Row),
            TargetRef::Unit(unit) => {
                let owner = state
                    .live_unit(unit)
                    .map(|u| u.owner)
                    .ok_or(EffectFailure::NoTargets)?;
                PickMask::category(owner, query.caster, PickKind::Unit)
            }
        };
        if !mask.contains(category) {
            warn!("picked {picked} is outside the allowed categories");
            return Err(EffectFailure::NoTargets);
        }

        let targets: Targets = match picked {
            TargetRef::Row(row) => state.row_units(row).into_iter().map(TargetRef::Unit).collect(),
            other => std::iter::once(other).collect(),
        };
        if targets.is_empty() {
            return Err(EffectFailure::NoTargets);
        }
        trace!("chosen targets: {:?}", targets);
        Ok(targets)
    }

    fn persistent(state: &BattleState, saved: &[TargetRef]) -> Result<Targets, EffectFailure> {
        let targets: Targets = saved
            .iter()
            .copied()
            .filter(|t| match t {
                TargetRef::Unit(id) => state.live_unit(*id).is_some(),
                TargetRef::Hero(_) => true,
                TargetRef::Row(_) => false,
            })
            .collect();
        if targets.is_empty() {
            return Err(EffectFailure::NoTargets);
        }
        Ok(targets)
    }

    fn current_row(
        state: &mut BattleState,
        source: UnitId,
        include_self: bool,
    ) -> Result<Targets, EffectFailure> {
        let row = state
            .live_unit(source)
            .map(|u| u.row())
            .ok_or(EffectFailure::NoTargets)?;
        let mut targets: Targets = state
            .row_units(row)
            .into_iter()
            .filter(|id| include_self || *id != source)
            .map(TargetRef::Unit)
            .collect();
        Self::finish(state, &mut targets)?;
        Ok(targets)
    }

    fn last_attacked(state: &BattleState, source: UnitId) -> Result<Targets, EffectFailure> {
        let last = state
            .unit(source)
            .and_then(|u| u.last_attacked)
            .ok_or(EffectFailure::NoTargets)?;
        match last {
            TargetRef::Unit(id) if state.live_unit(id).is_none() => Err(EffectFailure::NoTargets),
            TargetRef::Row(_) => Err(EffectFailure::NoTargets),
            other => Ok(std::iter::once(other).collect()),
        }
    }

    fn query_board(
        state: &mut BattleState,
        caster: PlayerId,
        spec: TargetSpec,
        keyword: Option<Keyword>,
    ) -> Result<Targets, EffectFailure> {
        let who = spec.who();
        let sides = if who == TargetSpec::EITHER {
            vec![caster, caster.opponent()]
        } else if who == TargetSpec::FRIENDLY {
            vec![caster]
        } else if who == TargetSpec::ENEMY {
            vec![caster.opponent()]
        } else {
            warn!("target spec {spec} has no side");
            return Err(EffectFailure::InvalidTarget(spec));
        };

        let ranges = row_ranges(spec);
        if ranges.is_none() {
            warn!("unhandled row combination in {spec}");
        }

        let mut targets = Targets::new();
        for side in sides {
            if keyword.is_none() && spec.contains(TargetSpec::HERO) {
                targets.push(TargetRef::Hero(side));
            }
            for &range in ranges.unwrap_or(&[]) {
                for id in state.row_units(RowId::new(side, range)) {
                    let holds = match keyword {
                        Some(k) => state.unit(id).is_some_and(|u| u.has(k)),
                        None => true,
                    };
                    if holds {
                        targets.push(TargetRef::Unit(id));
                    }
                }
            }
        }

        Self::finish(state, &mut targets)?;
        Ok(targets)
    }

    fn finish(state: &mut BattleState, targets: &mut Targets) -> Result<(), EffectFailure> {
        if targets.is_empty() {
            return Err(EffectFailure::NoTargets);
        }
        state.rng.shuffle(targets);
        trace!("resolved targets: {:?}", targets);
        Ok(())
    }
}
