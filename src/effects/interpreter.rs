//! Effect interpretation.
//!
//! `EffectInterpreter` executes one [`EffectParams`] at a time against the
//! board through [`Rules`]. Every handler resolves its targets (when it has
//! any), mutates state, and reports success or an [`EffectFailure`].
//!
//! ## Qualifiers
//!
//! The `SINGLE`, `BOUNCE` and `ROW` bits of a spec decide how an effect
//! spreads over its candidates:
//!
//! | Qualifier | Meaning |
//! |---|---|
//! | Single | the first candidate (random, as candidates arrive shuffled) |
//! | Bounce | up to `bounce_hits` distinct random candidates |
//! | Row / none | every candidate |
//!
//! Individual effects refine this; see each handler.

use std::sync::Arc;

use log::{debug, warn};

use crate::board::{RowId, Unit};
use crate::cards::EffectKind;
use crate::core::PlayerId;
use crate::keywords::Keyword;
use crate::rules::Rules;

use super::effect::{EffectContext, EffectFailure, EffectParams, EffectSource};
use super::resolver::{TargetQuery, TargetResolver};
use super::targeting::{Qualifier, TargetRef, TargetSpec, Targets};

/// Executes effects.
pub struct EffectInterpreter;

impl EffectInterpreter {
    /// Run effects in order, stopping at the first failure or once the
    /// battle has ended.
    pub fn run(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        effects: &[EffectParams],
    ) -> Result<(), EffectFailure> {
        for params in effects {
            if rules.state.is_over() {
                debug!("battle over; skipping {}", params.kind);
                break;
            }
            Self::apply(rules, ctx, params)?;
        }
        Ok(())
    }

    /// Execute one effect.
    pub fn apply(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        match params.kind {
            EffectKind::Summon => Self::summon(rules, ctx, params),
            EffectKind::FlatDamageInstant => Self::flat_damage(rules, ctx, params),
            EffectKind::RandomDamageInstant => Self::random_damage(rules, ctx, params),
            EffectKind::DrawToHand => {
                Self::draw_to_hand(rules, ctx, params);
                Ok(())
            }
            EffectKind::Replenish => {
                let owner = ctx.source.owner();
                rules.state.hero_mut(owner).replenish(params.replenish);
                debug!("{owner} replenishes {} mana", params.replenish);
                Ok(())
            }
            EffectKind::BurnFromHand | EffectKind::BurnFromDeck => {
                Self::burn(rules, ctx, params);
                Ok(())
            }
            EffectKind::Inflict => Self::inflict(rules, ctx, params),
            EffectKind::Heal => Self::heal(rules, ctx, params),
            EffectKind::BuffAttack | EffectKind::BuffHealth => Self::buff(rules, ctx, params),
            EffectKind::Destroy => Self::destroy(rules, ctx, params),
            EffectKind::Manathirst => Self::manathirst(rules, ctx, params),
            EffectKind::SummonCopy => Self::summon_copy(rules, ctx, params),
            EffectKind::Push | EffectKind::Pull => Self::reposition(rules, ctx, params),
            EffectKind::RequiredKeyword => Self::required_keyword(rules, ctx, params),
            EffectKind::RequiredState => Self::not_specified("RequiredState"),
            EffectKind::DrawAndPlay => Self::not_specified("DrawAndPlay"),
            EffectKind::SwapStats => Self::not_specified("SwapStats"),
            EffectKind::GainCopy => Self::not_specified("GainCopy"),
        }
    }

    fn not_specified(what: &'static str) -> Result<(), EffectFailure> {
        warn!("{what} has no defined behaviour");
        Err(EffectFailure::NotSpecified(what))
    }

    fn targets(
        rules: &mut Rules<'_>,
        ctx: &EffectContext,
        spec: TargetSpec,
    ) -> Result<Targets, EffectFailure> {
        let mut query = TargetQuery::new(spec, ctx.source.owner()).with_persistent(&ctx.persistent);
        if let Some(unit) = ctx.source.unit() {
            query = query.with_source(unit);
        }
        TargetResolver::resolve(&mut *rules.state, &mut *rules.picker, &query)
    }

    fn first(targets: &Targets) -> Result<TargetRef, EffectFailure> {
        targets.first().copied().ok_or(EffectFailure::NoTargets)
    }

    fn sides(owner: PlayerId, spec: TargetSpec) -> Vec<PlayerId> {
        let who = spec.who();
        if who == TargetSpec::EITHER {
            vec![owner, owner.opponent()]
        } else if who == TargetSpec::FRIENDLY {
            vec![owner]
        } else if who == TargetSpec::ENEMY {
            vec![owner.opponent()]
        } else {
            warn!("target spec {spec} names no side");
            Vec::new()
        }
    }

    // === Board ===

    /// Summon the card's unit. Fails on a Locked destination row.
    fn summon(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let data = ctx.summon.clone().ok_or(EffectFailure::MissingSummonData)?;
        let owner = ctx.source.owner();
        let row = RowId::new(owner, data.range);
        if rules.row_locked(row) {
            return Err(EffectFailure::RowLocked(row));
        }
        rules.summon(owner, &data, params.count);
        Ok(())
    }

    /// Copy a unit's template onto the source's side.
    ///
    /// With `LAST_ATTACKED` the copy goes into the row matching the copied
    /// unit's current range; otherwise into the template's own row.
    fn summon_copy(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let spec = params.target;
        let last_attacked = spec.contains(TargetSpec::LAST_ATTACKED) && ctx.source.unit().is_some();
        if !last_attacked {
            match spec.qualifier() {
                Qualifier::Single => {}
                Qualifier::Row => return Self::not_specified("SummonCopy of a row"),
                _ => {
                    warn!("SummonCopy needs a single target, got {spec}");
                    return Err(EffectFailure::InvalidTarget(spec));
                }
            }
        }

        let targets = Self::targets(rules, ctx, spec)?;
        let original = Self::first(&targets)?
            .unit()
            .and_then(|id| rules.state.live_unit(id))
            .map(|u| (Arc::clone(&u.data), u.range));
        let Some((data, current_range)) = original else {
            if last_attacked {
                return Ok(());
            }
            return Err(EffectFailure::InvalidTarget(spec));
        };

        let owner = ctx.source.owner();
        let range = if last_attacked { current_range } else { data.range };
        let row = RowId::new(owner, range);
        if rules.row_locked(row) {
            debug!("{row} is locked; no copy of '{}'", data.name);
            return Ok(());
        }
        for _ in 0..params.count.max(0) {
            rules.spawn_unit(owner, Arc::clone(&data), range);
        }
        Ok(())
    }

    /// Push moves a unit one row back, Pull one row forward. Heroes are
    /// skipped.
    fn reposition(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let spec = params.target;
        let mut targets = Self::targets(rules, ctx, spec)?;
        if spec.qualifier() == Qualifier::Single {
            targets.truncate(1);
        }

        for target in targets {
            let Some(id) = target.unit() else {
                continue;
            };
            if params.kind == EffectKind::Push {
                rules.push(id);
            } else {
                rules.pull(id);
            }
            ctx.save(spec, target);
        }
        Ok(())
    }

    fn destroy(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let targets = Self::targets(rules, ctx, params.target)?;
        for id in targets.iter().filter_map(|t| t.unit()) {
            rules.kill(id);
        }
        Ok(())
    }

    // === Damage and healing ===

    fn flat_damage(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let spec = params.target;
        let targets = Self::targets(rules, ctx, spec)?;

        match spec.qualifier() {
            Qualifier::Single => {
                let target = Self::first(&targets)?;
                rules.damage(target, params.damage);
                ctx.save(spec, target);
            }
            Qualifier::Bounce => {
                let mut pool = targets;
                for _ in 0..params.bounce_hits.max(0) {
                    let Some(index) = rules.state.rng.pick_index(pool.len()) else {
                        break;
                    };
                    let target = pool.remove(index);
                    rules.damage(target, params.damage);
                    ctx.save(spec, target);
                }
            }
            Qualifier::Row | Qualifier::All => {
                for target in targets {
                    rules.damage(target, params.damage);
                    ctx.save(spec, target);
                }
            }
        }
        Ok(())
    }

    /// Hit every candidate for an independent roll in `damage..=damage_max`.
    fn random_damage(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let spec = params.target;
        let targets = Self::targets(rules, ctx, spec)?;
        let max = params.damage_max.max(params.damage);
        for target in targets {
            let roll = rules.state.rng.gen_inclusive(params.damage, max);
            rules.damage(target, roll);
            ctx.save(spec, target);
        }
        Ok(())
    }

    /// Heal.
    ///
    /// `SELF` heals the source unit, or the caster's hero for a card. Single
    /// heals the first hero or damaged unit among the candidates.
    fn heal(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let spec = params.target;
        if spec.is_self_only() {
            let target = match ctx.source {
                EffectSource::Unit { unit, .. } => TargetRef::Unit(unit),
                EffectSource::Card { owner, .. } => TargetRef::Hero(owner),
            };
            rules.heal(target, params.heal);
            return Ok(());
        }
        if matches!(spec.qualifier(), Qualifier::Row | Qualifier::Bounce) {
            return Self::not_specified("Heal with a row or bounce qualifier");
        }

        let targets = Self::targets(rules, ctx, spec)?;
        if spec.qualifier() == Qualifier::Single {
            let pick = targets.iter().copied().find(|t| match t {
                TargetRef::Hero(_) => true,
                TargetRef::Unit(id) => rules
                    .state
                    .live_unit(*id)
                    .is_some_and(|u| u.stats.is_damaged()),
                TargetRef::Row(_) => false,
            });
            if let Some(target) = pick {
                rules.heal(target, params.heal);
            }
        } else {
            for target in targets {
                rules.heal(target, params.heal);
            }
        }
        Ok(())
    }

    // === Stats and keywords ===

    fn buff(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let mut targets = Self::targets(rules, ctx, params.target)?;
        if params.target.qualifier() == Qualifier::Single {
            let index = rules.state.rng.pick_index(targets.len()).unwrap_or(0);
            targets = targets.into_iter().skip(index).take(1).collect();
        }

        for id in targets.iter().filter_map(|t| t.unit()) {
            let Some(unit) = rules.state.units.get_mut(&id).filter(|u| u.is_alive()) else {
                continue;
            };
            if params.kind == EffectKind::BuffAttack {
                unit.stats.temporary_attack_bonus += params.attack_buff;
            } else {
                unit.stats.temporary_health_bonus += params.health_buff;
            }
            let health = unit.current_health();
            debug!("{id} buffed to {}/{health}", unit.current_attack());
            if health <= 0 {
                rules.kill(id);
            }
        }
        Ok(())
    }

    /// Apply a keyword.
    ///
    /// With a Row qualifier, Locked goes onto each candidate's row (once);
    /// any other keyword goes onto the candidates themselves.
    fn inflict(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let keyword = params.keyword()?;
        let spec = params.target;

        if spec.is_self_only() {
            if let Some(unit) = ctx.source.unit() {
                rules.add_unit_keyword(unit, keyword, params.duration);
                return Ok(());
            }
        }

        let targets = Self::targets(rules, ctx, spec)?;
        match spec.qualifier() {
            Qualifier::Single => {
                let target = Self::first(&targets)?;
                if let Some(id) = target.unit() {
                    rules.add_unit_keyword(id, keyword, params.duration);
                }
                ctx.save(spec, target);
            }
            Qualifier::Row => {
                for id in targets.iter().filter_map(|t| t.unit()) {
                    if keyword == Keyword::Locked {
                        let Some(row) = rules.state.live_unit(id).map(Unit::row) else {
                            continue;
                        };
                        if !rules.row_locked(row) {
                            rules.add_row_keyword(row, keyword, params.duration);
                        }
                    } else {
                        rules.add_unit_keyword(id, keyword, params.duration);
                    }
                }
            }
            Qualifier::Bounce | Qualifier::All => {
                for id in targets.iter().filter_map(|t| t.unit()) {
                    rules.add_unit_keyword(id, keyword, params.duration);
                }
            }
        }
        Ok(())
    }

    /// Gate on a keyword.
    ///
    /// With `PERSISTENT`, the first saved target must be a live unit
    /// holding the keyword.
    /// Otherwise the holders found are appended to the saved targets; a
    /// unit ability starts from an empty list and skips itself unless
    /// `SELF` is set.
    fn required_keyword(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let keyword = params.keyword()?;
        let spec = params.target;

        if spec.contains(TargetSpec::PERSISTENT) {
            let holds = ctx
                .persistent
                .first()
                .and_then(|t| t.unit())
                .and_then(|id| rules.state.live_unit(id))
                .is_some_and(|u| u.has(keyword));
            return if holds {
                Ok(())
            } else {
                Err(EffectFailure::RequirementUnmet(keyword))
            };
        }

        let source = ctx.source.unit();
        if source.is_some() {
            ctx.persistent.clear();
        }
        let query = TargetQuery::new(spec, ctx.source.owner()).with_keyword(keyword);
        let mut holders = TargetResolver::resolve(&mut *rules.state, &mut *rules.picker, &query)
            .map_err(|_| EffectFailure::RequirementUnmet(keyword))?;
        if let Some(source) = source {
            if !spec.contains(TargetSpec::SELF) {
                holders.retain(|t| *t != TargetRef::Unit(source));
            }
        }
        if holders.is_empty() {
            return Err(EffectFailure::RequirementUnmet(keyword));
        }

        debug!("{} holder(s) of {keyword} found", holders.len());
        for holder in holders {
            if !ctx.persistent.contains(&holder) {
                ctx.persistent.push(holder);
            }
        }
        Ok(())
    }

    // === Cards and mana ===

    fn draw_to_hand(rules: &mut Rules<'_>, ctx: &EffectContext, params: &EffectParams) {
        for player in Self::sides(ctx.source.owner(), params.target) {
            for _ in 0..params.draw.max(0) {
                if rules.state.is_over() {
                    return;
                }
                rules.draw(player);
            }
        }
    }

    /// Burn from the Friendly or Enemy hand or deck. The casting card is
    /// never burned.
    fn burn(rules: &mut Rules<'_>, ctx: &EffectContext, params: &EffectParams) {
        let owner = ctx.source.owner();
        let who = params.target.who();
        let player = if who == TargetSpec::FRIENDLY {
            owner
        } else if who == TargetSpec::ENEMY {
            owner.opponent()
        } else {
            warn!("burn target {} must be Friendly or Enemy", params.target);
            return;
        };

        if params.kind == EffectKind::BurnFromHand {
            rules.burn_from_hand(player, params.count, ctx.source.card());
        } else {
            rules.burn_from_deck(player, params.count);
        }
    }

    /// Pay extra mana on top of the card's cost.
    fn manathirst(
        rules: &mut Rules<'_>,
        ctx: &mut EffectContext,
        params: &EffectParams,
    ) -> Result<(), EffectFailure> {
        let EffectSource::Card { owner, cost, .. } = ctx.source else {
            return Self::not_specified("Manathirst outside a cast");
        };
        if rules.state.hero_mut(owner).manathirst(cost, params.manathirst) {
            debug!("{owner} pays manathirst {}", params.manathirst);
            Ok(())
        } else {
            Err(EffectFailure::ManathirstUnmet {
                needed: params.manathirst,
            })
        }
    }
}
