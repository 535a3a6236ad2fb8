//! Casting cards from hand.
//!
//! A cast checks the caster can pay, runs the card's effects in order and
//! only then spends mana and removes the card. If an effect fails, the cast
//! fails: mana stays unspent and the card stays in hand. An unmet
//! Manathirst is the exception. It stops the remaining effects but the
//! cast still counts.

use std::sync::Arc;

use log::debug;
use thiserror::Error;

use crate::core::{BattleError, CardInstanceId, PlayerId, Result};
use crate::rules::Rules;

use super::effect::{EffectContext, EffectFailure, EffectParams};
use super::interpreter::EffectInterpreter;

/// Why a cast did not go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CastFailure {
    #[error("costs {cost} but only {available} mana is available")]
    InsufficientMana { cost: i32, available: i32 },

    #[error(transparent)]
    Effect(#[from] EffectFailure),
}

/// Outcome of [`CardCaster::cast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastResult {
    /// The card resolved, its cost was paid and it left the hand.
    /// `stopped_early` is set when an unmet Manathirst cut it short.
    Succeeded { stopped_early: bool },
    /// Nothing was paid and the card is still in hand.
    Failed(CastFailure),
}

impl CastResult {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        matches!(self, CastResult::Succeeded { .. })
    }
}

/// Casts cards.
pub struct CardCaster;

impl CardCaster {
    /// Cast `card` from `player`'s hand.
    ///
    /// Errors only on misuse: a finished battle, the wrong player, or a card
    /// that is not in hand. Game outcomes come back as [`CastResult`].
    pub fn cast(
        rules: &mut Rules<'_>,
        player: PlayerId,
        card: CardInstanceId,
    ) -> Result<CastResult> {
        if rules.state.is_over() {
            return Err(BattleError::BattleOver);
        }
        if rules.state.active != player {
            return Err(BattleError::NotActivePlayer(player));
        }
        let Some(held) = rules.state.hero(player).hand.get(card).cloned() else {
            return Err(BattleError::CardNotInHand { card, player });
        };
        let data = Arc::clone(&held.data);

        let hero = rules.state.hero(player);
        if !hero.can_cast(data.cost) {
            let available = hero.usable_mana();
            debug!("{player} cannot afford {held}: {available} mana");
            rules.view.cast_failed(&held);
            return Ok(CastResult::Failed(CastFailure::InsufficientMana {
                cost: data.cost,
                available,
            }));
        }

        let mut ctx = EffectContext::for_card(player, card, &data);
        let effects: Vec<EffectParams> = data.effects.iter().map(EffectParams::from_spell).collect();
        let stopped_early = match EffectInterpreter::run(rules, &mut ctx, &effects) {
            Ok(()) => false,
            Err(EffectFailure::ManathirstUnmet { needed }) => {
                debug!("{held} stops: manathirst {needed} unmet");
                true
            }
            Err(failure) => {
                debug!("{held} fails: {failure}");
                rules.view.cast_failed(&held);
                return Ok(CastResult::Failed(failure.into()));
            }
        };

        let hero = rules.state.hero_mut(player);
        hero.consume_mana(data.cost);
        hero.hand.remove(card);
        debug!("{player} casts {held}");
        Ok(CastResult::Succeeded { stopped_early })
    }
}
