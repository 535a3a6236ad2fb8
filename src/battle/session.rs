//! The battle session: turn controller and input routing.
//!
//! `BattleSession` owns one battle and its collaborators. It is driven from
//! outside by three calls:
//!
//! - [`BattleSession::handle_intent`] for player input,
//! - [`BattleSession::tick`] to advance the turn timer and finish AI card
//!   displays,
//! - [`BattleSession::end_turn`] to hand over explicitly.
//!
//! ## Turn flow
//!
//! Opening a turn draws, grows mana and runs the side's turn-start
//! schedule. A human side then waits for intents. A commander side either
//! starts displaying the card it wants to play (the turn suspends until the
//! display completes on a later `tick`) or goes straight to its attacks and
//! hands the turn over.
//!
//! ```
//! use std::sync::Arc;
//! use row_battle::battle::{BattleSession, BattleState};
//! use row_battle::cards::CardData;
//! use row_battle::core::{BattleConfig, PlayerId};
//! use row_battle::presentation::{NoPicker, NullPresentation};
//!
//! let deck = vec![Arc::new(CardData::new("Filler", 1)); 10];
//! let state = BattleState::new(BattleConfig::default().with_seed(7))
//!     .with_deck(PlayerId::FIRST, deck.clone())
//!     .with_deck(PlayerId::SECOND, deck);
//! let mut session = BattleSession::new(state, NullPresentation::new(), NoPicker);
//!
//! session.start().unwrap();
//! assert_eq!(session.state().active, PlayerId::FIRST);
//! session.end_turn().unwrap();
//! assert_eq!(session.state().active, PlayerId::SECOND);
//! ```

use std::sync::Arc;

use log::{debug, warn};

use crate::board::RowId;
use crate::cards::{Deck, UnitRange};
use crate::core::{BattleError, CardInstanceId, PlayerId, PlayerMap, Result, UnitId};
use crate::effects::{CardCaster, CastResult, PickMask, TargetRef};
use crate::presentation::{DisplayHandle, Presentation, TargetPicker};
use crate::rules::{AttackResult, Rules};
use crate::triggers::{TurnHook, TurnPhase};

use super::commander::{CommanderAi, TurnPolicy};
use super::input::{Intent, IntentOutcome, PressTarget, Selection};
use super::state::BattleState;

/// Where the session is within the current turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TurnStage {
    #[default]
    NotStarted,
    /// The active side may act.
    AwaitingInput,
    /// A commander is showing the card it will cast.
    Displaying {
        card: CardInstanceId,
        handle: DisplayHandle,
    },
    Finished,
}

/// One battle with its presentation and picker.
pub struct BattleSession<V: Presentation, T: TargetPicker> {
    state: BattleState,
    view: V,
    picker: T,
    policies: PlayerMap<TurnPolicy>,
    stage: TurnStage,
    turn_timer: f32,
    selection: Option<Selection>,
}

impl<V: Presentation, T: TargetPicker> BattleSession<V, T> {
    /// Wrap a battle. Both sides start as human; call [`start`](Self::start)
    /// to deal and open the first turn.
    pub fn new(state: BattleState, view: V, picker: T) -> Self {
        Self {
            state,
            view,
            picker,
            policies: PlayerMap::default(),
            stage: TurnStage::NotStarted,
            turn_timer: 0.0,
            selection: None,
        }
    }

    /// Set how a side takes its turns (builder pattern).
    #[must_use]
    pub fn with_policy(mut self, player: PlayerId, policy: TurnPolicy) -> Self {
        self.policies[player] = policy;
        self
    }

    // === Accessors ===

    #[must_use]
    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BattleState {
        &mut self.state
    }

    #[must_use]
    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn picker_mut(&mut self) -> &mut T {
        &mut self.picker
    }

    #[must_use]
    pub fn stage(&self) -> TurnStage {
        self.stage
    }

    #[must_use]
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Seconds elapsed in the current turn.
    #[must_use]
    pub fn turn_timer(&self) -> f32 {
        self.turn_timer
    }

    #[must_use]
    pub fn policy(&self, player: PlayerId) -> TurnPolicy {
        self.policies[player]
    }

    /// Borrow the rules context for direct board manipulation.
    pub fn rules(&mut self) -> Rules<'_> {
        Rules::new(&mut self.state, &mut self.view, &mut self.picker)
    }

    // === Lifecycle ===

    /// Reset both sides, deal and open the first player's turn.
    ///
    /// May be called again to restart the battle.
    pub fn start(&mut self) -> Result<()> {
        self.state.config.validate()?;
        self.reset_board();

        let starting = self.state.config.starting_draw;
        let mut rules = self.rules();
        for player in PlayerId::both() {
            for _ in 0..starting {
                rules.draw(player);
            }
        }

        debug!("battle starts");
        if self.open_turn(PlayerId::FIRST) {
            self.advance();
        }
        Ok(())
    }

    fn reset_board(&mut self) {
        let BattleState {
            heroes,
            units,
            schedule,
            deck_lists,
            ids,
            rng,
            outcome,
            turn,
            active,
            ..
        } = &mut self.state;

        units.clear();
        schedule.clear();
        *outcome = None;
        *turn = 0;
        *active = PlayerId::FIRST;

        for (player, hero) in heroes.iter_mut() {
            hero.reset();
            hero.deck = Deck::from_templates(&deck_lists[player], player, ids);
            hero.deck.shuffle(rng);
            for range in UnitRange::ALL {
                let row = RowId::new(player, range);
                schedule.register(player, TurnPhase::Start, TurnHook::ResetRow(row));
            }
        }

        self.selection = None;
        self.turn_timer = 0.0;
        self.stage = TurnStage::NotStarted;
    }

    fn ensure_running(&self) -> Result<()> {
        if self.state.is_over() {
            return Err(BattleError::BattleOver);
        }
        match self.stage {
            TurnStage::NotStarted => Err(BattleError::NotStarted),
            TurnStage::Finished => Err(BattleError::BattleOver),
            TurnStage::AwaitingInput | TurnStage::Displaying { .. } => Ok(()),
        }
    }

    fn finish_if_over(&mut self) -> bool {
        if !self.state.is_over() {
            return false;
        }
        if self.stage != TurnStage::Finished {
            debug!("battle over: {:?}", self.state.outcome);
        }
        self.stage = TurnStage::Finished;
        self.selection = None;
        true
    }

    // === Turns ===

    /// End the active side's turn and open the next one.
    pub fn end_turn(&mut self) -> Result<()> {
        self.ensure_running()?;
        self.advance();
        Ok(())
    }

    /// Advance the turn timer by `dt` seconds.
    ///
    /// Completes a pending commander display, and ends the turn once the
    /// timer passes the configured limit.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        self.ensure_running()?;
        self.turn_timer += dt;

        if let TurnStage::Displaying { card, handle } = self.stage {
            if self.view.display_complete(handle) {
                self.stage = TurnStage::AwaitingInput;
                self.finish_commander_turn(self.state.active, card);
                return Ok(());
            }
        }

        if self.turn_timer > self.state.config.turn_time_limit_secs as f32 {
            debug!("{} ran out of time", self.state.active);
            self.advance();
        }
        Ok(())
    }

    /// Close the active turn and open turns until one waits on something.
    fn advance(&mut self) {
        loop {
            let player = self.state.active;
            self.rules().end_of_turn(player);
            self.selection = None;
            if self.finish_if_over() {
                return;
            }
            debug!("{player} ends turn {}", self.state.turn);
            if !self.open_turn(player.opponent()) {
                return;
            }
        }
    }

    /// Start `player`'s turn. Returns true when the turn is already done.
    fn open_turn(&mut self, player: PlayerId) -> bool {
        self.state.active = player;
        self.state.turn += 1;
        self.turn_timer = 0.0;
        self.selection = None;
        self.stage = TurnStage::AwaitingInput;
        debug!("turn {} begins for {player}", self.state.turn);

        self.rules().start_of_turn(player);
        if self.finish_if_over() {
            return false;
        }

        match self.policies[player] {
            TurnPolicy::Human => false,
            TurnPolicy::Commander(ai) => self.commander_turn(player, ai),
        }
    }

    fn commander_turn(&mut self, player: PlayerId, ai: CommanderAi) -> bool {
        let pick = ai
            .pick_card(&self.state, player)
            .and_then(|id| self.state.hero(player).hand.get(id))
            .map(|card| (card.id, Arc::clone(&card.data)));

        if let Some((card, data)) = pick {
            let handle = self.view.begin_display(&data, self.state.config.ai_display_secs);
            debug!("{player} shows {card}");
            self.stage = TurnStage::Displaying { card, handle };
            return false;
        }
        self.commander_attacks(player, ai)
    }

    fn finish_commander_turn(&mut self, player: PlayerId, card: CardInstanceId) {
        let TurnPolicy::Commander(ai) = self.policies[player] else {
            return;
        };
        match CardCaster::cast(&mut self.rules(), player, card) {
            Ok(result) => debug!("{player} plays {card}: {result:?}"),
            Err(err) => warn!("{player} could not play {card}: {err}"),
        }
        if self.finish_if_over() {
            return;
        }
        if self.commander_attacks(player, ai) {
            self.advance();
        }
    }

    /// Returns true when the turn should be handed over.
    fn commander_attacks(&mut self, player: PlayerId, ai: CommanderAi) -> bool {
        ai.run_attacks(&mut self.rules(), player);
        !self.finish_if_over()
    }

    // === Actions ===

    /// Cast a card for the active player.
    pub fn cast(&mut self, player: PlayerId, card: CardInstanceId) -> Result<CastResult> {
        self.ensure_running()?;
        let result = CardCaster::cast(&mut self.rules(), player, card)?;
        self.finish_if_over();
        Ok(result)
    }

    /// Attack with one of the active player's units.
    pub fn attack(&mut self, attacker: UnitId, target: TargetRef) -> Result<AttackResult> {
        self.ensure_running()?;
        let owner = self
            .state
            .live_unit(attacker)
            .map(|u| u.owner)
            .ok_or(BattleError::UnitNotFound(attacker))?;
        if owner != self.state.active {
            return Err(BattleError::NotActivePlayer(owner));
        }
        let result = self.rules().attack(attacker, target);
        self.finish_if_over();
        Ok(result)
    }

    // === Input ===

    /// Route one intent from `player`.
    ///
    /// Input from the inactive side, or while the battle is not accepting
    /// input, is discarded.
    pub fn handle_intent(&mut self, player: PlayerId, intent: Intent) -> Result<IntentOutcome> {
        if self.finish_if_over()
            || self.stage != TurnStage::AwaitingInput
            || player != self.state.active
        {
            warn!("input from {player} discarded: {intent:?}");
            return Ok(IntentOutcome::Discarded);
        }

        match intent {
            Intent::PrimaryPress(PressTarget::Card(card)) => {
                if !self.state.hero(player).hand.contains(card) {
                    return Ok(IntentOutcome::Ignored);
                }
                Ok(self.select(Selection::Card(card)))
            }
            Intent::PrimaryPress(PressTarget::Unit(id)) => {
                let ready = self
                    .state
                    .live_unit(id)
                    .is_some_and(|u| u.owner == player && u.can_attack());
                if !ready {
                    return Ok(IntentOutcome::Ignored);
                }
                Ok(self.select(Selection::Unit(id)))
            }
            Intent::PrimaryPress(PressTarget::Hero(hero)) => {
                debug!("{player} touched {hero}'s hero");
                Ok(IntentOutcome::Ignored)
            }
            Intent::PrimaryPress(PressTarget::TurnButton) | Intent::EndTurn => {
                self.end_turn()?;
                Ok(IntentOutcome::TurnEnded)
            }
            Intent::Release { over_hand } => self.release(player, over_hand),
            Intent::SecondaryPress => Ok(match self.selection.take() {
                Some(_) => IntentOutcome::Cancelled,
                None => IntentOutcome::Ignored,
            }),
        }
    }

    fn select(&mut self, selection: Selection) -> IntentOutcome {
        self.selection = Some(selection);
        IntentOutcome::Selected(selection)
    }

    fn release(&mut self, player: PlayerId, over_hand: bool) -> Result<IntentOutcome> {
        match self.selection.take() {
            None => Ok(IntentOutcome::Ignored),
            Some(Selection::Card(_)) if over_hand => Ok(IntentOutcome::Cancelled),
            Some(Selection::Card(card)) => Ok(IntentOutcome::Cast(self.cast(player, card)?)),
            Some(Selection::Unit(unit)) => {
                let mask = PickMask::ENEMY_UNIT.union(PickMask::ENEMY_HERO);
                let Some(target) = self.picker.pick(mask) else {
                    debug!("{unit} released over nothing");
                    return Ok(IntentOutcome::Cancelled);
                };
                Ok(IntentOutcome::Attacked(self.attack(unit, target)?))
            }
        }
    }
}
