//! # row-battle
//!
//! Rules engine for a two-player, three-row card battler.
//!
//! ## Design Principles
//!
//! 1. **Data-Driven Effects**: Cards and unit abilities are declarative
//!    records (effect kind + target spec + numeric attributes). One
//!    interpreter turns them into board mutations.
//!
//! 2. **Explicit Session**: A battle is an owned `BattleSession`, passed by
//!    reference. There is no global board.
//!
//! 3. **Presentation at Arm's Length**: Rendering, pointer picking and card
//!    display timing sit behind the `Presentation` and `TargetPicker`
//!    traits. The rules run headless.
//!
//! ## Architecture
//!
//! - **Typed Targets**: `TargetRef` is `Hero | Unit | Row`, resolved by
//!   pattern match.
//!
//! - **Scheduled Decay**: Timed keywords register explicit turn-start hooks
//!   that the turn controller runs in order, removed by exact
//!   (holder, keyword) match.
//!
//! - **Deterministic RNG**: Every random choice flows through one seeded
//!   `GameRng`.
//!
//! ## Modules
//!
//! - `core`: ids, players, RNG, configuration, errors
//! - `keywords`: keyword identities and per-holder ledgers
//! - `cards`: templates, runtime cards, the card database
//! - `board`: heroes, rows, units and stats
//! - `effects`: target specs, target resolution, effect interpretation, casting
//! - `triggers`: unit triggers and the turn schedule
//! - `rules`: the `Rules` mutation context and combat
//! - `presentation`: collaborator traits and test doubles
//! - `battle`: battle state, session, AI and input

pub mod core;
pub mod keywords;
pub mod cards;
pub mod board;
pub mod effects;
pub mod triggers;
pub mod rules;
pub mod presentation;
pub mod battle;

// Re-export commonly used types
pub use crate::core::{
    BattleConfig, BattleError, CardInstanceId, ConfigError, GameRng, PlayerId, PlayerMap, Result,
    UnitId,
};

pub use crate::keywords::{Keyword, KeywordLedger, KeywordSet};

pub use crate::cards::{
    Card, CardData, CardDatabase, EffectKind, SpellEffect, SummonAbility, UnitData, UnitRange,
};

pub use crate::board::{Hero, Row, RowId, StatState, Unit};

pub use crate::effects::{
    CardCaster, CastFailure, CastResult, EffectFailure, EffectInterpreter, EffectParams,
    PickMask, TargetRef, TargetSpec,
};

pub use crate::triggers::{TurnHook, TurnSchedule, UnitTrigger};

pub use crate::rules::{AttackResult, DrawOutcome, Rules};

pub use crate::presentation::{NullPresentation, Presentation, TargetPicker};

pub use crate::battle::{
    BattleOutcome, BattleSession, BattleState, CommanderAi, Intent, IntentOutcome, TurnPolicy,
};
