//! Card templates, runtime cards and the card database.
//!
//! ## Key Types
//!
//! - `CardData` / `UnitData`: immutable templates loaded from data
//! - `SpellEffect` / `SummonAbility`: declarative effects with numeric attributes
//! - `Card`, `Hand`, `Deck`: runtime card flow for one side
//! - `CardDatabase`: named, validated card sets

pub mod definition;
pub mod instance;
pub mod registry;

pub use definition::{
    CardData, CardTier, Commander, EffectKind, School, SpellEffect, SummonAbility, UnitData,
    UnitRange,
};
pub use instance::{Card, Deck, Hand};
pub use registry::{CardDatabase, CardSet};
pub use crate::triggers::UnitTrigger;
