//! Keyword (status effect) tracking.
//!
//! - `Keyword` / `KeywordSet`: keyword identities and bitmask sets
//! - `KeywordLedger`: ordered per-holder states with durations
//! - `DecayBinding`: which side's turn start ticks a timed keyword

pub mod keyword;
pub mod ledger;

pub use keyword::{Keyword, KeywordSet};
pub use ledger::{
    AddOutcome, DecayBinding, DecayOutcome, KeywordHolder, KeywordLedger, KeywordState, PERMANENT,
};
