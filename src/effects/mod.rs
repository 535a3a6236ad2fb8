//! Effect system for cards and unit abilities.
//!
//! - `TargetSpec`: bit flags describing who an effect may touch
//! - `TargetResolver`: turns a spec into concrete targets
//! - `EffectInterpreter`: executes one effect against the board
//! - `CardCaster`: pays for and resolves a card from hand
//!
//! ## Resolution
//!
//! Card effects and unit abilities store their numbers in different
//! attribute slots. Both are decoded into [`EffectParams`] first, so the
//! interpreter never cares where an effect came from beyond its
//! [`EffectSource`].
//!
//! ```
//! use row_battle::effects::{PickMask, TargetSpec};
//!
//! let spec = TargetSpec::ENEMY | TargetSpec::CHOSEN | TargetSpec::ROW;
//! assert_eq!(PickMask::for_spec(spec), Some(PickMask::ENEMY_ROW));
//! ```

mod cast;
mod effect;
mod interpreter;
mod resolver;
mod targeting;

pub use cast::{CardCaster, CastFailure, CastResult};
pub use effect::{EffectContext, EffectFailure, EffectParams, EffectSource};
pub use interpreter::EffectInterpreter;
pub use resolver::{TargetQuery, TargetResolver};
pub use targeting::{row_ranges, PickKind, PickMask, Qualifier, TargetRef, TargetSpec, Targets};
