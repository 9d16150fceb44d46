//! A headless, bounded Game of Life engine with pluggable transition rules.
//!
//! The [`Grid`] owns its cells and advances them one generation per
//! [`Grid::step`]. Callers read generations through [`Snapshot`]s and map them
//! to whatever output they like.

pub mod enc;
pub mod engine;
pub mod error;
pub mod patterns;
pub mod pos;
pub mod rule;
pub mod stats;

pub use enc::{DecodedPattern, PatternCodec, RunLengthEncoded};
pub use engine::{Grid, InitPolicy, Snapshot};
pub use error::{GridError, Result};
pub use pos::Pos2;
pub use rule::{LifeLike, Rule, RuleVariant};
