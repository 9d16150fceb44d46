//! Transition rules mapping a cell's state and live-neighbor count to its next state.
//!
//! The grid never inspects a concrete rule while stepping: it compiles the rule
//! into a lookup table once (see `engine::index`) so any [`Rule`] can be swapped
//! in without touching traversal code.

use crate::error::{GridError, Result};
use std::{fmt, str::FromStr};

/// The largest possible Moore-neighborhood count
pub const MAX_NEIGHBORS: u8 = 8;

pub trait Rule {
    /// Next state of a cell given whether it is alive now and how many of its
    /// 8 neighbors are alive (`0..=8`)
    fn next_state(&self, alive: bool, neighbors: u8) -> bool;
}

impl<R: Rule + ?Sized> Rule for &R {
    #[inline]
    fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        (**self).next_state(alive, neighbors)
    }
}

/// The two Game of Life behaviors the engine ships with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RuleVariant {
    /// All four classic rules: under-population, persistence, over-population, reproduction
    #[default]
    Strict,
    /// Under-population and persistence only. Crowded cells survive and dead
    /// cells never come back, so the population can only shrink.
    SurvivalBiased,
}

impl Rule for RuleVariant {
    fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        match (self, alive, neighbors) {
            // under-population
            (_, true, 0..=1) => false,
            // persistence
            (_, true, 2..=3) => true,
            // over-population
            (Self::Strict, true, _) => false,
            (Self::SurvivalBiased, true, _) => true,
            // reproduction
            (Self::Strict, false, 3) => true,
            (_, false, _) => false,
        }
    }
}

impl From<RuleVariant> for LifeLike {
    fn from(variant: RuleVariant) -> Self {
        match variant {
            RuleVariant::Strict => LifeLike::conway(),
            RuleVariant::SurvivalBiased => LifeLike::from_rule(&variant),
        }
    }
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => f.write_str("strict"),
            Self::SurvivalBiased => f.write_str("survival"),
        }
    }
}

impl FromStr for RuleVariant {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" | "conway" => Ok(Self::Strict),
            "survival" | "survival-biased" => Ok(Self::SurvivalBiased),
            other => Err(GridError::InvalidRule(format!("unknown variant `{other}`"))),
        }
    }
}

/// A life-like (outer totalistic) rule in `B/S` notation
///
/// Bit `n` of `birth` is set when a dead cell with `n` live neighbors becomes
/// alive, and bit `n` of `survive` when a live cell with `n` neighbors stays alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifeLike {
    birth: u16,
    survive: u16,
}

impl LifeLike {
    const MASK: u16 = (1 << (MAX_NEIGHBORS + 1)) - 1;

    pub fn new(birth: &[u8], survive: &[u8]) -> Result<Self> {
        Ok(Self {
            birth: Self::mask_of(birth)?,
            survive: Self::mask_of(survive)?,
        })
    }

    /// Conway's rule, `B3/S23`
    pub fn conway() -> Self {
        Self {
            birth: 1 << 3,
            survive: (1 << 2) | (1 << 3),
        }
    }

    /// Tabulates an arbitrary rule into `B/S` form
    pub fn from_rule<R: Rule + ?Sized>(rule: &R) -> Self {
        let mut value = Self {
            birth: 0,
            survive: 0,
        };
        for n in 0..=MAX_NEIGHBORS {
            if rule.next_state(false, n) {
                value.birth |= 1 << n;
            }
            if rule.next_state(true, n) {
                value.survive |= 1 << n;
            }
        }
        value
    }

    fn mask_of(counts: &[u8]) -> Result<u16> {
        counts.iter().try_fold(0u16, |mask, &n| {
            if n > MAX_NEIGHBORS {
                return Err(GridError::InvalidRule(format!(
                    "neighbor count {n} exceeds {MAX_NEIGHBORS}"
                )));
            }
            Ok(mask | (1 << n))
        })
    }

    fn parse_counts(digits: &str) -> Result<u16> {
        let counts = digits
            .chars()
            .map(|c| match c.to_digit(10) {
                Some(d) => Ok(d as u8),
                None => Err(GridError::InvalidRule(format!("unexpected `{c}` in `{digits}`"))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::mask_of(&counts)
    }

    /// `part` without its leading `tag`, in either case
    fn tagged(part: &str, tag: char) -> Option<&str> {
        part.strip_prefix(tag.to_ascii_uppercase())
            .or_else(|| part.strip_prefix(tag.to_ascii_lowercase()))
    }

    fn write_counts(f: &mut fmt::Formatter<'_>, mask: u16) -> fmt::Result {
        for n in (0..=MAX_NEIGHBORS).filter(|n| mask & (1 << n) != 0) {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

impl Default for LifeLike {
    fn default() -> Self {
        Self::conway()
    }
}

impl Rule for LifeLike {
    #[inline]
    fn next_state(&self, alive: bool, neighbors: u8) -> bool {
        let mask = if alive { self.survive } else { self.birth };
        (mask & Self::MASK) & (1 << neighbors.min(MAX_NEIGHBORS)) != 0
    }
}

impl fmt::Display for LifeLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        Self::write_counts(f, self.birth)?;
        f.write_str("/S")?;
        Self::write_counts(f, self.survive)
    }
}

impl FromStr for LifeLike {
    type Err = GridError;

    /// Accepts `B3/S23` (any case, either order) and the legacy `23/3` survive/birth form
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let Some((left, right)) = s.split_once('/') else {
            return Err(GridError::InvalidRule(format!("`{s}` has no `/` separator")));
        };

        let (birth, survive) = match (Self::tagged(left, 'B'), Self::tagged(right, 'S')) {
            (Some(b), Some(s)) => (b, s),
            _ => match (Self::tagged(left, 'S'), Self::tagged(right, 'B')) {
                (Some(s), Some(b)) => (b, s),
                // legacy notation lists survival counts first
                _ => (right, left),
            },
        };

        Ok(Self {
            birth: Self::parse_counts(birth)?,
            survive: Self::parse_counts(survive)?,
        })
    }
}
