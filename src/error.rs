//! Error types for grid construction, seeding and pattern decoding.

use crate::Pos2;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("invalid grid dimensions {width}x{height}: both must be greater than zero")]
    InvalidDimension { width: i32, height: i32 },

    #[error("cell {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Pos2, width: i32, height: i32 },

    #[error("invalid rule: {0}")]
    InvalidRule(String),

    #[error("malformed pattern: {0}")]
    Decode(String),
}
