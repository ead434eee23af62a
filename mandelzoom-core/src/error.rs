//! Coordinate error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// Whole part does not fit the signed 32-bit integer limb.
    #[error("value {value} is outside the range of the 32-bit integer limb")]
    Range { value: String },

    #[error("degenerate input interval: min and max are both {bound}")]
    DegenerateInterval { bound: String },

    #[error("invalid decimal literal {literal:?}: {reason}")]
    InvalidDecimal { literal: String, reason: String },

    /// Start and end of an axis coincide or are inverted after mapping.
    #[error("boundary has no extent on the {axis} axis")]
    Collapsed { axis: &'static str },

    #[error("non-finite coordinate: {0}")]
    NonFinite(String),
}
