//! Errors raised while building or querying sector geometry.

use crate::shape::SectorType;
use thiserror::Error;

pub type SectorResult<T> = Result<T, SectorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SectorError {
    /// The shape template needs an exact number of fix names.
    #[error("{sector_type} sector requires exactly {expected} fix names, got {actual}")]
    FixCount {
        sector_type: SectorType,
        expected: usize,
        actual: usize,
    },

    /// Two fix names collide once uppercased.
    #[error("duplicate fix name '{0}'")]
    DuplicateFix(String),

    /// Fix names must be non-empty and free of the route-name separator.
    #[error("invalid fix name '{0}'")]
    InvalidFixName(String),

    /// Length/offset parameters that cannot produce a layout.
    #[error("invalid shape dimension {name} = {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    #[error("unknown fix '{0}'")]
    UnknownFix(String),

    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// The sector type is fixed when the shape is built.
    #[error("sector type is immutable: shape is {current}, attempted to set {attempted}")]
    ImmutableSectorType {
        current: SectorType,
        attempted: SectorType,
    },
}
