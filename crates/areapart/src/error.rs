//! Error type for caller misuse (malformed input, bad parameters).
//!
//! Numerical degeneracies are not errors: they are logged through `tracing`
//! and replaced by a fallback value at the call site.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("polygon needs at least 3 vertices, got {actual}")]
    TooFewVertices { actual: usize },

    #[error("polygon vertex {index} is not finite")]
    NonFiniteVertex { index: usize },

    #[error("polygon vertices {first} and {second} coincide")]
    DuplicateVertices { first: usize, second: usize },

    #[error("polygon must have non-zero nominal area (degenerate bounding box)")]
    DegenerateBounds,

    #[error("polygon vertices have not been initialized")]
    EmptyPolygon,

    #[error("density field has no samples set")]
    DensityUnset,

    #[error("density grid must be at least 2x2, got {nx}x{ny}")]
    GridTooSmall { nx: usize, ny: usize },

    #[error("no grid cell lies inside the region; refine the density grid")]
    NoInteriorCells,

    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("volume lower bound {bound} is too large for {regions} regions")]
    LowerBoundTooLarge { bound: f64, regions: usize },

    #[error("desired area {index} = {value} must exceed the volume lower bound {bound}")]
    DesiredAreaTooSmall { index: usize, value: f64, bound: f64 },

    #[error("center {index} lies outside the region of interest")]
    CenterOutsideRegion { index: usize },

    #[error("unable to create default centers after {attempts} attempts")]
    DefaultCentersFailed { attempts: usize },

    #[error("centers and weights have not been initialized")]
    NotInitialized,

    #[error("invalid parameter file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("trace output failed: {0}")]
    Trace(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
