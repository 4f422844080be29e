//! 2D geometry primitives: points, tolerances, predicates, polygons.
//!
//! Purpose
//! - Provide the small vocabulary the partition algorithm is written in:
//!   `Vec2` points, the `GeomCfg` robustness tolerance, collinearity and
//!   between-tests, collinear segment overlap, and a validated `Polygon`.
//!
//! Conventions
//! - Polygons are vertex loops (V-rep), implicitly closed, counter-clockwise.
//! - Every tolerance-dependent predicate takes `GeomCfg` explicitly.
//!
//! Code cross-refs: `Polygon`, `GeomCfg`, `Overlap`, `crate::density`

pub mod polygon;
pub mod predicates;
mod types;

pub use polygon::{loop_contains, Polygon};
pub use predicates::{
    are_collinear, collinear_overlap, distance, is_between, perp_direction,
    perp_distance_to_line, point_along_line, Overlap,
};
pub use types::{Bounds2, GeomCfg, Vec2};

#[cfg(test)]
mod tests;
