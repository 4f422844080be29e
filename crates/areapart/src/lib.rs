//! Area-constrained partitioning of convex regions with power diagrams.
//!
//! A convex region carries a density field. `Partition` splits it into `n`
//! power cells whose density-weighted areas match prescribed fractions, while
//! each center settles on its cell's weighted centroid.
//!
//! Layout
//! - `geom2`: points, tolerances, predicates, validated polygons.
//! - `density`: sampled density with closed-form cell integrals.
//! - `clip`: integer clipping seam and the `geo`-backed engine.
//! - `power`: power-diagram construction.
//! - `adjacency`: shared edges between cells.
//! - `partition`: parameters, controller, trace sinks.
//!
//! API Policy
//! - `api` is the curated surface; module paths may move between versions.

pub mod adjacency;
pub mod api;
pub mod clip;
pub mod density;
pub mod error;
pub mod geom2;
pub mod partition;
pub mod power;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{Error, Result};
pub use geom2::{GeomCfg, Polygon, Vec2};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::density::DensityField;
    pub use crate::error::{Error, Result};
    pub use crate::geom2::{Bounds2, GeomCfg, Polygon, Vec2};
    pub use crate::partition::{Partition, PartitionParams, PartitionReport, Phase};
}
