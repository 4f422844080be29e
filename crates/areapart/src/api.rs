//! Curated API surface.
//!
//! Prefer these re-exports over deep module paths; the module layout behind
//! them is free to change.

// Geometry
pub use crate::geom2::{
    are_collinear, collinear_overlap, is_between, loop_contains, Bounds2, GeomCfg, Overlap,
    Polygon, Vec2,
};
// Density
pub use crate::density::{CellCoeffs, CellIntegrals, DensityField, Grid, GridMask};
// Clipping
pub use crate::clip::{
    clean_path, orientation, reverse_path, ClipEngine, ClipOp, IntPath, IntPoint, OverlayClipper,
    Scaling,
};
// Power diagram and adjacency
pub use crate::adjacency::AdjacencyGraph;
pub use crate::power::{half_plane, locate_bisector, BisectorSearch, PowerDiagramBuilder};
// Controller
pub use crate::partition::{
    default_centers, NoTrace, Partition, PartitionParams, PartitionReport, Phase, StageLog,
    TraceSink, TraceStage, TraceWriter,
};
pub use crate::error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Random interior centers on a skewed density: the covering stays a
    /// partition of the region whatever the seed.
    #[test]
    fn random_centers_tile_the_region() {
        let mut rng = StdRng::seed_from_u64(42);
        let region = Polygon::new(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(2.0, 0.0),
            Vec2::new(2.5, 1.5),
            Vec2::new(0.5, 2.0),
        ])
        .unwrap();
        let cfg = GeomCfg::default();
        let prior = DensityField::from_fn(region.clone(), 30, 30, cfg, |p| 1.0 + p.x * p.y).unwrap();
        let params = PartitionParams {
            max_iterations_centers: 3,
            max_iterations_volume: 5,
            ..Default::default()
        };
        let n = 5;
        let mut centers = Vec::with_capacity(n);
        while centers.len() < n {
            let c = Vec2::new(rng.gen_range(0.0..2.5), rng.gen_range(0.0..2.0));
            if region.contains(c, cfg).unwrap() {
                centers.push(c);
            }
        }
        let mut part = Partition::new(n, prior, None, params).unwrap();
        part.initialize(Some(centers), None).unwrap();
        let report = part.compute_partition().unwrap();

        assert_eq!(report.volumes.len(), n);
        let covered: f64 = part.covering().iter().map(Polygon::area).sum();
        assert!((covered - region.area()).abs() < 1e-5);
        let weighted: f64 = report.volumes.iter().sum();
        assert!((weighted - 1.0).abs() < 0.1);
    }
}
