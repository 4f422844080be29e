//! Power diagram of weighted centers, clipped to a convex region.
//!
//! Purpose
//! - Cell `i` is `{P : |P − c_i|² − w_i ≤ |P − c_j|² − w_j  ∀ j ≠ i}`
//!   intersected with the region. It is built by successive clipping of the
//!   region against one half-plane per other center.
//!
//! Pipeline per cell
//! 1. `bisector::locate_bisector` finds the equal-power point on `c_i → c_j`.
//! 2. `halfplane::half_plane` turns the perpendicular line through it into a
//!    quadrilateral on `c_i`'s side, large enough to cover the region.
//! 3. The clip engine intersects the running cell with it on integer
//!    coordinates; results are cleaned and the largest piece is kept.
//!
//! Afterwards `clean_covering` snaps nearly coincident vertices shared across
//! cells and cleans every cell once more.
//!
//! Code cross-refs: `crate::clip::ClipEngine`, `crate::partition::Partition`

pub mod bisector;
pub mod halfplane;

pub use bisector::{locate_bisector, BisectorSearch, MAX_BISECTOR_ITERATIONS};
pub use halfplane::half_plane;

use crate::clip::{
    orientation, path_area, reverse_path, ClipEngine, ClipOp, IntPath, IntPoint, OverlayClipper, Scaling,
};
use crate::error::{Error, Result};
use crate::geom2::{GeomCfg, Polygon, Vec2};
use tracing::{debug, warn};

/// Cleaning distance (integer units) after each clip.
pub const CLIP_CLEAN_DISTANCE: f64 = 1.0;
/// Cleaning distance (integer units) for the final covering pass.
pub const COVERING_CLEAN_DISTANCE: f64 = 1.415;

#[derive(Clone, Debug)]
pub struct PowerDiagramBuilder<E: ClipEngine = OverlayClipper> {
    engine: E,
    cfg: GeomCfg,
    scaling: Scaling,
}

impl PowerDiagramBuilder<OverlayClipper> {
    pub fn new(cfg: GeomCfg) -> Self {
        Self::with_engine(OverlayClipper, cfg)
    }
}

impl<E: ClipEngine> PowerDiagramBuilder<E> {
    pub fn with_engine(engine: E, cfg: GeomCfg) -> Self {
        Self {
            engine,
            cfg,
            scaling: Scaling::from_cfg(cfg),
        }
    }

    pub fn cfg(&self) -> GeomCfg {
        self.cfg
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Clipped power cells of `centers` with `weights`, one per center.
    ///
    /// Cells that vanish come back as empty polygons.
    pub fn build(&self, region: &Polygon, centers: &[Vec2], weights: &[f64]) -> Result<Vec<Polygon>> {
        if weights.len() != centers.len() {
            return Err(Error::SizeMismatch {
                what: "weights",
                expected: centers.len(),
                actual: weights.len(),
            });
        }
        let bounds = region.bounds().ok_or(Error::EmptyPolygon)?;
        let subject = self.scaling.path(region.vertices());

        let mut covering = Vec::with_capacity(centers.len());
        for i in 0..centers.len() {
            let mut solution: Vec<IntPath> = vec![subject.clone()];
            for j in 0..centers.len() {
                if j == i || solution.is_empty() {
                    continue;
                }
                let search = locate_bisector(centers[i], weights[i], centers[j], weights[j], self.cfg);
                let Some(quad) = half_plane(
                    centers[i],
                    weights[i],
                    centers[j],
                    weights[j],
                    search.point,
                    bounds,
                    self.cfg,
                ) else {
                    warn!(i, j, "no_bisector_for_center_pair_skipped");
                    continue;
                };
                let mut clip = self.scaling.path(&quad);
                if !orientation(&clip) {
                    reverse_path(&mut clip);
                }
                solution = self.clip_and_clean(&solution, clip);
            }
            covering.push(self.to_polygon(i, solution.first().map(Vec::as_slice).unwrap_or(&[])));
        }
        self.clean_covering(&mut covering);
        debug!(
            cells = covering.len(),
            empty = covering.iter().filter(|p| p.is_empty()).count(),
            "power_diagram_built"
        );
        Ok(covering)
    }

    /// Intersect, clean each piece, keep the largest non-empty one.
    fn clip_and_clean(&self, solution: &[IntPath], clip: IntPath) -> Vec<IntPath> {
        let pieces = self.engine.execute(solution, &[clip], ClipOp::Intersection);
        if pieces.len() > 1 {
            debug!(pieces = pieces.len(), "clip_split_keeping_largest");
        }
        pieces
            .iter()
            .map(|p| self.engine.clean(p, CLIP_CLEAN_DISTANCE))
            .filter(|p| !p.is_empty())
            .max_by(|a, b| path_area(a).abs().total_cmp(&path_area(b).abs()))
            .into_iter()
            .collect()
    }

    fn to_polygon(&self, index: usize, path: &[IntPoint]) -> Polygon {
        match Polygon::new(self.scaling.vertices(path)) {
            Ok(p) => p,
            Err(err) => {
                warn!(index, %err, "invalid_cell_replaced_by_empty");
                Polygon::default()
            }
        }
    }

    /// Snap vertices closer than `1/mult` across cells (`i ≤ j`, later cells
    /// take the earlier cell's vertex), then clean and revalidate every cell.
    pub fn clean_covering(&self, covering: &mut [Polygon]) {
        let tol = 1.0 / self.scaling.mult as f64;
        for i in 0..covering.len() {
            for j in i..covering.len() {
                let source = covering[i].vertices().to_vec();
                let mut target = covering[j].vertices().to_vec();
                let mut moved = false;
                for &vi in &source {
                    for vj in target.iter_mut() {
                        if *vj != vi && (*vj - vi).norm() < tol {
                            *vj = vi;
                            moved = true;
                        }
                    }
                }
                if moved {
                    if let Err(err) = covering[j].patch_vertices(target) {
                        warn!(index = j, %err, "cell_snap_rejected");
                    }
                }
            }
        }
        for (index, cell) in covering.iter_mut().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let path = self.scaling.path(cell.vertices());
            let cleaned = self.engine.clean(&path, COVERING_CLEAN_DISTANCE);
            if cleaned.is_empty() {
                warn!(index, "cell_collapsed_during_cleanup");
                *cell = Polygon::default();
                continue;
            }
            if let Err(err) = cell.set_vertices(self.scaling.vertices(&cleaned)) {
                warn!(index, %err, "invalid_cell_replaced_by_empty");
                *cell = Polygon::default();
            }
        }
    }
}
