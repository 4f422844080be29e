//! Area-constrained partition controller.
//!
//! Purpose
//! - Split a convex region into `n` power cells whose density-weighted areas
//!   match prescribed fractions, with centers at the cells' weighted centroids.
//!
//! Algorithm (nested gradient descent)
//! - Inner loop: with centers fixed, adjust weights along the shared-edge
//!   gradient until the squared volume error is within `volume_tolerance`.
//! - Outer loop: move centers toward their centroids by `centers_step` until
//!   the squared center displacement is within `convergence_criterion`.
//! - Both loops are capped; running out of steps is reported, not an error.
//!
//! Lifecycle: `Uninitialized` → (`initialize`) → `CentersInitialized` →
//! (`compute_partition`) → `Converged` | `StepBudgetExhausted`.
//!
//! Code cross-refs: `crate::power::PowerDiagramBuilder`, `crate::density::DensityField`,
//! `crate::adjacency::AdjacencyGraph`, `cfg::PartitionParams`, `trace::TraceSink`

pub mod cfg;
pub mod trace;

pub use cfg::PartitionParams;
pub use trace::{NoTrace, StageLog, TraceSink, TraceStage, TraceWriter};

use crate::adjacency::AdjacencyGraph;
use crate::clip::{ClipEngine, OverlayClipper};
use crate::density::DensityField;
use crate::error::{Error, Result};
use crate::geom2::{perp_direction, point_along_line, GeomCfg, Polygon, Vec2};
use crate::power::PowerDiagramBuilder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Uninitialized,
    CentersInitialized,
    Converged,
    StepBudgetExhausted,
}

/// Outcome of one `compute_partition` run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PartitionReport {
    pub phase: Phase,
    /// Outer (center) iterations taken.
    pub center_iterations: usize,
    /// Inner (weight) iterations summed over all outer iterations.
    pub volume_iterations: usize,
    /// Squared center displacement of the last center step.
    pub displacement: f64,
    /// Squared volume error of the final covering.
    pub volume_error: f64,
    /// Weighted areas of the final covering.
    pub volumes: Vec<f64>,
}

#[derive(Clone, Debug)]
pub struct Partition<E: ClipEngine = OverlayClipper> {
    n: usize,
    prior: DensityField,
    desired: Vec<f64>,
    params: PartitionParams,
    builder: PowerDiagramBuilder<E>,
    centers: Vec<Vec2>,
    weights: Vec<f64>,
    covering: Vec<Polygon>,
    adjacency: AdjacencyGraph,
    phase: Phase,
}

impl Partition<OverlayClipper> {
    /// Partition of `prior`'s region into `n` cells.
    ///
    /// `desired` areas default to `1/n` each; otherwise they must have length
    /// `n` with every entry above the volume lower bound, and are renormalized
    /// (with a warning) when they do not sum to 1.
    pub fn new(n: usize, prior: DensityField, desired: Option<Vec<f64>>, params: PartitionParams) -> Result<Self> {
        Self::with_engine(OverlayClipper, n, prior, desired, params)
    }
}

impl<E: ClipEngine> Partition<E> {
    pub fn with_engine(
        engine: E,
        n: usize,
        mut prior: DensityField,
        desired: Option<Vec<f64>>,
        params: PartitionParams,
    ) -> Result<Self> {
        params.validate()?;
        if n == 0 {
            return Err(Error::InvalidParameter {
                name: "n_regions",
                value: 0.0,
                reason: "at least one region is required",
            });
        }
        if !prior.is_set() {
            return Err(Error::DensityUnset);
        }
        prior.set_lower_bound(params.volume_lower_bound);
        let desired = resolve_desired_areas(n, desired, params.volume_lower_bound)?;
        let cfg = params.geom_cfg();
        Ok(Self {
            n,
            prior,
            desired,
            params,
            builder: PowerDiagramBuilder::with_engine(engine, cfg),
            centers: Vec::new(),
            weights: Vec::new(),
            covering: Vec::new(),
            adjacency: AdjacencyGraph::new(n),
            phase: Phase::Uninitialized,
        })
    }

    /// Set centers and weights.
    ///
    /// Centers must lie in the region; `None` places them along the region's
    /// first edge. Weights default to zero.
    pub fn initialize(&mut self, centers: Option<Vec<Vec2>>, weights: Option<Vec<f64>>) -> Result<()> {
        let cfg = self.cfg();
        let region = self.prior.region();
        let centers = match centers {
            None => default_centers(
                region,
                self.n,
                self.params.default_center_offset,
                self.params.default_center_attempts,
                cfg,
            )?,
            Some(centers) => {
                if centers.len() != self.n {
                    return Err(Error::SizeMismatch {
                        what: "centers",
                        expected: self.n,
                        actual: centers.len(),
                    });
                }
                for (index, &c) in centers.iter().enumerate() {
                    if !region.contains(c, cfg)? {
                        return Err(Error::CenterOutsideRegion { index });
                    }
                }
                centers
            }
        };
        let weights = match weights {
            None => vec![0.0; self.n],
            Some(w) if w.len() != self.n => {
                return Err(Error::SizeMismatch {
                    what: "weights",
                    expected: self.n,
                    actual: w.len(),
                })
            }
            Some(w) => w,
        };
        self.centers = centers;
        self.weights = weights;
        self.covering = vec![Polygon::default(); self.n];
        self.adjacency = AdjacencyGraph::new(self.n);
        self.phase = Phase::CentersInitialized;
        debug!(n = self.n, "partition_initialized");
        Ok(())
    }

    pub fn compute_partition(&mut self) -> Result<PartitionReport> {
        self.compute_partition_traced(&mut NoTrace)
    }

    /// Run the nested descent, reporting snapshots to `sink`.
    pub fn compute_partition_traced(&mut self, sink: &mut dyn TraceSink) -> Result<PartitionReport> {
        if self.phase == Phase::Uninitialized {
            return Err(Error::NotInitialized);
        }
        let p = self.params;
        let cfg = self.cfg();

        sink.record(TraceStage::Start, &self.centers, &self.covering)?;
        self.rebuild_diagram()?;
        sink.record(TraceStage::InitialDiagram, &self.centers, &self.covering)?;
        self.center_step(1.0)?;
        self.rebuild_diagram()?;
        sink.record(TraceStage::InitialCentroidStep, &self.centers, &self.covering)?;

        let mut displacement = f64::INFINITY;
        let mut center_iterations = 0;
        let mut volume_iterations = 0;
        while displacement > p.convergence_criterion && center_iterations < p.max_iterations_centers {
            let mut volumes = self.volumes()?;
            let mut error = self.volume_error(&volumes);
            let mut inner = 0;
            while error > p.volume_tolerance && inner < p.max_iterations_volume {
                self.adjacency.rebuild(&self.covering, cfg)?;
                self.weight_step(&volumes)?;
                self.rebuild_diagram()?;
                sink.record(TraceStage::WeightStep, &self.centers, &self.covering)?;
                volumes = self.volumes()?;
                error = self.volume_error(&volumes);
                inner += 1;
            }
            volume_iterations += inner;
            if error > p.volume_tolerance {
                debug!(center_iterations, volume_error = error, "volume_budget_exhausted");
            }

            displacement = self.center_step(p.centers_step)?;
            self.rebuild_diagram()?;
            sink.record(TraceStage::CenterStep, &self.centers, &self.covering)?;
            center_iterations += 1;
            debug!(
                center_iterations,
                inner,
                volume_error = error,
                displacement,
                "center_step"
            );
        }
        sink.record(TraceStage::Finish, &self.centers, &self.covering)?;

        self.phase = if displacement <= p.convergence_criterion {
            Phase::Converged
        } else {
            Phase::StepBudgetExhausted
        };
        let volumes = self.volumes()?;
        let volume_error = self.volume_error(&volumes);
        info!(
            phase = ?self.phase,
            center_iterations,
            volume_iterations,
            displacement,
            volume_error,
            "partition_finished"
        );
        Ok(PartitionReport {
            phase: self.phase,
            center_iterations,
            volume_iterations,
            displacement,
            volume_error,
            volumes,
        })
    }

    fn rebuild_diagram(&mut self) -> Result<()> {
        self.covering = self
            .builder
            .build(self.prior.region(), &self.centers, &self.weights)?;
        Ok(())
    }

    /// Weighted area of every cell.
    pub fn volumes(&self) -> Result<Vec<f64>> {
        self.covering
            .iter()
            .map(|cell| self.prior.weighted_area(cell))
            .collect()
    }

    /// `Σ (v_i − d_i)²`.
    pub fn volume_error(&self, volumes: &[f64]) -> f64 {
        volumes
            .iter()
            .zip(&self.desired)
            .map(|(v, d)| (v - d) * (v - d))
            .sum()
    }

    /// One gradient step on the weights from the current shared edges.
    fn weight_step(&mut self, volumes: &[f64]) -> Result<()> {
        let step = self.params.weights_step;
        let mut updated = self.weights.clone();
        for i in 0..self.n {
            if self.covering[i].is_empty() {
                updated[i] += 2.0 * step;
                continue;
            }
            let mut total = 0.0;
            for (j, p, q) in self.adjacency.neighbours(i) {
                let dist = (self.centers[i] - self.centers[j]).norm();
                if dist == 0.0 {
                    continue;
                }
                let pressure = self.desired[j] / volumes[j] - self.desired[i] / volumes[i];
                let flux = self.prior.line_integral(self.params.line_int_step, p, q)?;
                total += pressure / dist * flux;
            }
            updated[i] -= step * total;
        }
        self.weights = updated;
        Ok(())
    }

    /// Move centers toward their cells' centroids; returns `Σ |centroid − c|²`.
    ///
    /// An empty cell's centroid is the origin, so its center is pulled there.
    fn center_step(&mut self, step: f64) -> Result<f64> {
        let mut displacement = 0.0;
        for i in 0..self.n {
            let target = self.prior.centroid(&self.covering[i])?;
            let delta = target - self.centers[i];
            displacement += delta.norm_squared();
            self.centers[i] += delta * step;
        }
        Ok(displacement)
    }

    #[inline]
    pub fn cfg(&self) -> GeomCfg {
        self.builder.cfg()
    }

    pub fn n_regions(&self) -> usize {
        self.n
    }

    pub fn centers(&self) -> &[Vec2] {
        &self.centers
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn covering(&self) -> &[Polygon] {
        &self.covering
    }

    pub fn desired_areas(&self) -> &[f64] {
        &self.desired
    }

    pub fn prior(&self) -> &DensityField {
        &self.prior
    }

    pub fn params(&self) -> &PartitionParams {
        &self.params
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Shared edges of the current covering.
    pub fn shared_edges(&self) -> AdjacencyGraph {
        AdjacencyGraph::from_covering(&self.covering, self.cfg())
    }
}

fn resolve_desired_areas(n: usize, desired: Option<Vec<f64>>, bound: f64) -> Result<Vec<f64>> {
    let Some(mut desired) = desired else {
        if bound > 1.0 / n as f64 {
            return Err(Error::LowerBoundTooLarge { bound, regions: n });
        }
        return Ok(vec![1.0 / n as f64; n]);
    };
    if desired.len() != n {
        return Err(Error::SizeMismatch {
            what: "desired areas",
            expected: n,
            actual: desired.len(),
        });
    }
    for (index, &value) in desired.iter().enumerate() {
        if value.is_nan() || value <= bound {
            return Err(Error::DesiredAreaTooSmall { index, value, bound });
        }
    }
    let sum: f64 = desired.iter().sum();
    if (sum - 1.0).abs() > 1e-12 {
        warn!(sum, "desired_areas_renormalized");
        for (index, value) in desired.iter_mut().enumerate() {
            *value /= sum;
            if *value < bound {
                return Err(Error::DesiredAreaTooSmall {
                    index,
                    value: *value,
                    bound,
                });
            }
        }
    }
    Ok(desired)
}

/// `n` centers evenly spaced along the region's first edge, offset inward.
///
/// The offset starts at `offset` and is halved up to `attempts` times until
/// every center lies inside the region.
pub fn default_centers(region: &Polygon, n: usize, offset: f64, attempts: usize, cfg: GeomCfg) -> Result<Vec<Vec2>> {
    let verts = region.vertices();
    if verts.len() < 2 {
        return Err(Error::EmptyPolygon);
    }
    let (p1, p2) = (verts[0], verts[1]);
    let spacing = 1.0 / (n + 1) as f64;
    let mut len = offset;
    for attempt in 0..=attempts {
        let mut perp = perp_direction(p1, p2, len);
        if !region.contains(point_along_line(p1, p2, 0.5) + perp, cfg)? {
            perp = -perp;
        }
        let centers: Vec<Vec2> = (0..n)
            .map(|k| point_along_line(p1, p2, spacing * (k + 1) as f64) + perp)
            .collect();
        let mut inside = true;
        for &c in &centers {
            if !region.contains(c, cfg)? {
                inside = false;
                break;
            }
        }
        if inside {
            return Ok(centers);
        }
        debug!(attempt, offset = len, "default_centers_retry");
        len /= 2.0;
    }
    Err(Error::DefaultCentersFailed {
        attempts: attempts + 1,
    })
}
