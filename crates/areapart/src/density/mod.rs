//! Density field over a polygonal base region.
//!
//! Purpose
//! - Sample a scalar density on a regular grid spanning the region's bounding
//!   box and answer weighted-area, centroid, line-integral and point queries.
//!
//! Model
//! - On each grid cell the density is the bilinear surface
//!   `f(x, y) = a·x + b·y + c·x·y + d` through the four corner samples.
//! - `∫f`, `∫x·f`, `∫y·f` over every cell are precomputed in closed form.
//! - A cell belongs to a query polygon iff all four of its corners do; the
//!   polygon's weighted area is the sum of its cells' `∫f`.
//! - Integrals and samples are normalized so the region integrates to 1.
//!
//! Queries build a fresh `GridMask` per call, so the field is immutable after
//! construction (apart from the reporting lower bound).
//!
//! Code cross-refs: `grid::Grid`, `grid::GridMask`, `crate::partition`

mod grid;

pub use grid::{Grid, GridMask};

use crate::error::{Error, Result};
use crate::geom2::{GeomCfg, Polygon, Vec2};
use tracing::{debug, warn};

/// Bilinear coefficients of one cell: `a·x + b·y + c·x·y + d`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellCoeffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CellCoeffs {
    /// Interpolant through `v00 = f(x0,y0)`, `v10 = f(x1,y0)`, `v01 = f(x0,y1)`,
    /// `v11 = f(x1,y1)`.
    #[allow(clippy::too_many_arguments)]
    pub fn fit(x0: f64, y0: f64, dx: f64, dy: f64, v00: f64, v10: f64, v01: f64, v11: f64) -> Self {
        let c = (v00 - v10 - v01 + v11) / (dx * dy);
        let a = (v10 - v00) / dx - c * y0;
        let b = (v01 - v00) / dy - c * x0;
        let d = v00 - a * x0 - b * y0 - c * x0 * y0;
        Self { a, b, c, d }
    }

    #[inline]
    pub fn eval(&self, p: Vec2) -> f64 {
        self.a * p.x + self.b * p.y + self.c * p.x * p.y + self.d
    }

    /// Closed-form `∫f`, `∫x·f`, `∫y·f` over `[x0,x1] × [y0,y1]`.
    pub fn integrate(&self, x0: f64, x1: f64, y0: f64, y1: f64) -> CellIntegrals {
        let lx = x1 - x0;
        let ly = y1 - y0;
        let sx2 = (x1 * x1 - x0 * x0) / 2.0;
        let sy2 = (y1 * y1 - y0 * y0) / 2.0;
        let sx3 = (x1 * x1 * x1 - x0 * x0 * x0) / 3.0;
        let sy3 = (y1 * y1 * y1 - y0 * y0 * y0) / 3.0;
        let Self { a, b, c, d } = *self;
        CellIntegrals {
            int: a * sx2 * ly + b * sy2 * lx + c * sx2 * sy2 + d * lx * ly,
            intx: a * sx3 * ly + b * sx2 * sy2 + c * sx3 * sy2 + d * sx2 * ly,
            inty: a * sx2 * sy2 + b * sy3 * lx + c * sx2 * sy3 + d * lx * sy2,
        }
    }
}

/// Per-cell integrals: mass and first moments.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellIntegrals {
    pub int: f64,
    pub intx: f64,
    pub inty: f64,
}

impl CellIntegrals {
    fn scaled(self, s: f64) -> Self {
        Self {
            int: self.int * s,
            intx: self.intx * s,
            inty: self.inty * s,
        }
    }
}

impl std::ops::AddAssign for CellIntegrals {
    fn add_assign(&mut self, rhs: Self) {
        self.int += rhs.int;
        self.intx += rhs.intx;
        self.inty += rhs.inty;
    }
}

#[derive(Clone, Debug)]
struct Sampled {
    grid: Grid,
    values: Vec<f64>,
    coeffs: Vec<CellCoeffs>,
    integrals: Vec<CellIntegrals>,
    in_region: GridMask,
    unweighted_area: f64,
}

/// Normalized density over a base region. See module docs.
#[derive(Clone, Debug)]
pub struct DensityField {
    region: Polygon,
    sampled: Option<Sampled>,
    lower_bound: f64,
    cfg: GeomCfg,
}

/// Default floor for reported weighted areas.
pub const DEFAULT_LOWER_BOUND: f64 = 1e-5;

impl DensityField {
    /// Field with no samples; every query fails with `DensityUnset`.
    pub fn unset() -> Self {
        Self {
            region: Polygon::default(),
            sampled: None,
            lower_bound: DEFAULT_LOWER_BOUND,
            cfg: GeomCfg::default(),
        }
    }

    /// Field from `nx · ny` samples, index `ny·i + j` for grid column `i`, row `j`.
    ///
    /// An empty region or a zero grid dimension yields an unset field.
    pub fn new(region: Polygon, nx: usize, ny: usize, values: Vec<f64>, cfg: GeomCfg) -> Result<Self> {
        if values.len() != nx * ny {
            return Err(Error::SizeMismatch {
                what: "density samples",
                expected: nx * ny,
                actual: values.len(),
            });
        }
        let Some(bounds) = region.bounds() else {
            return Ok(Self {
                cfg,
                ..Self::unset()
            });
        };
        if nx == 0 || ny == 0 {
            return Ok(Self {
                region,
                cfg,
                ..Self::unset()
            });
        }
        if nx < 2 || ny < 2 {
            return Err(Error::GridTooSmall { nx, ny });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "density sample",
                value: values[index],
                reason: "samples must be finite",
            });
        }

        let grid = Grid::over(bounds, nx, ny);
        let in_region = GridMask::of_polygon(&grid, &region, cfg);
        let mut sampled = Sampled {
            grid,
            values,
            coeffs: Vec::new(),
            integrals: Vec::new(),
            in_region,
            unweighted_area: 0.0,
        };
        let mut total = sampled.precompute();
        if sampled.unweighted_area <= 0.0 {
            return Err(Error::NoInteriorCells);
        }
        if total == 0.0 {
            warn!(
                nx,
                ny,
                unweighted_area = sampled.unweighted_area,
                "zero_density_total_fallback_uniform"
            );
            let uniform = 1.0 / sampled.unweighted_area;
            sampled.values.iter_mut().for_each(|v| *v = uniform);
            total = sampled.precompute();
        }
        sampled.normalize(total);
        debug!(nx, ny, total, unweighted_area = sampled.unweighted_area, "density_field_ready");

        Ok(Self {
            region,
            sampled: Some(sampled),
            lower_bound: DEFAULT_LOWER_BOUND,
            cfg,
        })
    }

    /// Constant density (normalized to `1 / region area` on the grid).
    pub fn uniform(region: Polygon, nx: usize, ny: usize, cfg: GeomCfg) -> Result<Self> {
        Self::new(region, nx, ny, vec![1.0; nx * ny], cfg)
    }

    /// Sample `f` at every grid point of the region's bounding box.
    pub fn from_fn<F>(region: Polygon, nx: usize, ny: usize, cfg: GeomCfg, f: F) -> Result<Self>
    where
        F: Fn(Vec2) -> f64,
    {
        let values = match region.bounds() {
            Some(bounds) if nx >= 2 && ny >= 2 => {
                let grid = Grid::over(bounds, nx, ny);
                let mut values = Vec::with_capacity(nx * ny);
                for i in 0..nx {
                    for j in 0..ny {
                        values.push(f(grid.point(i, j)));
                    }
                }
                values
            }
            _ => vec![0.0; nx * ny],
        };
        Self::new(region, nx, ny, values, cfg)
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.sampled.is_some()
    }

    pub fn region(&self) -> &Polygon {
        &self.region
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.sampled.as_ref().map(|s| &s.grid)
    }

    /// Normalized samples.
    pub fn samples(&self) -> &[f64] {
        self.sampled.as_ref().map_or(&[], |s| &s.values)
    }

    pub fn cell_coeffs(&self) -> &[CellCoeffs] {
        self.sampled.as_ref().map_or(&[], |s| &s.coeffs)
    }

    /// Geometric area of the cells lying inside the region.
    pub fn unweighted_area(&self) -> f64 {
        self.sampled.as_ref().map_or(0.0, |s| s.unweighted_area)
    }

    /// Whether grid point `(i, j)` lies inside the base region.
    pub fn in_region(&self, i: usize, j: usize) -> bool {
        self.sampled.as_ref().is_some_and(|s| s.in_region.get(i, j))
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn set_lower_bound(&mut self, bound: f64) {
        self.lower_bound = bound;
    }

    pub fn cfg(&self) -> GeomCfg {
        self.cfg
    }

    fn sampled(&self) -> Result<&Sampled> {
        self.sampled.as_ref().ok_or(Error::DensityUnset)
    }

    /// Sum of cell integrals over the cells of `poly`.
    pub fn moments(&self, poly: &Polygon) -> Result<CellIntegrals> {
        let s = self.sampled()?;
        let mask = GridMask::of_polygon(&s.grid, poly, self.cfg);
        let mut acc = CellIntegrals::default();
        for i in 1..s.grid.nx {
            for j in 1..s.grid.ny {
                if mask.cell_inside(i - 1, j - 1) {
                    acc += s.integrals[s.grid.cell_index(i - 1, j - 1)];
                }
            }
        }
        Ok(acc)
    }

    /// Density-weighted area of `poly`, floored at the lower bound.
    pub fn weighted_area(&self, poly: &Polygon) -> Result<f64> {
        self.sampled()?;
        if poly.is_empty() {
            return Ok(self.lower_bound);
        }
        Ok(self.moments(poly)?.int.max(self.lower_bound))
    }

    /// Density-weighted centroid of `poly`.
    ///
    /// Empty polygons map to the origin and polygons whose weighted area does
    /// not exceed the lower bound to their bounding-box minimum corner.
    pub fn centroid(&self, poly: &Polygon) -> Result<Vec2> {
        self.sampled()?;
        let Some(bounds) = poly.bounds() else {
            return Ok(Vec2::zeros());
        };
        let m = self.moments(poly)?;
        if m.int <= self.lower_bound {
            debug!(volume = m.int, "centroid_below_lower_bound");
            return Ok(bounds.min);
        }
        Ok(Vec2::new(m.intx / m.int, m.inty / m.int))
    }

    /// Trapezoid-rule integral of the density along `p1 → p2`.
    ///
    /// `step ∈ (0, 1]` is the normalized sub-interval length, giving
    /// `floor(1/step)` sub-intervals.
    pub fn line_integral(&self, step: f64, p1: Vec2, p2: Vec2) -> Result<f64> {
        self.sampled()?;
        if !(step > 0.0 && step <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "line_int_step",
                value: step,
                reason: "must lie in (0, 1]",
            });
        }
        let n = ((1.0 / step) + 1e-9).floor().max(1.0) as usize;
        let h = (p2 - p1).norm() / n as f64;
        let mut sum = 0.5 * (self.interpolate(p1)? + self.interpolate(p2)?);
        for k in 1..n {
            let t = k as f64 / n as f64;
            sum += self.interpolate(p1 + (p2 - p1) * t)?;
        }
        Ok(sum * h)
    }

    /// Bilinear interpolation of the normalized samples at `p`.
    pub fn interpolate(&self, p: Vec2) -> Result<f64> {
        let s = self.sampled()?;
        let g = &s.grid;
        let (i, j, xr, ys) = g.locate(p);
        let v00 = s.values[g.point_index(i, j)];
        let v10 = s.values[g.point_index(i + 1, j)];
        let v01 = s.values[g.point_index(i, j + 1)];
        let v11 = s.values[g.point_index(i + 1, j + 1)];
        Ok((1.0 - xr) * (1.0 - ys) * v00 + xr * (1.0 - ys) * v10 + (1.0 - xr) * ys * v01 + xr * ys * v11)
    }
}

impl Sampled {
    /// Recompute coefficients, integrals and the unweighted area from the
    /// current samples; returns the total over the region.
    fn precompute(&mut self) -> f64 {
        let g = self.grid;
        let n_cells = g.num_cells();
        self.coeffs = Vec::with_capacity(n_cells);
        self.integrals = Vec::with_capacity(n_cells);
        self.unweighted_area = 0.0;
        let mut total = 0.0;
        for i in 0..g.nx - 1 {
            let (x0, x1) = (g.x(i), g.x(i + 1));
            for j in 0..g.ny - 1 {
                let (y0, y1) = (g.y(j), g.y(j + 1));
                let coeffs = CellCoeffs::fit(
                    x0,
                    y0,
                    x1 - x0,
                    y1 - y0,
                    self.values[g.point_index(i, j)],
                    self.values[g.point_index(i + 1, j)],
                    self.values[g.point_index(i, j + 1)],
                    self.values[g.point_index(i + 1, j + 1)],
                );
                let integrals = coeffs.integrate(x0, x1, y0, y1);
                if self.in_region.cell_inside(i, j) {
                    total += integrals.int;
                    self.unweighted_area += (x1 - x0) * (y1 - y0);
                }
                self.coeffs.push(coeffs);
                self.integrals.push(integrals);
            }
        }
        total
    }

    fn normalize(&mut self, total: f64) {
        let inv = 1.0 / total;
        for v in &mut self.values {
            *v *= inv;
        }
        for c in &mut self.coeffs {
            c.a *= inv;
            c.b *= inv;
            c.c *= inv;
            c.d *= inv;
        }
        for it in &mut self.integrals {
            *it = it.scaled(inv);
        }
    }
}

#[cfg(test)]
mod tests;
