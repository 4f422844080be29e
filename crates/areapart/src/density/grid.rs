//! Regular sampling grid over a bounding box, and per-query membership masks.

use crate::geom2::{Bounds2, GeomCfg, Polygon, Vec2};

/// `nx × ny` grid points spanning `origin ..= end`.
///
/// Interior coordinates are `origin + i·dx`; the last row and column sit
/// exactly on `end`.
///
/// Grid point `(i, j)` (column `i`, row `j`) has flat index `ny·i + j`; cell
/// `(i, j)` spans points `(i..=i+1, j..=j+1)` and has flat index `(ny-1)·i + j`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    pub origin: Vec2,
    pub end: Vec2,
    pub dx: f64,
    pub dy: f64,
}

impl Grid {
    /// Grid spanning `bounds` with `nx, ny >= 2` points per axis.
    pub fn over(bounds: Bounds2, nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            origin: bounds.min,
            end: bounds.max,
            dx: bounds.width() / (nx - 1) as f64,
            dy: bounds.height() / (ny - 1) as f64,
        }
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.nx * self.ny
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.nx.saturating_sub(1) * self.ny.saturating_sub(1)
    }

    #[inline]
    pub fn point_index(&self, i: usize, j: usize) -> usize {
        self.ny * i + j
    }

    #[inline]
    pub fn cell_index(&self, i: usize, j: usize) -> usize {
        (self.ny - 1) * i + j
    }

    #[inline]
    pub fn x(&self, i: usize) -> f64 {
        if i + 1 == self.nx {
            self.end.x
        } else {
            self.origin.x + i as f64 * self.dx
        }
    }

    #[inline]
    pub fn y(&self, j: usize) -> f64 {
        if j + 1 == self.ny {
            self.end.y
        } else {
            self.origin.y + j as f64 * self.dy
        }
    }

    #[inline]
    pub fn point(&self, i: usize, j: usize) -> Vec2 {
        Vec2::new(self.x(i), self.y(j))
    }

    /// Cell containing `p` and the local offsets `(xr, ys) ∈ [0,1]²` within it.
    ///
    /// Indices are clamped to the grid, so points on the last row/column or
    /// marginally outside (rounding) land in the boundary cell.
    pub fn locate(&self, p: Vec2) -> (usize, usize, f64, f64) {
        let fx = (p.x - self.origin.x) / self.dx;
        let fy = (p.y - self.origin.y) / self.dy;
        let i = (fx.floor().max(0.0) as usize).min(self.nx - 2);
        let j = (fy.floor().max(0.0) as usize).min(self.ny - 2);
        let xr = (fx - i as f64).clamp(0.0, 1.0);
        let ys = (fy - j as f64).clamp(0.0, 1.0);
        (i, j, xr, ys)
    }
}

/// Per-grid-point membership of one polygon.
///
/// A fresh mask is produced by every query; the field itself is never
/// mutated, so queries on different polygons are independent.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMask {
    inside: Vec<bool>,
    ny: usize,
}

impl GridMask {
    /// Membership of every grid point in `poly`, skipping points outside
    /// its bounding box (widened by ε). An empty polygon yields an all-false
    /// mask.
    pub fn of_polygon(grid: &Grid, poly: &Polygon, cfg: GeomCfg) -> Self {
        let mut inside = vec![false; grid.num_points()];
        if let Some(b) = poly.bounds() {
            let tol = cfg.robustness;
            for i in 0..grid.nx {
                let x = grid.x(i);
                if x < b.min.x - tol || x > b.max.x + tol {
                    continue;
                }
                for j in 0..grid.ny {
                    let p = grid.point(i, j);
                    if p.y < b.min.y - tol || p.y > b.max.y + tol {
                        continue;
                    }
                    inside[grid.point_index(i, j)] = poly.contains(p, cfg).unwrap_or(false);
                }
            }
        }
        Self {
            inside,
            ny: grid.ny,
        }
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.inside[self.ny * i + j]
    }

    /// All four corners of cell `(i, j)` are inside.
    #[inline]
    pub fn cell_inside(&self, i: usize, j: usize) -> bool {
        self.get(i, j) && self.get(i + 1, j) && self.get(i, j + 1) && self.get(i + 1, j + 1)
    }

    pub fn count(&self) -> usize {
        self.inside.iter().filter(|&&b| b).count()
    }
}
