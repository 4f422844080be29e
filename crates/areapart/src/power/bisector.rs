//! Weighted bisector search along the segment between two centers.
//!
//! Finds `t` such that `P = c_i + t·(c_j − c_i)` has equal power distance
//! `|P − c|² − w` to both centers. `t` may leave `[0, 1]` when the weights
//! differ strongly.

use crate::geom2::{point_along_line, GeomCfg, Vec2};
use tracing::debug;

/// Iteration cap of the search.
pub const MAX_BISECTOR_ITERATIONS: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BisectorSearch {
    pub t: f64,
    pub point: Vec2,
    pub iterations: usize,
    pub converged: bool,
}

#[inline]
fn power(center: Vec2, weight: f64, p: Vec2) -> f64 {
    (p - center).norm_squared() - weight
}

/// Proportional search from `t = 0.5` with unit increment.
///
/// Steps toward the side with the larger power distance of `c_j` and halves
/// the increment whenever the sign of the difference flips. Stops once
/// `|pow_j − pow_i| < ε`; on hitting the cap the last point is returned.
pub fn locate_bisector(ci: Vec2, wi: f64, cj: Vec2, wj: f64, cfg: GeomCfg) -> BisectorSearch {
    let tol = cfg.robustness;
    let mut t = 0.5;
    let mut increment = 1.0;

    let mut point = point_along_line(ci, cj, t);
    let mut vi = power(ci, wi, point);
    let mut vj = power(cj, wj, point);
    if (vj - vi).abs() < tol {
        return BisectorSearch {
            t,
            point,
            iterations: 0,
            converged: true,
        };
    }
    let (mut prev_i, mut prev_j) = (vi, vj);
    if vi > vj {
        t -= increment;
    } else {
        t += increment;
    }

    let mut iterations = 0;
    while iterations < MAX_BISECTOR_ITERATIONS {
        point = point_along_line(ci, cj, t);
        vi = power(ci, wi, point);
        vj = power(cj, wj, point);
        if (vj - vi).abs() < tol {
            return BisectorSearch {
                t,
                point,
                iterations,
                converged: true,
            };
        }
        if vj > vi && prev_j > prev_i {
            t += increment;
            (prev_i, prev_j) = (vi, vj);
        } else if vi > vj && prev_i > prev_j {
            t -= increment;
            (prev_i, prev_j) = (vi, vj);
        } else if vj > vi && prev_i > prev_j {
            increment /= 2.0;
            t += increment;
        } else {
            increment /= 2.0;
            t -= increment;
        }
        iterations += 1;
    }

    debug!(
        t,
        residual = (vj - vi).abs(),
        iterations,
        "bisector_search_not_converged"
    );
    BisectorSearch {
        t,
        point,
        iterations,
        converged: false,
    }
}
