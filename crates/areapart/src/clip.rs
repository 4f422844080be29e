//! Polygon boolean clipping on integer-scaled coordinates.
//!
//! Purpose
//! - Define the seam between the power-diagram builder and a polygon clipping
//!   engine: integer paths, the `ClipEngine` trait, and the helpers the
//!   builder needs around it (orientation, reversal, vertex cleaning, scaling).
//! - Provide `OverlayClipper`, an engine backed by `geo::BooleanOps`.
//!
//! Conventions
//! - Paths are implicitly closed vertex loops; results are simple and
//!   counter-clockwise (positive signed area).
//! - Float → int scaling multiplies by `mult = round(1/ε)` and truncates toward
//!   zero; int → float divides by `mult`.
//!
//! Code cross-refs: `crate::power::PowerDiagramBuilder`, `GeomCfg::mult`

use crate::geom2::{GeomCfg, Vec2};
use geo::{BooleanOps, Coord, LineString, MultiPolygon};

pub type IntPoint = [i64; 2];
pub type IntPath = Vec<IntPoint>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipOp {
    Intersection,
    Union,
    Difference,
}

/// Boolean operations on integer polygons.
pub trait ClipEngine {
    /// Apply `op` to the region covered by `subject` and the one covered by
    /// `clip`. Returns zero or more simple counter-clockwise paths.
    fn execute(&self, subject: &[IntPath], clip: &[IntPath], op: ClipOp) -> Vec<IntPath>;

    /// Drop vertices closer than `distance` to a neighbour or to the line
    /// through their neighbours. Paths left with fewer than 3 vertices come
    /// back empty.
    fn clean(&self, path: &[IntPoint], distance: f64) -> IntPath {
        clean_path(path, distance)
    }
}

/// Twice the signed area, exact.
fn twice_signed_area(path: &[IntPoint]) -> i128 {
    let n = path.len();
    (0..n)
        .map(|k| {
            let [x0, y0] = path[k];
            let [x1, y1] = path[(k + 1) % n];
            x0 as i128 * y1 as i128 - x1 as i128 * y0 as i128
        })
        .sum()
}

/// Signed area in integer units.
pub fn path_area(path: &[IntPoint]) -> f64 {
    0.5 * twice_signed_area(path) as f64
}

/// `true` for counter-clockwise (non-negative area) paths.
pub fn orientation(path: &[IntPoint]) -> bool {
    twice_signed_area(path) >= 0
}

pub fn reverse_path(path: &mut IntPath) {
    path.reverse();
}

fn close_sqrd(a: IntPoint, b: IntPoint, dist_sqrd: f64) -> bool {
    let dx = (a[0] - b[0]) as f64;
    let dy = (a[1] - b[1]) as f64;
    dx * dx + dy * dy <= dist_sqrd
}

/// Squared distance from `p` to the line through `l1`, `l2`.
fn line_dist_sqrd(p: IntPoint, l1: IntPoint, l2: IntPoint) -> f64 {
    let a = (l1[1] - l2[1]) as f64;
    let b = (l2[0] - l1[0]) as f64;
    let c = a * l1[0] as f64 + b * l1[1] as f64;
    let r = a * p[0] as f64 + b * p[1] as f64 - c;
    r * r / (a * a + b * b)
}

/// Whether the middle one of three points (in axis order) lies within
/// `sqrt(dist_sqrd)` of the line through the outer two.
fn near_collinear(p1: IntPoint, p2: IntPoint, p3: IntPoint, dist_sqrd: f64) -> bool {
    let axis = if (p1[0] - p2[0]).abs() > (p1[1] - p2[1]).abs() {
        0
    } else {
        1
    };
    if (p1[axis] > p2[axis]) == (p1[axis] < p3[axis]) {
        line_dist_sqrd(p1, p2, p3) < dist_sqrd
    } else if (p2[axis] > p1[axis]) == (p2[axis] < p3[axis]) {
        line_dist_sqrd(p2, p1, p3) < dist_sqrd
    } else {
        line_dist_sqrd(p3, p1, p2) < dist_sqrd
    }
}

/// Doubly linked ring over path indices.
struct Ring {
    prev: Vec<usize>,
    next: Vec<usize>,
    done: Vec<bool>,
}

impl Ring {
    fn new(n: usize) -> Self {
        Self {
            prev: (0..n).map(|i| (i + n - 1) % n).collect(),
            next: (0..n).map(|i| (i + 1) % n).collect(),
            done: vec![false; n],
        }
    }

    /// Unlink `op`; returns its predecessor, which is revisited.
    fn exclude(&mut self, op: usize) -> usize {
        let p = self.prev[op];
        let n = self.next[op];
        self.next[p] = n;
        self.prev[n] = p;
        self.done[p] = false;
        p
    }
}

/// Vertex cleaning in the manner of Clipper's `CleanPolygon`.
pub fn clean_path(path: &[IntPoint], distance: f64) -> IntPath {
    let n = path.len();
    if n < 3 {
        return Vec::new();
    }
    let dist_sqrd = distance * distance;
    let mut ring = Ring::new(n);
    let mut size = n;
    let mut op = 0;
    while !ring.done[op] && ring.next[op] != ring.prev[op] {
        let pt = path[op];
        let prev = path[ring.prev[op]];
        let next = path[ring.next[op]];
        if close_sqrd(pt, prev, dist_sqrd) {
            op = ring.exclude(op);
            size -= 1;
        } else if close_sqrd(prev, next, dist_sqrd) {
            ring.exclude(ring.next[op]);
            op = ring.exclude(op);
            size -= 2;
        } else if near_collinear(prev, pt, next, dist_sqrd) {
            op = ring.exclude(op);
            size -= 1;
        } else {
            ring.done[op] = true;
            op = ring.next[op];
        }
    }
    if size < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        out.push(path[op]);
        op = ring.next[op];
    }
    out
}

/// Float ↔ integer coordinate conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scaling {
    pub mult: i64,
}

impl Scaling {
    pub fn from_cfg(cfg: GeomCfg) -> Self {
        Self { mult: cfg.mult() }
    }

    /// Scale and truncate toward zero.
    #[inline]
    pub fn to_int(&self, p: Vec2) -> IntPoint {
        let m = self.mult as f64;
        [(p.x * m) as i64, (p.y * m) as i64]
    }

    #[inline]
    pub fn to_float(&self, p: IntPoint) -> Vec2 {
        let m = self.mult as f64;
        Vec2::new(p[0] as f64 / m, p[1] as f64 / m)
    }

    pub fn path(&self, vertices: &[Vec2]) -> IntPath {
        vertices.iter().map(|&v| self.to_int(v)).collect()
    }

    pub fn vertices(&self, path: &[IntPoint]) -> Vec<Vec2> {
        path.iter().map(|&p| self.to_float(p)).collect()
    }
}

/// `ClipEngine` backed by the `geo` crate's boolean operations.
///
/// Holes in the output are dropped: the builder only clips convex pieces.
#[derive(Clone, Copy, Debug, Default)]
pub struct OverlayClipper;

impl OverlayClipper {
    fn to_multi(paths: &[IntPath]) -> MultiPolygon<f64> {
        MultiPolygon::new(
            paths
                .iter()
                .filter(|p| p.len() >= 3)
                .map(|p| {
                    let ring: Vec<Coord<f64>> = p
                        .iter()
                        .map(|&[x, y]| Coord {
                            x: x as f64,
                            y: y as f64,
                        })
                        .collect();
                    geo::Polygon::new(LineString::new(ring), Vec::new())
                })
                .collect(),
        )
    }

    fn from_multi(mp: MultiPolygon<f64>) -> Vec<IntPath> {
        mp.into_iter()
            .filter_map(|poly| {
                let mut path: IntPath = Vec::new();
                for c in poly.exterior().coords() {
                    let p = [c.x.round() as i64, c.y.round() as i64];
                    if path.last() != Some(&p) {
                        path.push(p);
                    }
                }
                while path.len() > 1 && path.first() == path.last() {
                    path.pop();
                }
                if path.len() < 3 {
                    return None;
                }
                if !orientation(&path) {
                    reverse_path(&mut path);
                }
                Some(path)
            })
            .collect()
    }
}

impl ClipEngine for OverlayClipper {
    fn execute(&self, subject: &[IntPath], clip: &[IntPath], op: ClipOp) -> Vec<IntPath> {
        let subject = Self::to_multi(subject);
        if subject.0.is_empty() && op != ClipOp::Union {
            return Vec::new();
        }
        let clip = Self::to_multi(clip);
        let out = match op {
            ClipOp::Intersection => subject.intersection(&clip),
            ClipOp::Union => subject.union(&clip),
            ClipOp::Difference => subject.difference(&clip),
        };
        Self::from_multi(out)
    }
}
