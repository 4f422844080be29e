//! Point and segment predicates under the robustness tolerance.
//!
//! All predicates take the tolerance explicitly through `GeomCfg`. Collinearity
//! is judged relative to the size of the point triple, so the boolean results
//! do not change when all inputs are scaled by the same positive factor.

use super::types::{GeomCfg, Vec2};

/// Result of overlapping two collinear segments (also the adjacency-graph entry).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Overlap {
    /// No common point (the "undefined" entry of the adjacency graph).
    Disjoint,
    /// A single common endpoint.
    Point(Vec2),
    /// A common sub-segment with two distinct endpoints.
    Segment(Vec2, Vec2),
}

impl Overlap {
    #[inline]
    pub fn is_segment(&self) -> bool {
        matches!(self, Overlap::Segment(..))
    }

    /// Endpoints of a full shared segment, if any.
    #[inline]
    pub fn segment(&self) -> Option<(Vec2, Vec2)> {
        match *self {
            Overlap::Segment(p, q) => Some((p, q)),
            _ => None,
        }
    }

    /// Number of points in the overlap (0, 1 or 2).
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Overlap::Disjoint => 0,
            Overlap::Point(_) => 1,
            Overlap::Segment(..) => 2,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Overlap::Disjoint)
    }
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f64 {
    (a - b).norm()
}

/// Point at normalized position `t` on the line through `a` and `b`
/// (`t = 0` gives `a`, `t = 1` gives `b`).
#[inline]
pub fn point_along_line(a: Vec2, b: Vec2, t: f64) -> Vec2 {
    a + (b - a) * t
}

/// Vector of length `len` perpendicular to `a → b` (rotated clockwise).
///
/// Returns zero when `a == b`. A negative `len` flips the direction.
pub fn perp_direction(a: Vec2, b: Vec2, len: f64) -> Vec2 {
    let d = distance(a, b);
    if d == 0.0 {
        return Vec2::zeros();
    }
    Vec2::new((b.y - a.y) / d * len, (a.x - b.x) / d * len)
}

/// Distance from `p` to the line through `a` and `b`.
///
/// Near-horizontal and near-vertical lines (coordinate difference below ε)
/// use the axis distance directly, which also covers `a == b`.
pub fn perp_distance_to_line(a: Vec2, b: Vec2, p: Vec2, cfg: GeomCfg) -> f64 {
    let eps = cfg.robustness;
    if (b.y - a.y).abs() < eps {
        (p.y - b.y).abs()
    } else if (b.x - a.x).abs() < eps {
        (p.x - b.x).abs()
    } else {
        let ab = b - a;
        (ab.y * p.x - ab.x * p.y + b.x * a.y - b.y * a.x).abs() / ab.norm()
    }
}

/// Relative collinearity test for the triple `(a, b, p)`.
pub fn are_collinear(a: Vec2, b: Vec2, p: Vec2, cfg: GeomCfg) -> bool {
    let max_dist = distance(a, b).max(distance(b, p)).max(distance(a, p));
    if max_dist == 0.0 {
        return true;
    }
    perp_distance_to_line(a, b, p, cfg) / max_dist < cfg.robustness
}

/// `p` is collinear with `a`, `b` and projects into the closed segment `[a, b]`.
pub fn is_between(a: Vec2, b: Vec2, p: Vec2, cfg: GeomCfg) -> bool {
    if !are_collinear(a, b, p, cfg) {
        return false;
    }
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 == 0.0 {
        return p == a;
    }
    let t = (p - a).dot(&ab) / len2;
    (0.0..=1.0).contains(&t)
}

/// Overlap of the collinear segments `(p1, p2)` and `(p3, p4)`.
///
/// Endpoints of the second segment are preferred; an endpoint of the first
/// segment is only added when it is farther than ε from the point already found.
pub fn collinear_overlap(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2, cfg: GeomCfg) -> Overlap {
    let eps = cfg.robustness;
    if is_between(p1, p2, p3, cfg) {
        if is_between(p1, p2, p4, cfg) {
            Overlap::Segment(p3, p4)
        } else if is_between(p3, p4, p1, cfg) && distance(p3, p1) > eps {
            Overlap::Segment(p3, p1)
        } else if is_between(p3, p4, p2, cfg) && distance(p3, p2) > eps {
            Overlap::Segment(p3, p2)
        } else {
            Overlap::Point(p3)
        }
    } else if is_between(p1, p2, p4, cfg) {
        if is_between(p3, p4, p1, cfg) && distance(p4, p1) > eps {
            Overlap::Segment(p4, p1)
        } else if is_between(p3, p4, p2, cfg) && distance(p2, p4) > eps {
            Overlap::Segment(p4, p2)
        } else {
            Overlap::Point(p4)
        }
    } else if is_between(p3, p4, p1, cfg) && is_between(p3, p4, p2, cfg) {
        Overlap::Segment(p1, p2)
    } else {
        Overlap::Disjoint
    }
}
