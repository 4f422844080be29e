//! Quadrilateral stand-in for the half-plane on `c_i`'s side of a bisector.

use crate::geom2::{loop_contains, perp_direction, Bounds2, GeomCfg, Vec2};

/// Cap on offset doublings before giving up on a bisector line.
pub const MAX_DOUBLINGS: usize = 200;

/// Quadrilateral covering the part of `bounds` on `c_i`'s side of the line
/// through `point` perpendicular to `c_i → c_j`.
///
/// The line is extended in both directions until it crosses the whole box,
/// horizontally or vertically. The two quadrilaterals closing it off against
/// a margin past the box are the candidates; the one containing `c_i` is
/// taken unless `c_i` lies outside its own cell (`−w_i > |c_i − c_j|² − w_j`),
/// in which case the other one is.
///
/// Returns `None` for coincident centers (no bisector line) or when the line
/// never straddles the box.
pub fn half_plane(
    ci: Vec2,
    wi: f64,
    cj: Vec2,
    wj: f64,
    point: Vec2,
    bounds: Bounds2,
    cfg: GeomCfg,
) -> Option<[Vec2; 4]> {
    let base = (cj - ci).norm();
    if base == 0.0 || !base.is_finite() || !point.x.is_finite() || !point.y.is_finite() {
        return None;
    }
    let (min, max) = (bounds.min, bounds.max);
    let mut scale = 1.0;
    let mut sides = None;
    for _ in 0..MAX_DOUBLINGS {
        let offset = perp_direction(ci, cj, base * scale);
        let p1 = point + offset;
        let p2 = point - offset;
        if (p1.x < min.x && p2.x > max.x) || (p1.x > max.x && p2.x < min.x) {
            let low = min.y.min(p1.y).min(p2.y) - 1.0;
            let high = max.y.max(p1.y).max(p2.y) + 1.0;
            let p3 = Vec2::new(p1.x, low);
            let p4 = Vec2::new(p2.x, low);
            let p5 = Vec2::new(p2.x, high);
            let p6 = Vec2::new(p1.x, high);
            sides = Some(([p3, p4, p2, p1], [p5, p6, p1, p2]));
            break;
        }
        if (p1.y < min.y && p2.y > max.y) || (p1.y > max.y && p2.y < min.y) {
            let low = min.x.min(p1.x).min(p2.x) - 1.0;
            let high = max.x.max(p1.x).max(p2.x) + 1.0;
            let p3 = Vec2::new(low, p1.y);
            let p4 = Vec2::new(low, p2.y);
            let p5 = Vec2::new(high, p2.y);
            let p6 = Vec2::new(high, p1.y);
            sides = Some(([p3, p4, p2, p1], [p5, p6, p1, p2]));
            break;
        }
        scale *= 2.0;
    }
    let (a, b) = sides?;

    let mut take_a = loop_contains(&a, ci, cfg);
    if -wi > (ci - cj).norm_squared() - wj {
        take_a = !take_a;
    }
    Some(if take_a { a } else { b })
}
