//! Vertex-loop polygon with cached bounding box.
//!
//! Invariants (non-empty polygons):
//! - At least 3 vertices, all finite and pairwise distinct.
//! - Non-degenerate bounding box (`min.x != max.x`, `min.y != max.y`).
//! - Implicitly closed; counter-clockwise by convention of the producers.
//!
//! The empty polygon is a valid value meaning "undefined region" (a cell that
//! vanished numerically).

use super::predicates::is_between;
use super::types::{Bounds2, GeomCfg, Vec2};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
    bounds: Option<Bounds2>,
}

impl Polygon {
    /// Validated construction; an empty vertex list yields the empty polygon.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self> {
        let bounds = validate(&vertices)?;
        Ok(Self { vertices, bounds })
    }

    /// Axis-aligned rectangle `[min, max]`, counter-clockwise from `min`.
    pub fn rectangle(min: Vec2, max: Vec2) -> Result<Self> {
        Self::new(vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    /// Replace the vertex loop, revalidating and recomputing the bounding box.
    pub fn set_vertices(&mut self, vertices: Vec<Vec2>) -> Result<()> {
        self.bounds = validate(&vertices)?;
        self.vertices = vertices;
        Ok(())
    }

    /// Replace the vertex loop without touching the cached bounding box.
    ///
    /// Only the minimum vertex count is checked. Used when vertices are nudged
    /// without changing topology; callers finish with `set_vertices`.
    pub fn patch_vertices(&mut self, vertices: Vec<Vec2>) -> Result<()> {
        if !vertices.is_empty() && vertices.len() < 3 {
            return Err(Error::TooFewVertices {
                actual: vertices.len(),
            });
        }
        self.vertices = vertices;
        Ok(())
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Cached bounding box; `None` for the empty polygon.
    #[inline]
    pub fn bounds(&self) -> Option<Bounds2> {
        self.bounds
    }

    /// Edges `(v[k-1], v[k])`, starting with the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |k| (self.vertices[(k + n - 1) % n], self.vertices[k]))
    }

    /// Point-in-polygon (pnpoly). Points on an edge count as inside.
    pub fn contains(&self, p: Vec2, cfg: GeomCfg) -> Result<bool> {
        if self.vertices.is_empty() {
            return Err(Error::EmptyPolygon);
        }
        Ok(loop_contains(&self.vertices, p, cfg))
    }

    /// Shoelace area, positive for counter-clockwise loops.
    pub fn signed_area(&self) -> f64 {
        let twice: f64 = self.edges().map(|(a, b)| a.x * b.y - b.x * a.y).sum();
        0.5 * twice
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Area centroid; `None` for empty or zero-area loops.
    pub fn centroid(&self) -> Option<Vec2> {
        let a = self.signed_area();
        if self.vertices.is_empty() || a == 0.0 {
            return None;
        }
        let mut c = Vec2::zeros();
        for (p, q) in self.edges() {
            let cross = p.x * q.y - q.x * p.y;
            c += (p + q) * cross;
        }
        Some(c / (6.0 * a))
    }
}

/// Ray-casting test on a raw vertex loop, with on-edge early exit.
///
/// Shared by `Polygon::contains` and callers holding temporary loops that
/// are not worth validating (e.g. half-plane quadrilaterals).
pub fn loop_contains(vertices: &[Vec2], p: Vec2, cfg: GeomCfg) -> bool {
    let Some(&last) = vertices.last() else {
        return false;
    };
    let mut inside = false;
    let mut a = last;
    for &b in vertices {
        if is_between(a, b, p, cfg) {
            return true;
        }
        let straddles = (a.y < p.y && p.y <= b.y) || (p.y <= a.y && b.y < p.y);
        if straddles && (a.x <= p.x || b.x <= p.x) {
            let x_cross = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x_cross < p.x {
                inside = !inside;
            }
        }
        a = b;
    }
    inside
}

fn validate(vertices: &[Vec2]) -> Result<Option<Bounds2>> {
    if vertices.is_empty() {
        return Ok(None);
    }
    if vertices.len() < 3 {
        return Err(Error::TooFewVertices {
            actual: vertices.len(),
        });
    }
    for (index, v) in vertices.iter().enumerate() {
        if !v.x.is_finite() || !v.y.is_finite() {
            return Err(Error::NonFiniteVertex { index });
        }
    }
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if vertices[i] == vertices[j] {
                return Err(Error::DuplicateVertices {
                    first: i,
                    second: j,
                });
            }
        }
    }
    let bounds = Bounds2::from_points(vertices).ok_or(Error::EmptyPolygon)?;
    if bounds.min.x == bounds.max.x || bounds.min.y == bounds.max.y {
        return Err(Error::DegenerateBounds);
    }
    Ok(Some(bounds))
}
