//! Basic 2D types and the robustness tolerance shared by all predicates.
//!
//! - `GeomCfg`: carries the robustness constant ε and the integer scaling
//!   derived from it. Passed by value into every predicate; there is no
//!   process-wide tolerance.
//! - `Bounds2`: axis-aligned bounding box cached by `Polygon`.
//!
//! Code cross-refs: `predicates`, `polygon::Polygon`, `crate::clip::Scaling`

use nalgebra::Vector2;

/// Point/vector type used throughout the crate.
pub type Vec2 = Vector2<f64>;

/// Geometry configuration (tolerances).
///
/// `robustness` is a relative tolerance for collinearity and an absolute one
/// for coincidence checks. Its reciprocal is the integer scale handed to the
/// clip engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeomCfg {
    pub robustness: f64,
}

impl Default for GeomCfg {
    fn default() -> Self {
        Self { robustness: 1e-7 }
    }
}

impl GeomCfg {
    #[inline]
    pub fn new(robustness: f64) -> Self {
        Self { robustness }
    }

    /// Integer coordinate multiplier `round(1/ε)`.
    ///
    /// Rounded rather than truncated: `1.0 / 1e-7` is not exactly 1e7 in f64.
    #[inline]
    pub fn mult(&self) -> i64 {
        (1.0 / self.robustness).round() as i64
    }
}

/// Closed axis-aligned box `[min.x, max.x] × [min.y, max.y]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds2 {
    /// Tight box around `points`; `None` for an empty slice.
    pub fn from_points(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let mut b = Bounds2 {
            min: first,
            max: first,
        };
        for p in &points[1..] {
            b.min.x = b.min.x.min(p.x);
            b.min.y = b.min.y.min(p.y);
            b.max.x = b.max.x.max(p.x);
            b.max.y = b.max.y.max(p.y);
        }
        Some(b)
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
