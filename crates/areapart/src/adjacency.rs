//! Dual graph of a covering: which cells share an edge, and where.
//!
//! Entry `(i, j)` holds the overlap of the first pair of collinear edges of
//! cells `i` and `j` that share a segment. Without such a pair it keeps the
//! last collinear contact found (a single point, or nothing). The matrix is
//! symmetric with a `Disjoint` diagonal, and every entry is reset on rebuild.

use crate::error::{Error, Result};
use crate::geom2::{are_collinear, collinear_overlap, GeomCfg, Overlap, Polygon, Vec2};
use nalgebra::DMatrix;
use tracing::trace;

#[derive(Clone, Debug, PartialEq)]
pub struct AdjacencyGraph {
    edges: DMatrix<Overlap>,
}

impl AdjacencyGraph {
    /// Graph over `n` cells with no adjacencies.
    pub fn new(n: usize) -> Self {
        Self {
            edges: DMatrix::from_element(n, n, Overlap::Disjoint),
        }
    }

    pub fn from_covering(covering: &[Polygon], cfg: GeomCfg) -> Self {
        let mut g = Self::new(covering.len());
        for i in 0..covering.len() {
            for j in (i + 1)..covering.len() {
                g.set(i, j, shared_boundary(&covering[i], &covering[j], cfg));
            }
        }
        g
    }

    /// Recompute every entry from `covering`, which must have one polygon per
    /// cell.
    pub fn rebuild(&mut self, covering: &[Polygon], cfg: GeomCfg) -> Result<()> {
        if covering.len() != self.len() {
            return Err(Error::SizeMismatch {
                what: "covering",
                expected: self.len(),
                actual: covering.len(),
            });
        }
        *self = Self::from_covering(covering, cfg);
        let shared = self.edge_count();
        trace!(cells = self.len(), shared, "adjacency_rebuilt");
        Ok(())
    }

    fn set(&mut self, i: usize, j: usize, o: Overlap) {
        self.edges[(i, j)] = o;
        self.edges[(j, i)] = o;
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Overlap {
        self.edges[(i, j)]
    }

    /// Shared edge of cells `i` and `j`, if they have one.
    #[inline]
    pub fn shared_edge(&self, i: usize, j: usize) -> Option<(Vec2, Vec2)> {
        self.edges[(i, j)].segment()
    }

    /// Cells sharing an edge with `i`, with the edge endpoints.
    pub fn neighbours(&self, i: usize) -> impl Iterator<Item = (usize, Vec2, Vec2)> + '_ {
        (0..self.len()).filter_map(move |j| self.shared_edge(i, j).map(|(p, q)| (j, p, q)))
    }

    /// Number of unordered pairs sharing an edge.
    pub fn edge_count(&self) -> usize {
        let n = self.len();
        (0..n)
            .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
            .filter(|&(i, j)| self.edges[(i, j)].is_segment())
            .count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.nrows()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn shared_boundary(a: &Polygon, b: &Polygon, cfg: GeomCfg) -> Overlap {
    let mut found = Overlap::Disjoint;
    for (a1, a2) in a.edges() {
        for (b1, b2) in b.edges() {
            if are_collinear(a1, a2, b1, cfg) && are_collinear(a1, a2, b2, cfg) {
                found = collinear_overlap(a1, a2, b1, b2, cfg);
                if found.is_segment() {
                    return found;
                }
            }
        }
    }
    found
}
