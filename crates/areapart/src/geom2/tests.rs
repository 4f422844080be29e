use super::*;
use crate::error::Error;
use nalgebra::vector;
use proptest::prelude::*;

fn cfg() -> GeomCfg {
    GeomCfg::default()
}

fn unit_square() -> Polygon {
    Polygon::rectangle(vector![0.0, 0.0], vector![1.0, 1.0]).unwrap()
}

#[test]
fn polygon_validation_rejects_malformed_loops() {
    assert!(matches!(
        Polygon::new(vec![vector![0.0, 0.0], vector![1.0, 0.0]]),
        Err(Error::TooFewVertices { actual: 2 })
    ));
    assert!(matches!(
        Polygon::new(vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![0.0, 0.0],
            vector![0.0, 1.0],
        ]),
        Err(Error::DuplicateVertices { first: 0, second: 2 })
    ));
    assert!(matches!(
        Polygon::new(vec![vector![0.0, 0.0], vector![1.0, 0.0], vector![2.0, 0.0]]),
        Err(Error::DegenerateBounds)
    ));
    assert!(matches!(
        Polygon::new(vec![
            vector![0.0, 0.0],
            vector![f64::INFINITY, 0.0],
            vector![0.0, 1.0],
        ]),
        Err(Error::NonFiniteVertex { index: 1 })
    ));
    // empty is the "undefined region" sentinel, not an error
    let empty = Polygon::new(Vec::new()).unwrap();
    assert!(empty.is_empty());
    assert!(empty.bounds().is_none());
}

#[test]
fn patch_keeps_bounds_and_only_checks_count() {
    let mut p = unit_square();
    let before = p.bounds();
    p.patch_vertices(vec![
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 2.0],
    ])
    .unwrap();
    assert_eq!(p.bounds(), before);
    assert!(p
        .patch_vertices(vec![vector![0.0, 0.0], vector![1.0, 1.0]])
        .is_err());
    p.set_vertices(vec![
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![2.0, 2.0],
    ])
    .unwrap();
    assert_eq!(p.bounds().unwrap().max, vector![2.0, 2.0]);
}

#[test]
fn pnpoly_vertices_centroid_and_outside() {
    let p = Polygon::new(vec![
        vector![0.0, 0.0],
        vector![3.0, 0.5],
        vector![2.5, 2.0],
        vector![0.5, 1.5],
    ])
    .unwrap();
    for &v in p.vertices() {
        assert!(p.contains(v, cfg()).unwrap());
    }
    let c = p.centroid().unwrap();
    assert!(p.contains(c, cfg()).unwrap());
    assert!(!p.contains(vector![3.5, 1.0], cfg()).unwrap());
    assert!(!p.contains(vector![1.0, -0.1], cfg()).unwrap());
    // midpoint of an edge counts as inside
    assert!(p.contains(vector![1.5, 0.25], cfg()).unwrap());
}

#[test]
fn pnpoly_on_empty_polygon_is_an_error() {
    let p = Polygon::default();
    assert!(matches!(
        p.contains(vector![0.0, 0.0], cfg()),
        Err(Error::EmptyPolygon)
    ));
}

#[test]
fn area_and_centroid_of_rectangle() {
    let r = Polygon::rectangle(vector![1.0, 2.0], vector![3.0, 6.0]).unwrap();
    assert!((r.signed_area() - 8.0).abs() < 1e-12);
    let c = r.centroid().unwrap();
    assert!((c - vector![2.0, 4.0]).norm() < 1e-12);
}

#[test]
fn perp_direction_and_distance() {
    let d = perp_direction(vector![0.0, 0.0], vector![2.0, 0.0], 0.5);
    assert!((d - vector![0.0, -0.5]).norm() < 1e-15);
    assert_eq!(
        perp_direction(vector![1.0, 1.0], vector![1.0, 1.0], 3.0),
        vector![0.0, 0.0]
    );
    let dist = perp_distance_to_line(vector![0.0, 0.0], vector![1.0, 1.0], vector![1.0, 0.0], cfg());
    assert!((dist - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
    // horizontal shortcut
    let dh = perp_distance_to_line(vector![0.0, 2.0], vector![5.0, 2.0], vector![1.0, 3.5], cfg());
    assert!((dh - 1.5).abs() < 1e-15);
}

#[test]
fn collinear_overlap_cases() {
    let c = cfg();
    let p1 = vector![0.0, 0.0];
    let p2 = vector![2.0, 0.0];
    // contained
    assert_eq!(
        collinear_overlap(p1, p2, vector![0.5, 0.0], vector![1.5, 0.0], c),
        Overlap::Segment(vector![0.5, 0.0], vector![1.5, 0.0])
    );
    // partial overlap to the right
    assert_eq!(
        collinear_overlap(p1, p2, vector![1.0, 0.0], vector![3.0, 0.0], c),
        Overlap::Segment(vector![1.0, 0.0], p2)
    );
    // second segment covers the first
    assert_eq!(
        collinear_overlap(p1, p2, vector![-1.0, 0.0], vector![3.0, 0.0], c),
        Overlap::Segment(p1, p2)
    );
    // touching at one endpoint
    assert_eq!(
        collinear_overlap(p1, p2, p2, vector![3.0, 0.0], c),
        Overlap::Point(p2)
    );
    // disjoint
    assert_eq!(
        collinear_overlap(p1, p2, vector![2.5, 0.0], vector![3.0, 0.0], c),
        Overlap::Disjoint
    );
    // shared edge walked in opposite directions
    let o = collinear_overlap(p1, p2, p2, p1, c);
    assert_eq!(o.segment(), Some((p2, p1)));
    assert_eq!(o.len(), 2);
}

#[test]
fn coincident_triple_is_collinear() {
    let p = vector![0.3, 0.7];
    assert!(are_collinear(p, p, p, cfg()));
    assert!(is_between(p, p, p, cfg()));
    assert!(!is_between(p, p, vector![0.3, 0.8], cfg()));
}

fn coords() -> impl Strategy<Value = (f64, f64)> {
    (-10.0f64..10.0, -10.0f64..10.0)
}

proptest! {
    #[test]
    fn collinearity_is_scale_invariant(
        a in coords(),
        b in coords(),
        t in -2.0f64..3.0,
        off in prop_oneof![Just(0.0), 0.1f64..1.0],
        k in 0.1f64..10.0,
    ) {
        let a = vector![a.0, a.1];
        let b = vector![b.0, b.1];
        prop_assume!((b - a).norm() > 0.1);
        prop_assume!((b.x - a.x).abs() > 1e-3 && (b.y - a.y).abs() > 1e-3);
        let ab = b - a;
        let n = vector![-ab.y, ab.x];
        let p = a + ab * t + n * off;
        let expected = off == 0.0;
        prop_assert_eq!(are_collinear(a, b, p, cfg()), expected);
        prop_assert_eq!(are_collinear(a * k, b * k, p * k, cfg()), expected);
    }

    #[test]
    fn between_is_symmetric(
        a in coords(),
        b in coords(),
        t in -1.0f64..2.0,
    ) {
        let a = vector![a.0, a.1];
        let b = vector![b.0, b.1];
        prop_assume!((b - a).norm() > 0.1);
        prop_assume!(t.abs() > 1e-6 && (t - 1.0).abs() > 1e-6);
        let p = point_along_line(a, b, t);
        let expected = (0.0..=1.0).contains(&t);
        prop_assert_eq!(is_between(a, b, p, cfg()), expected);
        prop_assert_eq!(is_between(b, a, p, cfg()), expected);
        prop_assert_eq!(are_collinear(a, b, p, cfg()), are_collinear(b, a, p, cfg()));
    }

    #[test]
    fn pnpoly_rejects_points_outside_bounds(
        x in -5.0f64..5.0,
        y in -5.0f64..5.0,
    ) {
        let sq = unit_square();
        let p = vector![x, y];
        let inside_box = (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y);
        if !inside_box {
            prop_assert!(!sq.contains(p, cfg()).unwrap());
        }
    }
}
