use super::*;
use approx::assert_abs_diff_eq;
use nalgebra::vector;

fn cfg() -> GeomCfg {
    GeomCfg::default()
}

fn unit_square() -> Polygon {
    Polygon::rectangle(vector![0.0, 0.0], vector![1.0, 1.0]).unwrap()
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::rectangle(vector![x0, y0], vector![x1, y1]).unwrap()
}

#[test]
fn coefficients_reproduce_corner_samples() {
    let (x0, y0, dx, dy) = (2.0, 3.0, 0.5, 0.25);
    let (v00, v10, v01, v11) = (1.0, 4.0, -2.0, 7.5);
    let c = CellCoeffs::fit(x0, y0, dx, dy, v00, v10, v01, v11);
    assert_abs_diff_eq!(c.eval(vector![x0, y0]), v00, epsilon = 1e-12);
    assert_abs_diff_eq!(c.eval(vector![x0 + dx, y0]), v10, epsilon = 1e-12);
    assert_abs_diff_eq!(c.eval(vector![x0, y0 + dy]), v01, epsilon = 1e-12);
    assert_abs_diff_eq!(c.eval(vector![x0 + dx, y0 + dy]), v11, epsilon = 1e-12);
}

#[test]
fn closed_form_integrals_of_constant_cell() {
    let c = CellCoeffs {
        a: 0.0,
        b: 0.0,
        c: 0.0,
        d: 2.0,
    };
    let it = c.integrate(1.0, 3.0, 0.0, 1.0);
    assert_abs_diff_eq!(it.int, 4.0, epsilon = 1e-12);
    // mass times centroid (2, 0.5)
    assert_abs_diff_eq!(it.intx, 8.0, epsilon = 1e-12);
    assert_abs_diff_eq!(it.inty, 2.0, epsilon = 1e-12);
}

#[test]
fn uniform_field_is_normalized() {
    let f = DensityField::uniform(unit_square(), 20, 20, cfg()).unwrap();
    assert!(f.is_set());
    assert_abs_diff_eq!(f.unweighted_area(), 1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(f.weighted_area(&unit_square()).unwrap(), 1.0, epsilon = 1e-12);
    for &v in f.samples() {
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
    }
    assert!(f.in_region(0, 0) && f.in_region(19, 19));
}

#[test]
fn weighted_area_of_half_and_nesting() {
    let f = DensityField::uniform(unit_square(), 21, 21, cfg()).unwrap();
    let half = rect(0.0, 0.0, 0.5, 1.0);
    assert_abs_diff_eq!(f.weighted_area(&half).unwrap(), 0.5, epsilon = 1e-9);

    let inner = rect(0.2, 0.2, 0.6, 0.6);
    let outer = rect(0.1, 0.1, 0.9, 0.7);
    let a_in = f.weighted_area(&inner).unwrap();
    let a_out = f.weighted_area(&outer).unwrap();
    assert!(a_in <= a_out);
    assert!(a_out <= 1.0 + 1e-12);
}

#[test]
fn linear_density_centroid_and_interpolation() {
    let f = DensityField::from_fn(unit_square(), 21, 21, cfg(), |p| p.x).unwrap();
    // normalized density is 2x
    let c = f.centroid(&unit_square()).unwrap();
    assert_abs_diff_eq!(c.x, 2.0 / 3.0, epsilon = 1e-9);
    assert_abs_diff_eq!(c.y, 0.5, epsilon = 1e-9);
    assert_abs_diff_eq!(f.interpolate(vector![0.3, 0.7]).unwrap(), 0.6, epsilon = 1e-9);
    // clamped at the far corner
    assert_abs_diff_eq!(f.interpolate(vector![1.0, 1.0]).unwrap(), 2.0, epsilon = 1e-9);
    let li = f
        .line_integral(0.1, vector![0.0, 0.5], vector![1.0, 0.5])
        .unwrap();
    assert_abs_diff_eq!(li, 1.0, epsilon = 1e-9);
}

#[test]
fn line_integral_of_uniform_density_is_length() {
    let f = DensityField::uniform(unit_square(), 20, 20, cfg()).unwrap();
    let li = f
        .line_integral(0.1, vector![0.5, 0.0], vector![0.5, 1.0])
        .unwrap();
    assert_abs_diff_eq!(li, 1.0, epsilon = 1e-9);
    let diag = f
        .line_integral(0.25, vector![0.0, 0.0], vector![1.0, 1.0])
        .unwrap();
    assert_abs_diff_eq!(diag, std::f64::consts::SQRT_2, epsilon = 1e-9);
    assert!(matches!(
        f.line_integral(0.0, vector![0.0, 0.0], vector![1.0, 0.0]),
        Err(Error::InvalidParameter { .. })
    ));
    assert!(f
        .line_integral(1.5, vector![0.0, 0.0], vector![1.0, 0.0])
        .is_err());
}

#[test]
fn line_integral_ignores_sample_scale() {
    let f = |p: Vec2| 1.0 + p.x;
    let a = DensityField::from_fn(unit_square(), 21, 21, cfg(), f).unwrap();
    let b = DensityField::from_fn(unit_square(), 21, 21, cfg(), |p| 5.0 * f(p)).unwrap();
    let (p, q) = (vector![0.5, 0.0], vector![0.5, 1.0]);
    let la = a.line_integral(0.1, p, q).unwrap();
    assert_abs_diff_eq!(la, b.line_integral(0.1, p, q).unwrap(), epsilon = 1e-12);
    // samples are divided by the total 1.5
    assert_abs_diff_eq!(la, 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(b.samples()[0], 1.0 / 1.5, epsilon = 1e-12);
}

#[test]
fn zero_samples_fall_back_to_uniform() {
    let f = DensityField::new(unit_square(), 5, 5, vec![0.0; 25], cfg()).unwrap();
    assert_abs_diff_eq!(f.weighted_area(&unit_square()).unwrap(), 1.0, epsilon = 1e-12);
    for &v in f.samples() {
        assert_abs_diff_eq!(v, 1.0, epsilon = 1e-12);
    }
}

#[test]
fn construction_errors_and_unset_fields() {
    assert!(matches!(
        DensityField::new(unit_square(), 3, 3, vec![1.0; 8], cfg()),
        Err(Error::SizeMismatch { expected: 9, actual: 8, .. })
    ));
    assert!(matches!(
        DensityField::uniform(unit_square(), 1, 5, cfg()),
        Err(Error::GridTooSmall { nx: 1, ny: 5 })
    ));
    let triangle = Polygon::new(vec![
        vector![0.0, 0.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
    ])
    .unwrap();
    assert!(matches!(
        DensityField::uniform(triangle, 2, 2, cfg()),
        Err(Error::NoInteriorCells)
    ));

    let unset = DensityField::uniform(unit_square(), 0, 0, cfg()).unwrap();
    assert!(!unset.is_set());
    assert!(matches!(
        unset.weighted_area(&unit_square()),
        Err(Error::DensityUnset)
    ));
    assert!(matches!(
        DensityField::unset().interpolate(vector![0.5, 0.5]),
        Err(Error::DensityUnset)
    ));
    let no_region = DensityField::uniform(Polygon::default(), 4, 4, cfg()).unwrap();
    assert!(!no_region.is_set());
}

#[test]
fn degenerate_query_polygons_use_fallbacks() {
    let mut f = DensityField::uniform(unit_square(), 11, 11, cfg()).unwrap();
    f.set_lower_bound(1e-3);
    let empty = Polygon::default();
    assert_eq!(f.weighted_area(&empty).unwrap(), 1e-3);
    assert_eq!(f.centroid(&empty).unwrap(), vector![0.0, 0.0]);

    // smaller than one grid cell: no cell fully inside
    let speck = rect(0.42, 0.33, 0.44, 0.35);
    assert_eq!(f.weighted_area(&speck).unwrap(), 1e-3);
    assert_eq!(f.centroid(&speck).unwrap(), vector![0.42, 0.33]);
}

#[test]
fn triangle_region_integrates_to_one() {
    let triangle = Polygon::new(vec![
        vector![0.0, 0.0],
        vector![2.0, 0.0],
        vector![0.0, 2.0],
    ])
    .unwrap();
    let f = DensityField::from_fn(triangle.clone(), 41, 41, cfg(), |p| 1.0 + p.y).unwrap();
    assert_abs_diff_eq!(f.weighted_area(&triangle).unwrap(), 1.0, epsilon = 1e-9);
    // staircase approximation stays below the exact area
    assert!(f.unweighted_area() < 2.0);
    assert!(f.unweighted_area() > 1.8);
}
