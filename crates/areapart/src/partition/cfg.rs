//! Algorithm parameters and their validation.
//!
//! Parameters are plain data: `serde` derives let callers keep them in JSON
//! next to their inputs. Missing fields take the defaults below.

use crate::error::{Error, Result};
use crate::geom2::GeomCfg;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionParams {
    /// Normalized sub-interval length for shared-edge line integrals, in (0, 1].
    pub line_int_step: f64,
    /// Gradient step on weights.
    pub weights_step: f64,
    /// Fraction of the way each center moves toward its centroid, in (0, 1].
    pub centers_step: f64,
    /// Inner loop stops once the squared volume error is at most this.
    pub volume_tolerance: f64,
    /// Outer loop stops once the squared center displacement is at most this.
    pub convergence_criterion: f64,
    pub max_iterations_volume: usize,
    pub max_iterations_centers: usize,
    /// Floor for reported weighted areas, in (0, 1).
    pub volume_lower_bound: f64,
    /// Geometric robustness constant ε.
    pub robustness: f64,
    /// Initial inward offset of default centers from the first region edge.
    pub default_center_offset: f64,
    /// How many times the default-center offset may be halved.
    pub default_center_attempts: usize,
}

impl Default for PartitionParams {
    fn default() -> Self {
        Self {
            line_int_step: 0.1,
            weights_step: 0.1,
            centers_step: 1.0,
            volume_tolerance: 0.002,
            convergence_criterion: 0.02,
            max_iterations_volume: 200,
            max_iterations_centers: 500,
            volume_lower_bound: 1e-5,
            robustness: 1e-7,
            default_center_offset: 0.01,
            default_center_attempts: 10,
        }
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> Error {
    Error::InvalidParameter {
        name,
        value,
        reason,
    }
}

impl PartitionParams {
    /// Range checks; NaN fails every check.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<()> {
        let unit = |v: f64| v > 0.0 && v <= 1.0;
        if !unit(self.line_int_step) {
            return Err(invalid("line_int_step", self.line_int_step, "must lie in (0, 1]"));
        }
        if !(self.weights_step > 0.0) {
            return Err(invalid("weights_step", self.weights_step, "must be positive"));
        }
        if !unit(self.centers_step) {
            return Err(invalid("centers_step", self.centers_step, "must lie in (0, 1]"));
        }
        if !(self.volume_tolerance > 0.0) {
            return Err(invalid("volume_tolerance", self.volume_tolerance, "must be positive"));
        }
        if !(self.convergence_criterion > 0.0) {
            return Err(invalid(
                "convergence_criterion",
                self.convergence_criterion,
                "must be positive",
            ));
        }
        if self.max_iterations_volume == 0 {
            return Err(invalid("max_iterations_volume", 0.0, "must be positive"));
        }
        if self.max_iterations_centers == 0 {
            return Err(invalid("max_iterations_centers", 0.0, "must be positive"));
        }
        if !(self.volume_lower_bound > 0.0 && self.volume_lower_bound < 1.0) {
            return Err(invalid("volume_lower_bound", self.volume_lower_bound, "must lie in (0, 1)"));
        }
        if !(self.robustness > 0.0 && self.robustness.is_finite()) {
            return Err(invalid("robustness", self.robustness, "must be positive"));
        }
        if !(self.default_center_offset > 0.0) {
            return Err(invalid(
                "default_center_offset",
                self.default_center_offset,
                "must be positive",
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn geom_cfg(&self) -> GeomCfg {
        GeomCfg::new(self.robustness)
    }

    /// Parse and validate parameters from JSON.
    pub fn from_json(s: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(s)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let p = PartitionParams::default();
        p.validate().unwrap();
        assert_eq!(p.geom_cfg().mult(), 10_000_000);
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let bad = [
            PartitionParams {
                line_int_step: 0.0,
                ..Default::default()
            },
            PartitionParams {
                centers_step: 1.5,
                ..Default::default()
            },
            PartitionParams {
                volume_lower_bound: 1.0,
                ..Default::default()
            },
            PartitionParams {
                max_iterations_centers: 0,
                ..Default::default()
            },
            PartitionParams {
                weights_step: f64::NAN,
                ..Default::default()
            },
        ];
        for p in bad {
            assert!(matches!(p.validate(), Err(Error::InvalidParameter { .. })));
        }
    }

    #[test]
    fn partial_json_takes_defaults() {
        let p = PartitionParams::from_json(r#"{ "weights_step": 0.5, "max_iterations_volume": 20 }"#)
            .unwrap();
        assert_eq!(p.weights_step, 0.5);
        assert_eq!(p.max_iterations_volume, 20);
        assert_eq!(p.centers_step, 1.0);

        let back = PartitionParams::from_json(&p.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back.max_iterations_volume, p.max_iterations_volume);
        assert_eq!(back.default_center_attempts, p.default_center_attempts);
        assert!((back.robustness / p.robustness - 1.0).abs() < 1e-12);
        assert!((back.volume_tolerance / p.volume_tolerance - 1.0).abs() < 1e-12);

        assert!(matches!(
            PartitionParams::from_json(r#"{ "centers_step": 0.0 }"#),
            Err(Error::InvalidParameter { name: "centers_step", .. })
        ));
        assert!(matches!(
            PartitionParams::from_json("{ not json"),
            Err(Error::Config(_))
        ));
    }
}
