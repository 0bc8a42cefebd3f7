use crate::camera::{CameraKind, CameraSpec};
use serde::{Deserialize, Serialize};

/// Default amount by which camera ranges are shrunk before building centers.
pub const DEFAULT_RANGE_SAFETY_MARGIN: f64 = 0.01;

/// Parameter validation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("{kind} camera range must be finite and > 0 (got {value})")]
    InvalidRange { kind: CameraKind, value: f64 },
    #[error("{kind} camera cost must be finite and > 0 (got {value})")]
    InvalidCost { kind: CameraKind, value: f64 },
    #[error("range_safety_margin must be finite, >= 0 and below both ranges (got {value})")]
    InvalidMargin { value: f64 },
}

fn default_margin() -> f64 {
    DEFAULT_RANGE_SAFETY_MARGIN
}

fn default_restrict_to_grid() -> bool {
    true
}

/// Run parameters shared by every pipeline stage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoverParams {
    pub short: CameraSpec,
    pub long: CameraSpec,
    /// Amount subtracted from each range before computing candidate centers.
    ///
    /// Larger values make candidates safer at the cost of slightly fewer
    /// pairs being coverable by a single camera.
    #[serde(default = "default_margin")]
    pub range_safety_margin: f64,
    /// Drop candidate centers with a negative coordinate.
    #[serde(default = "default_restrict_to_grid")]
    pub restrict_to_grid: bool,
}

impl CoverParams {
    /// Build and validate parameters with the default margin and grid clipping.
    pub fn new(short: CameraSpec, long: CameraSpec) -> Result<Self, ParamsError> {
        Self::from_specs(short, long, DEFAULT_RANGE_SAFETY_MARGIN)
    }

    /// Build and validate parameters with an explicit margin, so ranges below
    /// the default margin are accepted when `margin` fits them.
    pub fn from_specs(short: CameraSpec, long: CameraSpec, margin: f64) -> Result<Self, ParamsError> {
        Self {
            short,
            long,
            range_safety_margin: margin,
            restrict_to_grid: true,
        }
        .validated()
    }

    pub fn with_margin(mut self, margin: f64) -> Result<Self, ParamsError> {
        self.range_safety_margin = margin;
        self.validated()
    }

    pub fn with_grid_restriction(mut self, restrict: bool) -> Self {
        self.restrict_to_grid = restrict;
        self
    }

    /// Check every invariant, returning `self` unchanged on success.
    pub fn validated(self) -> Result<Self, ParamsError> {
        for kind in CameraKind::ALL {
            let spec = self.spec(kind);
            if !spec.range.is_finite() || spec.range <= 0.0 {
                return Err(ParamsError::InvalidRange {
                    kind,
                    value: spec.range,
                });
            }
            if !spec.unit_cost.is_finite() || spec.unit_cost <= 0.0 {
                return Err(ParamsError::InvalidCost {
                    kind,
                    value: spec.unit_cost,
                });
            }
        }
        let margin = self.range_safety_margin;
        if !margin.is_finite()
            || margin < 0.0
            || margin >= self.short.range
            || margin >= self.long.range
        {
            return Err(ParamsError::InvalidMargin { value: margin });
        }
        if margin == 0.0 {
            log::warn!("range_safety_margin is 0; tangent candidates may fail the strict range test");
        }
        Ok(self)
    }

    #[inline]
    pub fn spec(&self, kind: CameraKind) -> &CameraSpec {
        match kind {
            CameraKind::Short => &self.short,
            CameraKind::Long => &self.long,
        }
    }

    #[inline]
    pub fn effective_radius(&self, kind: CameraKind) -> f64 {
        self.spec(kind).effective_radius(self.range_safety_margin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn specs() -> (CameraSpec, CameraSpec) {
        (CameraSpec::new(2.0, 1.0), CameraSpec::new(5.0, 3.0))
    }

    #[test]
    fn defaults_are_applied() {
        let (short, long) = specs();
        let params = CoverParams::new(short, long).expect("valid");
        assert_eq!(params.range_safety_margin, DEFAULT_RANGE_SAFETY_MARGIN);
        assert!(params.restrict_to_grid);
        assert!((params.effective_radius(CameraKind::Long) - 4.99).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_values() {
        let (short, long) = specs();
        let err = CoverParams::new(CameraSpec::new(0.0, 1.0), long).unwrap_err();
        assert!(matches!(
            err,
            ParamsError::InvalidRange {
                kind: CameraKind::Short,
                ..
            }
        ));

        let err = CoverParams::new(short, CameraSpec::new(5.0, f64::NAN)).unwrap_err();
        assert!(matches!(
            err,
            ParamsError::InvalidCost {
                kind: CameraKind::Long,
                ..
            }
        ));
    }

    #[test]
    fn margin_must_stay_below_both_ranges() {
        let (short, long) = specs();
        let params = CoverParams::new(short, long).expect("valid");
        assert!(params.with_margin(0.0015).is_ok());
        assert!(params.with_margin(-0.1).is_err());
        assert_eq!(
            params.with_margin(2.0).unwrap_err(),
            ParamsError::InvalidMargin { value: 2.0 }
        );
    }

    #[test]
    fn explicit_margin_is_validated_instead_of_the_default() {
        let (_, long) = specs();
        let tiny = CameraSpec::new(0.005, 1.0);
        assert_eq!(
            CoverParams::new(tiny, long).unwrap_err(),
            ParamsError::InvalidMargin { value: DEFAULT_RANGE_SAFETY_MARGIN }
        );
        let params = CoverParams::from_specs(tiny, long, 0.001).expect("valid");
        assert_eq!(params.range_safety_margin, 0.001);
    }

    #[test]
    fn json_fills_optional_fields() {
        let json = r#"{
            "short": { "range": 2.0, "unit_cost": 1.0 },
            "long": { "range": 5.0, "unit_cost": 3.0 }
        }"#;
        let params: CoverParams = serde_json::from_str(json).expect("parse");
        assert_eq!(params.range_safety_margin, DEFAULT_RANGE_SAFETY_MARGIN);
        assert!(params.restrict_to_grid);
    }
}
