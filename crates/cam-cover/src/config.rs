//! JSON run configuration.

use cam_cover_core::{CameraSpec, CoverParams, ParamsError, DEFAULT_RANGE_SAFETY_MARGIN};
use cam_cover_model::{InfeasiblePolicy, ScipSolver};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Everything a run needs besides the input file itself.
///
/// Every field has a default, so `{}` is a valid config. Command-line flags
/// override the loaded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub range_safety_margin: f64,
    pub restrict_to_grid: bool,
    pub infeasible_policy: InfeasiblePolicy,
    pub solver: ScipSolver,
    /// Directory receiving the dated submission file.
    pub output_dir: PathBuf,
    /// Where to write the JSON run report, if anywhere.
    pub report_path: Option<PathBuf>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            range_safety_margin: DEFAULT_RANGE_SAFETY_MARGIN,
            restrict_to_grid: true,
            infeasible_policy: InfeasiblePolicy::Abort,
            solver: ScipSolver::default(),
            output_dir: PathBuf::from("."),
            report_path: None,
        }
    }
}

impl PlanConfig {
    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }

    /// Combine the per-file camera specs with this config into validated
    /// parameters.
    pub fn params(&self, short: CameraSpec, long: CameraSpec) -> Result<CoverParams, ParamsError> {
        CoverParams::from_specs(short, long, self.range_safety_margin)
            .map(|p| p.with_grid_restriction(self.restrict_to_grid))
    }
}
