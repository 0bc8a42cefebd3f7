//! Adapter for the SCIP command-line solver.

use crate::lp::{var_index, write_lp};
use crate::model::CoverModel;
use crate::solver::{Assignment, CoverSolver, SolveError, SolverStatus};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(feature = "tracing")]
use tracing::instrument;

fn default_executable() -> PathBuf {
    PathBuf::from("scip")
}

/// Runs `scip` on an LP export of the model and reads back its solution file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScipSolver {
    #[serde(default = "default_executable")]
    pub executable: PathBuf,
    /// Wall-clock limit in seconds passed as `limits/time`.
    #[serde(default)]
    pub time_limit: Option<f64>,
    /// Keep `model.lp` and `model.sol` in this directory instead of a
    /// temporary one.
    #[serde(default)]
    pub work_dir: Option<PathBuf>,
}

impl Default for ScipSolver {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            time_limit: None,
            work_dir: None,
        }
    }
}

impl ScipSolver {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Interactive-shell commands for one batch run.
    fn commands(&self, lp: &Path, sol: &Path) -> Vec<String> {
        let mut cmds = Vec::new();
        if let Some(limit) = self.time_limit {
            cmds.push(format!("set limits time {limit}"));
        }
        cmds.push(format!("read {}", lp.display()));
        cmds.push("optimize".to_string());
        cmds.push(format!("write solution {}", sol.display()));
        cmds.push("quit".to_string());
        cmds
    }

    fn run_in(&self, dir: &Path, model: &CoverModel) -> Result<Assignment, SolveError> {
        let lp_path = dir.join("model.lp");
        let sol_path = dir.join("model.sol");
        write_lp(model, BufWriter::new(File::create(&lp_path)?))?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg("-q");
        for c in self.commands(&lp_path, &sol_path) {
            cmd.arg("-c").arg(c);
        }
        log::debug!("running {:?}", cmd);

        let output = cmd.output().map_err(|source| SolveError::Spawn {
            program: self.executable.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(SolveError::ProcessFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = fs::read_to_string(&sol_path)?;
        parse_scip_solution(&text, model)
    }
}

impl CoverSolver for ScipSolver {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(variables = model.variables().len()))
    )]
    fn solve(&self, model: &CoverModel) -> Result<Assignment, SolveError> {
        match &self.work_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                self.run_in(dir, model)
            }
            None => {
                let tmp = tempfile::Builder::new().prefix("cam-cover-").tempdir()?;
                self.run_in(tmp.path(), model)
            }
        }
    }
}

fn parse_status(text: &str) -> SolverStatus {
    let lower = text.trim().to_ascii_lowercase();
    if lower.contains("optimal solution found") {
        SolverStatus::Optimal
    } else if lower.contains("infeasible or unbounded") {
        SolverStatus::InfeasibleOrUnbounded
    } else if lower.contains("unbounded") {
        SolverStatus::Unbounded
    } else if lower.contains("infeasible") {
        SolverStatus::Infeasible
    } else if lower.contains("time limit") {
        SolverStatus::TimeLimit
    } else {
        SolverStatus::Other(text.trim().to_string())
    }
}

/// Parse a SCIP `write solution` file written for a model exported by
/// [`crate::write_lp`].
///
/// Only an optimal status yields an assignment; every other status is
/// returned as [`SolveError::Status`].
pub fn parse_scip_solution(text: &str, model: &CoverModel) -> Result<Assignment, SolveError> {
    let mut status = None;
    let mut selected = Vec::new();

    for (n, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("solution status:") {
            status = Some(parse_status(rest));
            continue;
        }
        if line.starts_with("objective value:") || line.starts_with("no solution available") {
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some(name), Some(value)) = (fields.next(), fields.next()) else {
            return Err(SolveError::Parse {
                line: n + 1,
                message: format!("expected `<name> <value>`, got `{line}`"),
            });
        };
        let value: f64 = value.parse().map_err(|_| SolveError::Parse {
            line: n + 1,
            message: format!("bad value `{value}` for `{name}`"),
        })?;
        let index = var_index(name)
            .filter(|&i| i < model.variables().len())
            .ok_or_else(|| SolveError::UnknownVariable(name.to_string()))?;
        if value > 0.5 {
            selected.push(index);
        }
    }

    let status = status.ok_or_else(|| SolveError::Parse {
        line: 1,
        message: "missing `solution status:` line".to_string(),
    })?;
    if status != SolverStatus::Optimal {
        return Err(SolveError::Status(status));
    }
    Ok(Assignment::new(model, selected, status))
}
