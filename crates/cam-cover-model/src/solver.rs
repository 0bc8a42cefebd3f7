use crate::model::CoverModel;
use cam_cover_core::Candidate;
use cam_cover_placement::CandidateSet;
use serde::Serialize;
use std::path::PathBuf;

/// Termination status reported by a solver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    Optimal,
    Infeasible,
    Unbounded,
    /// The presolver proved one of the two without deciding which.
    InfeasibleOrUnbounded,
    TimeLimit,
    /// Anything else, verbatim.
    Other(String),
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Optimal => f.write_str("optimal"),
            SolverStatus::Infeasible => f.write_str("infeasible"),
            SolverStatus::Unbounded => f.write_str("unbounded"),
            SolverStatus::InfeasibleOrUnbounded => f.write_str("infeasible or unbounded"),
            SolverStatus::TimeLimit => f.write_str("time limit reached"),
            SolverStatus::Other(s) => f.write_str(s),
        }
    }
}

/// Errors at the solver boundary. They are passed through unchanged; nothing
/// here retries.
#[derive(thiserror::Error, Debug)]
pub enum SolveError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to run solver `{program}`: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("solver exited with {code:?}: {stderr}")]
    ProcessFailed { code: Option<i32>, stderr: String },
    #[error("solver finished with status: {0}")]
    Status(SolverStatus),
    #[error("malformed solver output at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("solver returned unknown variable `{0}`")]
    UnknownVariable(String),
    #[error("solver selection leaves piece #{piece} uncovered")]
    Violated { piece: usize },
}

/// Solver output: the variables set to one.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Assignment {
    /// Selected variable indices, ascending and unique.
    pub selected: Vec<usize>,
    pub objective: f64,
    pub status: SolverStatus,
}

impl Assignment {
    /// Build an assignment, normalising the selection and computing the
    /// objective from the model's costs.
    pub fn new(model: &CoverModel, mut selected: Vec<usize>, status: SolverStatus) -> Self {
        selected.sort_unstable();
        selected.dedup();
        let objective = model.cost_of(&selected);
        Self {
            selected,
            objective,
            status,
        }
    }

    /// Check the selection against every covering constraint of `model`.
    pub fn verify(&self, model: &CoverModel) -> Result<(), SolveError> {
        match model.first_violation(&self.selected) {
            Some(c) => Err(SolveError::Violated { piece: c.piece }),
            None => Ok(()),
        }
    }

    /// Selected candidates, in candidate order.
    pub fn candidates<'a>(
        &'a self,
        model: &'a CoverModel,
        candidates: &'a CandidateSet,
    ) -> impl Iterator<Item = &'a Candidate> + 'a {
        self.selected
            .iter()
            .filter_map(move |&v| model.variables().get(v))
            .filter_map(move |var| candidates.get(var.candidate))
    }
}

/// Seam to an integer-program solver able to minimise a covering model.
pub trait CoverSolver {
    fn solve(&self, model: &CoverModel) -> Result<Assignment, SolveError>;
}

impl<F> CoverSolver for F
where
    F: Fn(&CoverModel) -> Result<Assignment, SolveError>,
{
    fn solve(&self, model: &CoverModel) -> Result<Assignment, SolveError> {
        self(model)
    }
}
