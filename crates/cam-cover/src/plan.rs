//! End-to-end pipeline: input -> candidates -> coverage -> model -> selection.

use crate::config::{ConfigIoError, PlanConfig};
use crate::io::{InputError, ParsedInput};
use cam_cover_core::{
    CameraKind, CameraSpec, Candidate, CoverParams, GridExtent, ParamsError, Problem, ProblemError,
};
use cam_cover_model::{
    build_model, write_lp, Assignment, CoverModel, CoverSolver, SolveError, SolverStatus,
};
use cam_cover_placement::{
    generate_candidates, index_coverage, CoverageError, CoverageIndex, Generation,
    GenerationStats, UncoveredPiece,
};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;

#[cfg(feature = "tracing")]
use tracing::instrument;

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error(transparent)]
    Coverage(#[from] CoverageError),
    #[error(transparent)]
    Solve(#[from] SolveError),
    #[error(transparent)]
    Config(#[from] ConfigIoError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Build a validated problem from a parsed input file and a run config.
pub fn problem_from_input(input: ParsedInput, config: &PlanConfig) -> Result<Problem, PlanError> {
    let short = CameraSpec::new(input.ranges.0, input.costs.0);
    let long = CameraSpec::new(input.ranges.1, input.costs.1);
    let params = config.params(short, long)?;
    Ok(Problem::new(input.pieces, params)?)
}

/// Every stage value of one run, kept together so callers can inspect,
/// export or solve without recomputing anything.
#[derive(Debug, Clone)]
pub struct CoverPlan {
    pub problem: Problem,
    pub generation: Generation,
    pub coverage: CoverageIndex,
    pub model: CoverModel,
}

impl CoverPlan {
    /// Run every stage up to (not including) the solver.
    ///
    /// Fails with [`PlanError::Coverage`] when a piece cannot be watched and
    /// the config policy is [`cam_cover_model::InfeasiblePolicy::Abort`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip_all, fields(pieces = problem.len()))
    )]
    pub fn prepare(problem: Problem, config: &PlanConfig) -> Result<Self, PlanError> {
        log::info!(
            "{} pieces, ranges {}/{}, costs {}/{}, margin {}",
            problem.len(),
            problem.params().short.range,
            problem.params().long.range,
            problem.params().short.unit_cost,
            problem.params().long.unit_cost,
            problem.params().range_safety_margin,
        );

        log::info!("generating candidate positions");
        let generation = generate_candidates(&problem);
        log::info!(
            "{} candidates ({} short, {} long), {} isolated pieces",
            generation.candidates.len(),
            generation.candidates.count(CameraKind::Short),
            generation.candidates.count(CameraKind::Long),
            generation.isolated.len(),
        );

        log::info!("deriving coverage sets");
        let coverage = index_coverage(&problem, &generation.candidates);
        log::info!("{} piece/candidate memberships", coverage.memberships());

        let model = build_model(
            &generation.candidates,
            &coverage,
            problem.params(),
            config.infeasible_policy,
        )?;
        log::info!(
            "model: {} variables, {} constraints",
            model.variables().len(),
            model.constraints().len()
        );

        Ok(Self {
            problem,
            generation,
            coverage,
            model,
        })
    }

    #[inline]
    pub fn params(&self) -> &CoverParams {
        self.problem.params()
    }

    /// Hand the model to `solver` and check the returned selection.
    ///
    /// A model without constraints is solved by the empty selection and never
    /// reaches the solver.
    pub fn solve<S: CoverSolver + ?Sized>(&self, solver: &S) -> Result<Assignment, PlanError> {
        if self.model.constraints().is_empty() {
            log::info!("nothing to cover; skipping the solver");
            return Ok(Assignment::new(&self.model, Vec::new(), SolverStatus::Optimal));
        }
        log::info!("solving");
        let assignment = solver.solve(&self.model)?;
        assignment.verify(&self.model)?;
        log::info!(
            "{}: {} cameras, total cost {}",
            assignment.status,
            assignment.selected.len(),
            assignment.objective
        );
        Ok(assignment)
    }

    /// Selected candidates, in candidate order.
    pub fn selected(&self, assignment: &Assignment) -> Vec<Candidate> {
        assignment
            .candidates(&self.model, &self.generation.candidates)
            .copied()
            .collect()
    }

    /// Write the model as CPLEX LP.
    pub fn write_lp_file(&self, path: impl AsRef<Path>) -> Result<(), PlanError> {
        let out = BufWriter::new(File::create(path)?);
        write_lp(&self.model, out)?;
        Ok(())
    }

    pub fn report(&self, assignment: Option<&Assignment>) -> PlanReport {
        let candidates = &self.generation.candidates;
        PlanReport {
            params: *self.params(),
            pieces: self.problem.len(),
            extent: self.problem.extent(),
            candidates: CandidateCounts {
                short: candidates.count(CameraKind::Short),
                long: candidates.count(CameraKind::Long),
                total: candidates.len(),
            },
            isolated: self.generation.isolated.len(),
            generation: self.generation.stats,
            memberships: self.coverage.memberships(),
            uncovered: self.coverage.uncovered().to_vec(),
            solution: assignment.map(|a| {
                let chosen = self.selected(a);
                SolutionReport {
                    status: a.status.clone(),
                    objective: a.objective,
                    short: chosen.iter().filter(|c| c.kind == CameraKind::Short).count(),
                    long: chosen.iter().filter(|c| c.kind == CameraKind::Long).count(),
                    selected: chosen.iter().map(Candidate::label).collect(),
                }
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CandidateCounts {
    pub short: usize,
    pub long: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionReport {
    pub status: SolverStatus,
    pub objective: f64,
    pub short: usize,
    pub long: usize,
    /// Labels of the chosen cameras.
    pub selected: Vec<String>,
}

/// JSON summary of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub params: CoverParams,
    pub pieces: usize,
    pub extent: Option<GridExtent>,
    pub candidates: CandidateCounts,
    pub isolated: usize,
    pub generation: GenerationStats,
    pub memberships: usize,
    pub uncovered: Vec<UncoveredPiece>,
    pub solution: Option<SolutionReport>,
}

impl PlanReport {
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigIoError> {
        let raw = serde_json::to_string_pretty(self)?;
        fs::write(path, raw)?;
        Ok(())
    }
}
