//! Covering model for camera placement and the boundary to external solvers.
//!
//! - [`build_model`] turns candidates and coverage sets into a weighted
//!   covering model: one binary variable per candidate, one `>= 1` row per
//!   piece.
//! - [`CoverSolver`] is the seam to whatever integer-program solver is
//!   available. This crate does not solve anything itself.
//! - [`write_lp`] exports the model in CPLEX LP format, and [`ScipSolver`]
//!   drives the `scip` command-line binary through that file.

mod lp;
mod model;
mod scip;
mod solver;

pub use lp::write_lp;
pub use model::{build_model, CoverConstraint, CoverModel, InfeasiblePolicy, Variable};
pub use scip::{parse_scip_solution, ScipSolver};
pub use solver::{Assignment, CoverSolver, SolveError, SolverStatus};
