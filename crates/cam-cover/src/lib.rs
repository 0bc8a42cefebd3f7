//! High-level facade for the `cam-cover-*` workspace.
//!
//! Places short- and long-range cameras on an integer grid so that every
//! piece is watched by at least one camera, at minimum total cost.
//!
//! This crate provides:
//! - re-exports of the geometry, placement and model crates
//! - the input file parser and the submission file writer ([`io`])
//! - the JSON run configuration ([`config`])
//! - [`plan::CoverPlan`], which runs every stage up to an external solver
//!
//! ## Quickstart
//!
//! ```no_run
//! use cam_cover::config::PlanConfig;
//! use cam_cover::io::read_input;
//! use cam_cover::model::ScipSolver;
//! use cam_cover::plan::{problem_from_input, CoverPlan};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PlanConfig::default();
//! let problem = problem_from_input(read_input("pieces.txt")?, &config)?;
//! let plan = CoverPlan::prepare(problem, &config)?;
//! let assignment = plan.solve(&ScipSolver::default().with_time_limit(60.0))?;
//! println!("total cost: {}", assignment.objective);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `cam_cover::core`: pieces, camera kinds, parameters, circle geometry.
//! - `cam_cover::placement`: candidate generation and coverage sets.
//! - `cam_cover::model`: the covering model, LP export and solver adapters.

pub use cam_cover_core as core;
pub use cam_cover_model as model;
pub use cam_cover_placement as placement;

pub use cam_cover_core::{CameraKind, CameraSpec, Candidate, CoverParams, Piece, Problem};
pub use cam_cover_model::{Assignment, CoverSolver, ScipSolver};

pub mod config;
pub mod io;
pub mod plan;
