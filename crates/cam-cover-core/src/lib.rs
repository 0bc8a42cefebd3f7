//! Core types and geometry for camera coverage planning.
//!
//! This crate is intentionally small and purely geometric. It knows about
//! pieces, camera kinds, run parameters and the circle construction used to
//! reduce the continuous placement space. It does *not* depend on any solver
//! or file format.

mod camera;
mod candidate;
mod geometry;
mod logger;
mod params;
mod piece;
mod problem;

pub use camera::{CameraKind, CameraSpec};
pub use candidate::{Candidate, CandidateKey};
pub use geometry::{circle_centers, squared_distance, CircleCenters};
pub use params::{CoverParams, ParamsError, DEFAULT_RANGE_SAFETY_MARGIN};
pub use piece::{GridExtent, Piece};
pub use problem::{Problem, ProblemError};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_verbosity};
