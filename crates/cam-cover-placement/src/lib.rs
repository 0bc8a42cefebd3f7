//! Candidate reduction and coverage derivation.
//!
//! Pipeline:
//! - [`generate_candidates`]: every pair of pieces close enough to share a
//!   camera contributes the centers of the circles through both pieces;
//!   isolated pieces get a short camera placed on themselves.
//! - [`index_coverage`]: every piece is mapped to the candidates that watch it,
//!   which become the covering constraints of the downstream model.
//!
//! Both stages are deterministic: the candidate set is deduplicated and
//! ordered by value, so the same pieces (in any order) produce the same
//! candidates with the same indices.

mod candidates;
mod coverage;
mod generate;

pub use candidates::CandidateSet;
pub use coverage::{index_coverage, CoverageError, CoverageIndex, UncoveredPiece};
pub use generate::{generate_candidates, Generation, GenerationStats};
