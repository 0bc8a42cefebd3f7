use crate::candidates::CandidateSet;
use cam_cover_core::{squared_distance, CameraKind, CoverParams, Piece, Problem};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// A piece that no candidate can watch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct UncoveredPiece {
    /// Index of the piece in input order.
    pub index: usize,
    pub piece: Piece,
}

impl std::fmt::Display for UncoveredPiece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{} {}", self.index, self.piece)
    }
}

fn format_uncovered(pieces: &[UncoveredPiece]) -> String {
    pieces
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Coverage derivation errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    #[error(
        "{count} piece(s) cannot be covered by any candidate: {list}",
        count = .pieces.len(),
        list = format_uncovered(.pieces)
    )]
    Uncovered { pieces: Vec<UncoveredPiece> },
}

/// Per-piece coverage sets: the covering constraints of the placement model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CoverageIndex {
    sets: Vec<Vec<usize>>,
    uncovered: Vec<UncoveredPiece>,
}

impl CoverageIndex {
    /// Candidate indices (ascending) watching piece `piece_index`.
    ///
    /// # Panics
    /// Panics if `piece_index` is out of bounds.
    #[inline]
    pub fn coverage_set(&self, piece_index: usize) -> &[usize] {
        &self.sets[piece_index]
    }

    /// `(piece_index, coverage_set)` pairs in piece order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.sets.iter().map(Vec::as_slice).enumerate()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Pieces with an empty coverage set, in piece order.
    #[inline]
    pub fn uncovered(&self) -> &[UncoveredPiece] {
        &self.uncovered
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.uncovered.is_empty()
    }

    /// Fail if any piece cannot be covered.
    pub fn require_complete(&self) -> Result<(), CoverageError> {
        if self.uncovered.is_empty() {
            Ok(())
        } else {
            Err(CoverageError::Uncovered {
                pieces: self.uncovered.clone(),
            })
        }
    }

    /// Total number of (piece, candidate) memberships.
    pub fn memberships(&self) -> usize {
        self.sets.iter().map(Vec::len).sum()
    }
}

/// Candidates of one kind whose position watches `piece`.
///
/// The kind's slice is sorted by `x`, so only the strip `|dx| <= range` is
/// scanned; every member still passes the exact strict distance test. The
/// strip bounds are inclusive: `p.x +- range` may round back onto `p.x` for
/// large coordinates or tiny ranges.
fn covering_of_kind(
    piece: Piece,
    candidates: &CandidateSet,
    params: &CoverParams,
    kind: CameraKind,
    out: &mut Vec<usize>,
) {
    let spec = params.spec(kind);
    let range = candidates.kind_range(kind);
    let slice = &candidates.as_slice()[range.clone()];
    let p = piece.position();

    let lo = p.x - spec.range;
    let hi = p.x + spec.range;
    let start = slice.partition_point(|c| c.position.x < lo);
    for (offset, candidate) in slice[start..].iter().enumerate() {
        if candidate.position.x > hi {
            break;
        }
        if spec.covers_squared(squared_distance(candidate.position, p)) {
            out.push(range.start + start + offset);
        }
    }
}

fn coverage_set(piece: Piece, candidates: &CandidateSet, params: &CoverParams) -> Vec<usize> {
    let mut set = Vec::new();
    for kind in CameraKind::ALL {
        covering_of_kind(piece, candidates, params, kind, &mut set);
    }
    set
}

#[cfg(feature = "rayon")]
fn coverage_sets(
    pieces: &[Piece],
    candidates: &CandidateSet,
    params: &CoverParams,
) -> Vec<Vec<usize>> {
    use rayon::prelude::*;
    pieces
        .par_iter()
        .map(|&p| coverage_set(p, candidates, params))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn coverage_sets(
    pieces: &[Piece],
    candidates: &CandidateSet,
    params: &CoverParams,
) -> Vec<Vec<usize>> {
    pieces
        .iter()
        .map(|&p| coverage_set(p, candidates, params))
        .collect()
}

/// Map every piece to the candidates strictly within range of it.
///
/// Uncovered pieces are recorded rather than rejected; call
/// [`CoverageIndex::require_complete`] to turn them into an error.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(problem, candidates),
        fields(pieces = problem.len(), candidates = candidates.len())
    )
)]
pub fn index_coverage(problem: &Problem, candidates: &CandidateSet) -> CoverageIndex {
    let pieces = problem.pieces();
    let sets = coverage_sets(pieces, candidates, problem.params());

    let uncovered: Vec<UncoveredPiece> = sets
        .iter()
        .enumerate()
        .filter(|(_, set)| set.is_empty())
        .map(|(index, _)| UncoveredPiece {
            index,
            piece: pieces[index],
        })
        .collect();
    for u in &uncovered {
        log::warn!("piece {u} is not covered by any candidate");
    }

    let index = CoverageIndex { sets, uncovered };
    log::debug!(
        "coverage: {} pieces, {} memberships, {} uncovered",
        index.len(),
        index.memberships(),
        index.uncovered.len()
    );
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use cam_cover_core::{CameraSpec, Candidate};
    use nalgebra::Point2;

    fn params() -> CoverParams {
        CoverParams::new(CameraSpec::new(2.0, 1.0), CameraSpec::new(5.0, 3.0)).expect("valid")
    }

    fn problem(pieces: &[(i64, i64)]) -> Problem {
        let pieces = pieces.iter().map(|&(x, y)| Piece::new(x, y)).collect();
        Problem::new(pieces, params()).expect("problem")
    }

    #[test]
    fn membership_uses_strict_nominal_range() {
        let candidates = CandidateSet::from_candidates([
            Candidate::new(CameraKind::Short, Point2::new(0.0, 0.0)),
            Candidate::new(CameraKind::Long, Point2::new(10.0, 0.0)),
        ]);
        let problem = problem(&[(0, 0), (2, 0), (1, 1), (5, 0), (6, 0)]);
        let index = index_coverage(&problem, &candidates);

        assert_eq!(index.coverage_set(0), &[0]);
        // Exactly on the short boundary.
        assert!(index.coverage_set(1).is_empty());
        assert_eq!(index.coverage_set(2), &[0]);
        // Exactly on the long boundary.
        assert!(index.coverage_set(3).is_empty());
        assert_eq!(index.coverage_set(4), &[1]);
    }

    #[test]
    fn uncovered_pieces_are_reported_with_coordinates() {
        let candidates = CandidateSet::from_candidates([Candidate::new(
            CameraKind::Short,
            Point2::new(0.0, 0.0),
        )]);
        let problem = problem(&[(0, 0), (9, 4)]);
        let index = index_coverage(&problem, &candidates);
        assert!(!index.is_complete());

        let err = index.require_complete().unwrap_err();
        let CoverageError::Uncovered { pieces } = &err;
        assert_eq!(
            pieces,
            &[UncoveredPiece {
                index: 1,
                piece: Piece::new(9, 4)
            }]
        );
        assert!(err.to_string().contains("#1 (9, 4)"));
    }

    #[test]
    fn strip_keeps_candidates_when_bounds_round_onto_the_piece() {
        // Above 2^53 adding the range to x is absorbed by rounding.
        let piece = Piece::new(i64::MAX, 0);
        let problem = problem(&[(i64::MAX, 0)]);
        let candidates =
            CandidateSet::from_candidates([Candidate::on_piece(CameraKind::Short, piece)]);
        let index = index_coverage(&problem, &candidates);
        assert_eq!(index.coverage_set(0), &[0]);

        // Same effect for a tiny range at a moderate coordinate.
        let params =
            CoverParams::from_specs(CameraSpec::new(0.005, 1.0), CameraSpec::new(5.0, 3.0), 0.001)
                .expect("valid");
        let piece = Piece::new(1_000_000_000_000_000, 3);
        let problem = Problem::new(vec![piece], params).expect("problem");
        let candidates =
            CandidateSet::from_candidates([Candidate::on_piece(CameraKind::Short, piece)]);
        assert!(index_coverage(&problem, &candidates).is_complete());
    }

    #[test]
    fn strip_scan_matches_full_scan() {
        let mut raw = Vec::new();
        for i in 0..15 {
            for j in 0..7 {
                let x = i as f64 * 0.73;
                let y = j as f64 * 1.31;
                raw.push(Candidate::new(CameraKind::Short, Point2::new(x, y)));
                raw.push(Candidate::new(CameraKind::Long, Point2::new(y, x)));
            }
        }
        let candidates = CandidateSet::from_candidates(raw);
        let problem = problem(&[(0, 0), (3, 2), (7, 7), (10, 1), (2, 9)]);
        let index = index_coverage(&problem, &candidates);

        for (i, &piece) in problem.pieces().iter().enumerate() {
            let expected: Vec<usize> = candidates
                .iter()
                .enumerate()
                .filter(|(_, c)| c.covers(piece, problem.params()))
                .map(|(k, _)| k)
                .collect();
            assert_eq!(index.coverage_set(i), expected.as_slice(), "piece {piece}");
        }
    }
}
