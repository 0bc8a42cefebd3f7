use crate::candidates::CandidateSet;
use cam_cover_core::{
    circle_centers, squared_distance, CameraKind, Candidate, CoverParams, Piece, Problem,
};
use serde::Serialize;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Counters collected while generating candidates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GenerationStats {
    /// Unordered pairs strictly within long range.
    pub long_pairs: usize,
    /// Unordered pairs strictly within short range.
    pub short_pairs: usize,
    /// Centers dropped because they fell outside the grid.
    pub off_grid_centers: usize,
    /// Centers dropped because they do not lie strictly within range of both
    /// pieces (only possible with a zero safety margin).
    pub unreachable_centers: usize,
    /// Candidates emitted before value deduplication.
    pub raw_candidates: usize,
}

impl GenerationStats {
    fn merge(&mut self, other: &GenerationStats) {
        self.long_pairs += other.long_pairs;
        self.short_pairs += other.short_pairs;
        self.off_grid_centers += other.off_grid_centers;
        self.unreachable_centers += other.unreachable_centers;
        self.raw_candidates += other.raw_candidates;
    }
}

/// Output of [`generate_candidates`].
#[derive(Clone, Debug)]
pub struct Generation {
    pub candidates: CandidateSet,
    /// Indices of pieces that received their own short camera.
    pub isolated: Vec<usize>,
    pub stats: GenerationStats,
}

/// Candidates produced by the pairs `(i, j)` with `j > i`.
struct PieceScan {
    candidates: Vec<Candidate>,
    /// Partners `j` whose pairing with `i` produced at least one candidate.
    partners: Vec<usize>,
    stats: GenerationStats,
}

/// Push the candidates shared by `a` and `b`. Returns whether any was kept.
fn scan_pair(
    a: Piece,
    b: Piece,
    params: &CoverParams,
    out: &mut Vec<Candidate>,
    stats: &mut GenerationStats,
) -> bool {
    // Canonical orientation so the centers do not depend on input order.
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let (pa, pb) = (a.position(), b.position());
    let d2 = squared_distance(pa, pb);

    let mut kept = false;
    for kind in [CameraKind::Long, CameraKind::Short] {
        if !params.spec(kind).covers_squared(d2) {
            continue;
        }
        match kind {
            CameraKind::Long => stats.long_pairs += 1,
            CameraKind::Short => stats.short_pairs += 1,
        }
        let spec = params.spec(kind);
        for center in circle_centers(pa, pb, params.effective_radius(kind)).iter() {
            let candidate = Candidate::new(kind, center);
            if params.restrict_to_grid && !candidate.is_on_grid() {
                stats.off_grid_centers += 1;
                continue;
            }
            // A pair only counts as served by centers that actually watch it.
            if !spec.covers_squared(squared_distance(center, pa))
                || !spec.covers_squared(squared_distance(center, pb))
            {
                stats.unreachable_centers += 1;
                continue;
            }
            out.push(candidate);
            kept = true;
        }
    }
    kept
}

fn scan_piece(pieces: &[Piece], params: &CoverParams, i: usize) -> PieceScan {
    let mut scan = PieceScan {
        candidates: Vec::new(),
        partners: Vec::new(),
        stats: GenerationStats::default(),
    };
    let a = pieces[i];
    for (j, &b) in pieces.iter().enumerate().skip(i + 1) {
        if a == b {
            continue;
        }
        if scan_pair(a, b, params, &mut scan.candidates, &mut scan.stats) {
            scan.partners.push(j);
        }
    }
    scan
}

#[cfg(feature = "rayon")]
fn scan_all(pieces: &[Piece], params: &CoverParams) -> Vec<PieceScan> {
    use rayon::prelude::*;
    (0..pieces.len())
        .into_par_iter()
        .map(|i| scan_piece(pieces, params, i))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn scan_all(pieces: &[Piece], params: &CoverParams) -> Vec<PieceScan> {
    (0..pieces.len())
        .map(|i| scan_piece(pieces, params, i))
        .collect()
}

/// Reduce the continuous placement space to a finite candidate set.
///
/// For every unordered pair of pieces strictly within a camera range, the
/// centers of the circles of the (margin-reduced) range through both pieces
/// become candidates of that kind. A piece none of whose pairings produced a
/// candidate gets a short camera placed exactly on it.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(problem), fields(pieces = problem.len()))
)]
pub fn generate_candidates(problem: &Problem) -> Generation {
    let pieces = problem.pieces();
    let params = problem.params();

    let scans = scan_all(pieces, params);

    let mut stats = GenerationStats::default();
    let mut contributed = vec![false; pieces.len()];
    let mut raw: Vec<Candidate> = Vec::new();
    for (i, scan) in scans.into_iter().enumerate() {
        stats.merge(&scan.stats);
        if !scan.partners.is_empty() {
            contributed[i] = true;
        }
        for j in scan.partners {
            contributed[j] = true;
        }
        raw.extend(scan.candidates);
    }

    let isolated: Vec<usize> = contributed
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| (!c).then_some(i))
        .collect();
    raw.extend(
        isolated
            .iter()
            .map(|&i| Candidate::on_piece(CameraKind::Short, pieces[i])),
    );
    stats.raw_candidates = raw.len();

    let candidates = CandidateSet::from_candidates(raw);
    log::debug!(
        "candidates: {} unique of {} raw ({} long pairs, {} short pairs, {} off-grid centers, {} unreachable centers, {} isolated)",
        candidates.len(),
        stats.raw_candidates,
        stats.long_pairs,
        stats.short_pairs,
        stats.off_grid_centers,
        stats.unreachable_centers,
        isolated.len()
    );

    Generation {
        candidates,
        isolated,
        stats,
    }
}
