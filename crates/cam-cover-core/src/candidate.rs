use crate::camera::CameraKind;
use crate::geometry::squared_distance;
use crate::params::CoverParams;
use crate::piece::Piece;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A camera placement produced by candidate generation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub kind: CameraKind,
    pub position: Point2<f64>,
}

/// Hashable value identity of a [`Candidate`].
///
/// Two candidates with the same kind and bit-identical coordinates are the
/// same candidate; `-0.0` is folded into `0.0`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CandidateKey {
    pub kind: CameraKind,
    pub x_bits: u64,
    pub y_bits: u64,
}

#[inline]
fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0.0_f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl Candidate {
    pub fn new(kind: CameraKind, position: Point2<f64>) -> Self {
        let fold = |v: f64| if v == 0.0 { 0.0 } else { v };
        Self {
            kind,
            position: Point2::new(fold(position.x), fold(position.y)),
        }
    }

    /// Camera placed directly on a piece.
    pub fn on_piece(kind: CameraKind, piece: Piece) -> Self {
        Self::new(kind, piece.position())
    }

    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            kind: self.kind,
            x_bits: canonical_bits(self.position.x),
            y_bits: canonical_bits(self.position.y),
        }
    }

    /// External label `"<code>,<x>,<y>"`, used as solver variable name and
    /// submission line.
    pub fn label(&self) -> String {
        format!(
            "{},{},{}",
            self.kind.code(),
            self.position.x,
            self.position.y
        )
    }

    /// Parse a label produced by [`Candidate::label`].
    pub fn parse_label(label: &str) -> Option<Self> {
        let mut parts = label.trim().split(',');
        let code: u8 = parts.next()?.trim().parse().ok()?;
        let x: f64 = parts.next()?.trim().parse().ok()?;
        let y: f64 = parts.next()?.trim().parse().ok()?;
        if parts.next().is_some() || !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(Self::new(CameraKind::from_code(code)?, Point2::new(x, y)))
    }

    /// Strict coverage test against the nominal range of this candidate's kind.
    #[inline]
    pub fn covers(&self, piece: Piece, params: &CoverParams) -> bool {
        params
            .spec(self.kind)
            .covers_squared(squared_distance(self.position, piece.position()))
    }

    #[inline]
    pub fn is_on_grid(&self) -> bool {
        self.position.x >= 0.0 && self.position.y >= 0.0
    }

    /// Total order by kind, then `x`, then `y`.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| self.position.x.total_cmp(&other.position.x))
            .then_with(|| self.position.y.total_cmp(&other.position.y))
    }
}
