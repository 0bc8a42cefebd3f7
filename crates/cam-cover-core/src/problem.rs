use crate::params::{CoverParams, ParamsError};
use crate::piece::{GridExtent, Piece};
use serde::Serialize;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProblemError {
    #[error(transparent)]
    Params(#[from] ParamsError),
    #[error("piece #{index} at {piece} lies outside the grid (coordinates must be >= 0)")]
    OffGrid { index: usize, piece: Piece },
}

/// Read-only run context shared by every pipeline stage: the pieces in input
/// order and the validated parameters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Problem {
    pieces: Vec<Piece>,
    params: CoverParams,
}

impl Problem {
    pub fn new(pieces: Vec<Piece>, params: CoverParams) -> Result<Self, ProblemError> {
        let params = params.validated()?;
        if let Some((index, &piece)) = pieces.iter().enumerate().find(|(_, p)| !p.is_on_grid()) {
            return Err(ProblemError::OffGrid { index, piece });
        }
        Ok(Self { pieces, params })
    }

    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[inline]
    pub fn params(&self) -> &CoverParams {
        &self.params
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn extent(&self) -> Option<GridExtent> {
        GridExtent::of(&self.pieces)
    }
}
