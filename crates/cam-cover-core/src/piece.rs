use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// A point of interest on the integer grid that must be watched by a camera.
///
/// Pieces are identified by their index in the input ordering; two pieces may
/// share coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Piece {
    pub x: i64,
    pub y: i64,
}

impl Piece {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Position in continuous grid coordinates.
    #[inline]
    pub fn position(&self) -> Point2<f64> {
        Point2::new(self.x as f64, self.y as f64)
    }

    /// Whether the piece lies in the grid domain (`x >= 0`, `y >= 0`).
    #[inline]
    pub fn is_on_grid(&self) -> bool {
        self.x >= 0 && self.y >= 0
    }
}

impl std::fmt::Display for Piece {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Bounding extent of a piece set, measured from the grid origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridExtent {
    pub max_x: i64,
    pub max_y: i64,
}

impl GridExtent {
    /// Extent of `pieces`, or `None` for an empty slice.
    pub fn of(pieces: &[Piece]) -> Option<Self> {
        let max_x = pieces.iter().map(|p| p.x).max()?;
        let max_y = pieces.iter().map(|p| p.y).max()?;
        Some(Self { max_x, max_y })
    }

    /// Number of grid columns from the origin, saturating at `i64::MAX`.
    #[inline]
    pub fn width(&self) -> i64 {
        self.max_x.saturating_add(1)
    }

    /// Number of grid rows from the origin, saturating at `i64::MAX`.
    #[inline]
    pub fn height(&self) -> i64 {
        self.max_y.saturating_add(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_tracks_each_axis_independently() {
        let pieces = [Piece::new(3, 0), Piece::new(1, 9), Piece::new(0, 2)];
        assert_eq!(
            GridExtent::of(&pieces),
            Some(GridExtent { max_x: 3, max_y: 9 })
        );
        assert_eq!(GridExtent::of(&[]), None);
    }

    #[test]
    fn size_saturates_at_the_coordinate_limit() {
        let extent = GridExtent { max_x: 3, max_y: 9 };
        assert_eq!((extent.width(), extent.height()), (4, 10));

        let extent = GridExtent::of(&[Piece::new(i64::MAX, i64::MAX)]).expect("extent");
        assert_eq!(extent.width(), i64::MAX);
        assert_eq!(extent.height(), i64::MAX);
    }

    #[test]
    fn display_uses_tuple_form() {
        assert_eq!(Piece::new(4, 7).to_string(), "(4, 7)");
    }
}
