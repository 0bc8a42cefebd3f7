//! Circle construction used to reduce the continuous placement space.
//!
//! A camera of range `r` sees two pieces at once iff its position lies in the
//! lens-shaped intersection of the two disks of radius `r`. The extreme points
//! of that lens are the centers of the circles of radius `r` through both
//! pieces, so those centers are the only positions worth considering for the
//! pair.

use nalgebra::Point2;

/// Squared euclidean distance between two points.
#[inline]
pub fn squared_distance(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).norm_squared()
}

/// Centers of the circles of a given radius passing through two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CircleCenters {
    /// Points too far apart (or coincident): no circle of this radius fits.
    None,
    /// Points exactly one diameter apart.
    One(Point2<f64>),
    Two(Point2<f64>, Point2<f64>),
}

impl CircleCenters {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            CircleCenters::None => 0,
            CircleCenters::One(_) => 1,
            CircleCenters::Two(_, _) => 2,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, CircleCenters::None)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2<f64>> {
        let (a, b) = match *self {
            CircleCenters::None => (None, None),
            CircleCenters::One(c) => (Some(c), None),
            CircleCenters::Two(c1, c2) => (Some(c1), Some(c2)),
        };
        a.into_iter().chain(b)
    }
}

/// Centers of the circles of `radius` through `p1` and `p2`.
///
/// The caller passes the *effective* radius (nominal range minus the safety
/// margin). Returns [`CircleCenters::None`] when `|p1 - p2| > 2 * radius`,
/// when the points coincide, or when `radius` is not a positive finite number.
pub fn circle_centers(p1: Point2<f64>, p2: Point2<f64>, radius: f64) -> CircleCenters {
    if !radius.is_finite() || radius <= 0.0 {
        return CircleCenters::None;
    }
    let delta = p2 - p1;
    let q = delta.norm();
    if q == 0.0 || q > 2.0 * radius {
        return CircleCenters::None;
    }

    let half = 0.5 * q;
    // Clamp tiny negative values produced by rounding near tangency.
    let d = (radius * radius - half * half).max(0.0).sqrt();
    let mid = p1 + delta * 0.5;
    if d == 0.0 {
        return CircleCenters::One(mid);
    }

    let offset = nalgebra::Vector2::new(-delta.y, delta.x) * (d / q);
    CircleCenters::Two(mid + offset, mid - offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_equidistant(centers: CircleCenters, p1: Point2<f64>, p2: Point2<f64>, r: f64) {
        for c in centers.iter() {
            assert_abs_diff_eq!((c - p1).norm(), r, epsilon = 1e-9);
            assert_abs_diff_eq!((c - p2).norm(), r, epsilon = 1e-9);
        }
    }

    #[test]
    fn two_centers_for_close_points() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(3.0, 0.0);
        let centers = circle_centers(p1, p2, 5.0);
        assert_eq!(centers.len(), 2);
        assert_equidistant(centers, p1, p2, 5.0);

        let CircleCenters::Two(a, b) = centers else {
            panic!("expected two centers, got {centers:?}");
        };
        assert_abs_diff_eq!(a.x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(b.x, 1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(a.y, 22.75_f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(b.y, -(22.75_f64.sqrt()), epsilon = 1e-12);
    }

    #[test]
    fn centers_are_symmetric_for_diagonal_pairs() {
        let p1 = Point2::new(2.0, 7.0);
        let p2 = Point2::new(5.0, 3.0);
        let r = 4.2;
        let centers = circle_centers(p1, p2, r);
        assert_eq!(centers.len(), 2);
        assert_equidistant(centers, p1, p2, r);

        let mid = Point2::new(3.5, 5.0);
        let pts: Vec<_> = centers.iter().collect();
        assert_abs_diff_eq!((pts[0] - mid).norm(), (pts[1] - mid).norm(), epsilon = 1e-12);
    }

    #[test]
    fn tangent_pair_yields_midpoint() {
        let p1 = Point2::new(1.0, 1.0);
        let p2 = Point2::new(5.0, 1.0);
        let centers = circle_centers(p1, p2, 2.0);
        assert_eq!(centers, CircleCenters::One(Point2::new(3.0, 1.0)));
    }

    #[test]
    fn far_points_yield_nothing() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(4.0, 3.0);
        assert!(circle_centers(p1, p2, 2.49).is_empty());
        // Shrinking the radius by a margin can push an exact diameter out of reach.
        let p3 = Point2::new(4.0, 0.0);
        assert!(circle_centers(p1, p3, 2.0 - 0.01).is_empty());
    }

    #[test]
    fn degenerate_inputs_yield_nothing() {
        let p = Point2::new(1.0, 2.0);
        assert!(circle_centers(p, p, 3.0).is_empty());
        assert!(circle_centers(p, Point2::new(2.0, 2.0), 0.0).is_empty());
        assert!(circle_centers(p, Point2::new(2.0, 2.0), f64::NAN).is_empty());
    }

    #[test]
    fn swapping_points_only_reorders_centers() {
        let p1 = Point2::new(0.0, 0.0);
        let p2 = Point2::new(1.0, 2.0);
        let mut forward: Vec<_> = circle_centers(p1, p2, 3.0).iter().collect();
        let mut backward: Vec<_> = circle_centers(p2, p1, 3.0).iter().collect();
        let key = |p: &Point2<f64>| (p.x.to_bits(), p.y.to_bits());
        forward.sort_by_key(key);
        backward.sort_by_key(key);
        for (a, b) in forward.iter().zip(&backward) {
            assert_abs_diff_eq!(a.x, b.x, epsilon = 1e-12);
            assert_abs_diff_eq!(a.y, b.y, epsilon = 1e-12);
        }
    }
}
