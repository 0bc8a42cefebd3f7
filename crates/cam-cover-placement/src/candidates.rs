use cam_cover_core::{CameraKind, Candidate, CandidateKey};
use nalgebra::Point2;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::ops::Range;

/// Deduplicated candidates in a value-defined order.
///
/// Candidates are sorted by kind, then `x`, then `y`, so indices are stable
/// for a given set of values. Lookups by value go through a hash index keyed
/// on [`CandidateKey`].
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
    index: HashMap<CandidateKey, usize>,
}

impl CandidateSet {
    /// Build a set from any sequence of candidates, dropping value duplicates.
    pub fn from_candidates<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut candidates: Vec<Candidate> = candidates.into_iter().collect();
        candidates.sort_by(|a, b| a.total_cmp(b));
        candidates.dedup_by_key(|c| c.key());

        let index = candidates
            .iter()
            .enumerate()
            .map(|(i, c)| (c.key(), i))
            .collect();
        Self { candidates, index }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    #[inline]
    pub fn as_slice(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    /// Index of the candidate with this kind and position, if present.
    pub fn position_of(&self, kind: CameraKind, position: Point2<f64>) -> Option<usize> {
        self.index_of(&Candidate::new(kind, position))
    }

    pub fn index_of(&self, candidate: &Candidate) -> Option<usize> {
        self.index.get(&candidate.key()).copied()
    }

    pub fn contains(&self, candidate: &Candidate) -> bool {
        self.index.contains_key(&candidate.key())
    }

    /// Contiguous index range holding the candidates of `kind`.
    pub fn kind_range(&self, kind: CameraKind) -> Range<usize> {
        let start = self.candidates.partition_point(|c| c.kind < kind);
        let end = self.candidates.partition_point(|c| c.kind <= kind);
        start..end
    }

    pub fn count(&self, kind: CameraKind) -> usize {
        self.kind_range(kind).len()
    }
}

impl PartialEq for CandidateSet {
    fn eq(&self, other: &Self) -> bool {
        self.candidates.len() == other.candidates.len()
            && self
                .candidates
                .iter()
                .zip(&other.candidates)
                .all(|(a, b)| a.key() == b.key())
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

impl Serialize for CandidateSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.candidates.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(kind: CameraKind, x: f64, y: f64) -> Candidate {
        Candidate::new(kind, Point2::new(x, y))
    }

    #[test]
    fn dedups_and_orders_by_value() {
        let set = CandidateSet::from_candidates([
            c(CameraKind::Long, 1.0, 2.0),
            c(CameraKind::Short, 3.0, 0.0),
            c(CameraKind::Long, 1.0, 2.0),
            c(CameraKind::Short, 0.5, 9.0),
            c(CameraKind::Short, 3.0, -0.0),
        ]);
        assert_eq!(set.len(), 3);
        let labels: Vec<String> = set.iter().map(Candidate::label).collect();
        assert_eq!(labels, ["1,0.5,9", "1,3,0", "2,1,2"]);
    }

    #[test]
    fn lookup_by_value_ignores_insertion_order() {
        let a = CandidateSet::from_candidates([
            c(CameraKind::Short, 1.0, 1.0),
            c(CameraKind::Long, 0.0, 4.0),
        ]);
        let b = CandidateSet::from_candidates([
            c(CameraKind::Long, 0.0, 4.0),
            c(CameraKind::Short, 1.0, 1.0),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.position_of(CameraKind::Long, Point2::new(0.0, 4.0)), Some(1));
        assert_eq!(b.position_of(CameraKind::Long, Point2::new(0.0, 4.0)), Some(1));
        assert_eq!(a.position_of(CameraKind::Short, Point2::new(0.0, 4.0)), None);
    }

    #[test]
    fn kind_ranges_partition_the_set() {
        let set = CandidateSet::from_candidates([
            c(CameraKind::Long, 1.0, 2.0),
            c(CameraKind::Short, 3.0, 0.0),
            c(CameraKind::Long, 5.0, 2.0),
        ]);
        assert_eq!(set.kind_range(CameraKind::Short), 0..1);
        assert_eq!(set.kind_range(CameraKind::Long), 1..3);
        assert_eq!(set.count(CameraKind::Long), 2);

        let empty = CandidateSet::default();
        assert!(empty.kind_range(CameraKind::Long).is_empty());
    }
}
