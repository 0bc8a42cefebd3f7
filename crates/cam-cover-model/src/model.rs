use cam_cover_core::CoverParams;
use cam_cover_placement::{CandidateSet, CoverageError, CoverageIndex, UncoveredPiece};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// What to do with pieces no candidate can watch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfeasiblePolicy {
    /// Refuse to build a model.
    #[default]
    Abort,
    /// Leave the uncovered pieces out of the model and warn about each.
    DropUncovered,
}

/// Binary decision variable for one candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Variable {
    /// External label of the candidate, `"<code>,<x>,<y>"`.
    pub name: String,
    /// Index into the candidate set.
    pub candidate: usize,
    /// Objective coefficient: unit cost of the candidate's kind.
    pub cost: f64,
}

/// `sum(x[v] for v in members) >= 1` for one piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CoverConstraint {
    pub piece: usize,
    /// Variable indices, ascending.
    pub members: Vec<usize>,
}

/// Weighted covering model: minimize total camera cost subject to every
/// modelled piece being watched at least once.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CoverModel {
    variables: Vec<Variable>,
    constraints: Vec<CoverConstraint>,
    dropped: Vec<UncoveredPiece>,
}

impl CoverModel {
    #[inline]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[inline]
    pub fn constraints(&self) -> &[CoverConstraint] {
        &self.constraints
    }

    /// Pieces left out under [`InfeasiblePolicy::DropUncovered`].
    #[inline]
    pub fn dropped(&self) -> &[UncoveredPiece] {
        &self.dropped
    }

    /// Variable index with this name.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v.name == name)
    }

    /// Objective value of a selection of variable indices.
    pub fn cost_of(&self, selected: &[usize]) -> f64 {
        selected
            .iter()
            .filter_map(|&v| self.variables.get(v))
            .map(|v| v.cost)
            .sum()
    }

    /// First constraint not satisfied by `selected`, if any.
    pub fn first_violation(&self, selected: &[usize]) -> Option<&CoverConstraint> {
        let mut chosen = vec![false; self.variables.len()];
        for &v in selected {
            if let Some(slot) = chosen.get_mut(v) {
                *slot = true;
            }
        }
        self.constraints
            .iter()
            .find(|c| !c.members.iter().any(|&m| chosen[m]))
    }
}

/// Assemble the covering model from candidates and coverage sets.
///
/// Variables follow candidate order, constraints follow piece order. Under
/// [`InfeasiblePolicy::Abort`] any uncovered piece fails the build before a
/// solver ever sees the model.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip_all, fields(candidates = candidates.len()))
)]
pub fn build_model(
    candidates: &CandidateSet,
    coverage: &CoverageIndex,
    params: &CoverParams,
    policy: InfeasiblePolicy,
) -> Result<CoverModel, CoverageError> {
    let dropped = match policy {
        InfeasiblePolicy::Abort => {
            coverage.require_complete()?;
            Vec::new()
        }
        InfeasiblePolicy::DropUncovered => {
            for u in coverage.uncovered() {
                log::warn!("dropping uncovered piece {u} from the model");
            }
            coverage.uncovered().to_vec()
        }
    };

    let variables = candidates
        .iter()
        .enumerate()
        .map(|(i, c)| Variable {
            name: c.label(),
            candidate: i,
            cost: params.spec(c.kind).unit_cost,
        })
        .collect();

    let constraints = coverage
        .iter()
        .filter(|(_, set)| !set.is_empty())
        .map(|(piece, set)| CoverConstraint {
            piece,
            members: set.to_vec(),
        })
        .collect();

    Ok(CoverModel {
        variables,
        constraints,
        dropped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cam_cover_core::{CameraSpec, Piece, Problem};
    use cam_cover_placement::{generate_candidates, index_coverage, CandidateSet};

    fn params() -> CoverParams {
        CoverParams::new(CameraSpec::new(2.0, 1.0), CameraSpec::new(5.0, 3.0)).expect("valid")
    }

    fn staged(pieces: &[(i64, i64)]) -> (CandidateSet, CoverageIndex) {
        let pieces = pieces.iter().map(|&(x, y)| Piece::new(x, y)).collect();
        let problem = Problem::new(pieces, params()).expect("problem");
        let generation = generate_candidates(&problem);
        let coverage = index_coverage(&problem, &generation.candidates);
        (generation.candidates, coverage)
    }

    #[test]
    fn variables_carry_labels_and_costs() {
        let (candidates, coverage) = staged(&[(0, 0), (3, 0), (20, 20)]);
        let model =
            build_model(&candidates, &coverage, &params(), InfeasiblePolicy::Abort).expect("model");

        assert_eq!(model.variables().len(), candidates.len());
        assert_eq!(model.constraints().len(), 3);
        for (v, c) in model.variables().iter().zip(candidates.iter()) {
            assert_eq!(v.name, c.label());
            assert_eq!(v.cost, params().spec(c.kind).unit_cost);
        }
        let isolated = model.variable_index("1,20,20").expect("isolated camera");
        assert_eq!(model.constraints()[2].members, vec![isolated]);
    }

    #[test]
    fn abort_policy_refuses_uncovered_pieces() {
        let (candidates, _) = staged(&[(0, 0)]);
        let pieces = vec![Piece::new(0, 0), Piece::new(9, 9)];
        let problem = Problem::new(pieces, params()).expect("problem");
        let coverage = index_coverage(&problem, &candidates);

        let err = build_model(&candidates, &coverage, &params(), InfeasiblePolicy::Abort)
            .unwrap_err();
        assert!(err.to_string().contains("(9, 9)"));

        let model = build_model(
            &candidates,
            &coverage,
            &params(),
            InfeasiblePolicy::DropUncovered,
        )
        .expect("partial model");
        assert_eq!(model.constraints().len(), 1);
        assert_eq!(model.dropped().len(), 1);
        assert_eq!(model.dropped()[0].piece, Piece::new(9, 9));
    }

    #[test]
    fn violations_and_costs() {
        let (candidates, coverage) = staged(&[(0, 0), (30, 30)]);
        let model =
            build_model(&candidates, &coverage, &params(), InfeasiblePolicy::Abort).expect("model");
        assert_eq!(model.variables().len(), 2);
        assert!(model.first_violation(&[0]).is_some());
        assert!(model.first_violation(&[0, 1]).is_none());
        assert_eq!(model.cost_of(&[0, 1]), 2.0);
    }
}
