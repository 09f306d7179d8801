use crate::core::lattice::NUM_DIRECTIONS;
use crate::core::models::bead::Bead;
use crate::core::models::peptide::Peptide;
use crate::core::operators::operator::{OperatorError, QubitOperator};
use crate::engine::qubits::fixing::{FixedQubits, fix_qubits};

pub type DirectionIndicators = [QubitOperator; NUM_DIRECTIONS];

/// Turn indicators of every bead, with the fixed qubits already substituted.
///
/// Substituting early lets indicators of pinned turns collapse to the constants 0 and 1,
/// which keeps every product built from them small.
#[derive(Debug, Clone)]
pub struct TurnIndicators {
    num_qubits: usize,
    main: Vec<Option<DirectionIndicators>>,
    side: Vec<Option<DirectionIndicators>>,
}

impl TurnIndicators {
    pub fn new(peptide: &Peptide, fixed: &FixedQubits) -> Result<Self, OperatorError> {
        let num_qubits = peptide.num_qubits();
        let build = |bead: &Bead| -> Result<Option<DirectionIndicators>, OperatorError> {
            Ok(bead
                .turn_indicators(num_qubits)?
                .map(|ops| ops.map(|op| fix_qubits(&op, fixed))))
        };

        let main = peptide
            .main_chain()
            .iter()
            .map(build)
            .collect::<Result<Vec<_>, _>>()?;
        let side = peptide
            .side_chains()
            .iter()
            .map(|bead| bead.as_ref().map(build).transpose().map(Option::flatten))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            num_qubits,
            main,
            side,
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Indicators of the turn into main bead `k`; `None` for the origin.
    pub fn main(&self, k: usize) -> Option<&DirectionIndicators> {
        self.main.get(k).and_then(Option::as_ref)
    }

    /// Indicators of the turn from main bead `k` into its side bead.
    pub fn side(&self, k: usize) -> Option<&DirectionIndicators> {
        self.side.get(k).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::qubits::fixing::fixed_qubits;

    #[test]
    fn pinned_turns_collapse_to_constants() {
        let peptide = Peptide::from_sequence("APRLG").unwrap();
        let indicators = TurnIndicators::new(&peptide, &fixed_qubits(&peptide)).unwrap();
        assert!(indicators.main(0).is_none());

        let first = indicators.main(1).unwrap();
        assert_eq!(first[1], QubitOperator::identity(8, 1.0));
        assert!(first[0].is_zero() && first[2].is_zero() && first[3].is_zero());

        let second = indicators.main(2).unwrap();
        assert_eq!(second[0], QubitOperator::identity(8, 1.0));

        // Only the first bit of the turn into bead 3 is free.
        let third = indicators.main(3).unwrap();
        assert!(third[0].is_zero() && third[2].is_zero());
        assert_eq!(third[1].support().positions().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn side_indicators_follow_the_hot_vector() {
        let peptide = Peptide::new("APRLG", &["", "", "K", "", ""]).unwrap();
        let indicators = TurnIndicators::new(&peptide, &FixedQubits::new()).unwrap();
        assert!(indicators.side(1).is_none());
        let side = indicators.side(2).unwrap();
        assert_eq!(side[3].support().positions().collect::<Vec<_>>(), vec![8, 9]);
        assert_eq!(indicators.num_qubits(), 10);
    }
}
