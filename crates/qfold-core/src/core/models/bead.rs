use super::residue::ResidueType;
use crate::core::lattice::NUM_DIRECTIONS;
use crate::core::operators::operator::{OperatorError, QubitOperator};
use crate::core::operators::pauli::Factor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BeadKind {
    Main,
    Side,
}

/// Register positions of the two turn qubits of a bead.
///
/// Direction `d` is encoded as `d = 2 * b(first) + b(second)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnQubits {
    pub first: usize,
    pub second: usize,
}

impl TurnQubits {
    /// Classical bit values `(first, second)` that encode direction `d`.
    pub fn encode(d: usize) -> (bool, bool) {
        (d & 0b10 != 0, d & 0b01 != 0)
    }

    pub fn decode(first: bool, second: bool) -> usize {
        ((first as usize) << 1) | second as usize
    }

    /// Operator that evaluates to 1 when this bead's turn qubits encode `d`, else 0.
    pub fn indicator(&self, d: usize, num_qubits: usize) -> Result<QubitOperator, OperatorError> {
        let (first, second) = Self::encode(d);
        QubitOperator::product(
            num_qubits,
            &[
                (self.first, Factor::project(first)),
                (self.second, Factor::project(second)),
            ],
        )
    }

    /// Indicators for all four directions, indexed by direction.
    pub fn indicators(&self, num_qubits: usize) -> Result<[QubitOperator; NUM_DIRECTIONS], OperatorError> {
        Ok([
            self.indicator(0, num_qubits)?,
            self.indicator(1, num_qubits)?,
            self.indicator(2, num_qubits)?,
            self.indicator(3, num_qubits)?,
        ])
    }
}

/// One coarse-grained residue of the peptide.
///
/// `turn` holds the qubits describing the lattice step into this bead from its parent:
/// the previous main bead for main beads, or the owning main bead for side beads. The
/// first main bead is the lattice origin and has no turn qubits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bead {
    pub kind: BeadKind,
    pub main_index: usize,
    pub side_index: Option<usize>,
    pub residue: ResidueType,
    pub turn: Option<TurnQubits>,
}

impl Bead {
    pub fn main(main_index: usize, residue: ResidueType, turn: Option<TurnQubits>) -> Self {
        Self {
            kind: BeadKind::Main,
            main_index,
            side_index: None,
            residue,
            turn,
        }
    }

    pub fn side(main_index: usize, residue: ResidueType, turn: TurnQubits) -> Self {
        Self {
            kind: BeadKind::Side,
            main_index,
            side_index: Some(0),
            residue,
            turn: Some(turn),
        }
    }

    #[inline]
    pub fn is_main(&self) -> bool {
        self.kind == BeadKind::Main
    }

    /// Diamond sublattice of the bead: main bead `k` sits on `k mod 2`, its side bead
    /// on the other sublattice.
    pub fn parity(&self) -> usize {
        match self.kind {
            BeadKind::Main => self.main_index % 2,
            BeadKind::Side => (self.main_index + 1) % 2,
        }
    }

    /// Turn indicators for the step into this bead, or `None` for the chain origin.
    pub fn turn_indicators(
        &self,
        num_qubits: usize,
    ) -> Result<Option<[QubitOperator; NUM_DIRECTIONS]>, OperatorError> {
        self.turn.map(|t| t.indicators(num_qubits)).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment_with(turn: TurnQubits, d: usize) -> u128 {
        let (first, second) = TurnQubits::encode(d);
        ((first as u128) << turn.first) | ((second as u128) << turn.second)
    }

    #[test]
    fn encode_and_decode_cover_all_directions() {
        assert_eq!(TurnQubits::encode(0), (false, false));
        assert_eq!(TurnQubits::encode(1), (false, true));
        assert_eq!(TurnQubits::encode(2), (true, false));
        assert_eq!(TurnQubits::encode(3), (true, true));
        for d in 0..4 {
            let (a, b) = TurnQubits::encode(d);
            assert_eq!(TurnQubits::decode(a, b), d);
        }
    }

    #[test]
    fn indicator_is_one_only_on_its_own_encoding() {
        let turn = TurnQubits { first: 4, second: 5 };
        let indicators = turn.indicators(8).unwrap();
        for (d, indicator) in indicators.iter().enumerate() {
            for encoded in 0..4 {
                let value = indicator.evaluate(assignment_with(turn, encoded));
                let expected = if encoded == d { 1.0 } else { 0.0 };
                assert!((value - expected).abs() < 1e-12, "d={d} encoded={encoded}");
            }
        }
    }

    #[test]
    fn indicators_ignore_other_positions() {
        let turn = TurnQubits { first: 0, second: 1 };
        let indicator = turn.indicator(2, 4).unwrap();
        assert_eq!(indicator.evaluate(0b0001), 1.0);
        assert_eq!(indicator.evaluate(0b1101), 1.0);
        assert_eq!(indicator.evaluate(0b1111), 0.0);
    }

    #[test]
    fn indicator_outside_register_is_an_error() {
        let turn = TurnQubits { first: 6, second: 7 };
        assert!(turn.indicators(7).is_err());
    }

    #[test]
    fn parity_alternates_and_side_beads_sit_opposite() {
        let m2 = Bead::main(2, ResidueType::Alanine, None);
        let m3 = Bead::main(3, ResidueType::Alanine, None);
        let s2 = Bead::side(2, ResidueType::Alanine, TurnQubits { first: 0, second: 1 });
        assert_eq!(m2.parity(), 0);
        assert_eq!(m3.parity(), 1);
        assert_eq!(s2.parity(), 1);
        assert!(!s2.is_main());
    }

    #[test]
    fn origin_bead_has_no_indicators() {
        let origin = Bead::main(0, ResidueType::Glycine, None);
        assert!(origin.turn_indicators(4).unwrap().is_none());
    }
}
