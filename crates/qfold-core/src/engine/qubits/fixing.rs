use crate::core::models::bead::TurnQubits;
use crate::core::models::peptide::Peptide;
use crate::core::operators::operator::QubitOperator;
use crate::core::operators::pauli::ZString;
use std::collections::BTreeMap;
use tracing::debug;

/// Register positions pinned to a classical value, keyed by position.
pub type FixedQubits = BTreeMap<usize, bool>;

/// Direction of the turn into main bead 1.
const FIRST_TURN: usize = 1;
/// Direction of the turn into main bead 2.
const SECOND_TURN: usize = 0;

/// Symmetry-breaking assignment of the leading turn qubits.
///
/// The diamond lattice is invariant under rotations that permute the four directions, so
/// the first two main-chain turns can be pinned without losing any conformation. When
/// main bead 1 carries no side chain the mirror symmetry left after that is broken too,
/// by pinning the second bit of the turn into main bead 3.
pub fn fixed_qubits(peptide: &Peptide) -> FixedQubits {
    let mut fixed = FixedQubits::new();
    let main = peptide.main_chain();

    let pin_turn = |bead: usize, direction: usize, fixed: &mut FixedQubits| {
        if let Some(turn) = main.get(bead).and_then(|b| b.turn) {
            let (first, second) = TurnQubits::encode(direction);
            fixed.insert(turn.first, first);
            fixed.insert(turn.second, second);
        }
    };
    pin_turn(1, FIRST_TURN, &mut fixed);
    pin_turn(2, SECOND_TURN, &mut fixed);

    if peptide.side_bead(1).is_none() {
        if let Some(turn) = main.get(3).and_then(|b| b.turn) {
            fixed.insert(turn.second, true);
        }
    }

    debug!(
        positions = ?fixed.keys().collect::<Vec<_>>(),
        "Derived fixed turn qubits."
    );
    fixed
}

/// Substitutes every fixed position by its classical value.
///
/// A `Z` on a position fixed to 0 becomes the identity; on a position fixed to 1 it
/// becomes `-I`. The register width is unchanged, fixed positions simply stop appearing
/// in any term. Positions outside the register are ignored.
pub fn fix_qubits(op: &QubitOperator, fixed: &FixedQubits) -> QubitOperator {
    let (mask, ones) = fixed
        .iter()
        .filter(|&(&p, _)| p < op.num_qubits())
        .fold((0u128, 0u128), |(mask, ones), (&p, &value)| {
            (mask | (1u128 << p), ones | ((value as u128) << p))
        });
    if mask == 0 {
        return op.clone();
    }

    op.map_terms(op.num_qubits(), |z, coeff| {
        let pinned = ZString::from_bits(z.bits() & mask);
        let rest = ZString::from_bits(z.bits() & !mask);
        (rest, coeff * pinned.sign(ones))
    })
    .simplify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operators::pauli::Factor;

    #[test]
    fn standard_layout_fixes_positions_0_to_3_and_5() {
        let peptide = Peptide::from_sequence("DWGGM").unwrap();
        let fixed = fixed_qubits(&peptide);
        let expected: FixedQubits = [(0, false), (1, true), (2, false), (3, false), (5, true)]
            .into_iter()
            .collect();
        assert_eq!(fixed, expected);
    }

    #[test]
    fn side_chain_on_second_bead_keeps_position_5_free() {
        let peptide = Peptide::new("APRLG", &["", "K", "", "", ""]).unwrap();
        let fixed = fixed_qubits(&peptide);
        assert!(!fixed.contains_key(&5));
        assert_eq!(fixed.len(), 4);
    }

    #[test]
    fn short_chains_only_fix_positions_that_exist() {
        let fixed = fixed_qubits(&Peptide::from_sequence("AP").unwrap());
        assert_eq!(fixed.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
        let fixed = fixed_qubits(&Peptide::from_sequence("APR").unwrap());
        assert_eq!(fixed.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn fixing_matches_substitution_on_every_assignment() {
        let op = QubitOperator::product(4, &[(0, Factor::PauliZ), (1, Factor::PauliZ)]).unwrap()
            + QubitOperator::factor(4, 1, Factor::ProjectOne).unwrap().scale(3.0)
            + QubitOperator::factor(4, 3, Factor::PauliZ).unwrap().scale(-2.0)
            + QubitOperator::identity(4, 0.5);
        let fixed: FixedQubits = [(1, true), (3, false), (9, true)].into_iter().collect();
        let reduced = fix_qubits(&op, &fixed);

        assert!(!reduced.support().contains(1));
        assert!(!reduced.support().contains(3));
        for free in 0..16u128 {
            let pinned = (free & !0b1010) | 0b0010;
            assert!((reduced.evaluate(free) - op.evaluate(pinned)).abs() < 1e-12);
        }
    }

    #[test]
    fn fixing_is_idempotent() {
        let op = QubitOperator::product(3, &[(0, Factor::ProjectOne), (2, Factor::ProjectZero)])
            .unwrap();
        let fixed: FixedQubits = [(0, true)].into_iter().collect();
        let once = fix_qubits(&op, &fixed);
        assert_eq!(fix_qubits(&once, &fixed), once);
    }
}
