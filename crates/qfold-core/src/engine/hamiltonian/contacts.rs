use super::displacement::Displacements;
use super::indicators::TurnIndicators;
use crate::core::interactions::Interaction;
use crate::core::lattice::{self, LatticeVector};
use crate::core::models::bead::Bead;
use crate::core::models::peptide::Peptide;
use crate::core::operators::operator::QubitOperator;
use crate::engine::config::PenaltyParameters;
use itertools::iproduct;

/// Shortest bond path between two beads that can close into a lattice contact. The smallest
/// ring on the diamond lattice has six sites.
pub const MIN_CONTACT_PATH: usize = 5;

/// Number of bonds along the chain between `a` and `b`.
pub fn bond_path(a: &Bead, b: &Bead) -> usize {
    b.main_index.abs_diff(a.main_index) + usize::from(!a.is_main()) + usize::from(!b.is_main())
}

/// How a non-bonded bead pair contributes to the folding energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRule {
    /// Opposite sublattices, at least five bonds apart: interaction energy when the beads
    /// are lattice neighbours. Closer pairs can only touch by walking back on the chain.
    Contact,
    /// Two main beads an even number of bonds (at least four) apart on the same site.
    Overlap,
    /// A side bead on the same site as another bead of its sublattice.
    SideChainClash,
}

impl PairRule {
    /// Rule for a pair with `a.main_index <= b.main_index`, or `None` when the pair is
    /// bonded, cannot meet, or is already covered by the back-turn penalty.
    pub fn classify(a: &Bead, b: &Bead) -> Option<PairRule> {
        let separation = b.main_index.abs_diff(a.main_index);
        if separation == 0 {
            return None;
        }
        let both_main = a.is_main() && b.is_main();
        if a.parity() != b.parity() {
            (bond_path(a, b) >= MIN_CONTACT_PATH).then_some(PairRule::Contact)
        } else if both_main {
            (separation >= 4).then_some(PairRule::Overlap)
        } else {
            Some(PairRule::SideChainClash)
        }
    }

    /// Displacements from `a` to `b` that trigger the rule.
    pub fn targets(self, a: &Bead) -> Vec<LatticeVector> {
        match self {
            PairRule::Contact => lattice::neighbor_offsets(a.parity()).to_vec(),
            PairRule::Overlap | PairRule::SideChainClash => vec![LatticeVector::zeros()],
        }
    }

    /// Energy added when the rule fires.
    pub fn weight(
        self,
        a: &Bead,
        b: &Bead,
        interaction: &dyn Interaction,
        penalties: &PenaltyParameters,
    ) -> f64 {
        match self {
            PairRule::Contact => interaction.energy(a.residue, b.residue),
            PairRule::Overlap => penalties.overlap,
            PairRule::SideChainClash => penalties.side_chain,
        }
    }
}

/// Possible offsets of a bead from its main-chain anchor, each with its indicator.
///
/// A main bead is its own anchor, so it has a single zero offset that always applies.
fn anchor_offsets<'a>(
    bead: &Bead,
    indicators: &'a TurnIndicators,
) -> Vec<(LatticeVector, Option<&'a QubitOperator>)> {
    if bead.is_main() {
        return vec![(LatticeVector::zeros(), None)];
    }
    let Some(turn) = indicators.side(bead.main_index) else {
        return Vec::new();
    };
    turn.iter()
        .enumerate()
        .filter(|(_, op)| !op.is_zero())
        .filter_map(|(d, op)| lattice::step(bead.main_index, d).map(|v| (v, Some(op))))
        .collect()
}

/// Indicator that the displacement from `a` to `b` lands in `targets`.
///
/// `a` must be anchored on the start bead of `displacements`.
fn pair_indicator(
    a: &Bead,
    b: &Bead,
    targets: &[LatticeVector],
    displacements: &Displacements,
    indicators: &TurnIndicators,
) -> QubitOperator {
    let num_qubits = indicators.num_qubits();
    let mut total = QubitOperator::zero(num_qubits);

    for ((off_a, g_a), (off_b, g_b)) in iproduct!(
        anchor_offsets(a, indicators),
        anchor_offsets(b, indicators)
    ) {
        let mut hits = QubitOperator::zero(num_qubits);
        for t in targets {
            if let Some(op) = displacements.at(b.main_index, &(t - off_b + off_a)) {
                hits += op;
            }
        }
        if hits.is_zero() {
            continue;
        }
        let gate = match (g_a, g_b) {
            (Some(x), Some(y)) => Some(x * y),
            (Some(x), None) | (None, Some(x)) => Some(x.clone()),
            (None, None) => None,
        };
        match gate {
            Some(gate) => total += &hits * &gate,
            None => total += hits,
        }
    }
    total.simplify()
}

/// Interaction and collision terms of every pair whose first bead hangs off main bead
/// `start`, together with the second bead further along the chain.
pub fn pair_terms(
    start: usize,
    peptide: &Peptide,
    displacements: &Displacements,
    indicators: &TurnIndicators,
    interaction: &dyn Interaction,
    penalties: &PenaltyParameters,
) -> QubitOperator {
    let mut total = QubitOperator::zero(indicators.num_qubits());
    for a in peptide.beads_at(start) {
        for j in start + 1..peptide.len() {
            for b in peptide.beads_at(j) {
                let Some(rule) = PairRule::classify(a, b) else {
                    continue;
                };
                let weight = rule.weight(a, b, interaction, penalties);
                if weight == 0.0 {
                    continue;
                }
                let indicator =
                    pair_indicator(a, b, &rule.targets(a), displacements, indicators);
                total += indicator.scale(weight);
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bead::TurnQubits;
    use crate::core::models::residue::ResidueType;

    fn main(k: usize) -> Bead {
        Bead::main(k, ResidueType::Alanine, None)
    }

    fn side(k: usize) -> Bead {
        Bead::side(k, ResidueType::Alanine, TurnQubits { first: 0, second: 1 })
    }

    #[test]
    fn main_chain_pairs_follow_separation() {
        assert_eq!(PairRule::classify(&main(0), &main(1)), None);
        assert_eq!(PairRule::classify(&main(0), &main(2)), None);
        assert_eq!(PairRule::classify(&main(0), &main(3)), None);
        assert_eq!(PairRule::classify(&main(1), &main(5)), Some(PairRule::Overlap));
        assert_eq!(PairRule::classify(&main(0), &main(5)), Some(PairRule::Contact));
        assert_eq!(PairRule::classify(&main(2), &main(7)), Some(PairRule::Contact));
    }

    #[test]
    fn side_bead_pairs_are_contacts_or_clashes() {
        assert_eq!(PairRule::classify(&main(2), &side(2)), None);
        assert_eq!(PairRule::classify(&main(1), &side(2)), Some(PairRule::SideChainClash));
        assert_eq!(PairRule::classify(&side(2), &main(3)), Some(PairRule::SideChainClash));
        assert_eq!(PairRule::classify(&side(1), &side(3)), Some(PairRule::SideChainClash));
        assert_eq!(PairRule::classify(&main(0), &side(4)), Some(PairRule::Contact));
        assert_eq!(PairRule::classify(&side(1), &side(4)), Some(PairRule::Contact));
    }

    #[test]
    fn three_bond_pairs_never_count_as_contacts() {
        for (a, b) in [
            (main(1), side(3)),
            (side(1), main(3)),
            (side(1), side(2)),
            (main(0), main(3)),
        ] {
            assert_eq!(bond_path(&a, &b), 3);
            assert_eq!(PairRule::classify(&a, &b), None);
        }
    }

    #[test]
    fn contact_targets_are_neighbours_of_the_first_bead() {
        let targets = PairRule::Contact.targets(&main(1));
        assert_eq!(targets.len(), 4);
        for t in &targets {
            assert_eq!(lattice::squared_length(t), lattice::BOND_LENGTH_SQUARED);
        }
        assert_eq!(
            PairRule::Overlap.targets(&main(0)),
            vec![LatticeVector::zeros()]
        );
    }
}
