use super::indicators::TurnIndicators;
use crate::core::lattice::{self, BOND_LENGTH_SQUARED, LatticeVector};
use crate::core::operators::operator::QubitOperator;
use std::collections::BTreeMap;

/// Farthest any pair target lies from the displacement between two main beads, in bonds:
/// one bond for the contact itself plus one for each side-bead offset.
const TARGET_REACH: i64 = 3;

pub type DisplacementKey = [i64; 3];

/// Indicators of where main bead `j` sits relative to a fixed start bead.
///
/// Each entry maps a displacement to the operator that evaluates to 1 exactly on the turn
/// assignments placing bead `j` at that displacement from the start. The entries for a
/// given `j` are mutually exclusive and, before pruning, sum to the identity.
#[derive(Debug, Clone, Default)]
pub struct Displacements {
    by_bead: Vec<BTreeMap<DisplacementKey, QubitOperator>>,
}

#[inline]
pub fn key(v: &LatticeVector) -> DisplacementKey {
    [v.x, v.y, v.z]
}

impl Displacements {
    /// Walks the main chain from `start`, one turn at a time.
    ///
    /// Displacements too far from the origin to come back within reach of any pair target
    /// before the chain ends are dropped, as are entries whose operator vanished.
    pub fn from_start(start: usize, chain_length: usize, indicators: &TurnIndicators) -> Self {
        let mut by_bead = vec![BTreeMap::new(); chain_length];
        if start >= chain_length {
            return Self { by_bead };
        }

        let mut current = BTreeMap::new();
        current.insert(
            [0, 0, 0],
            QubitOperator::identity(indicators.num_qubits(), 1.0),
        );

        for j in start + 1..chain_length {
            let Some(turn) = indicators.main(j) else {
                break;
            };
            let remaining = (chain_length - 1 - j) as i64;
            let limit = BOND_LENGTH_SQUARED * (remaining + TARGET_REACH).pow(2);

            let mut next: BTreeMap<DisplacementKey, QubitOperator> = BTreeMap::new();
            for (v, op) in &current {
                let v = LatticeVector::from(*v);
                for (d, indicator) in turn.iter().enumerate() {
                    if indicator.is_zero() {
                        continue;
                    }
                    let Some(step) = lattice::step(j - 1, d) else {
                        continue;
                    };
                    let moved = v + step;
                    if lattice::squared_length(&moved) > limit {
                        continue;
                    }
                    *next.entry(key(&moved)).or_default() += op * indicator;
                }
            }

            current = next
                .into_iter()
                .map(|(k, op)| (k, op.simplify()))
                .filter(|(_, op)| !op.is_zero())
                .collect();
            by_bead[j] = current.clone();
        }

        Self { by_bead }
    }

    /// Indicator that bead `j` sits at displacement `v` from the start, if it can.
    pub fn at(&self, j: usize, v: &LatticeVector) -> Option<&QubitOperator> {
        self.by_bead.get(j).and_then(|m| m.get(&key(v)))
    }

    pub fn entries(&self, j: usize) -> impl Iterator<Item = (&DisplacementKey, &QubitOperator)> {
        self.by_bead.get(j).into_iter().flatten()
    }
}
