use super::qubits::fixing::FixedQubits;
use super::result::Conformation;
use crate::core::models::bead::TurnQubits;
use crate::core::models::peptide::Peptide;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DecodeError {
    #[error("Bitstring has {actual} bits but the reduced register has {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Invalid character '{character}' at index {index} of bitstring; expected '0' or '1'")]
    InvalidCharacter { character: char, index: usize },

    #[error("Turn direction {0} is outside the four lattice directions")]
    InvalidDirection(usize),

    #[error("Unused qubit position {position} is outside a register of {num_qubits} qubits")]
    UnusedPositionOutOfRange { position: usize, num_qubits: usize },

    #[error("Probability distribution is empty; there is no bitstring to decode")]
    EmptyDistribution,
}

/// Turns a measured bitstring over the compressed register back into a conformation.
///
/// Bitstrings list the highest reduced position first, so the last character is reduced
/// position 0. Removed positions are restored from the fixed assignment, or set to 0 when
/// they were not fixed (such positions do not affect the energy).
#[derive(Debug, Clone)]
pub struct ResultDecoder {
    num_qubits: usize,
    num_main_beads: usize,
    hot_vector: Vec<bool>,
    unused: Vec<usize>,
    fixed: FixedQubits,
}

impl ResultDecoder {
    pub fn new(peptide: &Peptide, unused: &[usize], fixed: &FixedQubits) -> Result<Self, DecodeError> {
        let num_qubits = peptide.num_qubits();
        let mut unused = unused.to_vec();
        unused.sort_unstable();
        unused.dedup();
        if let Some(&position) = unused.last().filter(|&&p| p >= num_qubits) {
            return Err(DecodeError::UnusedPositionOutOfRange {
                position,
                num_qubits,
            });
        }
        Ok(Self {
            num_qubits,
            num_main_beads: peptide.len(),
            hot_vector: peptide.side_chain_hot_vector(),
            unused,
            fixed: fixed.clone(),
        })
    }

    /// Width of the register the bitstrings are measured on.
    pub fn reduced_width(&self) -> usize {
        self.num_qubits - self.unused.len()
    }

    pub fn unused(&self) -> &[usize] {
        &self.unused
    }

    /// Full-register assignment, one value per original position.
    pub fn full_assignment(&self, bitstring: &str) -> Result<Vec<bool>, DecodeError> {
        let actual = bitstring.chars().count();
        if actual != self.reduced_width() {
            return Err(DecodeError::LengthMismatch {
                expected: self.reduced_width(),
                actual,
            });
        }
        let mut reduced = bitstring
            .chars()
            .enumerate()
            .map(|(index, character)| match character {
                '0' => Ok(false),
                '1' => Ok(true),
                _ => Err(DecodeError::InvalidCharacter { character, index }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        reduced.reverse();

        let mut next = reduced.into_iter();
        Ok((0..self.num_qubits)
            .map(|p| {
                if self.unused.binary_search(&p).is_ok() {
                    self.fixed.get(&p).copied().unwrap_or(false)
                } else {
                    next.next().unwrap_or(false)
                }
            })
            .collect())
    }

    pub fn decode(&self, bitstring: &str) -> Result<Conformation, DecodeError> {
        let bits = self.full_assignment(bitstring)?;
        let turn_at = |first: usize| TurnQubits::decode(bits[first], bits[first + 1]);

        let main_turns: Vec<usize> = (0..self.num_main_beads - 1).map(|k| turn_at(2 * k)).collect();
        let side_offset = 2 * (self.num_main_beads - 1);
        let mut next_side = 0;
        let side_turns = self
            .hot_vector
            .iter()
            .map(|&present| {
                present.then(|| {
                    let turn = turn_at(side_offset + 2 * next_side);
                    next_side += 1;
                    turn
                })
            })
            .collect();

        Conformation::from_turns(main_turns, side_turns)
    }

    /// The full-width bitstring, highest position first, with `_` at every removed position.
    pub fn binary_vector(&self, bitstring: &str) -> Result<String, DecodeError> {
        let bits = self.full_assignment(bitstring)?;
        Ok((0..self.num_qubits)
            .rev()
            .map(|p| {
                if self.unused.binary_search(&p).is_ok() {
                    '_'
                } else if bits[p] {
                    '1'
                } else {
                    '0'
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lattice::{self, BOND_LENGTH_SQUARED, LatticeVector};
    use crate::engine::qubits::fixing::fixed_qubits;

    fn dwggm_decoder() -> ResultDecoder {
        let peptide = Peptide::from_sequence("DWGGM").unwrap();
        let fixed = fixed_qubits(&peptide);
        let unused: Vec<usize> = fixed.keys().copied().collect();
        ResultDecoder::new(&peptide, &unused, &fixed).unwrap()
    }

    #[test]
    fn all_zero_free_bits_decode_to_a_valid_chain() {
        let decoder = dwggm_decoder();
        assert_eq!(decoder.reduced_width(), 3);
        let conformation = decoder.decode("000").unwrap();

        assert_eq!(conformation.main_turns(), &[1, 0, 1, 0]);
        let positions = conformation.main_positions();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], LatticeVector::zeros());
        for w in positions.windows(2) {
            assert_eq!(lattice::squared_length(&(w[1] - w[0])), BOND_LENGTH_SQUARED);
        }
    }

    #[test]
    fn reduced_bits_are_read_from_the_right() {
        let decoder = dwggm_decoder();
        // Free positions are 4, 6, 7; the last character is position 4.
        let conformation = decoder.decode("011").unwrap();
        assert_eq!(conformation.main_turns(), &[1, 0, 3, 2]);
        assert_eq!(decoder.binary_vector("011").unwrap(), "01_1____");
    }

    #[test]
    fn decoding_is_deterministic() {
        let decoder = dwggm_decoder();
        assert_eq!(decoder.decode("101").unwrap(), decoder.decode("101").unwrap());
    }

    #[test]
    fn malformed_bitstrings_are_rejected() {
        let decoder = dwggm_decoder();
        assert_eq!(
            decoder.decode("0101").unwrap_err(),
            DecodeError::LengthMismatch {
                expected: 3,
                actual: 4
            }
        );
        assert_eq!(
            decoder.decode("0a1").unwrap_err(),
            DecodeError::InvalidCharacter {
                character: 'a',
                index: 1
            }
        );
    }

    #[test]
    fn unused_positions_must_lie_in_the_register() {
        let peptide = Peptide::from_sequence("APR").unwrap();
        let err = ResultDecoder::new(&peptide, &[0, 4], &FixedQubits::new()).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnusedPositionOutOfRange {
                position: 4,
                num_qubits: 4
            }
        );
    }

    #[test]
    fn side_turns_follow_main_turns_in_chain_order() {
        let peptide = Peptide::new("APRLG", &["", "", "K", "F", ""]).unwrap();
        let decoder = ResultDecoder::new(&peptide, &[], &FixedQubits::new()).unwrap();
        // Positions 8,9 hold the side turn on bead 2 and 10,11 the one on bead 3.
        let bitstring = "011000000000";
        let conformation = decoder.decode(bitstring).unwrap();
        assert_eq!(conformation.side_turns(), &[None, None, Some(1), Some(2), None]);
        let side = conformation.side_positions()[2].unwrap();
        let anchor = conformation.main_positions()[2];
        assert_eq!(side - anchor, lattice::step(2, 1).unwrap());
    }
}
