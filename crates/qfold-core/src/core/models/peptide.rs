use super::bead::{Bead, TurnQubits};
use super::residue::{InvalidResidueError, ResidueType};
use crate::core::operators::pauli::MAX_QUBITS;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PeptideError {
    #[error(transparent)]
    InvalidResidue(#[from] InvalidResidueError),

    #[error("Main chain must contain at least 2 residues, got {length}")]
    InvalidSize { length: usize },

    #[error("Invalid side chain: {0}")]
    InvalidSideChain(String),

    #[error("Peptide needs {num_qubits} turn qubits, more than the supported {MAX_QUBITS}")]
    RegisterTooWide { num_qubits: usize },
}

/// A validated peptide: a main chain with at most one single-bead side chain per main bead.
///
/// The peptide also fixes the layout of the turn-qubit register:
///
/// - the turn into main bead `k` (for `k >= 1`) occupies positions `2(k-1)` and `2(k-1)+1`;
/// - the `s`-th side bead in main-chain order occupies `2(L-1)+2s` and `2(L-1)+2s+1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Peptide {
    main_chain: Vec<Bead>,
    side_chains: Vec<Option<Bead>>,
}

impl Peptide {
    /// Builds a peptide from a main-chain sequence and one side-chain entry per main bead.
    ///
    /// An empty side-chain entry means the main bead carries no side bead. Side chains are
    /// limited to a single residue and are not allowed on the two terminal beads.
    pub fn new<S: AsRef<str>>(main_sequence: &str, side_chains: &[S]) -> Result<Self, PeptideError> {
        let residues = ResidueType::parse_sequence(main_sequence)?;
        let length = residues.len();
        if length < 2 {
            return Err(PeptideError::InvalidSize { length });
        }
        if side_chains.len() != length {
            return Err(PeptideError::InvalidSideChain(format!(
                "expected {} side-chain entries (one per main bead), got {}",
                length,
                side_chains.len()
            )));
        }

        let side_residues = side_chains
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let entry = entry.as_ref();
                if entry.chars().count() > 1 {
                    return Err(PeptideError::InvalidSideChain(format!(
                        "side chain '{}' on main bead {} has more than one residue; only single-bead side chains are supported",
                        entry, i
                    )));
                }
                let residue = ResidueType::parse_optional(entry)?;
                if residue.is_some() && (i == 0 || i == length - 1) {
                    return Err(PeptideError::InvalidSideChain(format!(
                        "terminal main bead {} cannot carry a side chain",
                        i
                    )));
                }
                Ok(residue)
            })
            .collect::<Result<Vec<_>, PeptideError>>()?;

        let num_side = side_residues.iter().filter(|r| r.is_some()).count();
        let num_qubits = 2 * (length - 1) + 2 * num_side;
        if num_qubits > MAX_QUBITS {
            return Err(PeptideError::RegisterTooWide { num_qubits });
        }

        let main_chain = residues
            .iter()
            .enumerate()
            .map(|(k, &residue)| {
                let turn = (k > 0).then(|| TurnQubits {
                    first: 2 * (k - 1),
                    second: 2 * (k - 1) + 1,
                });
                Bead::main(k, residue, turn)
            })
            .collect();

        let side_offset = 2 * (length - 1);
        let mut next_side = 0;
        let side_chains = side_residues
            .into_iter()
            .enumerate()
            .map(|(k, residue)| {
                residue.map(|residue| {
                    let turn = TurnQubits {
                        first: side_offset + 2 * next_side,
                        second: side_offset + 2 * next_side + 1,
                    };
                    next_side += 1;
                    Bead::side(k, residue, turn)
                })
            })
            .collect();

        Ok(Self {
            main_chain,
            side_chains,
        })
    }

    /// Peptide without side chains.
    pub fn from_sequence(main_sequence: &str) -> Result<Self, PeptideError> {
        let empty = vec![""; main_sequence.chars().count()];
        Self::new(main_sequence, &empty)
    }

    /// Number of main beads.
    pub fn len(&self) -> usize {
        self.main_chain.len()
    }

    pub fn main_chain(&self) -> &[Bead] {
        &self.main_chain
    }

    pub fn side_chains(&self) -> &[Option<Bead>] {
        &self.side_chains
    }

    pub fn side_bead(&self, main_index: usize) -> Option<&Bead> {
        self.side_chains.get(main_index).and_then(Option::as_ref)
    }

    /// One flag per main bead telling whether it carries a side bead.
    pub fn side_chain_hot_vector(&self) -> Vec<bool> {
        self.side_chains.iter().map(Option::is_some).collect()
    }

    pub fn num_side_beads(&self) -> usize {
        self.side_chains.iter().flatten().count()
    }

    /// Width of the turn-qubit register before fixing and compression.
    pub fn num_qubits(&self) -> usize {
        2 * (self.len() - 1) + 2 * self.num_side_beads()
    }

    pub fn num_main_turn_qubits(&self) -> usize {
        2 * (self.len() - 1)
    }

    /// Main bead `k` followed by its side bead, if it has one.
    pub fn beads_at(&self, k: usize) -> impl Iterator<Item = &Bead> {
        self.main_chain.get(k).into_iter().chain(self.side_bead(k))
    }

    /// Main beads followed by side beads in main-chain order.
    pub fn beads(&self) -> impl Iterator<Item = &Bead> {
        self.main_chain.iter().chain(self.side_chains.iter().flatten())
    }

    pub fn main_sequence(&self) -> String {
        self.main_chain.iter().map(|b| b.residue.symbol()).collect()
    }

    pub fn side_sequence(&self) -> Vec<String> {
        self.side_chains
            .iter()
            .map(|s| s.as_ref().map(|b| b.residue.to_string()).unwrap_or_default())
            .collect()
    }
}
