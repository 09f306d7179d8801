use super::decoder::DecodeError;
use super::energy::EnergyBreakdown;
use crate::core::io::xyz::{XyzAtom, XyzError, XyzFile, XyzStructure};
use crate::core::lattice::{self, LatticeVector, NUM_DIRECTIONS};
use crate::core::models::bead::Bead;
use crate::core::models::peptide::Peptide;
use std::path::{Path, PathBuf};

/// Lattice path of a peptide: the turn sequence and the bead positions it produces.
///
/// Main bead 0 sits at the origin and `P_k = P_{k-1} + (-1)^{k-1} D[t_k]`. A side bead on
/// main bead `k` sits at `P_k + (-1)^k D[s_k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Conformation {
    main_turns: Vec<usize>,
    side_turns: Vec<Option<usize>>,
    main_positions: Vec<LatticeVector>,
    side_positions: Vec<Option<LatticeVector>>,
}

impl Conformation {
    /// `main_turns[k - 1]` is the turn into main bead `k`; `side_turns[k]` the turn from
    /// main bead `k` into its side bead.
    pub fn from_turns(
        main_turns: Vec<usize>,
        side_turns: Vec<Option<usize>>,
    ) -> Result<Self, DecodeError> {
        let step = |parity: usize, d: usize| {
            lattice::step(parity, d).ok_or(DecodeError::InvalidDirection(d))
        };

        let mut main_positions = Vec::with_capacity(main_turns.len() + 1);
        main_positions.push(LatticeVector::zeros());
        for (i, &t) in main_turns.iter().enumerate() {
            let previous = main_positions[i];
            main_positions.push(previous + step(i, t)?);
        }

        let side_positions = side_turns
            .iter()
            .enumerate()
            .map(|(k, turn)| match (turn, main_positions.get(k)) {
                (Some(s), Some(anchor)) => Ok(Some(anchor + step(k, *s)?)),
                (Some(s), None) if *s >= NUM_DIRECTIONS => Err(DecodeError::InvalidDirection(*s)),
                _ => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            main_turns,
            side_turns,
            main_positions,
            side_positions,
        })
    }

    pub fn main_turns(&self) -> &[usize] {
        &self.main_turns
    }

    pub fn side_turns(&self) -> &[Option<usize>] {
        &self.side_turns
    }

    pub fn main_positions(&self) -> &[LatticeVector] {
        &self.main_positions
    }

    pub fn side_positions(&self) -> &[Option<LatticeVector>] {
        &self.side_positions
    }

    pub fn position(&self, bead: &Bead) -> Option<LatticeVector> {
        if bead.is_main() {
            self.main_positions.get(bead.main_index).copied()
        } else {
            self.side_positions.get(bead.main_index).copied().flatten()
        }
    }
}

/// A decoded measurement outcome together with everything needed to report it.
#[derive(Debug, Clone, PartialEq)]
pub struct FoldingResult {
    pub peptide: Peptide,
    /// Measured bitstring over the compressed register.
    pub bitstring: String,
    pub probability: f64,
    /// Full-register bitstring with `_` at removed positions.
    pub binary_vector: String,
    pub conformation: Conformation,
    pub energy: EnergyBreakdown,
    /// Cartesian length of one lattice bond in exported structures.
    pub bond_length: f64,
}

impl FoldingResult {
    pub fn main_turns(&self) -> &[usize] {
        self.conformation.main_turns()
    }

    pub fn side_turns(&self) -> &[Option<usize>] {
        self.conformation.side_turns()
    }

    /// Main beads first, then side beads in chain order, labelled by residue symbol.
    pub fn to_xyz(&self, comment: &str) -> XyzStructure {
        let atoms = self
            .peptide
            .beads()
            .filter_map(|bead| {
                self.conformation.position(bead).map(|v| XyzAtom {
                    label: bead.residue.symbol().to_string(),
                    position: lattice::to_cartesian(&v, self.bond_length),
                })
            })
            .collect();
        XyzStructure {
            comment: comment.to_string(),
            atoms,
        }
    }

    /// Writes `<dir>/<name>.xyz` and returns its path.
    pub fn save_xyz_file(
        &self,
        name: &str,
        dir: &Path,
        comment: &str,
        replace: bool,
    ) -> Result<PathBuf, XyzError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.xyz", name));
        XyzFile::save(&self.to_xyz(comment), &path, replace)?;
        Ok(path)
    }
}
