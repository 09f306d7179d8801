//! Pairwise contact energies between residue types.
//!
//! All schemes reduce to a symmetric 20x20 [`EnergyMatrix`]; the [`Interaction`] trait is the
//! seam the Hamiltonian builder queries.

use crate::core::models::residue::{InvalidResidueError, ResidueType};
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub mod miyazawa_jernigan;
pub mod mixed;
pub mod random;

const NUM_RESIDUE_TYPES: usize = ResidueType::ALL.len();

/// Tolerance used when checking a loaded table for symmetry.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("I/O error for file '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing error for file '{path}': {source}", path = path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid residue label in contact table: {0}")]
    InvalidResidue(#[from] InvalidResidueError),

    #[error("Invalid energy value '{value}' for pair {a}-{b}")]
    InvalidValue { a: char, b: char, value: String },

    #[error("Contact table is missing the energy for pair {a}-{b}")]
    MissingEntry { a: ResidueType, b: ResidueType },

    #[error("Contact table is not symmetric: E({a},{b}) = {ab} but E({b},{a}) = {ba}")]
    Asymmetric {
        a: ResidueType,
        b: ResidueType,
        ab: f64,
        ba: f64,
    },
}

/// Contact energy between two residues. Implementations must be symmetric.
pub trait Interaction: Send + Sync {
    fn name(&self) -> &str;

    fn energy(&self, a: ResidueType, b: ResidueType) -> f64;
}

/// A symmetric table of contact energies indexed by residue type.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyMatrix {
    values: [[f64; NUM_RESIDUE_TYPES]; NUM_RESIDUE_TYPES],
}

impl EnergyMatrix {
    /// Builds the matrix from `f(a, b)` evaluated on the upper triangle (`a.index() <= b.index()`)
    /// and mirrored onto the lower triangle.
    pub fn from_upper_triangle<F>(mut f: F) -> Self
    where
        F: FnMut(ResidueType, ResidueType) -> f64,
    {
        let mut values = [[0.0; NUM_RESIDUE_TYPES]; NUM_RESIDUE_TYPES];
        for (i, &a) in ResidueType::ALL.iter().enumerate() {
            for (j, &b) in ResidueType::ALL.iter().enumerate().skip(i) {
                let e = f(a, b);
                values[i][j] = e;
                values[j][i] = e;
            }
        }
        Self { values }
    }

    #[inline]
    pub fn get(&self, a: ResidueType, b: ResidueType) -> f64 {
        self.values[a.index()][b.index()]
    }

    /// Loads a square table from CSV.
    ///
    /// The header row lists residue one-letter codes after a leading corner cell, and
    /// each subsequent row starts with its residue code followed by the energies. Empty
    /// cells are filled from the mirrored pair, so an upper triangle is enough. Every
    /// residue pair must end up defined and the table must be symmetric.
    pub fn load_csv(path: &Path) -> Result<Self, InteractionError> {
        debug!("Loading contact energy table from {:?}", path);
        let file = File::open(path).map_err(|source| InteractionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(file);

        let csv_error = |source: csv::Error| InteractionError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let columns = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .skip(1)
            .map(|label| label.parse::<ResidueType>())
            .collect::<Result<Vec<_>, _>>()?;

        let mut entries = [[None::<f64>; NUM_RESIDUE_TYPES]; NUM_RESIDUE_TYPES];
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            let Some(label) = record.get(0) else {
                continue;
            };
            let row: ResidueType = label.parse()?;
            for (column, cell) in columns.iter().zip(record.iter().skip(1)) {
                if cell.is_empty() {
                    continue;
                }
                let value = cell.parse::<f64>().map_err(|_| InteractionError::InvalidValue {
                    a: row.symbol(),
                    b: column.symbol(),
                    value: cell.to_string(),
                })?;
                entries[row.index()][column.index()] = Some(value);
            }
        }

        let mut values = [[0.0; NUM_RESIDUE_TYPES]; NUM_RESIDUE_TYPES];
        for a in ResidueType::ALL {
            for b in ResidueType::ALL {
                let (i, j) = (a.index(), b.index());
                values[i][j] = match (entries[i][j], entries[j][i]) {
                    (Some(ab), Some(ba)) if (ab - ba).abs() > SYMMETRY_TOLERANCE => {
                        return Err(InteractionError::Asymmetric { a, b, ab, ba });
                    }
                    (Some(e), _) | (None, Some(e)) => e,
                    (None, None) => return Err(InteractionError::MissingEntry { a, b }),
                };
            }
        }
        Ok(Self { values })
    }

    pub fn is_symmetric(&self) -> bool {
        (0..NUM_RESIDUE_TYPES).all(|i| (0..i).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

impl Interaction for EnergyMatrix {
    fn name(&self) -> &str {
        "custom"
    }

    fn energy(&self, a: ResidueType, b: ResidueType) -> f64 {
        self.get(a, b)
    }
}
