use crate::core::io::traits::TextFile;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Mean C-alpha to C-alpha distance of a protein backbone, in angstroms.
pub const CA_BOND_LENGTH: f64 = 3.8;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("File '{path}' already exists and replacement was not requested", path = path.display())]
    FileExists { path: PathBuf },
    #[error("Cannot rescale a structure with fewer than two atoms")]
    TooFewAtoms,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyzAtom {
    pub label: String,
    pub position: Point3<f64>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct XyzStructure {
    pub comment: String,
    pub atoms: Vec<XyzAtom>,
}

impl XyzStructure {
    /// Mean distance between consecutive atoms over the first `chain_length` atoms.
    pub fn mean_bond_length(&self, chain_length: usize) -> Option<f64> {
        let chain = &self.atoms[..chain_length.min(self.atoms.len())];
        if chain.len() < 2 {
            return None;
        }
        let total: f64 = chain
            .windows(2)
            .map(|w| (w[1].position - w[0].position).norm())
            .sum();
        Some(total / (chain.len() - 1) as f64)
    }

    /// Uniformly scales all coordinates about the origin so that the mean consecutive
    /// distance along the first `chain_length` atoms equals `target`.
    pub fn rescaled(&self, chain_length: usize, target: f64) -> Result<Self, XyzError> {
        let current = self
            .mean_bond_length(chain_length)
            .filter(|&d| d > 0.0)
            .ok_or(XyzError::TooFewAtoms)?;
        let factor = target / current;
        Ok(Self {
            comment: self.comment.clone(),
            atoms: self
                .atoms
                .iter()
                .map(|a| XyzAtom {
                    label: a.label.clone(),
                    position: Point3::from(a.position.coords * factor),
                })
                .collect(),
        })
    }
}

pub struct XyzFile;

impl XyzFile {
    /// Writes `structure` to `path`, refusing to overwrite an existing file unless `replace`.
    pub fn save(structure: &XyzStructure, path: &Path, replace: bool) -> Result<(), XyzError> {
        if path.exists() && !replace {
            return Err(XyzError::FileExists {
                path: path.to_path_buf(),
            });
        }
        Self::write_to_path(structure, path)
    }
}

impl TextFile for XyzFile {
    type Value = XyzStructure;
    type Error = XyzError;

    fn read_from(reader: &mut impl BufRead) -> Result<XyzStructure, XyzError> {
        let mut lines = reader.lines();
        let count_line = lines.next().transpose()?.ok_or_else(|| XyzError::Parse {
            line: 1,
            message: "missing atom count".to_string(),
        })?;
        let count: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
            line: 1,
            message: format!("invalid atom count '{}'", count_line.trim()),
        })?;
        let comment = lines.next().transpose()?.unwrap_or_default();

        let mut atoms = Vec::with_capacity(count);
        for (offset, line) in lines.enumerate() {
            let line = line?;
            let line_num = offset + 3;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 4 {
                return Err(XyzError::Parse {
                    line: line_num,
                    message: "expected '<label> <x> <y> <z>'".to_string(),
                });
            }
            let coord = |i: usize| {
                fields[i].parse::<f64>().map_err(|_| XyzError::Parse {
                    line: line_num,
                    message: format!("invalid coordinate '{}'", fields[i]),
                })
            };
            atoms.push(XyzAtom {
                label: fields[0].to_string(),
                position: Point3::new(coord(1)?, coord(2)?, coord(3)?),
            });
        }

        if atoms.len() != count {
            return Err(XyzError::Parse {
                line: 1,
                message: format!("header declares {} atoms but {} were read", count, atoms.len()),
            });
        }
        Ok(XyzStructure { comment, atoms })
    }

    fn write_to(structure: &XyzStructure, writer: &mut impl Write) -> Result<(), XyzError> {
        writeln!(writer, "{}", structure.atoms.len())?;
        writeln!(writer, "{}", structure.comment.replace('\n', " "))?;
        for atom in &structure.atoms {
            writeln!(
                writer,
                "{} {:.6} {:.6} {:.6}",
                atom.label, atom.position.x, atom.position.y, atom.position.z
            )?;
        }
        Ok(())
    }
}
