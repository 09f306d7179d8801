use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResidueType {
    // --- Aliphatic, Nonpolar ---
    Alanine,    // A
    Glycine,    // G
    Isoleucine, // I
    Leucine,    // L
    Proline,    // P
    Valine,     // V

    // --- Aromatic ---
    Phenylalanine, // F
    Tryptophan,    // W
    Tyrosine,      // Y

    // --- Polar, Uncharged ---
    Asparagine, // N
    Cysteine,   // C
    Glutamine,  // Q
    Serine,     // S
    Threonine,  // T
    Methionine, // M

    // --- Positively Charged (Basic) ---
    Arginine,  // R
    Histidine, // H
    Lysine,    // K

    // --- Negatively Charged (Acidic) ---
    AsparticAcid, // D
    GlutamicAcid, // E
}

static RESIDUE_SYMBOLS: Map<char, ResidueType> = phf_map! {
    'A' => ResidueType::Alanine,
    'C' => ResidueType::Cysteine,
    'D' => ResidueType::AsparticAcid,
    'E' => ResidueType::GlutamicAcid,
    'F' => ResidueType::Phenylalanine,
    'G' => ResidueType::Glycine,
    'H' => ResidueType::Histidine,
    'I' => ResidueType::Isoleucine,
    'K' => ResidueType::Lysine,
    'L' => ResidueType::Leucine,
    'M' => ResidueType::Methionine,
    'N' => ResidueType::Asparagine,
    'P' => ResidueType::Proline,
    'Q' => ResidueType::Glutamine,
    'R' => ResidueType::Arginine,
    'S' => ResidueType::Serine,
    'T' => ResidueType::Threonine,
    'V' => ResidueType::Valine,
    'W' => ResidueType::Tryptophan,
    'Y' => ResidueType::Tyrosine,
};

#[derive(Debug, Error, PartialEq, Eq, Clone)]
#[error(
    "Provided residue type '{0}' is not valid. Valid residue types are the one-letter codes ACDEFGHIKLMNPQRSTVWY"
)]
pub struct InvalidResidueError(pub String);

impl ResidueType {
    /// All residue types in one-letter alphabetical order.
    pub const ALL: [ResidueType; 20] = [
        ResidueType::Alanine,
        ResidueType::Cysteine,
        ResidueType::AsparticAcid,
        ResidueType::GlutamicAcid,
        ResidueType::Phenylalanine,
        ResidueType::Glycine,
        ResidueType::Histidine,
        ResidueType::Isoleucine,
        ResidueType::Lysine,
        ResidueType::Leucine,
        ResidueType::Methionine,
        ResidueType::Asparagine,
        ResidueType::Proline,
        ResidueType::Glutamine,
        ResidueType::Arginine,
        ResidueType::Serine,
        ResidueType::Threonine,
        ResidueType::Valine,
        ResidueType::Tryptophan,
        ResidueType::Tyrosine,
    ];

    /// Position of the residue in [`ResidueType::ALL`].
    pub const fn index(self) -> usize {
        match self {
            ResidueType::Alanine => 0,
            ResidueType::Cysteine => 1,
            ResidueType::AsparticAcid => 2,
            ResidueType::GlutamicAcid => 3,
            ResidueType::Phenylalanine => 4,
            ResidueType::Glycine => 5,
            ResidueType::Histidine => 6,
            ResidueType::Isoleucine => 7,
            ResidueType::Lysine => 8,
            ResidueType::Leucine => 9,
            ResidueType::Methionine => 10,
            ResidueType::Asparagine => 11,
            ResidueType::Proline => 12,
            ResidueType::Glutamine => 13,
            ResidueType::Arginine => 14,
            ResidueType::Serine => 15,
            ResidueType::Threonine => 16,
            ResidueType::Valine => 17,
            ResidueType::Tryptophan => 18,
            ResidueType::Tyrosine => 19,
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        RESIDUE_SYMBOLS.get(&symbol).copied()
    }

    pub fn symbol(self) -> char {
        match self {
            ResidueType::Alanine => 'A',
            ResidueType::Cysteine => 'C',
            ResidueType::AsparticAcid => 'D',
            ResidueType::GlutamicAcid => 'E',
            ResidueType::Phenylalanine => 'F',
            ResidueType::Glycine => 'G',
            ResidueType::Histidine => 'H',
            ResidueType::Isoleucine => 'I',
            ResidueType::Lysine => 'K',
            ResidueType::Leucine => 'L',
            ResidueType::Methionine => 'M',
            ResidueType::Asparagine => 'N',
            ResidueType::Proline => 'P',
            ResidueType::Glutamine => 'Q',
            ResidueType::Arginine => 'R',
            ResidueType::Serine => 'S',
            ResidueType::Threonine => 'T',
            ResidueType::Valine => 'V',
            ResidueType::Tryptophan => 'W',
            ResidueType::Tyrosine => 'Y',
        }
    }

    /// Parses a whole residue sequence such as `"APRLRFY"`.
    pub fn parse_sequence(sequence: &str) -> Result<Vec<Self>, InvalidResidueError> {
        sequence.chars().map(Self::try_from).collect()
    }

    /// Parses a side-chain entry. An empty entry means "no side bead" and yields `None`.
    pub fn parse_optional(symbol: &str) -> Result<Option<Self>, InvalidResidueError> {
        if symbol.is_empty() {
            Ok(None)
        } else {
            symbol.parse().map(Some)
        }
    }
}

impl TryFrom<char> for ResidueType {
    type Error = InvalidResidueError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_symbol(c).ok_or_else(|| InvalidResidueError(c.to_string()))
    }
}

impl FromStr for ResidueType {
    type Err = InvalidResidueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::try_from(c),
            _ => Err(InvalidResidueError(s.to_string())),
        }
    }
}

impl fmt::Display for ResidueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
