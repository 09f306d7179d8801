use qfold::core::interactions::mixed::DEFAULT_PRIMARY_RESIDUES;
use qfold::core::models::peptide::{Peptide, PeptideError};
use qfold::core::models::residue::ResidueType;
use qfold::engine::config::InteractionScheme;
use qfold::workflows::batch::parse_side_chain_pattern;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error(
        "Unknown interaction scheme '{0}'. Expected 'miyazawa-jernigan', 'random@SEED', 'mixed@SEED[:RESIDUES]', or a path."
    )]
    UnknownScheme(String),

    #[error("Invalid seed '{seed}' in interaction scheme '{name}'.")]
    InvalidSeed { name: String, seed: String },

    #[error("Invalid residue list '{0}'.")]
    InvalidResidues(String),

    #[error("Component '{component}' cannot be empty in interaction scheme '{name}'.")]
    EmptyComponent {
        component: &'static str,
        name: String,
    },
}

fn looks_like_path(value: &str) -> bool {
    Path::new(value).is_absolute() || value.contains(['/', '\\']) || value.ends_with(".csv")
}

fn parse_seed(name: &str, seed: &str) -> Result<u64, ParseError> {
    if seed.is_empty() {
        return Err(ParseError::EmptyComponent {
            component: "seed",
            name: name.to_string(),
        });
    }
    seed.parse().map_err(|_| ParseError::InvalidSeed {
        name: name.to_string(),
        seed: seed.to_string(),
    })
}

pub fn parse_residue_list(residues: &str) -> Result<Vec<ResidueType>, ParseError> {
    ResidueType::parse_sequence(residues.trim())
        .map_err(|_| ParseError::InvalidResidues(residues.to_string()))
}

/// Builds a peptide from `--sequence` and an optional `--side-chains` pattern.
pub fn parse_peptide(sequence: &str, side_chains: Option<&str>) -> Result<Peptide, PeptideError> {
    let sequence = sequence.trim();
    let side_chains = parse_side_chain_pattern(side_chains.unwrap_or(""), sequence.chars().count());
    Peptide::new(sequence, &side_chains)
}

/// Parses the `--interaction` value.
///
/// Anything that looks like a file path selects a custom CSV table; otherwise the value is
/// a logical name of the form `scheme[@seed[:residues]]`.
pub fn parse_interaction(value: &str) -> Result<InteractionScheme, ParseError> {
    let value = value.trim();
    if looks_like_path(value) {
        return Ok(InteractionScheme::Custom {
            path: PathBuf::from(value),
        });
    }

    let (scheme, rest) = value.split_once('@').unwrap_or((value, ""));
    match scheme {
        "miyazawa-jernigan" | "mj" if rest.is_empty() => Ok(InteractionScheme::MiyazawaJernigan),
        "random" => Ok(InteractionScheme::Random {
            seed: parse_seed(value, rest)?,
        }),
        "mixed" => {
            let (seed, residues) = rest.split_once(':').unwrap_or((rest, DEFAULT_PRIMARY_RESIDUES));
            Ok(InteractionScheme::Mixed {
                seed: parse_seed(value, seed)?,
                primary_residues: parse_residue_list(residues)?,
            })
        }
        _ => Err(ParseError::UnknownScheme(value.to_string())),
    }
}
