use crate::core::interactions::miyazawa_jernigan::MiyazawaJernigan;
use crate::core::interactions::mixed::MixedInteraction;
use crate::core::interactions::random::RandomInteraction;
use crate::core::interactions::{EnergyMatrix, Interaction, InteractionError};
use crate::core::models::residue::ResidueType;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PENALTY: f64 = 10.0;
pub const DEFAULT_MAX_QUBITS: usize = 24;
pub const DEFAULT_PROBABILITY_THRESHOLD: f64 = 1e-8;
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_BOND_LENGTH: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// Strengths of the three constraint penalties in the folding Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenaltyParameters {
    /// Consecutive main-chain turns that walk straight back.
    pub back: f64,
    /// Two main beads on the same lattice site.
    pub overlap: f64,
    /// A side bead sharing a lattice site with any other bead.
    pub side_chain: f64,
}

impl PenaltyParameters {
    pub fn new(back: f64, overlap: f64, side_chain: f64) -> Self {
        Self {
            back,
            overlap,
            side_chain,
        }
    }
}

impl Default for PenaltyParameters {
    fn default() -> Self {
        Self::new(DEFAULT_PENALTY, DEFAULT_PENALTY, DEFAULT_PENALTY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionScheme {
    MiyazawaJernigan,
    Random {
        seed: u64,
    },
    /// Miyazawa-Jernigan for pairs within `primary_residues`, seeded random otherwise.
    Mixed {
        seed: u64,
        primary_residues: Vec<ResidueType>,
    },
    /// A contact table loaded from CSV.
    Custom {
        path: PathBuf,
    },
}

impl InteractionScheme {
    pub fn build(&self) -> Result<Box<dyn Interaction>, InteractionError> {
        Ok(match self {
            InteractionScheme::MiyazawaJernigan => Box::new(MiyazawaJernigan::new()),
            InteractionScheme::Random { seed } => Box::new(RandomInteraction::new(*seed)),
            InteractionScheme::Mixed {
                seed,
                primary_residues,
            } => Box::new(MixedInteraction::new(
                Box::new(MiyazawaJernigan::new()),
                Box::new(RandomInteraction::new(*seed)),
                primary_residues.iter().copied(),
            )),
            InteractionScheme::Custom { path } => Box::new(EnergyMatrix::load_csv(path)?),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SamplingConfig {
    /// Parameter vectors handed to the oracle, one energy estimate per entry.
    pub parameter_schedule: Vec<Vec<f64>>,
    pub max_qubits: usize,
    pub probability_threshold: f64,
    /// Draw this many shots instead of returning exact probabilities.
    pub shots: Option<usize>,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FoldingConfig {
    pub penalties: PenaltyParameters,
    pub interaction: InteractionScheme,
    pub sampling: SamplingConfig,
    pub top_k: usize,
    pub bond_length: f64,
}

#[derive(Default)]
pub struct FoldingConfigBuilder {
    penalty_back: Option<f64>,
    penalty_overlap: Option<f64>,
    penalty_side_chain: Option<f64>,
    interaction: Option<InteractionScheme>,
    parameter_schedule: Option<Vec<Vec<f64>>>,
    max_qubits: Option<usize>,
    probability_threshold: Option<f64>,
    shots: Option<usize>,
    seed: Option<u64>,
    top_k: Option<usize>,
    bond_length: Option<f64>,
}

impl FoldingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn penalty_back(mut self, value: f64) -> Self {
        self.penalty_back = Some(value);
        self
    }
    pub fn penalty_overlap(mut self, value: f64) -> Self {
        self.penalty_overlap = Some(value);
        self
    }
    pub fn penalty_side_chain(mut self, value: f64) -> Self {
        self.penalty_side_chain = Some(value);
        self
    }
    pub fn penalties(self, penalties: PenaltyParameters) -> Self {
        self.penalty_back(penalties.back)
            .penalty_overlap(penalties.overlap)
            .penalty_side_chain(penalties.side_chain)
    }
    pub fn interaction(mut self, scheme: InteractionScheme) -> Self {
        self.interaction = Some(scheme);
        self
    }
    pub fn parameter_schedule(mut self, schedule: Vec<Vec<f64>>) -> Self {
        self.parameter_schedule = Some(schedule);
        self
    }
    pub fn max_qubits(mut self, n: usize) -> Self {
        self.max_qubits = Some(n);
        self
    }
    pub fn probability_threshold(mut self, threshold: f64) -> Self {
        self.probability_threshold = Some(threshold);
        self
    }
    pub fn shots(mut self, shots: Option<usize>) -> Self {
        self.shots = shots;
        self
    }
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }
    pub fn bond_length(mut self, length: f64) -> Self {
        self.bond_length = Some(length);
        self
    }

    pub fn build(self) -> Result<FoldingConfig, ConfigError> {
        let penalties = PenaltyParameters {
            back: non_negative(
                "penalty_back",
                self.penalty_back
                    .ok_or(ConfigError::MissingParameter("penalty_back"))?,
            )?,
            overlap: non_negative(
                "penalty_overlap",
                self.penalty_overlap
                    .ok_or(ConfigError::MissingParameter("penalty_overlap"))?,
            )?,
            side_chain: non_negative(
                "penalty_side_chain",
                self.penalty_side_chain
                    .ok_or(ConfigError::MissingParameter("penalty_side_chain"))?,
            )?,
        };

        let parameter_schedule = self
            .parameter_schedule
            .ok_or(ConfigError::MissingParameter("parameter_schedule"))?;
        if parameter_schedule.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "parameter_schedule",
                reason: "at least one parameter vector is required".to_string(),
            });
        }

        let probability_threshold = self
            .probability_threshold
            .unwrap_or(DEFAULT_PROBABILITY_THRESHOLD);
        if !(0.0..1.0).contains(&probability_threshold) {
            return Err(ConfigError::InvalidParameter {
                name: "probability_threshold",
                reason: format!("{} is outside [0, 1)", probability_threshold),
            });
        }

        if self.shots == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "shots",
                reason: "must be positive when set".to_string(),
            });
        }

        let bond_length = self.bond_length.unwrap_or(DEFAULT_BOND_LENGTH);
        if !(bond_length.is_finite() && bond_length > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "bond_length",
                reason: format!("{} is not a positive length", bond_length),
            });
        }

        Ok(FoldingConfig {
            penalties,
            interaction: self
                .interaction
                .ok_or(ConfigError::MissingParameter("interaction"))?,
            sampling: SamplingConfig {
                parameter_schedule,
                max_qubits: self.max_qubits.unwrap_or(DEFAULT_MAX_QUBITS),
                probability_threshold,
                shots: self.shots,
                seed: self.seed.unwrap_or(0),
            },
            top_k: self.top_k.unwrap_or(DEFAULT_TOP_K),
            bond_length,
        })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            reason: format!("{} must be a finite, non-negative number", value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_builder() -> FoldingConfigBuilder {
        FoldingConfigBuilder::new()
            .penalties(PenaltyParameters::default())
            .interaction(InteractionScheme::MiyazawaJernigan)
            .parameter_schedule(vec![vec![0.5], vec![1.0]])
    }

    #[test]
    fn build_fills_optional_fields_with_defaults() {
        let config = complete_builder().build().unwrap();
        assert_eq!(config.penalties, PenaltyParameters::new(10.0, 10.0, 10.0));
        assert_eq!(config.sampling.max_qubits, DEFAULT_MAX_QUBITS);
        assert_eq!(config.sampling.shots, None);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.bond_length, DEFAULT_BOND_LENGTH);
    }

    #[test]
    fn build_reports_missing_parameters() {
        let err = FoldingConfigBuilder::new()
            .interaction(InteractionScheme::MiyazawaJernigan)
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("penalty_back"));

        let err = FoldingConfigBuilder::new()
            .penalties(PenaltyParameters::default())
            .parameter_schedule(vec![vec![1.0]])
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingParameter("interaction"));
    }

    #[test]
    fn build_rejects_invalid_values() {
        let err = complete_builder().penalty_overlap(-1.0).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "penalty_overlap",
                ..
            }
        ));
        let err = complete_builder().parameter_schedule(vec![]).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
        let err = complete_builder().bond_length(0.0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { .. }));
        let err = complete_builder().shots(Some(0)).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParameter { name: "shots", .. }));
    }

    #[test]
    fn interaction_schemes_build_tables() {
        let mj = InteractionScheme::MiyazawaJernigan.build().unwrap();
        assert_eq!(mj.name(), "miyazawa-jernigan");
        let mixed = InteractionScheme::Mixed {
            seed: 1,
            primary_residues: vec![ResidueType::Leucine],
        }
        .build()
        .unwrap();
        assert_eq!(
            mixed.energy(ResidueType::Leucine, ResidueType::Leucine),
            mj.energy(ResidueType::Leucine, ResidueType::Leucine)
        );
        let missing = InteractionScheme::Custom {
            path: PathBuf::from("/nonexistent/table.csv"),
        };
        assert!(missing.build().is_err());
    }
}
