use super::config::ConfigError;
use super::decoder::DecodeError;
use super::oracle::OracleError;
use crate::core::interactions::InteractionError;
use crate::core::io::records::RecordError;
use crate::core::io::xyz::XyzError;
use crate::core::models::peptide::PeptideError;
use crate::core::operators::operator::OperatorError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid peptide: {0}")]
    Peptide(#[from] PeptideError),

    #[error("Operator construction failed: {0}")]
    Operator(#[from] OperatorError),

    #[error("Interaction table error: {0}")]
    Interaction(#[from] InteractionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("Shape file error: {0}")]
    Xyz(#[from] XyzError),

    #[error("Record file error: {0}")]
    Record(#[from] RecordError),

    #[error("I/O error for '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid batch input '{path}': {reason}", path = path.display())]
    BatchInput { path: PathBuf, reason: String },

    #[error("Folding phase '{phase}' failed: {reason}")]
    PhaseFailed { phase: &'static str, reason: String },
}
