use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePenaltiesConfig {
    pub back: Option<f64>,
    pub overlap: Option<f64>,
    pub side_chain: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", tag = "type")]
pub enum FileInteractionConfig {
    MiyazawaJernigan,
    Random {
        seed: u64,
    },
    Mixed {
        seed: u64,
        #[serde(rename = "primary-residues")]
        primary_residues: Option<String>,
    },
    Custom {
        path: PathBuf,
    },
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSamplingConfig {
    /// Inverse temperatures, one single-parameter schedule entry each.
    pub betas: Option<Vec<f64>>,
    /// Raw parameter vectors for oracles that take more than one parameter.
    pub parameter_schedule: Option<Vec<Vec<f64>>>,
    pub max_qubits: Option<usize>,
    pub probability_threshold: Option<f64>,
    pub shots: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub top_k: Option<usize>,
    pub bond_length: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub penalties: Option<FilePenaltiesConfig>,
    pub interaction: Option<FileInteractionConfig>,
    pub sampling: Option<FileSamplingConfig>,
    pub output: Option<FileOutputConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut config: FileConfig =
            toml::from_str(&content).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        // Custom tables are resolved against the directory holding the config file.
        if let Some(FileInteractionConfig::Custom { path: table }) = config.interaction.as_mut() {
            if table.is_relative() {
                if let Some(dir) = path.parent() {
                    *table = dir.join(&*table);
                }
            }
        }
        Ok(config)
    }
}
