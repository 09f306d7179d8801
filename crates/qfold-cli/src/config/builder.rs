use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileInteractionConfig, FileSamplingConfig};
use crate::cli::ConfigArgs;
use crate::error::{CliError, Result};
use crate::utils::parser;
use qfold::core::interactions::mixed::DEFAULT_PRIMARY_RESIDUES;
use qfold::engine::config::{self as core_config, FoldingConfig, InteractionScheme};
use std::str::FromStr;
use tracing::debug;

/// Merges CLI flags over the config file over the built-in defaults.
pub fn build_config(args: &ConfigArgs) -> Result<FoldingConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let penalties_file = file_config.penalties.take().unwrap_or_default();
    let sampling_file = file_config.sampling.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();

    let interaction = resolve_interaction(
        args.interaction.as_deref(),
        file_config.interaction.take(),
        &defaults,
    )?;
    let schedule = resolve_schedule(args.betas.as_deref(), &sampling_file, &defaults)?;
    debug!(?interaction, entries = schedule.len(), "Resolved interaction and schedule.");

    core_config::FoldingConfigBuilder::new()
        .penalty_back(
            args.penalty_back
                .or(penalties_file.back)
                .unwrap_or(defaults.penalty_back),
        )
        .penalty_overlap(
            args.penalty_overlap
                .or(penalties_file.overlap)
                .unwrap_or(defaults.penalty_overlap),
        )
        .penalty_side_chain(
            args.penalty_side_chain
                .or(penalties_file.side_chain)
                .unwrap_or(defaults.penalty_side_chain),
        )
        .interaction(interaction)
        .parameter_schedule(schedule)
        .max_qubits(
            args.max_qubits
                .or(sampling_file.max_qubits)
                .unwrap_or(defaults.max_qubits),
        )
        .probability_threshold(
            sampling_file
                .probability_threshold
                .unwrap_or(defaults.probability_threshold),
        )
        .shots(args.shots.or(sampling_file.shots))
        .seed(args.seed.or(sampling_file.seed).unwrap_or(defaults.seed))
        .top_k(args.top_k.or(output_file.top_k).unwrap_or(defaults.top_k))
        .bond_length(
            args.bond_length
                .or(output_file.bond_length)
                .unwrap_or(defaults.bond_length),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn resolve_interaction(
    cli_arg: Option<&str>,
    file_val: Option<FileInteractionConfig>,
    defaults: &DefaultsConfig,
) -> Result<InteractionScheme> {
    if let Some(value) = cli_arg {
        return parser::parse_interaction(value).map_err(|e| CliError::Argument(e.to_string()));
    }
    let scheme = match file_val {
        Some(FileInteractionConfig::MiyazawaJernigan) => InteractionScheme::MiyazawaJernigan,
        Some(FileInteractionConfig::Random { seed }) => InteractionScheme::Random { seed },
        Some(FileInteractionConfig::Mixed {
            seed,
            primary_residues,
        }) => InteractionScheme::Mixed {
            seed,
            primary_residues: parser::parse_residue_list(
                primary_residues.as_deref().unwrap_or(DEFAULT_PRIMARY_RESIDUES),
            )
            .map_err(|e| CliError::Config(e.to_string()))?,
        },
        Some(FileInteractionConfig::Custom { path }) => {
            if !path.exists() {
                return Err(CliError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Provided path does not exist: {}", path.display()),
                )));
            }
            InteractionScheme::Custom { path }
        }
        None => parser::parse_interaction(&defaults.interaction)
            .map_err(|e| CliError::Config(e.to_string()))?,
    };
    Ok(scheme)
}

fn resolve_schedule(
    cli_betas: Option<&[f64]>,
    file_val: &FileSamplingConfig,
    defaults: &DefaultsConfig,
) -> Result<Vec<Vec<f64>>> {
    let betas_to_schedule =
        |betas: &[f64]| -> Vec<Vec<f64>> { betas.iter().map(|&b| vec![b]).collect() };

    if let Some(betas) = cli_betas {
        return Ok(betas_to_schedule(betas));
    }
    match (&file_val.betas, &file_val.parameter_schedule) {
        (Some(_), Some(_)) => Err(CliError::Config(
            "`sampling.betas` and `sampling.parameter-schedule` are mutually exclusive."
                .to_string(),
        )),
        (Some(betas), None) => Ok(betas_to_schedule(betas)),
        (None, Some(schedule)) => Ok(schedule.clone()),
        (None, None) => Ok(betas_to_schedule(&defaults.betas)),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "penalties.back" => {
                config.penalties.get_or_insert_with(Default::default).back =
                    Some(parse_value(key, value_str, "float")?);
            }
            "penalties.overlap" => {
                config.penalties.get_or_insert_with(Default::default).overlap =
                    Some(parse_value(key, value_str, "float")?);
            }
            "penalties.side-chain" => {
                config
                    .penalties
                    .get_or_insert_with(Default::default)
                    .side_chain = Some(parse_value(key, value_str, "float")?);
            }
            "sampling.betas" => {
                let betas = value_str
                    .split(',')
                    .map(|b| parse_value(key, b, "float"))
                    .collect::<Result<Vec<f64>>>()?;
                let sampling = config.sampling.get_or_insert_with(Default::default);
                sampling.betas = Some(betas);
                sampling.parameter_schedule = None;
            }
            "sampling.max-qubits" => {
                config
                    .sampling
                    .get_or_insert_with(Default::default)
                    .max_qubits = Some(parse_value(key, value_str, "integer")?);
            }
            "sampling.probability-threshold" => {
                config
                    .sampling
                    .get_or_insert_with(Default::default)
                    .probability_threshold = Some(parse_value(key, value_str, "float")?);
            }
            "sampling.shots" => {
                config.sampling.get_or_insert_with(Default::default).shots =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "sampling.seed" => {
                config.sampling.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "output.top-k" => {
                config.output.get_or_insert_with(Default::default).top_k =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "output.bond-length" => {
                config
                    .output
                    .get_or_insert_with(Default::default)
                    .bond_length = Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use qfold::engine::config::PenaltyParameters;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn write_config(dir: &std::path::Path, content: &str) -> PathBuf {
        let path = dir.join("qfold.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_fill_every_field() {
        let config = build_config(&ConfigArgs::default()).unwrap();
        let defaults = DefaultsConfig::default();

        assert_eq!(config.penalties, PenaltyParameters::default());
        assert_eq!(config.interaction, InteractionScheme::MiyazawaJernigan);
        assert_eq!(config.sampling.parameter_schedule.len(), defaults.betas.len());
        assert_eq!(config.sampling.parameter_schedule[0], vec![defaults.betas[0]]);
        assert_eq!(config.sampling.max_qubits, defaults.max_qubits);
        assert_eq!(config.sampling.shots, None);
        assert_eq!(config.top_k, defaults.top_k);
        assert_eq!(config.bond_length, defaults.bond_length);
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [penalties]
            overlap = 25.0

            [interaction]
            type = "random"
            seed = 9

            [sampling]
            parameter-schedule = [[0.5], [2.0]]
            seed = 4
            "#,
        );
        let args = ConfigArgs {
            config: Some(path),
            ..Default::default()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.penalties, PenaltyParameters::new(10.0, 25.0, 10.0));
        assert_eq!(config.interaction, InteractionScheme::Random { seed: 9 });
        assert_eq!(config.sampling.parameter_schedule, vec![vec![0.5], vec![2.0]]);
        assert_eq!(config.sampling.seed, 4);
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[penalties]\nback = 3.0\n\n[output]\ntop-k = 8\n",
        );
        let cli = Cli::parse_from([
            "qfold",
            "fold",
            "-s",
            "APRLRFY",
            "-o",
            "out",
            "-c",
            path.to_str().unwrap(),
            "--penalty-back",
            "12.5",
            "--betas",
            "0.1,1,3",
            "-e",
            "random@5",
            "-k",
            "2",
        ]);
        let Commands::Fold(fold_args) = cli.command else {
            panic!("Expected 'fold' subcommand");
        };

        let config = build_config(&fold_args.config).unwrap();
        assert_eq!(config.penalties.back, 12.5);
        assert_eq!(config.top_k, 2);
        assert_eq!(config.interaction, InteractionScheme::Random { seed: 5 });
        assert_eq!(
            config.sampling.parameter_schedule,
            vec![vec![0.1], vec![1.0], vec![3.0]]
        );
    }

    #[test]
    fn set_values_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[sampling]\nparameter-schedule = [[1.0]]\nshots = 100\n",
        );
        let args = ConfigArgs {
            config: Some(path),
            set_values: vec![
                "sampling.betas=0.2,0.4".to_string(),
                "penalties.side-chain=30".to_string(),
                "output.bond-length=3.8".to_string(),
            ],
            ..Default::default()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.sampling.parameter_schedule, vec![vec![0.2], vec![0.4]]);
        assert_eq!(config.sampling.shots, Some(100));
        assert_eq!(config.penalties.side_chain, 30.0);
        assert_eq!(config.bond_length, 3.8);
    }

    #[test]
    fn invalid_settings_are_reported() {
        let unsupported = ConfigArgs {
            set_values: vec!["sampling.temperature=1".to_string()],
            ..Default::default()
        };
        assert!(matches!(build_config(&unsupported), Err(CliError::Config(_))));

        let malformed = ConfigArgs {
            set_values: vec!["penalties.back".to_string()],
            ..Default::default()
        };
        assert!(matches!(build_config(&malformed), Err(CliError::Config(_))));

        let negative = ConfigArgs {
            penalty_overlap: Some(-1.0),
            ..Default::default()
        };
        match build_config(&negative) {
            Err(CliError::Config(msg)) => assert!(msg.contains("penalty_overlap")),
            other => panic!("unexpected result {:?}", other),
        }

        let bad_scheme = ConfigArgs {
            interaction: Some("gaussian".to_string()),
            ..Default::default()
        };
        assert!(matches!(build_config(&bad_scheme), Err(CliError::Argument(_))));
    }

    #[test]
    fn conflicting_schedules_in_file_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[sampling]\nbetas = [1.0]\nparameter-schedule = [[1.0]]\n",
        );
        let args = ConfigArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn missing_custom_table_is_an_io_error() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "[interaction]\ntype = \"custom\"\npath = \"none.csv\"\n");
        let args = ConfigArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Io(_))));
    }
}
