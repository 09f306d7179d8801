use crate::cli::FoldArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::parser;
use crate::utils::progress::CliProgressHandler;
use qfold::engine::error::EngineError;
use qfold::engine::exhaustive::ExhaustiveOracle;
use qfold::engine::progress::ProgressReporter;
use qfold::engine::result::FoldingResult;
use qfold::workflows;
use tracing::{info, warn};

pub async fn run(args: FoldArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let config = build_config(&args.config)?;

    let peptide = parser::parse_peptide(&args.peptide.sequence, args.peptide.side_chains.as_deref())
        .map_err(EngineError::from)?;
    let id = args.id.clone().unwrap_or_else(|| peptide.main_sequence());
    let oracle = ExhaustiveOracle::from_config(&config.sampling);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Folding {} ({} main beads)...", id, peptide.len());
    info!("Invoking the core fold workflow...");

    let outcome =
        tokio::task::block_in_place(|| workflows::fold::run(peptide, &config, &oracle, &reporter))?;

    if !outcome.best.energy.is_valid() {
        warn!(energy = %outcome.best.energy, "Most probable conformation violates a constraint.");
        println!("Warning: the most probable conformation is not self-avoiding.");
    }

    let paths = workflows::fold::write_outputs(&outcome, &id, &args.output, args.replace)?;

    println!(
        "Compressed register: {} of {} qubits, {} history entries.",
        outcome.reduced.num_qubits(),
        outcome.reduced.full_width,
        outcome.history.len()
    );
    print_result("Best", &outcome.best);
    println!("✓ Structure written to: {}", paths.structure.display());
    for (i, (result, path)) in outcome.top.iter().zip(&paths.top_structures).enumerate() {
        println!(
            "  Top {} (Energy: {:.4}, p = {:.4}) written to: {}",
            i + 1,
            result.energy.total(),
            result.probability,
            path.display()
        );
    }
    println!("  Energy log: {}", paths.energy_log.display());
    println!("  Probability distribution: {}", paths.distribution.display());

    Ok(())
}

pub(crate) fn print_result(label: &str, result: &FoldingResult) {
    let main_turns: String = result
        .main_turns()
        .iter()
        .map(|t| t.to_string())
        .collect();
    let side_turns: String = result
        .side_turns()
        .iter()
        .map(|t| t.map_or_else(|| "_".to_string(), |s| s.to_string()))
        .collect();
    println!(
        "{}: bitstring {} (p = {:.4}), binary vector {}",
        label, result.bitstring, result.probability, result.binary_vector
    );
    println!("  Main turns: {}", main_turns);
    if result.peptide.num_side_beads() > 0 {
        println!("  Side turns: {}", side_turns);
    }
    println!("  Energy: {}", result.energy);
}
