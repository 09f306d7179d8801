use crate::core::io::records::{EnergyLogFile, ProbabilityFile};
use crate::core::io::traits::TextFile;
use crate::core::models::distribution::ProbabilityDistribution;
use crate::core::models::peptide::Peptide;
use crate::engine::config::FoldingConfig;
use crate::engine::error::EngineError;
use crate::engine::oracle::{EnergyHistory, Oracle, OracleError, estimate_with_history};
use crate::engine::problem::{FoldingProblem, ReducedHamiltonian};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::result::FoldingResult;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone)]
pub struct FoldOutcome {
    pub reduced: ReducedHamiltonian,
    pub history: EnergyHistory,
    /// Distribution sampled at the lowest-energy parameters.
    pub distribution: ProbabilityDistribution,
    pub best: FoldingResult,
    /// Structures for the lowest-energy history entries, lowest first.
    pub top: Vec<FoldingResult>,
}

/// Files written by [`write_outputs`].
#[derive(Debug, Clone, PartialEq)]
pub struct OutputPaths {
    pub root: PathBuf,
    pub energy_log: PathBuf,
    pub distribution: PathBuf,
    pub structure: PathBuf,
    pub top_structures: Vec<PathBuf>,
}

#[instrument(skip_all, name = "fold_workflow", fields(sequence = %peptide.main_sequence()))]
pub fn run(
    peptide: Peptide,
    config: &FoldingConfig,
    oracle: &dyn Oracle,
    reporter: &ProgressReporter,
) -> Result<FoldOutcome, EngineError> {
    // === Phase 0: Preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    info!(oracle = oracle.name(), "Building the folding Hamiltonian.");
    let problem = FoldingProblem::from_config(peptide, config)?;
    let reduced = problem.qubit_operator()?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Parameter schedule ===
    let history = evaluate_schedule(&reduced, config, oracle, reporter)?;
    let best_entry = history.best().ok_or(EngineError::PhaseFailed {
        phase: "Parameter Schedule",
        reason: "no energy estimates were recorded".to_string(),
    })?;
    info!(
        iteration = best_entry.iteration,
        energy = best_entry.energy,
        "Selected lowest-energy parameters."
    );

    // === Phase 2: Interpretation of the best state ===
    reporter.report(Progress::PhaseStart {
        name: "Interpretation",
    });
    let distribution = oracle.sample(&reduced.operator, &best_entry.params)?;
    let best = problem.interpret(&reduced, &distribution)?;
    info!(
        bitstring = %best.bitstring,
        probability = best.probability,
        energy = best.energy.total(),
        "Decoded most probable conformation."
    );
    reporter.report(Progress::Message(format!(
        "Best bitstring {} (p = {:.4}, E = {:.4})",
        best.bitstring,
        best.probability,
        best.energy.total()
    )));
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Top-K structures ===
    let top = interpret_top_k(&problem, &reduced, &history, config.top_k, oracle, reporter);

    info!(
        "Workflow complete. Returning {} top structure(s).",
        top.len()
    );
    Ok(FoldOutcome {
        reduced,
        history,
        distribution,
        best,
        top,
    })
}

fn evaluate_schedule(
    reduced: &ReducedHamiltonian,
    config: &FoldingConfig,
    oracle: &dyn Oracle,
    reporter: &ProgressReporter,
) -> Result<EnergyHistory, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Parameter Schedule",
    });
    let schedule = &config.sampling.parameter_schedule;
    let expected = oracle.num_parameters(reduced.num_qubits());
    reporter.report(Progress::TaskStart {
        total_steps: schedule.len() as u64,
    });

    let mut history = EnergyHistory::new();
    for params in schedule {
        if params.len() != expected {
            return Err(OracleError::InvalidParameters {
                expected,
                actual: params.len(),
            }
            .into());
        }
        let (energy, next) = estimate_with_history(oracle, &reduced.operator, params, history)?;
        history = next;
        debug!(iteration = history.len() - 1, energy, "Estimated energy.");
        reporter.report(Progress::StatusUpdate {
            text: format!("E = {:.4}", energy),
        });
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    Ok(history)
}

fn interpret_top_k(
    problem: &FoldingProblem,
    reduced: &ReducedHamiltonian,
    history: &EnergyHistory,
    k: usize,
    oracle: &dyn Oracle,
    reporter: &ProgressReporter,
) -> Vec<FoldingResult> {
    reporter.report(Progress::PhaseStart {
        name: "Top-K Structures",
    });
    let entries = history.top_k(k);
    reporter.report(Progress::TaskStart {
        total_steps: entries.len() as u64,
    });

    let mut results = Vec::with_capacity(entries.len());
    for entry in entries {
        let outcome = oracle
            .sample(&reduced.operator, &entry.params)
            .map_err(EngineError::from)
            .and_then(|dist| Ok(problem.interpret(reduced, &dist)?));
        match outcome {
            Ok(result) => results.push(result),
            Err(e) => warn!(
                iteration = entry.iteration,
                error = %e,
                "Skipping top-K entry that could not be interpreted."
            ),
        }
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    results
}

/// Writes the per-protein output tree under `<output_dir>/<id>`.
///
/// The energy log and probability distribution are always rewritten; structure files
/// honour `replace`.
pub fn write_outputs(
    outcome: &FoldOutcome,
    id: &str,
    output_dir: &Path,
    replace: bool,
) -> Result<OutputPaths, EngineError> {
    let root = output_dir.join(id);
    let energy_dir = root.join("System_Energy");
    let distribution_dir = root.join("Prob_distribution");
    for dir in [&energy_dir, &distribution_dir] {
        std::fs::create_dir_all(dir).map_err(|source| EngineError::Io {
            path: dir.clone(),
            source,
        })?;
    }

    let energy_log = energy_dir.join(format!("energy_list_{}.txt", id));
    EnergyLogFile::write_to_path(&outcome.history.energies(), &energy_log)?;

    let distribution = distribution_dir.join("prob_distribution.txt");
    ProbabilityFile::write_to_path(&outcome.distribution, &distribution)?;

    let structure = outcome.best.save_xyz_file(
        id,
        &root,
        &structure_comment(id, &outcome.best),
        replace,
    )?;

    let top_structures = outcome
        .top
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let name = format!("{}_top_{}", id, i + 1);
            result.save_xyz_file(&name, &root, &structure_comment(&name, result), replace)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(path = %root.display(), "Wrote fold outputs.");
    Ok(OutputPaths {
        root,
        energy_log,
        distribution,
        structure,
        top_structures,
    })
}

fn structure_comment(name: &str, result: &FoldingResult) -> String {
    format!(
        "{} {} E={:.4} p={:.6}",
        name,
        result.peptide.main_sequence(),
        result.energy.total(),
        result.probability
    )
}
