use crate::cli::HamiltonianArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::parser;
use qfold::core::io::records::HamiltonianFile;
use qfold::core::io::traits::TextFile;
use qfold::engine::error::EngineError;
use qfold::core::operators::operator::QubitOperator;
use qfold::engine::problem::FoldingProblem;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub async fn run(args: HamiltonianArgs) -> Result<()> {
    let config = build_config(&args.config)?;
    let peptide = parser::parse_peptide(&args.peptide.sequence, args.peptide.side_chains.as_deref())
        .map_err(EngineError::from)?;
    let problem = FoldingProblem::from_config(peptide, &config)?;

    let operator = tokio::task::block_in_place(|| -> Result<_> {
        if args.full {
            Ok(problem.full_operator()?)
        } else {
            let reduced = problem.qubit_operator()?;
            info!(unused = ?reduced.unused, "Removed unused qubits.");
            Ok(reduced.operator)
        }
    })?;
    info!(
        num_qubits = operator.num_qubits(),
        terms = operator.len(),
        "Built qubit operator."
    );

    match &args.output {
        Some(path) => {
            write_operator(&operator, path)?;
            println!(
                "✓ Hamiltonian ({} qubits, {} terms) written to: {}",
                operator.num_qubits(),
                operator.len(),
                path.display()
            );
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            HamiltonianFile::write_to(&operator, &mut lock).map_err(EngineError::from)?;
            lock.flush()?;
        }
    }
    Ok(())
}

fn write_operator(operator: &QubitOperator, path: &Path) -> Result<()> {
    HamiltonianFile::write_to_path(operator, path).map_err(EngineError::from)?;
    Ok(())
}
