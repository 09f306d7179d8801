use super::fold::print_result;
use crate::cli::DecodeArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::utils::parser;
use qfold::core::io::xyz::{CA_BOND_LENGTH, XyzFile};
use qfold::engine::error::EngineError;
use qfold::engine::problem::FoldingProblem;
use tracing::info;

pub async fn run(args: DecodeArgs) -> Result<()> {
    let config = build_config(&args.config)?;
    let peptide = parser::parse_peptide(&args.peptide.sequence, args.peptide.side_chains.as_deref())
        .map_err(EngineError::from)?;
    let problem = FoldingProblem::from_config(peptide, &config)?;

    let reduced = tokio::task::block_in_place(|| problem.qubit_operator())?;
    info!(
        reduced_width = reduced.num_qubits(),
        "Decoding against the compressed register."
    );
    let result = problem
        .decode_bitstring(&reduced, args.bitstring.trim(), 1.0)
        .map_err(EngineError::from)?;
    print_result("Decoded", &result);

    if let Some(path) = &args.output {
        let comment = format!(
            "{} {} E={:.4}",
            result.peptide.main_sequence(),
            result.bitstring,
            result.energy.total()
        );
        let mut structure = result.to_xyz(&comment);
        if args.rescale {
            structure = structure
                .rescaled(result.peptide.len(), CA_BOND_LENGTH)
                .map_err(EngineError::from)?;
        }
        XyzFile::save(&structure, path, args.replace).map_err(EngineError::from)?;
        println!("✓ Structure written to: {}", path.display());
    }
    Ok(())
}
