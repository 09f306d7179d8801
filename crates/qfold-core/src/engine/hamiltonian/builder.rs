use super::contacts::pair_terms;
use super::displacement::Displacements;
use super::indicators::TurnIndicators;
use super::penalties::back_turn_penalty;
use crate::core::interactions::Interaction;
use crate::core::models::peptide::Peptide;
use crate::core::operators::operator::{OperatorError, QubitOperator};
use crate::engine::config::PenaltyParameters;
use crate::engine::qubits::fixing::{FixedQubits, fix_qubits};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Assembles the folding Hamiltonian over the full turn register.
///
/// Turn indicators are built with `fixed` already substituted, and the total is fixed
/// once more so that no fixed position survives in any term. The result is simplified.
///
/// Pair terms are grouped by the main bead their first bead hangs off. The groups may be
/// built in parallel but are always summed in chain order, so the operator does not
/// depend on the number of threads.
#[instrument(skip_all, name = "hamiltonian_builder", fields(beads = peptide.len()))]
pub fn run(
    peptide: &Peptide,
    interaction: &dyn Interaction,
    penalties: &PenaltyParameters,
    fixed: &FixedQubits,
) -> Result<QubitOperator, OperatorError> {
    let indicators = TurnIndicators::new(peptide, fixed)?;
    let length = peptide.len();

    let group = |start: usize| -> QubitOperator {
        let displacements = Displacements::from_start(start, length, &indicators);
        pair_terms(
            start,
            peptide,
            &displacements,
            &indicators,
            interaction,
            penalties,
        )
    };

    #[cfg(not(feature = "parallel"))]
    let groups: Vec<QubitOperator> = (0..length).map(group).collect();

    #[cfg(feature = "parallel")]
    let groups: Vec<QubitOperator> = (0..length).into_par_iter().map(group).collect();

    let mut hamiltonian = back_turn_penalty(length, &indicators, penalties.back);
    for (start, terms) in groups.into_iter().enumerate() {
        debug!(start, terms = terms.len(), "Collected pair terms.");
        hamiltonian += terms;
    }

    let hamiltonian = fix_qubits(&hamiltonian, fixed).simplify();
    info!(
        num_qubits = hamiltonian.num_qubits(),
        terms = hamiltonian.len(),
        "Built folding Hamiltonian."
    );
    Ok(hamiltonian)
}
