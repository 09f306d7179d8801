use crate::core::operators::operator::{OperatorError, QubitOperator};
use tracing::debug;

/// Positions that carry `Z` in no term of `op`, in ascending order.
pub fn find_unused(op: &QubitOperator) -> Vec<usize> {
    let support = op.support();
    (0..op.num_qubits())
        .filter(|&p| !support.contains(p))
        .collect()
}

/// Deletes `unused` positions from the register, shifting higher positions down.
///
/// Coefficients are carried over unchanged; terms that collide after the shift are
/// summed and the result is simplified again.
pub fn compress(op: &QubitOperator, unused: &[usize]) -> Result<QubitOperator, OperatorError> {
    let mut removed = unused.to_vec();
    removed.sort_unstable();
    removed.dedup();
    if let Some(&position) = removed.last().filter(|&&p| p >= op.num_qubits()) {
        return Err(OperatorError::PositionOutOfRange {
            position,
            num_qubits: op.num_qubits(),
        });
    }

    let width = op.num_qubits() - removed.len();
    Ok(op
        .map_terms(width, |z, coeff| (z.remove_positions(&removed), coeff))
        .simplify())
}

/// Reinserts identity at the `unused` positions so the operator spans `num_qubits` again.
pub fn expand(
    op: &QubitOperator,
    unused: &[usize],
    num_qubits: usize,
) -> Result<QubitOperator, OperatorError> {
    let mut inserted = unused.to_vec();
    inserted.sort_unstable();
    inserted.dedup();
    if let Some(&position) = inserted.last().filter(|&&p| p >= num_qubits) {
        return Err(OperatorError::PositionOutOfRange {
            position,
            num_qubits,
        });
    }
    QubitOperator::from_terms(
        num_qubits,
        op.terms()
            .map(|(z, coeff)| (z.insert_positions(&inserted), coeff)),
    )
}

/// Drops every identity-only position. Returns the compressed operator and the
/// removed positions of the original register.
pub fn remove_unused_qubits(op: &QubitOperator) -> Result<(QubitOperator, Vec<usize>), OperatorError> {
    let unused = find_unused(op);
    let compressed = compress(op, &unused)?;
    debug!(
        original = op.num_qubits(),
        compressed = compressed.num_qubits(),
        "Removed unused qubits."
    );
    Ok((compressed, unused))
}
