//! Diagonal Pauli-Z operator algebra over the turn-qubit register.
//!
//! Every operator in the folding model is diagonal in the computational basis, so a term
//! is fully described by the set of positions that carry `Z`. [`pauli::ZString`] is that key and
//! [`operator::QubitOperator`] is the weighted sum of such terms.

pub mod operator;
pub mod pauli;
