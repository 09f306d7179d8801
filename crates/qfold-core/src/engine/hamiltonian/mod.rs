//! Assembly of the folding Hamiltonian.
//!
//! Every term is built from turn indicators: operators that equal 1 exactly when a bead's
//! two turn qubits encode a given direction. Chaining them along the main chain gives
//! indicators for the displacement between any two main beads, and combining those with
//! side-bead turn indicators gives indicators for any pair of beads being neighbours or
//! sharing a site. Pair energies and penalties weight those indicators.

pub mod builder;
pub mod contacts;
pub mod displacement;
pub mod indicators;
pub mod penalties;
