//! Register bookkeeping between the full turn-qubit layout and the compact register handed
//! to an oracle: symmetry-breaking fixing of the leading turns, followed by removal of
//! every position that no longer appears in the Hamiltonian.

pub mod fixing;
pub mod reducer;
