pub mod batch;
pub mod decode;
pub mod fold;
pub mod hamiltonian;
