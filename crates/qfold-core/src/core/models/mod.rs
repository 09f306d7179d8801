//! # Core Models Module
//!
//! Data structures describing a coarse-grained peptide on the tetrahedral lattice.
//!
//! ## Key Components
//!
//! - [`residue`] - The 20 amino-acid residue types and their one-letter codes
//! - [`bead`] - A main or side bead together with its turn qubits and turn indicators
//! - [`distribution`] - Measured bitstring probabilities returned by a sampling oracle
//! - [`peptide`] - The validated peptide and its turn-qubit register layout

pub mod bead;
pub mod distribution;
pub mod peptide;
pub mod residue;
