//! # Core Module
//!
//! Fundamental building blocks for the lattice folding model.
//!
//! ## Architecture
//!
//! - **Peptide Representation** ([`models`]) - Residues, beads, and the validated peptide with
//!   its turn-qubit register layout
//! - **Operator Algebra** ([`operators`]) - Diagonal Pauli-Z operators over the turn register
//! - **Contact Energies** ([`interactions`]) - Miyazawa-Jernigan, random and mixed pair tables
//! - **Lattice Geometry** ([`lattice`]) - Tetrahedral step vectors and sublattice parity
//! - **File I/O** ([`io`]) - XYZ shape files and plain-text result records

pub mod interactions;
pub mod io;
pub mod lattice;
pub mod models;
pub mod operators;
