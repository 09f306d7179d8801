//! # qfold Core Library
//!
//! A library for coarse-grained protein structure prediction on the tetrahedral lattice,
//! where the folding problem is encoded as a diagonal qubit Hamiltonian whose ground state
//! is the lowest-energy conformation.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that the algebra, the physics
//! and the orchestration can be tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Peptide`, `Bead`), the Pauli-Z
//!   operator algebra (`QubitOperator`), contact energy tables, lattice geometry, and I/O
//!   for XYZ shape files and result records.
//!
//! - **[`engine`]: The Logic Core.** Builds the folding Hamiltonian from a peptide,
//!   fixes the symmetry-breaking qubits, removes unused qubits, talks to the sampling
//!   oracle, and decodes measured bitstrings back into lattice conformations.
//!
//! - **[`workflows`]: The Public API.** Ties `engine` and `core` together into complete
//!   procedures: folding one peptide end to end, or a batch of peptides with per-item
//!   failure isolation.

pub mod core;
pub mod engine;
pub mod workflows;
