//! # Engine Module
//!
//! Turns a validated peptide into a qubit problem and turns measurement outcomes back into
//! lattice conformations.
//!
//! ## Overview
//!
//! The engine owns every step between the static models in [`crate::core`] and the
//! workflows: Hamiltonian assembly, register bookkeeping, the oracle boundary, and result
//! interpretation. All of it is synchronous; the oracle call is the only point where the
//! pipeline waits on something outside the process.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Penalty strengths, interaction scheme, and sampling
//!   parameters behind a validating builder
//! - **Hamiltonian Assembly** ([`hamiltonian`]) - Turn indicators, relative-displacement
//!   indicators, pair rules, and the back-turn penalty
//! - **Register Bookkeeping** ([`qubits`]) - Symmetry-breaking qubit fixing and removal of
//!   unused positions
//! - **Problem Definition** ([`problem`]) - A peptide bound to its energy model, producing
//!   the reduced Hamiltonian and interpreting distributions
//! - **Oracle Boundary** ([`oracle`], [`exhaustive`]) - The sampling interface, the energy
//!   history, and a classical stand-in for small registers
//! - **Decoding and Scoring** ([`decoder`], [`result`], [`energy`]) - Bitstrings to turns,
//!   turns to coordinates, coordinates to an energy breakdown
//! - **Progress Monitoring** ([`progress`]) and **Error Handling** ([`error`])

pub mod config;
pub mod decoder;
pub mod energy;
pub mod error;
pub mod exhaustive;
pub mod hamiltonian;
pub mod oracle;
pub mod problem;
pub mod progress;
pub mod qubits;
pub mod result;
