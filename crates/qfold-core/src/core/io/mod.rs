//! Provides input/output functionality for the plain-text files produced by a folding run.
//!
//! This module contains the XYZ shape-file format for decoded conformations and the
//! record formats for energy logs, sampled distributions, and exported Hamiltonians,
//! all behind a common trait-based reader/writer interface.

pub mod records;
pub mod traits;
pub mod xyz;
