//! # Workflows Module
//!
//! High-level procedures that take a peptide (or a file of peptides) from input to
//! predicted structures.
//!
//! ## Overview
//!
//! Workflows are the entry points for users of the library. They build the qubit problem,
//! drive the oracle through the configured parameter schedule, interpret the sampled
//! distributions, and organize the results on disk. Progress is reported through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) so that front ends can
//! render it however they like.
//!
//! ## Architecture
//!
//! - **Fold Workflow** ([`fold`]) - Folds one peptide: operator preparation, parameter
//!   schedule evaluation, interpretation of the best state and the top-K states, and the
//!   per-protein output tree.
//! - **Batch Workflow** ([`batch`]) - Reads a CSV of peptides and folds each one in turn.
//!   A failing item is logged and recorded without stopping the rest of the batch.

pub mod batch;
pub mod fold;
