use crate::core::models::distribution::ProbabilityDistribution;
use crate::core::operators::operator::QubitOperator;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum OracleError {
    #[error("Oracle '{0}' is unavailable")]
    Unavailable(String),

    #[error("Oracle job failed: {0}")]
    JobFailed(String),

    #[error("Invalid oracle parameters: expected {expected} values, got {actual}")]
    InvalidParameters { expected: usize, actual: usize },

    #[error("Register of {num_qubits} qubits exceeds the oracle limit of {max_qubits}")]
    TooManyQubits { num_qubits: usize, max_qubits: usize },
}

/// Boundary to whatever evaluates the Hamiltonian on a parameterised state.
///
/// Both calls block until the result is complete. Errors are reported as-is and never
/// retried here.
pub trait Oracle: Send + Sync {
    fn name(&self) -> &str;

    /// Number of parameters expected for a register of `num_qubits` qubits.
    fn num_parameters(&self, num_qubits: usize) -> usize;

    /// Expected energy of `hamiltonian` in the state prepared by `params`.
    fn estimate(&self, hamiltonian: &QubitOperator, params: &[f64]) -> Result<f64, OracleError>;

    /// Measurement distribution of the state prepared by `params`, keyed by bitstrings
    /// over the register of `hamiltonian` with the highest position first.
    fn sample(
        &self,
        hamiltonian: &QubitOperator,
        params: &[f64],
    ) -> Result<ProbabilityDistribution, OracleError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub iteration: usize,
    pub energy: f64,
    pub params: Vec<f64>,
}

/// Every energy estimate made while searching parameters, in call order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EnergyHistory {
    entries: Vec<HistoryEntry>,
}

impl EnergyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, energy: f64, params: Vec<f64>) {
        let iteration = self.entries.len();
        self.entries.push(HistoryEntry {
            iteration,
            energy,
            params,
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn energies(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.energy).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest-energy entry; ties go to the earliest iteration.
    pub fn best(&self) -> Option<&HistoryEntry> {
        self.top_k(1).into_iter().next()
    }

    /// The `k` lowest-energy entries, lowest first, ties in iteration order.
    pub fn top_k(&self, k: usize) -> Vec<&HistoryEntry> {
        let mut ranked: Vec<&HistoryEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| a.energy.total_cmp(&b.energy).then(a.iteration.cmp(&b.iteration)));
        ranked.truncate(k);
        ranked
    }
}

/// Calls [`Oracle::estimate`] and appends the outcome to `history`, which is handed back
/// with the energy.
pub fn estimate_with_history(
    oracle: &dyn Oracle,
    hamiltonian: &QubitOperator,
    params: &[f64],
    mut history: EnergyHistory,
) -> Result<(f64, EnergyHistory), OracleError> {
    let energy = oracle.estimate(hamiltonian, params)?;
    history.record(energy, params.to_vec());
    Ok((energy, history))
}
