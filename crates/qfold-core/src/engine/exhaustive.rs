//! Classical stand-in for a quantum oracle.
//!
//! A Hamiltonian built from `Z` strings is diagonal, so its full spectrum is the
//! Walsh-Hadamard transform of its coefficient vector. [`ExhaustiveOracle`] computes that
//! spectrum for small registers and uses a Boltzmann distribution at inverse temperature
//! `beta` as the "prepared state". Raising `beta` concentrates the distribution on the
//! ground states, which makes a schedule of `beta` values behave like an annealing run.

use super::config::SamplingConfig;
use super::oracle::{Oracle, OracleError};
use crate::core::models::distribution::ProbabilityDistribution;
use crate::core::operators::operator::QubitOperator;
use rand::{SeedableRng, distributions::WeightedIndex, prelude::Distribution, rngs::StdRng};
use tracing::{debug, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Widest register the oracle will ever enumerate, whatever the configured limit.
const HARD_QUBIT_LIMIT: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ExhaustiveOracle {
    max_qubits: usize,
    probability_threshold: f64,
    shots: Option<usize>,
    seed: u64,
}

impl ExhaustiveOracle {
    pub fn new(max_qubits: usize) -> Self {
        Self {
            max_qubits: max_qubits.min(HARD_QUBIT_LIMIT),
            probability_threshold: 0.0,
            shots: None,
            seed: 0,
        }
    }

    pub fn from_config(config: &SamplingConfig) -> Self {
        Self::new(config.max_qubits)
            .with_probability_threshold(config.probability_threshold)
            .with_shots(config.shots, config.seed)
    }

    /// Drops bitstrings whose probability does not exceed `threshold`.
    pub fn with_probability_threshold(mut self, threshold: f64) -> Self {
        self.probability_threshold = threshold;
        self
    }

    /// Replaces exact probabilities with frequencies from `shots` seeded draws.
    pub fn with_shots(mut self, shots: Option<usize>, seed: u64) -> Self {
        self.shots = shots;
        self.seed = seed;
        self
    }

    /// Energy of every basis state, indexed by the state's bits (bit `p` is qubit `p`).
    pub fn spectrum(&self, hamiltonian: &QubitOperator) -> Result<Vec<f64>, OracleError> {
        let n = hamiltonian.num_qubits();
        if n > self.max_qubits {
            return Err(OracleError::TooManyQubits {
                num_qubits: n,
                max_qubits: self.max_qubits,
            });
        }
        let mut values = vec![0.0; 1usize << n];
        for (z, coeff) in hamiltonian.terms() {
            values[z.bits() as usize] += coeff;
        }
        walsh_hadamard(&mut values);
        Ok(values)
    }

    fn boltzmann_weights(&self, energies: &[f64], params: &[f64]) -> Result<Vec<f64>, OracleError> {
        let beta = match params {
            [beta] => *beta,
            _ => {
                return Err(OracleError::InvalidParameters {
                    expected: 1,
                    actual: params.len(),
                });
            }
        };
        if !(beta.is_finite() && beta >= 0.0) {
            return Err(OracleError::JobFailed(format!(
                "inverse temperature must be finite and non-negative, got {}",
                beta
            )));
        }
        let min_energy = energies.iter().copied().fold(f64::INFINITY, f64::min);

        #[cfg(not(feature = "parallel"))]
        let weights = energies
            .iter()
            .map(|&e| (-(e - min_energy) * beta).exp())
            .collect();

        #[cfg(feature = "parallel")]
        let weights = energies
            .par_iter()
            .map(|&e| (-(e - min_energy) * beta).exp())
            .collect();

        Ok(weights)
    }
}

impl Oracle for ExhaustiveOracle {
    fn name(&self) -> &str {
        "exhaustive"
    }

    fn num_parameters(&self, _num_qubits: usize) -> usize {
        1
    }

    #[instrument(level = "debug", skip_all, fields(num_qubits = hamiltonian.num_qubits()))]
    fn estimate(&self, hamiltonian: &QubitOperator, params: &[f64]) -> Result<f64, OracleError> {
        let energies = self.spectrum(hamiltonian)?;
        let weights = self.boltzmann_weights(&energies, params)?;
        let total: f64 = weights.iter().sum();
        let mean = weights
            .iter()
            .zip(&energies)
            .map(|(w, e)| w * e)
            .sum::<f64>()
            / total;
        debug!(energy = mean, "Estimated energy.");
        Ok(mean)
    }

    #[instrument(level = "debug", skip_all, fields(num_qubits = hamiltonian.num_qubits()))]
    fn sample(
        &self,
        hamiltonian: &QubitOperator,
        params: &[f64],
    ) -> Result<ProbabilityDistribution, OracleError> {
        let n = hamiltonian.num_qubits();
        let energies = self.spectrum(hamiltonian)?;
        let weights = self.boltzmann_weights(&energies, params)?;
        let bitstring = |index: usize| {
            if n == 0 {
                String::new()
            } else {
                format!("{:0width$b}", index, width = n)
            }
        };

        let mut dist = ProbabilityDistribution::new();
        match self.shots {
            Some(shots) => {
                let sampler = WeightedIndex::new(&weights)
                    .map_err(|e| OracleError::JobFailed(e.to_string()))?;
                let mut rng = StdRng::seed_from_u64(self.seed);
                let mut counts = vec![0usize; weights.len()];
                for _ in 0..shots {
                    counts[sampler.sample(&mut rng)] += 1;
                }
                for (index, &count) in counts.iter().enumerate() {
                    if count > 0 {
                        dist.insert(bitstring(index), count as f64 / shots as f64);
                    }
                }
            }
            None => {
                let total: f64 = weights.iter().sum();
                for (index, w) in weights.iter().enumerate() {
                    let p = w / total;
                    if p > self.probability_threshold {
                        dist.insert(bitstring(index), p);
                    }
                }
            }
        }

        if dist.is_empty() {
            warn!("Every bitstring fell below the probability threshold.");
        }
        Ok(dist)
    }
}

/// In-place, unnormalised fast Walsh-Hadamard transform.
fn walsh_hadamard(values: &mut [f64]) {
    let len = values.len();
    let mut half = 1;
    while half < len {
        for block in (0..len).step_by(2 * half) {
            for i in block..block + half {
                let (a, b) = (values[i], values[i + half]);
                values[i] = a + b;
                values[i + half] = a - b;
            }
        }
        half *= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operators::pauli::{Factor, ZString};

    fn sample_hamiltonian() -> QubitOperator {
        QubitOperator::from_terms(
            3,
            [
                (ZString::IDENTITY, 1.0),
                (ZString::from_positions([0, 2]), -2.0),
                (ZString::single(1), 0.5),
            ],
        )
        .unwrap()
    }

    #[test]
    fn spectrum_matches_direct_evaluation() {
        let h = sample_hamiltonian();
        let spectrum = ExhaustiveOracle::new(10).spectrum(&h).unwrap();
        for (x, e) in spectrum.iter().enumerate() {
            assert!((e - h.evaluate(x as u128)).abs() < 1e-12);
        }
    }

    #[test]
    fn zero_temperature_mean_is_uniform_average() {
        let h = QubitOperator::factor(2, 0, Factor::ProjectOne).unwrap().scale(4.0);
        let oracle = ExhaustiveOracle::new(10);
        assert!((oracle.estimate(&h, &[0.0]).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn high_beta_concentrates_on_ground_states() {
        let h = sample_hamiltonian();
        let oracle = ExhaustiveOracle::new(10).with_probability_threshold(1e-6);
        let dist = oracle.sample(&h, &[50.0]).unwrap();
        // Ground states have Z0 Z2 = +1 and Z1 = -1: bits 0 and 2 equal, bit 1 set.
        let keys: Vec<&str> = dist.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["010", "111"]);
        assert!((dist.total() - 1.0).abs() < 1e-9);
        assert_eq!(dist.ranked()[0].0, "010");
    }

    #[test]
    fn seeded_shots_are_reproducible() {
        let h = sample_hamiltonian();
        let oracle = ExhaustiveOracle::new(10).with_shots(Some(500), 7);
        let a = oracle.sample(&h, &[0.5]).unwrap();
        let b = oracle.sample(&h, &[0.5]).unwrap();
        assert_eq!(a, b);
        assert!((a.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn oversized_registers_and_bad_parameters_fail() {
        let h = QubitOperator::identity(12, 1.0);
        assert_eq!(
            ExhaustiveOracle::new(8).estimate(&h, &[1.0]).unwrap_err(),
            OracleError::TooManyQubits {
                num_qubits: 12,
                max_qubits: 8
            }
        );
        let small = QubitOperator::identity(2, 1.0);
        assert!(matches!(
            ExhaustiveOracle::new(8).estimate(&small, &[]),
            Err(OracleError::InvalidParameters { expected: 1, actual: 0 })
        ));
        assert!(matches!(
            ExhaustiveOracle::new(8).sample(&small, &[-1.0]),
            Err(OracleError::JobFailed(_))
        ));
    }

    #[test]
    fn empty_register_yields_the_empty_bitstring() {
        let h = QubitOperator::identity(0, 3.0);
        let dist = ExhaustiveOracle::new(4).sample(&h, &[1.0]).unwrap();
        assert_eq!(dist.get(""), Some(1.0));
    }
}
