use super::config::{FoldingConfig, PenaltyParameters};
use super::decoder::{DecodeError, ResultDecoder};
use super::energy::evaluate_conformation;
use super::error::EngineError;
use super::hamiltonian::builder;
use super::qubits::fixing::{FixedQubits, fixed_qubits};
use super::qubits::reducer::remove_unused_qubits;
use super::result::FoldingResult;
use crate::core::interactions::Interaction;
use crate::core::models::distribution::ProbabilityDistribution;
use crate::core::models::peptide::Peptide;
use crate::core::operators::operator::QubitOperator;
use crate::engine::config::DEFAULT_BOND_LENGTH;
use tracing::{info, instrument, warn};

/// The compressed Hamiltonian together with the bookkeeping needed to undo compression.
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedHamiltonian {
    pub operator: QubitOperator,
    /// Positions of the full register removed during compression, ascending.
    pub unused: Vec<usize>,
    pub fixed: FixedQubits,
    pub full_width: usize,
}

impl ReducedHamiltonian {
    pub fn num_qubits(&self) -> usize {
        self.operator.num_qubits()
    }
}

/// A peptide with everything needed to turn it into a qubit problem and read answers back.
pub struct FoldingProblem {
    peptide: Peptide,
    interaction: Box<dyn Interaction>,
    penalties: PenaltyParameters,
    bond_length: f64,
}

impl FoldingProblem {
    pub fn new(
        peptide: Peptide,
        interaction: Box<dyn Interaction>,
        penalties: PenaltyParameters,
    ) -> Self {
        Self {
            peptide,
            interaction,
            penalties,
            bond_length: DEFAULT_BOND_LENGTH,
        }
    }

    pub fn from_config(peptide: Peptide, config: &FoldingConfig) -> Result<Self, EngineError> {
        let interaction = config.interaction.build()?;
        Ok(Self::new(peptide, interaction, config.penalties).with_bond_length(config.bond_length))
    }

    pub fn with_bond_length(mut self, bond_length: f64) -> Self {
        self.bond_length = bond_length;
        self
    }

    pub fn peptide(&self) -> &Peptide {
        &self.peptide
    }

    pub fn interaction(&self) -> &dyn Interaction {
        self.interaction.as_ref()
    }

    pub fn penalties(&self) -> &PenaltyParameters {
        &self.penalties
    }

    /// Hamiltonian over the full turn register, with the symmetry-breaking qubits fixed.
    pub fn full_operator(&self) -> Result<QubitOperator, EngineError> {
        let fixed = fixed_qubits(&self.peptide);
        Ok(builder::run(
            &self.peptide,
            self.interaction.as_ref(),
            &self.penalties,
            &fixed,
        )?)
    }

    /// Builds, fixes and compresses the Hamiltonian.
    #[instrument(skip_all, name = "qubit_operator", fields(sequence = %self.peptide.main_sequence()))]
    pub fn qubit_operator(&self) -> Result<ReducedHamiltonian, EngineError> {
        let fixed = fixed_qubits(&self.peptide);
        let full_width = self.peptide.num_qubits();
        let op = builder::run(&self.peptide, self.interaction.as_ref(), &self.penalties, &fixed)?;
        let (operator, unused) = remove_unused_qubits(&op)?;
        info!(
            full_width,
            reduced_width = operator.num_qubits(),
            terms = operator.len(),
            "Prepared qubit operator."
        );
        Ok(ReducedHamiltonian {
            operator,
            unused,
            fixed,
            full_width,
        })
    }

    pub fn decoder(&self, reduced: &ReducedHamiltonian) -> Result<ResultDecoder, DecodeError> {
        ResultDecoder::new(&self.peptide, &reduced.unused, &reduced.fixed)
    }

    /// Decodes one measured bitstring over the compressed register.
    pub fn decode_bitstring(
        &self,
        reduced: &ReducedHamiltonian,
        bitstring: &str,
        probability: f64,
    ) -> Result<FoldingResult, DecodeError> {
        let decoder = self.decoder(reduced)?;
        let conformation = decoder.decode(bitstring)?;
        let energy = evaluate_conformation(
            &self.peptide,
            &conformation,
            self.interaction.as_ref(),
            &self.penalties,
        );
        Ok(FoldingResult {
            peptide: self.peptide.clone(),
            bitstring: bitstring.to_string(),
            probability,
            binary_vector: decoder.binary_vector(bitstring)?,
            conformation,
            energy,
            bond_length: self.bond_length,
        })
    }

    /// Decodes the most probable bitstring; ties go to the lexicographically smallest.
    ///
    /// A bitstring that cannot be decoded is skipped in favour of the next-ranked one. If
    /// none decodes, the error from the most probable bitstring is returned.
    pub fn interpret(
        &self,
        reduced: &ReducedHamiltonian,
        distribution: &ProbabilityDistribution,
    ) -> Result<FoldingResult, DecodeError> {
        let mut first_error = None;
        for (bitstring, probability) in distribution.ranked() {
            match self.decode_bitstring(reduced, bitstring, probability) {
                Ok(result) => return Ok(result),
                Err(e) => {
                    warn!(bitstring, error = %e, "Skipping bitstring that could not be decoded.");
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error.unwrap_or(DecodeError::EmptyDistribution))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::interactions::miyazawa_jernigan::MiyazawaJernigan;
    use crate::core::interactions::random::RandomInteraction;
    use crate::core::lattice::{self, BOND_LENGTH_SQUARED};
    use crate::engine::exhaustive::ExhaustiveOracle;
    use crate::engine::qubits::reducer::expand;

    fn problem(sequence: &str, side_chains: &[&str]) -> FoldingProblem {
        FoldingProblem::new(
            Peptide::new(sequence, side_chains).unwrap(),
            Box::new(MiyazawaJernigan::new()),
            PenaltyParameters::default(),
        )
    }

    fn bitstring(value: u128, width: usize) -> String {
        (0..width)
            .rev()
            .map(|p| if (value >> p) & 1 == 1 { '1' } else { '0' })
            .collect()
    }

    /// Every reduced assignment decodes to a conformation whose geometric energy equals
    /// the operator's value on that assignment.
    fn assert_operator_matches_geometry(problem: &FoldingProblem) {
        let reduced = problem.qubit_operator().unwrap();
        let width = reduced.num_qubits();
        assert!(width <= 16, "test register too wide: {}", width);
        for x in 0..(1u128 << width) {
            let result = problem
                .decode_bitstring(&reduced, &bitstring(x, width), 1.0)
                .unwrap();
            let value = reduced.operator.evaluate(x);
            assert!(
                (value - result.energy.total()).abs() < 1e-8,
                "bitstring {}: operator {} vs geometry {} ({})",
                bitstring(x, width),
                value,
                result.energy.total(),
                result.energy
            );
        }
    }

    #[test]
    fn main_chain_operator_matches_geometric_energy() {
        assert_operator_matches_geometry(&problem("APRLRF", &["", "", "", "", "", ""]));
    }

    #[test]
    fn side_chain_operator_matches_geometric_energy() {
        assert_operator_matches_geometry(&problem("APRLG", &["", "", "K", "", ""]));
        assert_operator_matches_geometry(&problem("APRL", &["", "F", "W", ""]));
    }

    #[test]
    fn random_interaction_operator_matches_geometric_energy() {
        let problem = FoldingProblem::new(
            Peptide::new("WLMAVC", &["", "", "", "", "", ""]).unwrap(),
            Box::new(RandomInteraction::new(11)),
            PenaltyParameters::new(3.0, 7.0, 5.0),
        );
        assert_operator_matches_geometry(&problem);
    }

    #[test]
    fn dwggm_reduces_to_three_qubits() {
        let problem = problem("DWGGM", &["", "", "", "", ""]);
        let reduced = problem.qubit_operator().unwrap();
        assert_eq!(reduced.full_width, 8);
        assert_eq!(reduced.fixed.len(), 5);
        assert_eq!(reduced.num_qubits(), 3);
        assert_eq!(reduced.unused, vec![0, 1, 2, 3, 5]);

        let result = problem.decode_bitstring(&reduced, "000", 1.0).unwrap();
        let positions = result.conformation.main_positions();
        assert_eq!(positions.len(), 5);
        assert_eq!(positions[0], lattice::LatticeVector::zeros());
        for w in positions.windows(2) {
            assert_eq!(lattice::squared_length(&(w[1] - w[0])), BOND_LENGTH_SQUARED);
        }
    }

    #[test]
    fn fixed_operator_equals_substituted_full_operator() {
        let problem = problem("APRLR", &["", "", "", "", ""]);
        let fixed = fixed_qubits(problem.peptide());
        let unfixed = builder::run(
            problem.peptide(),
            problem.interaction(),
            problem.penalties(),
            &FixedQubits::new(),
        )
        .unwrap();
        let reduced = problem.qubit_operator().unwrap();
        let restored = expand(&reduced.operator, &reduced.unused, reduced.full_width).unwrap();

        for x in 0..(1u128 << reduced.full_width) {
            let pinned = fixed.iter().fold(x, |acc, (&p, &bit)| {
                (acc & !(1u128 << p)) | ((bit as u128) << p)
            });
            assert!((restored.evaluate(pinned) - unfixed.evaluate(pinned)).abs() < 1e-8);
        }
    }

    #[test]
    fn operator_construction_is_deterministic() {
        let a = problem("APRLRF", &["", "", "K", "", "", ""]).qubit_operator().unwrap();
        let b = problem("APRLRF", &["", "", "K", "", "", ""]).qubit_operator().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn interpret_picks_the_most_probable_bitstring() {
        let problem = problem("DWGGM", &["", "", "", "", ""]);
        let reduced = problem.qubit_operator().unwrap();
        let dist: ProbabilityDistribution =
            [("110", 0.2), ("001", 0.4), ("011", 0.4)].into_iter().collect();
        let result = problem.interpret(&reduced, &dist).unwrap();
        assert_eq!(result.bitstring, "001");
        assert_eq!(result.probability, 0.4);

        let err = problem
            .interpret(&reduced, &ProbabilityDistribution::new())
            .unwrap_err();
        assert_eq!(err, DecodeError::EmptyDistribution);
    }

    #[test]
    fn interpret_falls_back_to_the_next_ranked_bitstring() {
        let problem = problem("DWGGM", &["", "", "", "", ""]);
        let reduced = problem.qubit_operator().unwrap();
        let dist: ProbabilityDistribution =
            [("0101", 0.7), ("01x", 0.2), ("011", 0.1)].into_iter().collect();
        let result = problem.interpret(&reduced, &dist).unwrap();
        assert_eq!(result.bitstring, "011");
        assert_eq!(result.probability, 0.1);

        let undecodable: ProbabilityDistribution =
            [("0101", 0.7), ("01x", 0.3)].into_iter().collect();
        assert_eq!(
            problem.interpret(&reduced, &undecodable).unwrap_err(),
            DecodeError::LengthMismatch {
                expected: 3,
                actual: 4
            }
        );
    }

    #[test]
    fn ground_state_of_1a9m_is_a_valid_fold() {
        let problem = problem("IHGIGGFI", &[""; 8]);
        let reduced = problem.qubit_operator().unwrap();
        let width = reduced.num_qubits();
        let spectrum = ExhaustiveOracle::new(width).spectrum(&reduced.operator).unwrap();
        let (x, &minimum) = spectrum
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .unwrap();

        let result = problem
            .decode_bitstring(&reduced, &bitstring(x as u128, width), 1.0)
            .unwrap();
        assert!(result.energy.is_valid(), "invalid ground state: {}", result.energy);
        assert!((result.energy.total() - minimum).abs() < 1e-8);
        assert!(result.energy.contacts > 0);
    }
}
