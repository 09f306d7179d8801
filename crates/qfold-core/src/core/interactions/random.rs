use super::{EnergyMatrix, Interaction};
use crate::core::models::residue::ResidueType;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Contact energies drawn uniformly from `[-5, -1)` with a seeded generator.
///
/// Intended for tests and benchmarks where a physically meaningful table is not needed
/// but runs must be reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomInteraction {
    seed: u64,
    matrix: EnergyMatrix,
}

impl RandomInteraction {
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let matrix = EnergyMatrix::from_upper_triangle(|_, _| -1.0 - 4.0 * rng.r#gen::<f64>());
        Self { seed, matrix }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn matrix(&self) -> &EnergyMatrix {
        &self.matrix
    }
}

impl Interaction for RandomInteraction {
    fn name(&self) -> &str {
        "random"
    }

    fn energy(&self, a: ResidueType, b: ResidueType) -> f64 {
        self.matrix.get(a, b)
    }
}
