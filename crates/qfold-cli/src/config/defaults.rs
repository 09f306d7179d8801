use qfold::engine::config::{
    DEFAULT_BOND_LENGTH, DEFAULT_MAX_QUBITS, DEFAULT_PENALTY, DEFAULT_PROBABILITY_THRESHOLD,
    DEFAULT_TOP_K,
};

pub struct DefaultsConfig {
    pub penalty_back: f64,
    pub penalty_overlap: f64,
    pub penalty_side_chain: f64,
    pub interaction: String,
    pub betas: Vec<f64>,
    pub max_qubits: usize,
    pub probability_threshold: f64,
    pub seed: u64,
    pub top_k: usize,
    pub bond_length: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            penalty_back: DEFAULT_PENALTY,
            penalty_overlap: DEFAULT_PENALTY,
            penalty_side_chain: DEFAULT_PENALTY,
            interaction: "miyazawa-jernigan".to_string(),
            betas: vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0],
            max_qubits: DEFAULT_MAX_QUBITS,
            probability_threshold: DEFAULT_PROBABILITY_THRESHOLD,
            seed: 0,
            top_k: DEFAULT_TOP_K,
            bond_length: DEFAULT_BOND_LENGTH,
        }
    }
}
