use super::indicators::TurnIndicators;
use crate::core::operators::operator::QubitOperator;

/// `strength * Σ_k Σ_d f_k^d f_{k+1}^d`: fires once for every pair of consecutive main
/// turns in the same direction, which would fold bead `k+1` back onto bead `k-1`.
pub fn back_turn_penalty(
    chain_length: usize,
    indicators: &TurnIndicators,
    strength: f64,
) -> QubitOperator {
    let mut total = QubitOperator::zero(indicators.num_qubits());
    if strength == 0.0 {
        return total;
    }
    for k in 1..chain_length.saturating_sub(1) {
        let (Some(current), Some(next)) = (indicators.main(k), indicators.main(k + 1)) else {
            continue;
        };
        for (a, b) in current.iter().zip(next) {
            if a.is_zero() || b.is_zero() {
                continue;
            }
            total += a * b;
        }
    }
    total.scale(strength).simplify()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::bead::TurnQubits;
    use crate::core::models::peptide::Peptide;
    use crate::engine::qubits::fixing::FixedQubits;

    #[test]
    fn penalty_counts_repeated_turns() {
        let peptide = Peptide::from_sequence("APRG").unwrap();
        let indicators = TurnIndicators::new(&peptide, &FixedQubits::new()).unwrap();
        let penalty = back_turn_penalty(4, &indicators, 10.0);

        for code in 0..64u128 {
            let turns: Vec<usize> = (0..3).map(|i| ((code >> (2 * i)) & 3) as usize).collect();
            let assignment = turns.iter().enumerate().fold(0u128, |acc, (i, &d)| {
                let (first, second) = TurnQubits::encode(d);
                acc | ((first as u128) << (2 * i)) | ((second as u128) << (2 * i + 1))
            });
            let repeats = turns.windows(2).filter(|w| w[0] == w[1]).count();
            assert!((penalty.evaluate(assignment) - 10.0 * repeats as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn two_bead_chain_has_no_penalty() {
        let peptide = Peptide::from_sequence("AP").unwrap();
        let indicators = TurnIndicators::new(&peptide, &FixedQubits::new()).unwrap();
        assert!(back_turn_penalty(2, &indicators, 10.0).is_zero());
    }
}
