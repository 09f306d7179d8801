use super::config::PenaltyParameters;
use super::hamiltonian::contacts::PairRule;
use super::result::Conformation;
use crate::core::interactions::Interaction;
use crate::core::models::peptide::Peptide;
use std::fmt;

/// Energy of a concrete conformation, split into its interaction and penalty parts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyBreakdown {
    pub contact_energy: f64,
    pub contacts: usize,
    pub back_turns: usize,
    pub overlaps: usize,
    pub side_chain_clashes: usize,
    pub penalty_energy: f64,
}

impl EnergyBreakdown {
    pub fn total(&self) -> f64 {
        self.contact_energy + self.penalty_energy
    }

    /// `true` when the conformation is self-avoiding and has no back turns.
    pub fn is_valid(&self) -> bool {
        self.back_turns == 0 && self.overlaps == 0 && self.side_chain_clashes == 0
    }
}

impl fmt::Display for EnergyBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "total {:.4} (contacts {} = {:.4}, back turns {}, overlaps {}, side-chain clashes {})",
            self.total(),
            self.contacts,
            self.contact_energy,
            self.back_turns,
            self.overlaps,
            self.side_chain_clashes
        )
    }
}

/// Scores a conformation directly from its lattice positions.
///
/// Uses the same pair rules and penalty strengths as the Hamiltonian, so for any turn
/// assignment the Hamiltonian evaluates to `evaluate_conformation(..).total()` on the
/// decoded conformation.
pub fn evaluate_conformation(
    peptide: &Peptide,
    conformation: &Conformation,
    interaction: &dyn Interaction,
    penalties: &PenaltyParameters,
) -> EnergyBreakdown {
    let mut breakdown = EnergyBreakdown::default();

    breakdown.back_turns = conformation
        .main_turns()
        .windows(2)
        .filter(|w| w[0] == w[1])
        .count();
    breakdown.penalty_energy += penalties.back * breakdown.back_turns as f64;

    for i in 0..peptide.len() {
        for a in peptide.beads_at(i) {
            for j in i + 1..peptide.len() {
                for b in peptide.beads_at(j) {
                    let Some(rule) = PairRule::classify(a, b) else {
                        continue;
                    };
                    let (Some(pa), Some(pb)) = (conformation.position(a), conformation.position(b))
                    else {
                        continue;
                    };
                    let delta = pb - pa;
                    if !rule.targets(a).contains(&delta) {
                        continue;
                    }
                    let weight = rule.weight(a, b, interaction, penalties);
                    match rule {
                        PairRule::Contact => {
                            breakdown.contacts += 1;
                            breakdown.contact_energy += weight;
                        }
                        PairRule::Overlap => {
                            breakdown.overlaps += 1;
                            breakdown.penalty_energy += weight;
                        }
                        PairRule::SideChainClash => {
                            breakdown.side_chain_clashes += 1;
                            breakdown.penalty_energy += weight;
                        }
                    }
                }
            }
        }
    }
    breakdown
}
