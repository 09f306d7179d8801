use super::Interaction;
use crate::core::models::residue::ResidueType;
use std::collections::BTreeSet;

/// Residues scored with the primary table by default: the hydrophobic core formers.
pub const DEFAULT_PRIMARY_RESIDUES: &str = "CMFILVWY";

/// Composes two tables: pairs whose residues both belong to the primary set are scored
/// with the primary table, every other pair with the secondary table.
pub struct MixedInteraction {
    primary: Box<dyn Interaction>,
    secondary: Box<dyn Interaction>,
    primary_residues: BTreeSet<ResidueType>,
}

impl MixedInteraction {
    pub fn new<I>(primary: Box<dyn Interaction>, secondary: Box<dyn Interaction>, primary_residues: I) -> Self
    where
        I: IntoIterator<Item = ResidueType>,
    {
        Self {
            primary,
            secondary,
            primary_residues: primary_residues.into_iter().collect(),
        }
    }

    pub fn primary_residues(&self) -> &BTreeSet<ResidueType> {
        &self.primary_residues
    }

    fn uses_primary(&self, a: ResidueType, b: ResidueType) -> bool {
        self.primary_residues.contains(&a) && self.primary_residues.contains(&b)
    }
}

impl Interaction for MixedInteraction {
    fn name(&self) -> &str {
        "mixed"
    }

    fn energy(&self, a: ResidueType, b: ResidueType) -> f64 {
        if self.uses_primary(a, b) {
            self.primary.energy(a, b)
        } else {
            self.secondary.energy(a, b)
        }
    }
}

impl std::fmt::Debug for MixedInteraction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixedInteraction")
            .field("primary", &self.primary.name())
            .field("secondary", &self.secondary.name())
            .field("primary_residues", &self.primary_residues)
            .finish()
    }
}
