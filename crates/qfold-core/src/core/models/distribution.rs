use std::collections::BTreeMap;

/// Probabilities of measured bitstrings.
///
/// Bitstrings are written with the highest qubit first, as returned by sampling
/// backends. Keys are kept sorted so iteration and tie-breaking are deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbabilityDistribution {
    entries: BTreeMap<String, f64>,
}

impl ProbabilityDistribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `probability` to the entry for `bitstring`.
    pub fn insert(&mut self, bitstring: impl Into<String>, probability: f64) {
        *self.entries.entry(bitstring.into()).or_insert(0.0) += probability;
    }

    pub fn get(&self, bitstring: &str) -> Option<f64> {
        self.entries.get(bitstring).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, &v)| (k.as_str(), v))
    }

    pub fn total(&self) -> f64 {
        self.entries.values().sum()
    }

    /// Entries sorted by decreasing probability, ties broken by bitstring order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<_> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for ProbabilityDistribution {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut dist = Self::new();
        for (k, p) in iter {
            dist.insert(k, p);
        }
        dist
    }
}
