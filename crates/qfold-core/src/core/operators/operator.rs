use super::pauli::{Factor, MAX_QUBITS, ZString};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use thiserror::Error;

/// Coefficients with magnitude at or below this tolerance are dropped by
/// [`QubitOperator::simplify`].
pub const COEFFICIENT_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum OperatorError {
    #[error("Qubit position {position} is out of range for a register of {num_qubits} qubits")]
    PositionOutOfRange { position: usize, num_qubits: usize },

    #[error("Register of {0} qubits exceeds the supported maximum of {MAX_QUBITS}")]
    RegisterTooWide(usize),
}

/// A real-weighted sum of diagonal Pauli terms over a register of `num_qubits` qubits.
///
/// Terms are keyed by their [`ZString`], so equal tensor-product terms are always merged
/// and the iteration order is canonical regardless of how the operator was assembled.
/// Operators of different widths combine over the wider register (the narrower one is
/// padded with identity).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QubitOperator {
    num_qubits: usize,
    terms: BTreeMap<ZString, f64>,
}

impl QubitOperator {
    /// The zero operator.
    pub fn zero(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            terms: BTreeMap::new(),
        }
    }

    /// `coeff * I`.
    pub fn identity(num_qubits: usize, coeff: f64) -> Self {
        let mut op = Self::zero(num_qubits);
        op.add_term(ZString::IDENTITY, coeff);
        op
    }

    /// Builds an operator from `(term, coefficient)` pairs, summing repeated terms.
    pub fn from_terms<I>(num_qubits: usize, terms: I) -> Result<Self, OperatorError>
    where
        I: IntoIterator<Item = (ZString, f64)>,
    {
        if num_qubits > MAX_QUBITS {
            return Err(OperatorError::RegisterTooWide(num_qubits));
        }
        let mut op = Self::zero(num_qubits);
        for (z, coeff) in terms {
            if let Some(position) = z.highest_position().filter(|&p| p >= num_qubits) {
                return Err(OperatorError::PositionOutOfRange {
                    position,
                    num_qubits,
                });
            }
            op.add_term(z, coeff);
        }
        Ok(op)
    }

    /// A single-position factor embedded in the register.
    pub fn factor(num_qubits: usize, position: usize, factor: Factor) -> Result<Self, OperatorError> {
        if num_qubits > MAX_QUBITS {
            return Err(OperatorError::RegisterTooWide(num_qubits));
        }
        if position >= num_qubits {
            return Err(OperatorError::PositionOutOfRange {
                position,
                num_qubits,
            });
        }
        let (i_coeff, z_coeff) = factor.expansion();
        let mut op = Self::zero(num_qubits);
        op.add_term(ZString::IDENTITY, i_coeff);
        op.add_term(ZString::single(position), z_coeff);
        Ok(op.simplify())
    }

    /// Tensor product of factors on distinct positions; unlisted positions carry identity.
    pub fn product(num_qubits: usize, factors: &[(usize, Factor)]) -> Result<Self, OperatorError> {
        factors
            .iter()
            .try_fold(Self::identity(num_qubits, 1.0), |acc, &(position, f)| {
                Ok(&acc * &Self::factor(num_qubits, position, f)?)
            })
    }

    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of stored terms.
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = (ZString, f64)> + '_ {
        self.terms.iter().map(|(&z, &c)| (z, c))
    }

    pub fn coefficient(&self, z: ZString) -> f64 {
        self.terms.get(&z).copied().unwrap_or(0.0)
    }

    /// Coefficient of the identity term.
    pub fn constant(&self) -> f64 {
        self.coefficient(ZString::IDENTITY)
    }

    pub(crate) fn add_term(&mut self, z: ZString, coeff: f64) {
        *self.terms.entry(z).or_insert(0.0) += coeff;
    }

    /// Drops terms whose coefficient magnitude is within [`COEFFICIENT_TOLERANCE`].
    pub fn simplify(mut self) -> Self {
        self.terms.retain(|_, c| c.abs() > COEFFICIENT_TOLERANCE);
        self
    }

    pub fn scale(mut self, factor: f64) -> Self {
        for c in self.terms.values_mut() {
            *c *= factor;
        }
        self
    }

    /// Returns the same terms over a register of a different width.
    pub fn with_num_qubits(self, num_qubits: usize) -> Result<Self, OperatorError> {
        Self::from_terms(num_qubits, self.terms)
    }

    /// Union of all positions that carry `Z` in at least one term.
    pub fn support(&self) -> ZString {
        ZString::from_bits(self.terms.keys().fold(0u128, |acc, z| acc | z.bits()))
    }

    /// Classical value of the operator on a basis state.
    ///
    /// Bit `p` of `assignment` is the value of qubit `p`.
    pub fn evaluate(&self, assignment: u128) -> f64 {
        self.terms.iter().map(|(z, c)| c * z.sign(assignment)).sum()
    }

    /// Maps every term through `f` and re-accumulates the result over `num_qubits` qubits.
    pub(crate) fn map_terms<F>(&self, num_qubits: usize, mut f: F) -> Self
    where
        F: FnMut(ZString, f64) -> (ZString, f64),
    {
        let mut out = Self::zero(num_qubits);
        for (&z, &c) in &self.terms {
            let (z, c) = f(z, c);
            out.add_term(z, c);
        }
        out
    }
}

impl fmt::Display for QubitOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (i, (z, c)) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} * {}", c, z.label(self.num_qubits))?;
        }
        Ok(())
    }
}

impl AddAssign<&QubitOperator> for QubitOperator {
    fn add_assign(&mut self, rhs: &QubitOperator) {
        self.num_qubits = self.num_qubits.max(rhs.num_qubits);
        for (&z, &c) in &rhs.terms {
            self.add_term(z, c);
        }
    }
}

impl AddAssign for QubitOperator {
    fn add_assign(&mut self, rhs: QubitOperator) {
        *self += &rhs;
    }
}

impl Add for QubitOperator {
    type Output = QubitOperator;

    fn add(mut self, rhs: QubitOperator) -> QubitOperator {
        self += &rhs;
        self
    }
}

impl Add<&QubitOperator> for &QubitOperator {
    type Output = QubitOperator;

    fn add(self, rhs: &QubitOperator) -> QubitOperator {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

impl Neg for QubitOperator {
    type Output = QubitOperator;

    fn neg(self) -> QubitOperator {
        self.scale(-1.0)
    }
}

impl Sub for QubitOperator {
    type Output = QubitOperator;

    fn sub(self, rhs: QubitOperator) -> QubitOperator {
        self + (-rhs)
    }
}

impl Mul<&QubitOperator> for &QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: &QubitOperator) -> QubitOperator {
        let mut out = QubitOperator::zero(self.num_qubits.max(rhs.num_qubits));
        for (&za, &ca) in &self.terms {
            for (&zb, &cb) in &rhs.terms {
                out.add_term(za.compose(zb), ca * cb);
            }
        }
        out
    }
}

impl Mul for QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: QubitOperator) -> QubitOperator {
        &self * &rhs
    }
}

impl Mul<f64> for QubitOperator {
    type Output = QubitOperator;

    fn mul(self, rhs: f64) -> QubitOperator {
        self.scale(rhs)
    }
}

impl std::iter::Sum for QubitOperator {
    fn sum<I: Iterator<Item = QubitOperator>>(iter: I) -> QubitOperator {
        iter.fold(QubitOperator::default(), |acc, op| acc + op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_check(op: &QubitOperator, expected: impl Fn(u128) -> f64) {
        for assignment in 0..(1u128 << op.num_qubits()) {
            let value = op.evaluate(assignment);
            assert!(
                (value - expected(assignment)).abs() < 1e-12,
                "assignment {:b}: got {}, expected {}",
                assignment,
                value,
                expected(assignment)
            );
        }
    }

    #[test]
    fn projectors_select_bit_values() {
        let one = QubitOperator::factor(3, 1, Factor::ProjectOne).unwrap();
        let zero = QubitOperator::factor(3, 1, Factor::ProjectZero).unwrap();
        brute_force_check(&one, |a| ((a >> 1) & 1) as f64);
        brute_force_check(&zero, |a| 1.0 - ((a >> 1) & 1) as f64);
    }

    #[test]
    fn factor_out_of_range_is_rejected() {
        let err = QubitOperator::factor(2, 2, Factor::PauliZ).unwrap_err();
        assert_eq!(
            err,
            OperatorError::PositionOutOfRange {
                position: 2,
                num_qubits: 2
            }
        );
        assert_eq!(
            QubitOperator::factor(129, 0, Factor::PauliZ).unwrap_err(),
            OperatorError::RegisterTooWide(129)
        );
    }

    #[test]
    fn product_of_projectors_is_an_indicator() {
        let op = QubitOperator::product(
            4,
            &[(0, Factor::ProjectOne), (3, Factor::ProjectZero)],
        )
        .unwrap();
        brute_force_check(&op, |a| if a & 1 == 1 && (a >> 3) & 1 == 0 { 1.0 } else { 0.0 });
        assert_eq!(op.len(), 4);
    }

    #[test]
    fn multiplication_composes_z_strings() {
        let z0 = QubitOperator::factor(2, 0, Factor::PauliZ).unwrap();
        let squared = &z0 * &z0;
        assert_eq!(squared, QubitOperator::identity(2, 1.0));
    }

    #[test]
    fn subtraction_and_simplify_remove_cancelled_terms() {
        let a = QubitOperator::factor(2, 0, Factor::ProjectOne).unwrap();
        let diff = (a.clone() - a).simplify();
        assert!(diff.is_zero());
    }

    #[test]
    fn simplify_drops_only_tiny_coefficients() {
        let op = QubitOperator::from_terms(
            2,
            [
                (ZString::IDENTITY, 1e-12),
                (ZString::single(0), 1e-9),
                (ZString::single(1), -2.0),
            ],
        )
        .unwrap()
        .simplify();
        assert_eq!(op.len(), 2);
        assert_eq!(op.constant(), 0.0);
        assert_eq!(op.coefficient(ZString::single(1)), -2.0);
    }

    #[test]
    fn addition_order_does_not_change_result() {
        let parts: Vec<QubitOperator> = (0..4)
            .map(|p| {
                QubitOperator::factor(4, p, Factor::ProjectOne)
                    .unwrap()
                    .scale(p as f64 + 0.5)
            })
            .collect();
        let forward: QubitOperator = parts.iter().cloned().sum();
        let backward: QubitOperator = parts.iter().rev().cloned().sum();
        assert_eq!(forward.clone().simplify(), backward.simplify());
        assert_eq!(forward.num_qubits(), 4);
    }

    #[test]
    fn mixed_widths_combine_over_wider_register() {
        let narrow = QubitOperator::factor(2, 1, Factor::PauliZ).unwrap();
        let wide = QubitOperator::factor(5, 4, Factor::PauliZ).unwrap();
        let product = &narrow * &wide;
        assert_eq!(product.num_qubits(), 5);
        assert_eq!(product.coefficient(ZString::from_positions([1, 4])), 1.0);
    }

    #[test]
    fn from_terms_rejects_positions_outside_register() {
        let err = QubitOperator::from_terms(3, [(ZString::single(3), 1.0)]).unwrap_err();
        assert!(matches!(err, OperatorError::PositionOutOfRange { position: 3, .. }));
    }

    #[test]
    fn support_collects_every_z_position() {
        let op = QubitOperator::from_terms(
            6,
            [
                (ZString::from_positions([0, 2]), 1.0),
                (ZString::single(5), 1.0),
                (ZString::IDENTITY, 3.0),
            ],
        )
        .unwrap();
        assert_eq!(op.support(), ZString::from_positions([0, 2, 5]));
    }

    #[test]
    fn display_lists_terms_with_labels() {
        let op = QubitOperator::from_terms(2, [(ZString::single(0), 2.0)]).unwrap();
        assert_eq!(op.to_string(), "2 * IZ");
        assert_eq!(QubitOperator::zero(3).to_string(), "0");
    }
}
