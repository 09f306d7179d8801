use std::fmt;

/// Widest register a [`ZString`] can address.
pub const MAX_QUBITS: usize = 128;

/// Single-position factor used when building a tensor-product term.
///
/// With the convention `Z|b> = (-1)^b |b>`, the two projectors are diagonal
/// combinations of the identity and the Pauli-Z operator:
///
/// | Factor        | Operator      | Value on bit 0 | Value on bit 1 |
/// |---------------|---------------|----------------|----------------|
/// | `Identity`    | `I`           | 1              | 1              |
/// | `ProjectZero` | `(I + Z) / 2` | 1              | 0              |
/// | `ProjectOne`  | `(I - Z) / 2` | 0              | 1              |
/// | `PauliZ`      | `Z`           | 1              | -1             |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Factor {
    Identity,
    ProjectZero,
    ProjectOne,
    PauliZ,
}

impl Factor {
    /// The projector that selects the given classical bit value.
    pub fn project(bit: bool) -> Self {
        if bit {
            Factor::ProjectOne
        } else {
            Factor::ProjectZero
        }
    }

    /// Expansion of the factor as `(identity_coeff, z_coeff)`.
    pub(crate) fn expansion(self) -> (f64, f64) {
        match self {
            Factor::Identity => (1.0, 0.0),
            Factor::ProjectZero => (0.5, 0.5),
            Factor::ProjectOne => (0.5, -0.5),
            Factor::PauliZ => (0.0, 1.0),
        }
    }
}

/// Canonical key of a diagonal Pauli term: the set of positions carrying `Z`.
///
/// Every other position carries the identity. Two terms compose by symmetric
/// difference of their position sets because `Z * Z = I`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ZString(u128);

impl ZString {
    pub const IDENTITY: ZString = ZString(0);

    pub fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub fn single(position: usize) -> Self {
        debug_assert!(position < MAX_QUBITS);
        Self(1u128 << position)
    }

    pub fn from_positions<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        positions
            .into_iter()
            .fold(Self::IDENTITY, |acc, p| acc.compose(Self::single(p)))
    }

    #[inline]
    pub fn bits(self) -> u128 {
        self.0
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn contains(self, position: usize) -> bool {
        position < MAX_QUBITS && (self.0 >> position) & 1 == 1
    }

    /// Number of `Z` factors in the term.
    #[inline]
    pub fn weight(self) -> u32 {
        self.0.count_ones()
    }

    /// Highest position carrying `Z`, if any.
    pub fn highest_position(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(MAX_QUBITS - 1 - self.0.leading_zeros() as usize)
        }
    }

    #[inline]
    pub fn compose(self, other: ZString) -> ZString {
        ZString(self.0 ^ other.0)
    }

    pub fn positions(self) -> impl Iterator<Item = usize> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            let p = remaining.trailing_zeros() as usize;
            remaining &= remaining - 1;
            Some(p)
        })
    }

    /// Eigenvalue sign of the term on a classical assignment (bit `p` of `assignment`
    /// is the value of qubit `p`).
    #[inline]
    pub fn sign(self, assignment: u128) -> f64 {
        if (self.0 & assignment).count_ones() % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Removes the given positions from the register, shifting higher positions down.
    ///
    /// `removed` must be sorted in ascending order. A `Z` sitting on a removed position
    /// is dropped together with the position.
    pub fn remove_positions(self, removed: &[usize]) -> ZString {
        let mut out = 0u128;
        for p in self.positions() {
            let shift = removed.partition_point(|&r| r < p);
            if removed.get(shift) == Some(&p) {
                continue;
            }
            out |= 1u128 << (p - shift);
        }
        ZString(out)
    }

    /// Inverse of [`ZString::remove_positions`]: reinserts identity at the given positions.
    pub fn insert_positions(self, inserted: &[usize]) -> ZString {
        let mut out = 0u128;
        for p in self.positions() {
            let mut full = p;
            for &i in inserted {
                if i <= full {
                    full += 1;
                } else {
                    break;
                }
            }
            out |= 1u128 << full;
        }
        ZString(out)
    }

    /// Pauli label with the highest position first, e.g. `IZIZ` for positions {0, 2}.
    pub fn label(self, num_qubits: usize) -> String {
        (0..num_qubits)
            .rev()
            .map(|p| if self.contains(p) { 'Z' } else { 'I' })
            .collect()
    }

    /// Parses a label produced by [`ZString::label`]. Returns `None` on characters
    /// other than `I` and `Z` or labels wider than [`MAX_QUBITS`].
    pub fn parse_label(label: &str) -> Option<ZString> {
        let width = label.chars().count();
        if width > MAX_QUBITS {
            return None;
        }
        let mut bits = 0u128;
        for (p, c) in label.chars().rev().enumerate() {
            match c {
                'I' => {}
                'Z' => bits |= 1u128 << p,
                _ => return None,
            }
        }
        Some(ZString(bits))
    }
}

impl fmt::Display for ZString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.highest_position().map_or(1, |p| p + 1);
        write!(f, "{}", self.label(width))
    }
}
