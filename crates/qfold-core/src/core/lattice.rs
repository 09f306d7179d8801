//! Tetrahedral (diamond) lattice geometry.
//!
//! Beads live on the two interpenetrating sublattices of the diamond lattice. A bead on
//! sublattice parity `p` reaches its four neighbours through the steps `(-1)^p * D[d]`,
//! where `D` holds four of the cube's body diagonals. Lattice vectors are kept in integer
//! units where every bond has squared length 3.

use nalgebra::{Point3, Vector3};

pub type LatticeVector = Vector3<i64>;

pub const NUM_DIRECTIONS: usize = 4;

/// Squared length of a single lattice bond in integer units.
pub const BOND_LENGTH_SQUARED: i64 = 3;

const DIRECTIONS: [[i64; 3]; NUM_DIRECTIONS] = [[-1, 1, 1], [1, 1, -1], [-1, -1, -1], [1, -1, 1]];

/// Unsigned direction vector `D[d]`, or `None` for an index outside `0..4`.
pub fn direction(d: usize) -> Option<LatticeVector> {
    DIRECTIONS.get(d).map(|&[x, y, z]| LatticeVector::new(x, y, z))
}

#[inline]
pub fn parity_sign(parity: usize) -> i64 {
    if parity % 2 == 0 { 1 } else { -1 }
}

/// Step taken when leaving a bead of the given parity in direction `d`.
pub fn step(parity: usize, d: usize) -> Option<LatticeVector> {
    direction(d).map(|v| v * parity_sign(parity))
}

/// All displacements from a bead of the given parity to its lattice neighbours.
pub fn neighbor_offsets(parity: usize) -> [LatticeVector; NUM_DIRECTIONS] {
    let sign = parity_sign(parity);
    DIRECTIONS.map(|[x, y, z]| LatticeVector::new(x, y, z) * sign)
}

#[inline]
pub fn squared_length(v: &LatticeVector) -> i64 {
    v.dot(v)
}

/// Converts a lattice vector to Cartesian coordinates where one bond has `bond_length`.
pub fn to_cartesian(v: &LatticeVector, bond_length: f64) -> Point3<f64> {
    let scale = bond_length / (BOND_LENGTH_SQUARED as f64).sqrt();
    Point3::from(v.map(|c| c as f64 * scale))
}
