//! Crystal lattice: three basis vectors stored as the rows of a 3×3 matrix.
//!
//! A fractional coordinate $\mathbf{f}$ maps to Cartesian space through the
//! row-vector product $\mathbf{r} = \mathbf{f} \cdot \mathbf{A}$, i.e.
//! $\mathbf{r} = \sum_i f_i \mathbf{a}_i$.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::StructureError;

/// Smallest |det| accepted for a lattice matrix (Å³).
pub const MIN_CELL_VOLUME: f64 = 1e-12;

/// A non-degenerate 3D lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
pub struct Lattice {
    /// Rows are the lattice vectors a, b, c (Å).
    vectors: Matrix3<f64>,
    /// Reciprocal vectors (without the 2π factor) as rows, so that
    /// $\mathbf{a}_i \cdot \mathbf{b}_j = \delta_{ij}$.
    reciprocal: Matrix3<f64>,
}

impl Lattice {
    /// Build a lattice from a matrix whose rows are the lattice vectors.
    pub fn new(vectors: Matrix3<f64>) -> Result<Self, StructureError> {
        if vectors.iter().any(|v| !v.is_finite()) {
            return Err(StructureError::NonFinite("lattice matrix".into()));
        }

        let determinant = vectors.determinant();
        if determinant.abs() <= MIN_CELL_VOLUME {
            return Err(StructureError::SingularLattice { determinant });
        }

        let inverse = vectors
            .try_inverse()
            .ok_or(StructureError::SingularLattice { determinant })?;

        Ok(Self {
            vectors,
            reciprocal: inverse.transpose(),
        })
    }

    /// Build a lattice from row-major lattice vectors.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Result<Self, StructureError> {
        Self::new(Matrix3::from_row_slice(&[
            rows[0][0], rows[0][1], rows[0][2],
            rows[1][0], rows[1][1], rows[1][2],
            rows[2][0], rows[2][1], rows[2][2],
        ]))
    }

    /// Simple cubic lattice with edge `a`.
    pub fn cubic(a: f64) -> Result<Self, StructureError> {
        Self::new(Matrix3::identity() * a)
    }

    /// Build a lattice from cell lengths (Å) and angles (degrees).
    ///
    /// Uses the standard setting: **a** along x, **b** in the xy plane.
    pub fn from_parameters(
        a: f64,
        b: f64,
        c: f64,
        alpha: f64,
        beta: f64,
        gamma: f64,
    ) -> Result<Self, StructureError> {
        if a <= 0.0 || b <= 0.0 || c <= 0.0 {
            return Err(StructureError::InvalidParameters(format!(
                "cell lengths must be positive, got ({a}, {b}, {c})"
            )));
        }

        let (ca, cb, cg) = (
            alpha.to_radians().cos(),
            beta.to_radians().cos(),
            gamma.to_radians().cos(),
        );
        let sg = gamma.to_radians().sin();
        if sg.abs() < 1e-12 {
            return Err(StructureError::InvalidParameters(format!(
                "gamma = {gamma} degrees collapses a and b"
            )));
        }

        let cy = (ca - cb * cg) / sg;
        let cz_sq = 1.0 - cb * cb - cy * cy;
        if cz_sq <= 0.0 {
            return Err(StructureError::InvalidParameters(format!(
                "angles ({alpha}, {beta}, {gamma}) do not describe a 3D cell"
            )));
        }

        Self::from_rows([
            [a, 0.0, 0.0],
            [b * cg, b * sg, 0.0],
            [c * cb, c * cy, c * cz_sq.sqrt()],
        ])
    }

    /// The lattice matrix (rows = lattice vectors).
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.vectors
    }

    /// Reciprocal basis without the 2π factor (rows = b₁, b₂, b₃).
    pub fn reciprocal(&self) -> &Matrix3<f64> {
        &self.reciprocal
    }

    /// Spacing between adjacent lattice planes parallel to each pair of
    /// basis vectors: $d_i = 1 / |\mathbf{b}_i|$.
    pub fn interplanar_spacings(&self) -> [f64; 3] {
        let mut d = [0.0; 3];
        for (i, di) in d.iter_mut().enumerate() {
            *di = 1.0 / self.reciprocal.row(i).norm();
        }
        d
    }

    /// Convert fractional coordinates to Cartesian (Å).
    pub fn frac_to_cart(&self, frac: &[f64; 3]) -> Vector3<f64> {
        self.vectors.transpose() * Vector3::new(frac[0], frac[1], frac[2])
    }
}

impl TryFrom<[[f64; 3]; 3]> for Lattice {
    type Error = StructureError;

    fn try_from(rows: [[f64; 3]; 3]) -> Result<Self, Self::Error> {
        Self::from_rows(rows)
    }
}

impl From<Lattice> for [[f64; 3]; 3] {
    fn from(lattice: Lattice) -> Self {
        let m = lattice.vectors;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_singular_lattice_rejected() {
        let err = Lattice::from_rows([[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap_err();
        assert!(matches!(err, StructureError::SingularLattice { .. }));
    }

    #[test]
    fn test_non_finite_lattice_rejected() {
        let err = Lattice::from_rows([[f64::NAN, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
            .unwrap_err();
        assert!(matches!(err, StructureError::NonFinite(_)));
    }

    #[test]
    fn test_reciprocal_is_dual_basis() {
        let lat = Lattice::from_parameters(3.0, 4.0, 5.0, 80.0, 95.0, 110.0).unwrap();
        let product = lat.matrix() * lat.reciprocal().transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(product[(i, j)], expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cubic_spacings_equal_edge() {
        let lat = Lattice::cubic(2.5).unwrap();
        for d in lat.interplanar_spacings() {
            assert_abs_diff_eq!(d, 2.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_hexagonal_spacing() {
        // d_100 of a hexagonal cell is a·sin(60°)
        let lat = Lattice::from_parameters(3.0, 3.0, 5.0, 90.0, 90.0, 120.0).unwrap();
        let d = lat.interplanar_spacings();
        assert_abs_diff_eq!(d[0], 3.0 * 60f64.to_radians().sin(), epsilon = 1e-10);
        assert_abs_diff_eq!(d[2], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn test_impossible_angles_rejected() {
        assert!(Lattice::from_parameters(1.0, 1.0, 1.0, 10.0, 10.0, 170.0).is_err());
    }
}
