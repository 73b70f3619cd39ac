//! Point-dipole interaction tensor.
//!
//! The field at displacement $\mathbf{r}$ from a point dipole is linear in
//! its spin through the tensor
//!
//! $$
//! \mathbf{T}(\mathbf{r}) = \frac{C}{|\mathbf{r}|^3}
//! \left( \frac{3\,\mathbf{r}\mathbf{r}^T}{|\mathbf{r}|^2} - \mathbf{I} \right)
//! $$
//!
//! where $C$ is [`PhysicalConstants::dipolar_prefactor`](crate::constants::PhysicalConstants::dipolar_prefactor).
//! $\mathbf{T}$ is symmetric and traceless, and even in $\mathbf{r}$.

use nalgebra::{Matrix3, Vector3};

use crate::types::Tensor3x3;

/// Separations below this (Å) are treated as coincident.
pub const COINCIDENCE_TOLERANCE: f64 = 1e-10;

/// Compute the 3×3 point-dipole tensor for displacement `r` (Å).
///
/// Returns `None` when `|r|` is below [`COINCIDENCE_TOLERANCE`]: the
/// point-dipole field is undefined at zero separation.
pub fn dipolar_tensor(r: &Vector3<f64>, prefactor: f64) -> Option<Tensor3x3> {
    let r_sq = r.norm_squared();
    let dist = r_sq.sqrt();
    if dist < COINCIDENCE_TOLERANCE {
        return None;
    }

    let scale = prefactor / (r_sq * dist);
    let dyad = r * r.transpose() * (3.0 / r_sq);
    Some((dyad - Matrix3::identity()) * scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_axial_displacement() {
        // r along x: T = C/r³ · diag(2, -1, -1)
        let t = dipolar_tensor(&Vector3::new(0.5, 0.0, 0.0), 1.0).unwrap();
        assert_abs_diff_eq!(t[(0, 0)], 16.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(1, 1)], -8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(2, 2)], -8.0, epsilon = 1e-12);
        assert_abs_diff_eq!(t[(0, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_symmetric_and_traceless() {
        let displacements = [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-0.3, 0.01, 7.5),
            Vector3::new(4.0, -4.0, 0.5),
        ];
        for r in &displacements {
            let t = dipolar_tensor(r, 0.93).unwrap();
            assert_abs_diff_eq!(t.trace(), 0.0, epsilon = 1e-12);
            for i in 0..3 {
                for j in 0..3 {
                    assert_abs_diff_eq!(t[(i, j)], t[(j, i)], epsilon = 1e-15);
                }
            }
        }
    }

    #[test]
    fn test_even_in_displacement() {
        let r = Vector3::new(1.2, -0.7, 0.4);
        let a = dipolar_tensor(&r, 1.0).unwrap();
        let b = dipolar_tensor(&(-r), 1.0).unwrap();
        assert_abs_diff_eq!(a, b, epsilon = 1e-14);
    }

    #[test]
    fn test_coincident_points_undefined() {
        assert!(dipolar_tensor(&Vector3::zeros(), 1.0).is_none());
    }
}
