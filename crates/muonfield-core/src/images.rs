//! Lattice image generation.
//!
//! Enumerates every cell of a supercell as an integer offset and its
//! Cartesian translation `offset · A`. Offsets along an axis with `n` cells
//! run over `-(n-1)/2 ..= n/2` (integer division): symmetric for odd `n`,
//! one extra step on the positive side for even `n`.
//!
//! [`LatticeImages::from_bounds`] instead enumerates an explicit
//! [`ImageBounds`] window, which need not contain the origin.
//!
//! Iteration order is lexicographic in the offsets with the first axis
//! slowest, and is the same for every accessor, so arrays built from the
//! same [`LatticeImages`] can be zipped positionally.

use std::ops::RangeInclusive;

use muonfield_structure::lattice::Lattice;
use nalgebra::Vector3;
use ndarray::Array2;

use crate::supercell::{ImageBounds, SupercellSize};

/// One periodic copy of the unit cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeImage {
    /// Integer offset in lattice coordinates.
    pub offset: [i32; 3],
    /// Cartesian translation (Å).
    pub translation: Vector3<f64>,
}

/// The images of a supercell, generated on demand.
#[derive(Debug, Clone)]
pub struct LatticeImages {
    lo: [i32; 3],
    size: SupercellSize,
    lattice: Lattice,
}

/// Offsets along one axis with `n` cells.
pub fn axis_range(n: usize) -> RangeInclusive<i32> {
    let n = n as i32;
    -((n - 1) / 2)..=n / 2
}

impl LatticeImages {
    /// Origin-centred images of a supercell.
    pub fn new(size: SupercellSize, lattice: &Lattice) -> Self {
        Self {
            lo: size.counts().map(|n| *axis_range(n).start()),
            size,
            lattice: lattice.clone(),
        }
    }

    /// Every offset inside `bounds`.
    pub fn from_bounds(bounds: ImageBounds, lattice: &Lattice) -> Self {
        Self {
            lo: bounds.lo,
            size: bounds.size(),
            lattice: lattice.clone(),
        }
    }

    pub fn size(&self) -> SupercellSize {
        self.size
    }

    /// Number of images.
    pub fn len(&self) -> usize {
        self.size.total_cells()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Integer offsets in iteration order. Each call starts afresh.
    pub fn offsets(&self) -> impl Iterator<Item = [i32; 3]> {
        let counts = self.size.counts();
        let [r0, r1, r2] = [0, 1, 2].map(|a| self.lo[a]..self.lo[a] + counts[a] as i32);
        r0.flat_map(move |i| {
            let r2 = r2.clone();
            r1.clone().flat_map(move |j| r2.clone().map(move |k| [i, j, k]))
        })
    }

    /// Images (offset and translation) in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = LatticeImage> + '_ {
        self.offsets().map(move |offset| LatticeImage {
            offset,
            translation: self.lattice.frac_to_cart(&offset.map(f64::from)),
        })
    }

    /// Fractional offsets as an (M, 3) array.
    pub fn fractional(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.len(), 3));
        for (m, offset) in self.offsets().enumerate() {
            for c in 0..3 {
                out[[m, c]] = f64::from(offset[c]);
            }
        }
        out
    }

    /// Cartesian translations as an (M, 3) array (Å).
    pub fn cartesian(&self) -> Array2<f64> {
        let mut out = Array2::<f64>::zeros((self.len(), 3));
        for (m, image) in self.iter().enumerate() {
            for c in 0..3 {
                out[[m, c]] = image.translation[c];
            }
        }
        out
    }

    /// Translate every unit-cell position into every image.
    ///
    /// Row `m·N + i` is atom `i` of image `m`, shape (M·N, 3).
    pub fn replicate(&self, positions: &[Vector3<f64>]) -> Array2<f64> {
        let n = positions.len();
        let mut out = Array2::<f64>::zeros((self.len() * n, 3));
        for (m, image) in self.iter().enumerate() {
            for (i, p) in positions.iter().enumerate() {
                let r = p + image.translation;
                for c in 0..3 {
                    out[[m * n + i, c]] = r[c];
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_axis_ranges() {
        assert_eq!(axis_range(1), 0..=0);
        assert_eq!(axis_range(2), 0..=1);
        assert_eq!(axis_range(3), -1..=1);
        assert_eq!(axis_range(4), -1..=2);
        assert_eq!(axis_range(5), -2..=2);
    }

    #[test]
    fn test_count_and_order() {
        let lattice = Lattice::cubic(1.0).unwrap();
        let images = LatticeImages::new(SupercellSize([3, 1, 2]), &lattice);
        let offsets: Vec<_> = images.offsets().collect();
        assert_eq!(images.len(), 6);
        assert_eq!(
            offsets,
            vec![[-1, 0, 0], [-1, 0, 1], [0, 0, 0], [0, 0, 1], [1, 0, 0], [1, 0, 1]]
        );
        // Restartable
        assert_eq!(images.offsets().collect::<Vec<_>>(), offsets);
    }

    #[test]
    fn test_explicit_bounds() {
        let lattice = Lattice::cubic(1.0).unwrap();
        let bounds = ImageBounds { lo: [2, -1, 0], hi: [3, -1, 0] };
        let images = LatticeImages::from_bounds(bounds, &lattice);
        assert_eq!(images.len(), 2);
        assert_eq!(images.offsets().collect::<Vec<_>>(), vec![[2, -1, 0], [3, -1, 0]]);
        assert_abs_diff_eq!(images.cartesian()[[1, 0]], 3.0, epsilon = 1e-12);

        let empty = ImageBounds { lo: [1, 0, 0], hi: [0, 0, 0] };
        let images = LatticeImages::from_bounds(empty, &lattice);
        assert!(images.is_empty());
        assert_eq!(images.offsets().count(), 0);
    }

    #[test]
    fn test_fractional_and_cartesian_agree() {
        let lattice = Lattice::from_parameters(3.0, 4.0, 5.0, 80.0, 95.0, 110.0).unwrap();
        let images = LatticeImages::new(SupercellSize([3, 4, 2]), &lattice);
        let frac = images.fractional();
        let cart = images.cartesian();
        assert_eq!(frac.nrows(), images.len());
        for m in 0..images.len() {
            let expected = lattice.frac_to_cart(&[frac[[m, 0]], frac[[m, 1]], frac[[m, 2]]]);
            for c in 0..3 {
                assert_abs_diff_eq!(cart[[m, c]], expected[c], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_replicate_layout() {
        let lattice = Lattice::cubic(2.0).unwrap();
        let images = LatticeImages::new(SupercellSize([3, 1, 1]), &lattice);
        let atoms = [Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0)];
        let out = images.replicate(&atoms);
        assert_eq!(out.dim(), (6, 3));
        // image 0 is offset (-1, 0, 0)
        assert_abs_diff_eq!(out[[0, 0]], -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[[1, 0]], -1.0, epsilon = 1e-12);
        // image 2 is offset (1, 0, 0), atom 1
        assert_abs_diff_eq!(out[[5, 0]], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(out[[5, 1]], 1.0, epsilon = 1e-12);
    }
}
