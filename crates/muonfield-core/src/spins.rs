//! Instantaneous spin field from a propagation vector.
//!
//! For image $m$ with lattice offset $\mathbf{R}_m$ and atom $i$ at
//! fractional position $\mathbf{f}_i$:
//!
//! $$ \mathbf{S}_{m,i} = \operatorname{Re}\bigl[\mathbf{F}_i\,
//!    e^{-2\pi i\, \mathbf{k} \cdot (\mathbf{f}_i + \mathbf{R}_m)}\bigr] $$
//!
//! With $\mathbf{k} = 0$ every image carries $\operatorname{Re}\,\mathbf{F}_i$.

use ndarray::Array2;
use num_complex::Complex64;

use crate::images::LatticeImages;
use crate::solver::DipolarError;
use crate::types::MagneticModel;

/// Evaluate the real spin of every (image, atom) pair.
///
/// Returns an (M·N, 3) array with row `m·N + i`, matching
/// [`LatticeImages::replicate`].
pub fn build_spin_field(
    fractional: &[[f64; 3]],
    model: &MagneticModel,
    images: &LatticeImages,
) -> Result<Array2<f64>, DipolarError> {
    let n = fractional.len();
    if model.num_atoms() != n {
        return Err(DipolarError::MalformedInput(format!(
            "magnetic model describes {} atoms, structure has {}",
            model.num_atoms(),
            n
        )));
    }

    let mut spins = Array2::<f64>::zeros((images.len() * n, 3));

    if model.is_uniform() {
        let static_spins = model.fc.mapv(|c| c.re);
        for m in 0..images.len() {
            spins
                .slice_mut(ndarray::s![m * n..(m + 1) * n, ..])
                .assign(&static_spins);
        }
        return Ok(spins);
    }

    let k = model.k;
    for (m, offset) in images.offsets().enumerate() {
        for (i, f) in fractional.iter().enumerate() {
            let kdotr: f64 = (0..3)
                .map(|c| k[c] * (f[c] + f64::from(offset[c])))
                .sum();
            let phase = Complex64::new(0.0, -2.0 * std::f64::consts::PI * kdotr).exp();
            for c in 0..3 {
                spins[[m * n + i, c]] = (model.fc[[i, c]] * phase).re;
            }
        }
    }

    Ok(spins)
}
