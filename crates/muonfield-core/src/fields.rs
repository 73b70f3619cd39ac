//! Local dipolar field at a probe site.
//!
//! Once the positions and spins of every (image, atom) pair are known, the
//! field at a probe site $\mathbf{r}_\mu$ is
//!
//! $$
//! \mathbf{B}(\mathbf{r}_\mu) = \sum_{|\mathbf{r}_j - \mathbf{r}_\mu| \le r_c}
//! \mathbf{T}(\mathbf{r}_j - \mathbf{r}_\mu) \cdot \mathbf{S}_j
//! $$

use muonfield_structure::lattice::Lattice;
use nalgebra::Vector3;
use ndarray::Array2;

use crate::solver::dipolar::tensor::dipolar_tensor;
use crate::solver::DipolarError;
use crate::types::{Neighbour, ProbeField, Tensor3x3};

/// Positions and spins of every (image, atom) pair, with per-atom tensor prefactors.
///
/// Rows of `positions` and `spins` are laid out as `m·N + i` for image `m`
/// and atom `i`.
#[derive(Debug, Clone)]
pub struct ImageSites {
    positions: Array2<f64>,
    spins: Array2<f64>,
    prefactors: Vec<f64>,
    offsets: Vec<[i32; 3]>,
}

impl ImageSites {
    pub fn new(
        positions: Array2<f64>,
        spins: Array2<f64>,
        prefactors: Vec<f64>,
        offsets: Vec<[i32; 3]>,
    ) -> Result<Self, DipolarError> {
        let expected = (offsets.len() * prefactors.len(), 3);
        if positions.dim() != expected || spins.dim() != expected {
            return Err(DipolarError::MalformedInput(format!(
                "positions {:?} and spins {:?} must both have shape {:?}",
                positions.dim(),
                spins.dim(),
                expected
            )));
        }
        Ok(Self {
            positions,
            spins,
            prefactors,
            offsets,
        })
    }

    pub fn num_atoms(&self) -> usize {
        self.prefactors.len()
    }

    pub fn num_images(&self) -> usize {
        self.offsets.len()
    }

    fn row(array: &Array2<f64>, r: usize) -> Vector3<f64> {
        Vector3::new(array[[r, 0]], array[[r, 1]], array[[r, 2]])
    }
}

/// Accumulate tensors and field at one probe site.
///
/// Every site with distance ≤ `radius` (inclusive) contributes. A site
/// coinciding with the probe is reported as
/// [`DipolarError::UndefinedGeometry`].
pub fn local_field_at(
    sites: &ImageSites,
    lattice: &Lattice,
    probe_index: usize,
    probe_fractional: [f64; 3],
    radius: f64,
) -> Result<ProbeField, DipolarError> {
    let probe = lattice.frac_to_cart(&probe_fractional);
    let n = sites.num_atoms();

    let mut neighbours = Vec::new();
    let mut tensor_sum = Tensor3x3::zeros();
    let mut field = Vector3::zeros();

    for row in 0..sites.positions.nrows() {
        let displacement = ImageSites::row(&sites.positions, row) - probe;
        let distance = displacement.norm();
        if distance > radius {
            continue;
        }

        let atom = row % n;
        let image = sites.offsets[row / n];
        let tensor = dipolar_tensor(&displacement, sites.prefactors[atom]).ok_or(
            DipolarError::UndefinedGeometry {
                probe: probe_index,
                atom,
                image,
            },
        )?;

        field += tensor * ImageSites::row(&sites.spins, row);
        tensor_sum += tensor;
        neighbours.push(Neighbour {
            atom,
            image,
            displacement,
            distance,
            tensor,
        });
    }

    log::trace!(
        "Probe {probe_index} at {probe_fractional:?}: {} neighbours within {radius} Å",
        neighbours.len()
    );

    Ok(ProbeField {
        probe_fractional,
        probe_cartesian: probe,
        neighbours,
        tensor_sum,
        field,
    })
}
