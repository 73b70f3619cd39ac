//! Minimal supercell sizing.
//!
//! A parallelepiped spanned by $n_i \mathbf{a}_i$ has thickness $n_i d_i$
//! across the planes parallel to the other two vectors, where
//! $d_i = 1/|\mathbf{b}_i|$ is the interplanar spacing. Its inscribed sphere
//! therefore has radius $\min_i n_i d_i / 2$, and the smallest counts whose
//! inscribed sphere reaches radius $r$ are
//!
//! $$ n_i = \max\bigl(1, \lceil 2r / d_i \rceil\bigr). $$
//!
//! Sizing depends only on the lattice and the radius, never on the atoms.
//!
//! The lattice sum itself enumerates [`ImageBounds`]: the offsets $m$ for
//! which some atom copy $\mathbf{f}_i + m$ can lie within $r$ of some probe.
//! A displacement of length $\le r$ changes fractional coordinate $i$ by at
//! most $r/d_i$, so along each axis
//!
//! $$ \lceil p_{\min} - f_{\max} - r/d_i \rceil \le m_i \le
//!    \lfloor p_{\max} - f_{\min} + r/d_i \rfloor. $$
//!
//! Coordinates outside $[0, 1)$ simply move the window.

use muonfield_structure::lattice::Lattice;
use nalgebra::Matrix3;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::solver::{validate_radius, DipolarError};

/// Largest number of lattice images a single computation may enumerate.
pub const MAX_IMAGES: usize = 1 << 24;

/// Relative slack on the fractional window so rounding never drops a site
/// lying exactly on the cutoff.
const WINDOW_SLACK: f64 = 1e-9;

/// Number of unit-cell repetitions along each lattice vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupercellSize(pub [usize; 3]);

impl SupercellSize {
    pub fn counts(&self) -> [usize; 3] {
        self.0
    }

    /// Total number of cells in the supercell.
    pub fn total_cells(&self) -> usize {
        self.0.iter().product()
    }

    /// Radius of the sphere inscribed in the replicated lattice (Å).
    pub fn inscribed_radius(&self, lattice: &Lattice) -> f64 {
        lattice
            .interplanar_spacings()
            .iter()
            .zip(self.0.iter())
            .map(|(d, &n)| n as f64 * d / 2.0)
            .fold(f64::INFINITY, f64::min)
    }

}

/// Smallest supercell whose inscribed sphere has radius ≥ `radius` (Å).
pub fn minimal_supercell(lattice: &Lattice, radius: f64) -> Result<SupercellSize, DipolarError> {
    validate_radius(radius)?;

    let spacings = lattice.interplanar_spacings();
    let cells = spacings.map(|d| (2.0 * radius / d).ceil().max(1.0));
    check_image_count(cells)?;
    let counts = cells.map(|n| n as usize);

    log::debug!(
        "Minimal supercell for r = {radius} Å: {counts:?} (spacings {:.4?} Å)",
        spacings
    );
    Ok(SupercellSize(counts))
}

/// Inclusive range of lattice offsets along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageBounds {
    pub lo: [i32; 3],
    pub hi: [i32; 3],
}

impl ImageBounds {
    /// Number of offsets along each axis (zero when the window holds no integer).
    pub fn size(&self) -> SupercellSize {
        SupercellSize([0, 1, 2].map(|i| (self.hi[i] - self.lo[i] + 1).max(0) as usize))
    }
}

/// Offsets whose atom copies can fall within `radius` of any probe.
///
/// `atoms` and `probes` are fractional and may lie anywhere; the window
/// follows their actual extent.
pub fn image_bounds(
    lattice: &Lattice,
    radius: f64,
    atoms: &[[f64; 3]],
    probes: &[[f64; 3]],
) -> Result<ImageBounds, DipolarError> {
    validate_radius(radius)?;

    let spacings = lattice.interplanar_spacings();
    let mut lo = [0.0; 3];
    let mut hi = [0.0; 3];
    for axis in 0..3 {
        let (f_min, f_max) = extent(atoms, axis)?;
        let (p_min, p_max) = extent(probes, axis)?;
        let reach = radius / spacings[axis];
        let slack = WINDOW_SLACK * (1.0 + reach);
        lo[axis] = (p_min - f_max - reach - slack).ceil();
        hi[axis] = (p_max - f_min + reach + slack).floor();
    }
    check_image_count([0, 1, 2].map(|i| (hi[i] - lo[i] + 1.0).max(0.0)))?;
    if lo.iter().chain(hi.iter()).any(|v| v.abs() > f64::from(i32::MAX / 2)) {
        return Err(DipolarError::InvalidArgument(format!(
            "image offsets {lo:?}..={hi:?} are out of range"
        )));
    }

    let bounds = ImageBounds {
        lo: lo.map(|v| v as i32),
        hi: hi.map(|v| v as i32),
    };
    log::debug!("Image window for r = {radius} Å: {:?}..={:?}", bounds.lo, bounds.hi);
    Ok(bounds)
}

/// Smallest and largest value of one fractional coordinate (0 for an empty list).
fn extent(coords: &[[f64; 3]], axis: usize) -> Result<(f64, f64), DipolarError> {
    if coords.is_empty() {
        return Ok((0.0, 0.0));
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for c in coords {
        let v = c[axis];
        if !v.is_finite() {
            return Err(DipolarError::MalformedInput(format!(
                "non-finite fractional coordinate {c:?}"
            )));
        }
        min = min.min(v);
        max = max.max(v);
    }
    Ok((min, max))
}

fn check_image_count(cells: [f64; 3]) -> Result<(), DipolarError> {
    let total: f64 = cells.iter().product();
    if !(total <= MAX_IMAGES as f64) {
        return Err(DipolarError::InvalidArgument(format!(
            "cutoff needs {cells:?} cells, more than the limit of {MAX_IMAGES} images"
        )));
    }
    Ok(())
}

/// Build a [`Lattice`] from a raw array whose rows are the lattice vectors.
///
/// Anything other than a finite, non-singular 3×3 matrix is `MalformedInput`.
pub fn lattice_from_array(cell: ArrayView2<'_, f64>) -> Result<Lattice, DipolarError> {
    if cell.dim() != (3, 3) {
        return Err(DipolarError::MalformedInput(format!(
            "lattice matrix must be 3x3, got {:?}",
            cell.dim()
        )));
    }
    let matrix = Matrix3::from_fn(|i, j| cell[[i, j]]);
    Ok(Lattice::new(matrix)?)
}

/// [`minimal_supercell`] for a raw lattice array.
pub fn minimal_supercell_from_array(
    cell: ArrayView2<'_, f64>,
    radius: f64,
) -> Result<SupercellSize, DipolarError> {
    validate_radius(radius)?;
    let lattice = lattice_from_array(cell)?;
    minimal_supercell(&lattice, radius)
}
