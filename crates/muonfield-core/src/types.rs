//! Core types shared across the Muonfield engine.
//!
//! This module defines the magnetic model consumed by the engine, the
//! run parameters, and the per-probe result containers.

use std::fmt;
use std::str::FromStr;

use nalgebra::{Matrix3, Vector3};
use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::solver::{validate_radius, DipolarError};

/// Real 3×3 dipolar tensor (T per unit spin).
pub type Tensor3x3 = Matrix3<f64>;

/// A magnetic structure described by a single propagation vector.
///
/// The moment of atom $i$ in the cell translated by $\mathbf{R}_m$ is
/// $\operatorname{Re}\bigl[\mathbf{F}_i \exp(-2\pi i\, \mathbf{k} \cdot (\mathbf{f}_i + \mathbf{R}_m))\bigr]$.
#[derive(Debug, Clone, PartialEq)]
pub struct MagneticModel {
    /// Propagation vector in reciprocal lattice units.
    pub k: [f64; 3],
    /// Complex Fourier amplitude per atom, shape (N, 3).
    pub fc: Array2<Complex64>,
}

impl MagneticModel {
    /// Build a model, checking that `fc` has three columns and everything is finite.
    pub fn new(k: [f64; 3], fc: Array2<Complex64>) -> Result<Self, DipolarError> {
        if k.iter().any(|v| !v.is_finite()) {
            return Err(DipolarError::MalformedInput(format!(
                "propagation vector must be finite, got {k:?}"
            )));
        }
        if fc.ncols() != 3 {
            return Err(DipolarError::MalformedInput(format!(
                "Fourier amplitudes must have shape (N, 3), got {:?}",
                fc.dim()
            )));
        }
        if fc.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
            return Err(DipolarError::MalformedInput(
                "Fourier amplitudes contain non-finite values".into(),
            ));
        }
        Ok(Self { k, fc })
    }

    /// A static, k = 0 structure with real moments.
    pub fn ferromagnetic(moments: &[[f64; 3]]) -> Self {
        let mut fc = Array2::<Complex64>::zeros((moments.len(), 3));
        for (i, m) in moments.iter().enumerate() {
            for c in 0..3 {
                fc[[i, c]] = Complex64::from(m[c]);
            }
        }
        Self { k: [0.0; 3], fc }
    }

    /// Number of atoms the amplitudes describe.
    pub fn num_atoms(&self) -> usize {
        self.fc.nrows()
    }

    /// Whether `k` is exactly zero.
    pub fn is_uniform(&self) -> bool {
        self.k.iter().all(|&v| v == 0.0)
    }

    /// The same structure with every amplitude multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            k: self.k,
            fc: self.fc.mapv(|c| c * factor),
        }
    }
}

/// Which moments produce the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentType {
    /// Electronic moments; one γ_e for every atom.
    #[default]
    Electronic,
    /// Nuclear moments; γ looked up per species.
    Nuclear,
}

impl FromStr for MomentType {
    type Err = DipolarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "electronic" => Ok(MomentType::Electronic),
            "nuclear" => Ok(MomentType::Nuclear),
            other => Err(DipolarError::InvalidArgument(format!(
                "unsupported moment type '{other}' (expected 'electronic' or 'nuclear')"
            ))),
        }
    }
}

impl fmt::Display for MomentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MomentType::Electronic => write!(f, "electronic"),
            MomentType::Nuclear => write!(f, "nuclear"),
        }
    }
}

/// Parameters defining a local-field run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DipolarParams {
    /// Cutoff radius of the lattice sum (Å).
    pub radius: f64,
    /// Source of the magnetic moments.
    pub moment_type: MomentType,
    /// Evaluate probe sites on the rayon thread pool.
    pub parallel: bool,
}

impl Default for DipolarParams {
    fn default() -> Self {
        Self {
            radius: 50.0,
            moment_type: MomentType::Electronic,
            parallel: false,
        }
    }
}

impl DipolarParams {
    /// Parse parameters from TOML; missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, DipolarError> {
        let params: Self = toml::from_str(content)
            .map_err(|e| DipolarError::InvalidArgument(format!("invalid configuration: {e}")))?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), DipolarError> {
        validate_radius(self.radius)
    }
}

/// One magnetic site within the cutoff sphere of a probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbour {
    /// Index of the atom in the unit cell.
    pub atom: usize,
    /// Lattice offset of the image the atom sits in.
    pub image: [i32; 3],
    /// Neighbour position minus probe position (Å).
    pub displacement: Vector3<f64>,
    /// |displacement| (Å).
    pub distance: f64,
    /// Point-dipole tensor of this neighbour.
    pub tensor: Tensor3x3,
}

/// Dipolar tensor and local field at a single probe site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeField {
    /// Probe position (fractional).
    pub probe_fractional: [f64; 3],
    /// Probe position (Å).
    pub probe_cartesian: Vector3<f64>,
    /// Individual contributions, in image-major, atom-minor order.
    pub neighbours: Vec<Neighbour>,
    /// Sum of all neighbour tensors.
    pub tensor_sum: Tensor3x3,
    /// Local dipolar field (T).
    pub field: Vector3<f64>,
}

impl ProbeField {
    /// |B| (T).
    pub fn field_magnitude(&self) -> f64 {
        self.field.norm()
    }

    pub fn neighbour_count(&self) -> usize {
        self.neighbours.len()
    }

    /// Per-neighbour tensors in neighbour order.
    pub fn tensors(&self) -> impl Iterator<Item = &Tensor3x3> + '_ {
        self.neighbours.iter().map(|n| &n.tensor)
    }
}
