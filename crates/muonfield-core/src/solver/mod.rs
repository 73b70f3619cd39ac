//! Local-field solver abstraction and implementations.
//!
//! The [`LocalFieldSolver`] trait defines the interface that every local
//! field method implements. The point-dipole lattice sum
//! ([`dipolar::DipolarSolver`]) is the only implementation.

pub mod dipolar;

use muonfield_isotopes::provider::IsotopeError;
use muonfield_structure::crystal::CrystalStructure;
use muonfield_structure::StructureError;
use thiserror::Error;

use crate::types::{MagneticModel, MomentType, ProbeField};

/// Errors that can occur during a local-field computation.
///
/// Any error aborts the whole call; there are no partial results.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DipolarError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Missing isotope data: {0}")]
    MissingData(#[from] IsotopeError),

    #[error("Undefined geometry: atom {atom} of image {image:?} coincides with probe site {probe}")]
    UndefinedGeometry {
        probe: usize,
        atom: usize,
        image: [i32; 3],
    },
}

impl From<StructureError> for DipolarError {
    fn from(err: StructureError) -> Self {
        DipolarError::MalformedInput(err.to_string())
    }
}

/// The core trait that local-field methods implement.
pub trait LocalFieldSolver {
    /// Compute the dipolar tensor and local field at every probe site of
    /// `structure`, summing all magnetic sites within `radius` (Å).
    ///
    /// Results are in probe-site order.
    fn compute_dipolar_fields(
        &self,
        structure: &dyn CrystalStructure,
        model: &MagneticModel,
        radius: f64,
        moment_type: MomentType,
    ) -> Result<Vec<ProbeField>, DipolarError>;

    /// Human-readable name of the method.
    fn method_name(&self) -> &str;
}

/// Reject non-positive or non-finite cutoff radii.
pub(crate) fn validate_radius(radius: f64) -> Result<(), DipolarError> {
    if !radius.is_finite() || radius <= 0.0 {
        return Err(DipolarError::InvalidArgument(format!(
            "cutoff radius must be positive and finite, got {radius}"
        )));
    }
    Ok(())
}
