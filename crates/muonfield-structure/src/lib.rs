//! # Muonfield Structure
//!
//! Crystal-structure representation for the Muonfield framework. This crate
//! provides:
//!
//! - **Lattices** ([`lattice`]): Validated 3×3 cells with fractional →
//!   Cartesian conversion and interplanar spacings.
//! - **Crystals** ([`crystal`]): Atoms with species labels, plus the list of
//!   candidate muon (probe) sites.
//!
//! The [`CrystalStructure`](crystal::CrystalStructure) trait is the seam the
//! field engine consumes, so callers can plug in their own structure types.
//!
//! All lengths are in angstroms.

pub mod crystal;
pub mod lattice;

use thiserror::Error;

/// Errors raised while building or editing a crystal structure.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructureError {
    #[error("Lattice is singular (|det| = {determinant:.3e})")]
    SingularLattice { determinant: f64 },

    #[error("Non-finite value in {0}")]
    NonFinite(String),

    #[error("Invalid cell parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid species label at atom {index}: '{label}'")]
    InvalidSpecies { index: usize, label: String },
}
