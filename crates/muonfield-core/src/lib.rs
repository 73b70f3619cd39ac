//! # Muonfield Core
//!
//! The numerical backbone of the Muonfield framework. This crate computes
//! point-dipole interaction tensors and local magnetic fields at candidate
//! muon sites in a periodic crystal carrying a (possibly incommensurate)
//! magnetic structure.
//!
//! ## Architecture
//!
//! The pipeline runs strictly forward:
//!
//! 1. [`supercell`] sizes a replication of the unit cell that contains the
//!    cutoff sphere.
//! 2. [`images`] enumerates the lattice translations of that supercell.
//! 3. [`moments`] resolves a gyromagnetic ratio per atom.
//! 4. [`spins`] evaluates every atom's moment in every image from the
//!    propagation vector and Fourier amplitude.
//! 5. [`fields`] sums point-dipole tensors within the cutoff at each probe.
//!
//! All of this is orchestrated by [`solver::dipolar::DipolarSolver`], which
//! implements the [`solver::LocalFieldSolver`] trait.
//!
//! ## Modules
//!
//! - [`types`]: Magnetic model, moment type, parameters and result containers.
//! - [`constants`]: Physical constants (CODATA 2018 by default).
//! - [`supercell`]: Minimal supercell sizing.
//! - [`images`]: Lattice image generation.
//! - [`moments`]: Electronic and nuclear gyromagnetic ratios.
//! - [`spins`]: Instantaneous spin field from `k` and `fc`.
//! - [`fields`]: Per-probe dipolar tensor and field accumulation.
//! - [`solver`]: Solver trait, errors and the dipolar implementation.

pub mod constants;
pub mod fields;
pub mod images;
pub mod moments;
pub mod solver;
pub mod spins;
pub mod supercell;
pub mod types;
