//! Point-dipole lattice sum.
//!
//! The local field at a muon site is approximated by the sum of point-dipole
//! fields from every magnetic site inside a sphere of radius $r_c$. The
//! sphere is filled by replicating the unit cell over the lattice offsets of
//! [`image_bounds`], which follows the actual extent of the atom and probe
//! coordinates. Every site within $r_c$ of every probe is seen, including
//! probes and atoms given outside the home cell.
//!
//! # Parallelism
//!
//! Probe sites are independent. With `parallel` set they are evaluated on
//! the rayon thread pool; each probe's sum is still sequential, so results
//! match the serial path exactly.

pub mod tensor;

use std::sync::Arc;

use muonfield_isotopes::provider::IsotopeProvider;
use muonfield_isotopes::table::IsotopeTable;
use muonfield_structure::crystal::CrystalStructure;
use rayon::prelude::*;

use super::{validate_radius, DipolarError, LocalFieldSolver};
use crate::constants::PhysicalConstants;
use crate::fields::{local_field_at, ImageSites};
use crate::images::LatticeImages;
use crate::moments::gyromagnetic_ratios;
use crate::spins::build_spin_field;
use crate::supercell::{image_bounds, minimal_supercell};
use crate::types::{DipolarParams, MagneticModel, MomentType, ProbeField};

/// The dipolar solver, holding its injected collaborators.
#[derive(Clone)]
pub struct DipolarSolver {
    /// Physical constants entering γ_e and the tensor prefactor.
    pub constants: PhysicalConstants,
    /// Isotope data for nuclear moments.
    pub isotopes: Arc<dyn IsotopeProvider>,
    /// Evaluate probe sites in parallel.
    pub parallel: bool,
}

impl Default for DipolarSolver {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            isotopes: Arc::new(IsotopeTable::natural()),
            parallel: false,
        }
    }
}

impl std::fmt::Debug for DipolarSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DipolarSolver")
            .field("constants", &self.constants)
            .field("isotopes", &self.isotopes.name())
            .field("parallel", &self.parallel)
            .finish()
    }
}

impl DipolarSolver {
    pub fn new(constants: PhysicalConstants, isotopes: Arc<dyn IsotopeProvider>) -> Self {
        Self {
            constants,
            isotopes,
            parallel: false,
        }
    }

    /// Toggle parallel evaluation of probe sites.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run with radius and moment type taken from `params`.
    pub fn run(
        &self,
        structure: &dyn CrystalStructure,
        model: &MagneticModel,
        params: &DipolarParams,
    ) -> Result<Vec<ProbeField>, DipolarError> {
        params.validate()?;
        let solver = self.clone().with_parallel(self.parallel || params.parallel);
        solver.compute_dipolar_fields(structure, model, params.radius, params.moment_type)
    }

    /// Build the (image, atom) position, spin and prefactor arrays.
    fn build_sites(
        &self,
        structure: &dyn CrystalStructure,
        model: &MagneticModel,
        radius: f64,
        moment_type: MomentType,
    ) -> Result<ImageSites, DipolarError> {
        let lattice = structure.lattice();
        let fractional = structure.fractional_positions();
        if model.num_atoms() != fractional.len() {
            return Err(DipolarError::MalformedInput(format!(
                "magnetic model describes {} atoms, structure has {}",
                model.num_atoms(),
                fractional.len()
            )));
        }

        let minimal = minimal_supercell(lattice, radius)?;
        let bounds = image_bounds(lattice, radius, &fractional, structure.probe_sites())?;
        let images = LatticeImages::from_bounds(bounds, lattice);
        log::debug!(
            "Minimal supercell {:?}, summing over {:?}: {} images",
            minimal.counts(),
            bounds.size().counts(),
            images.len()
        );

        let ratios = gyromagnetic_ratios(
            &structure.species(),
            moment_type,
            self.isotopes.as_ref(),
            &self.constants,
        )?;
        let prefactors = ratios
            .iter()
            .map(|&gamma| self.constants.dipolar_prefactor(gamma))
            .collect();

        let spins = build_spin_field(&fractional, model, &images)?;
        let positions = images.replicate(&structure.cartesian_positions());

        ImageSites::new(positions, spins, prefactors, images.offsets().collect())
    }
}

impl LocalFieldSolver for DipolarSolver {
    fn compute_dipolar_fields(
        &self,
        structure: &dyn CrystalStructure,
        model: &MagneticModel,
        radius: f64,
        moment_type: MomentType,
    ) -> Result<Vec<ProbeField>, DipolarError> {
        validate_radius(radius)?;
        validate_fractional("atom", &structure.fractional_positions())?;
        validate_fractional("probe site", structure.probe_sites())?;

        let sites = self.build_sites(structure, model, radius, moment_type)?;
        let lattice = structure.lattice();
        let probes = structure.probe_sites();

        log::info!(
            "Dipolar sum ({moment_type}): {} probe sites, {} atoms x {} images, r = {radius} Å",
            probes.len(),
            sites.num_atoms(),
            sites.num_images()
        );

        if self.parallel {
            probes
                .par_iter()
                .enumerate()
                .map(|(i, &p)| local_field_at(&sites, lattice, i, p, radius))
                .collect()
        } else {
            probes
                .iter()
                .enumerate()
                .map(|(i, &p)| local_field_at(&sites, lattice, i, p, radius))
                .collect()
        }
    }

    fn method_name(&self) -> &str {
        "Point-dipole lattice sum"
    }
}

/// Reject NaN or infinite fractional coordinates.
fn validate_fractional(what: &str, coords: &[[f64; 3]]) -> Result<(), DipolarError> {
    match coords.iter().position(|c| c.iter().any(|v| !v.is_finite())) {
        Some(index) => Err(DipolarError::MalformedInput(format!(
            "{what} {index} has non-finite fractional coordinates {:?}",
            coords[index]
        ))),
        None => Ok(()),
    }
}

/// Compute dipolar tensors and fields with CODATA constants and the bundled
/// isotope table.
pub fn compute_dipolar_fields(
    structure: &dyn CrystalStructure,
    model: &MagneticModel,
    radius: f64,
    moment_type: MomentType,
) -> Result<Vec<ProbeField>, DipolarError> {
    DipolarSolver::default().compute_dipolar_fields(structure, model, radius, moment_type)
}
