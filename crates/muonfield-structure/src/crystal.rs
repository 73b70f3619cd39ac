//! Crystal structures: a lattice, its atoms and the candidate muon sites.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::lattice::Lattice;
use crate::StructureError;

/// A single atom in the unit cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    /// Chemical symbol (e.g. "Fe", "O").
    pub species: String,
    /// Fractional coordinates, nominally in [0, 1).
    pub fractional: [f64; 3],
}

impl Atom {
    pub fn new(species: impl Into<String>, fractional: [f64; 3]) -> Self {
        Self {
            species: species.into(),
            fractional,
        }
    }
}

/// What the field engine needs to know about a crystal.
///
/// Positions and probe sites are fractional; the engine derives Cartesian
/// coordinates through [`lattice`](CrystalStructure::lattice).
pub trait CrystalStructure {
    /// The lattice of the unit cell.
    fn lattice(&self) -> &Lattice;

    /// Chemical symbol of every atom, in atom order.
    fn species(&self) -> Vec<&str>;

    /// Fractional position of every atom, in atom order.
    fn fractional_positions(&self) -> Vec<[f64; 3]>;

    /// Fractional coordinates of the candidate muon sites.
    fn probe_sites(&self) -> &[[f64; 3]];

    /// Cartesian position of every atom (Å).
    fn cartesian_positions(&self) -> Vec<Vector3<f64>> {
        let lattice = self.lattice();
        self.fractional_positions()
            .iter()
            .map(|f| lattice.frac_to_cart(f))
            .collect()
    }

    /// Number of atoms in the unit cell.
    fn num_atoms(&self) -> usize {
        self.fractional_positions().len()
    }
}

/// Owned crystal structure with muon-site bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crystal {
    lattice: Lattice,
    atoms: Vec<Atom>,
    #[serde(default)]
    probe_sites: Vec<[f64; 3]>,
}

impl Crystal {
    /// An empty crystal on the given lattice.
    pub fn new(lattice: Lattice) -> Self {
        Self {
            lattice,
            atoms: Vec::new(),
            probe_sites: Vec::new(),
        }
    }

    /// Build a crystal from a list of atoms, validating each one.
    pub fn with_atoms(lattice: Lattice, atoms: Vec<Atom>) -> Result<Self, StructureError> {
        for (index, atom) in atoms.iter().enumerate() {
            validate_atom(index, atom)?;
        }
        Ok(Self {
            lattice,
            atoms,
            probe_sites: Vec::new(),
        })
    }

    /// Append an atom to the unit cell.
    pub fn add_atom(
        &mut self,
        species: impl Into<String>,
        fractional: [f64; 3],
    ) -> Result<(), StructureError> {
        let atom = Atom::new(species, fractional);
        validate_atom(self.atoms.len(), &atom)?;
        self.atoms.push(atom);
        Ok(())
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Register a candidate muon site (fractional coordinates).
    pub fn add_probe_site(&mut self, fractional: [f64; 3]) -> Result<(), StructureError> {
        if fractional.iter().any(|v| !v.is_finite()) {
            return Err(StructureError::NonFinite(format!(
                "probe site {}",
                self.probe_sites.len()
            )));
        }
        self.probe_sites.push(fractional);
        Ok(())
    }

    /// Remove every registered muon site.
    pub fn clear_probe_sites(&mut self) {
        self.probe_sites.clear();
    }

    /// Cartesian coordinates of the registered muon sites (Å).
    pub fn probe_sites_cartesian(&self) -> Vec<Vector3<f64>> {
        self.probe_sites
            .iter()
            .map(|f| self.lattice.frac_to_cart(f))
            .collect()
    }
}

fn validate_atom(index: usize, atom: &Atom) -> Result<(), StructureError> {
    if atom.species.trim().is_empty() {
        return Err(StructureError::InvalidSpecies {
            index,
            label: atom.species.clone(),
        });
    }
    if atom.fractional.iter().any(|v| !v.is_finite()) {
        return Err(StructureError::NonFinite(format!("position of atom {index}")));
    }
    Ok(())
}

impl CrystalStructure for Crystal {
    fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    fn species(&self) -> Vec<&str> {
        self.atoms.iter().map(|a| a.species.as_str()).collect()
    }

    fn fractional_positions(&self) -> Vec<[f64; 3]> {
        self.atoms.iter().map(|a| a.fractional).collect()
    }

    fn probe_sites(&self) -> &[[f64; 3]] {
        &self.probe_sites
    }

    fn num_atoms(&self) -> usize {
        self.atoms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rock_salt() -> Crystal {
        let lattice = Lattice::cubic(4.0).unwrap();
        Crystal::with_atoms(
            lattice,
            vec![Atom::new("Na", [0.0, 0.0, 0.0]), Atom::new("Cl", [0.5, 0.5, 0.5])],
        )
        .unwrap()
    }

    #[test]
    fn test_cartesian_positions_follow_lattice() {
        let crystal = rock_salt();
        let cart = crystal.cartesian_positions();
        assert_eq!(cart.len(), 2);
        assert_abs_diff_eq!(cart[1].x, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cart[1].y, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(cart[1].z, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_probe_site_bookkeeping() {
        let mut crystal = rock_salt();
        crystal.add_probe_site([0.25, 0.25, 0.25]).unwrap();
        crystal.add_probe_site([0.5, 0.0, 0.0]).unwrap();
        assert_eq!(crystal.probe_sites().len(), 2);
        assert_abs_diff_eq!(crystal.probe_sites_cartesian()[1].x, 2.0, epsilon = 1e-12);

        assert!(crystal.add_probe_site([f64::INFINITY, 0.0, 0.0]).is_err());
        assert_eq!(crystal.probe_sites().len(), 2);

        crystal.clear_probe_sites();
        assert!(crystal.probe_sites().is_empty());
    }

    #[test]
    fn test_blank_species_rejected() {
        let mut crystal = rock_salt();
        let err = crystal.add_atom("  ", [0.1, 0.1, 0.1]).unwrap_err();
        assert_eq!(
            err,
            StructureError::InvalidSpecies { index: 2, label: "  ".into() }
        );
    }

    #[test]
    fn test_species_order_matches_atoms() {
        let crystal = rock_salt();
        assert_eq!(crystal.species(), vec!["Na", "Cl"]);
        assert_eq!(crystal.num_atoms(), 2);
    }
}
