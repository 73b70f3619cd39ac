//! Gyromagnetic ratio of the moment carried by each atom.

use muonfield_isotopes::provider::IsotopeProvider;

use crate::constants::PhysicalConstants;
use crate::solver::DipolarError;
use crate::types::MomentType;

/// Resolve γ (rad s⁻¹ T⁻¹) for every atom.
///
/// Electronic moments share $\gamma_e = \mu_B g_e / \hbar$. Nuclear moments
/// are looked up per species; a species without isotope data fails the
/// whole call with [`DipolarError::MissingData`].
pub fn gyromagnetic_ratios(
    species: &[&str],
    moment_type: MomentType,
    isotopes: &dyn IsotopeProvider,
    constants: &PhysicalConstants,
) -> Result<Vec<f64>, DipolarError> {
    match moment_type {
        MomentType::Electronic => {
            let gamma = constants.electron_gyromagnetic_ratio();
            Ok(vec![gamma; species.len()])
        }
        MomentType::Nuclear => species
            .iter()
            .map(|s| isotopes.gyromagnetic_ratio(s).map_err(DipolarError::from))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use muonfield_isotopes::provider::IsotopeError;
    use muonfield_isotopes::table::IsotopeTable;

    #[test]
    fn test_electronic_ratio_ignores_species() {
        let table = IsotopeTable::natural();
        let constants = PhysicalConstants::default();
        let ratios = gyromagnetic_ratios(
            &["Fe", "O", "Unobtainium"],
            MomentType::Electronic,
            &table,
            &constants,
        )
        .unwrap();
        assert_eq!(ratios.len(), 3);
        assert!(ratios.iter().all(|&g| g == constants.electron_gyromagnetic_ratio()));
    }

    #[test]
    fn test_nuclear_ratio_per_species() {
        let table = IsotopeTable::natural();
        let ratios = gyromagnetic_ratios(
            &["H", "F"],
            MomentType::Nuclear,
            &table,
            &PhysicalConstants::default(),
        )
        .unwrap();
        assert_eq!(ratios[0], table.gyromagnetic_ratio("H").unwrap());
        assert_eq!(ratios[1], table.gyromagnetic_ratio("F").unwrap());
        assert_ne!(ratios[0], ratios[1]);
    }

    #[test]
    fn test_missing_isotope_is_propagated() {
        let table = IsotopeTable::natural();
        let err = gyromagnetic_ratios(
            &["H", "Xx"],
            MomentType::Nuclear,
            &table,
            &PhysicalConstants::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DipolarError::MissingData(IsotopeError::UnknownElement("Xx".into()))
        );
    }
}
