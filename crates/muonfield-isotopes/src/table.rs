//! Tabulated NMR isotope data.
//!
//! Spins, gyromagnetic ratios and natural abundances of the magnetically
//! active isotopes of common elements, from the IUPAC NMR nomenclature
//! recommendations (Harris et al., *Pure Appl. Chem.* **73**, 1795, 2001).
//!
//! Data is embedded at compile time. γ values are stored in units of
//! 10⁶ rad s⁻¹ T⁻¹ in the source table and converted on load.

use std::collections::BTreeMap;

use crate::provider::{normalise_symbol, IsotopeData, IsotopeError, IsotopeProvider};

const GAMMA_UNIT: f64 = 1e6;

/// (symbol, A, I, γ / 10⁶ rad s⁻¹ T⁻¹, abundance %)
#[rustfmt::skip]
const NMR_ISOTOPES: &[(&str, u16, f64, f64, f64)] = &[
    ("H",    1, 0.5,  267.522_128, 99.9885),
    ("H",    2, 1.0,   41.066_279,  0.0115),
    ("He",   3, 0.5, -203.801_587,  0.000_134),
    ("Li",   6, 1.0,   39.371_709,  7.59),
    ("Li",   7, 1.5,  103.977_013, 92.41),
    ("Be",   9, 1.5,  -37.596_66, 100.0),
    ("B",   10, 3.0,   28.746_786, 19.9),
    ("B",   11, 1.5,   85.847_044, 80.1),
    ("C",   13, 0.5,   67.282_84,   1.07),
    ("N",   14, 1.0,   19.337_792, 99.632),
    ("N",   15, 0.5,  -27.116_18,   0.368),
    ("O",   17, 2.5,  -36.280_8,    0.038),
    ("F",   19, 0.5,  251.814_8,  100.0),
    ("Na",  23, 1.5,   70.808_493, 100.0),
    ("Mg",  25, 2.5,  -16.388_4,   10.0),
    ("Al",  27, 2.5,   69.762_715, 100.0),
    ("Si",  29, 0.5,  -53.190,      4.6832),
    ("P",   31, 0.5,  108.394,    100.0),
    ("S",   33, 1.5,   20.556_85,   0.76),
    ("Cl",  35, 1.5,   26.241_98,  75.78),
    ("Cl",  37, 1.5,   21.843_68,  24.22),
    ("K",   39, 1.5,   12.500_608, 93.2581),
    ("Ca",  43, 3.5,  -18.003_0,    0.135),
    ("Ti",  47, 2.5,  -15.105_0,    7.44),
    ("Ti",  49, 3.5,  -15.109_5,    5.41),
    ("V",   51, 3.5,   70.455_7,   99.750),
    ("Cr",  53, 1.5,  -15.152_0,    9.501),
    ("Mn",  55, 2.5,   66.452_5,  100.0),
    ("Fe",  57, 0.5,    8.680_624,  2.119),
    ("Co",  59, 3.5,   63.32,     100.0),
    ("Ni",  61, 1.5,  -23.947_0,    1.1399),
    ("Cu",  63, 1.5,   71.117_89,  69.15),
    ("Cu",  65, 1.5,   76.043_5,   30.85),
    ("Zn",  67, 2.5,   16.766_9,    4.10),
    ("Ga",  69, 1.5,   64.388_55,  60.108),
    ("Ga",  71, 1.5,   81.811_71,  39.892),
    ("As",  75, 1.5,   45.822_8,  100.0),
    ("Se",  77, 0.5,   51.253_77,   7.63),
    ("Rb",  85, 2.5,   25.927_05,  72.17),
    ("Rb",  87, 1.5,   87.864_0,   27.83),
    ("Sr",  87, 4.5,  -11.639_3,    7.00),
    ("Y",   89, 0.5,  -13.162_79, 100.0),
    ("Nb",  93, 4.5,   65.567,    100.0),
    ("Mo",  95, 2.5,  -17.433,     15.90),
    ("Ag", 107, 0.5,  -10.889_19,  51.839),
    ("Ag", 109, 0.5,  -12.518_6,   48.161),
    ("Sn", 119, 0.5, -100.317_0,    8.59),
    ("Sb", 121, 2.5,   64.016_5,   57.21),
    ("Te", 125, 0.5,  -85.108_4,    7.07),
    ("I",  127, 2.5,   53.895_7,  100.0),
    ("Cs", 133, 3.5,   35.332_6,  100.0),
    ("Ba", 137, 1.5,   29.929_5,   11.232),
    ("La", 139, 3.5,   38.083_3,   99.910),
    ("Pt", 195, 0.5,   58.385,     33.832),
    ("Bi", 209, 4.5,   43.750,    100.0),
];

/// An in-memory isotope table with optional per-element isotope overrides.
#[derive(Debug, Clone)]
pub struct IsotopeTable {
    name: String,
    elements: BTreeMap<String, Vec<IsotopeData>>,
    overrides: BTreeMap<String, u16>,
}

impl IsotopeTable {
    /// A table with no entries.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elements: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }

    /// The embedded NMR isotope dataset.
    pub fn natural() -> Self {
        let mut table = Self::empty("NMR isotopes (IUPAC 2001)");
        for &(symbol, mass_number, spin, gamma, abundance) in NMR_ISOTOPES {
            table
                .elements
                .entry(symbol.to_string())
                .or_default()
                .push(IsotopeData {
                    mass_number,
                    spin,
                    gamma: gamma * GAMMA_UNIT,
                    abundance,
                });
        }
        table
    }

    /// Add (or replace) data for one isotope of `symbol`.
    pub fn insert(&mut self, symbol: &str, data: IsotopeData) -> Result<(), IsotopeError> {
        if !data.gamma.is_finite() || !data.abundance.is_finite() || data.spin < 0.0 {
            return Err(IsotopeError::InvalidData(format!(
                "{}{}: spin={}, gamma={}, abundance={}",
                data.mass_number, symbol, data.spin, data.gamma, data.abundance
            )));
        }

        let isotopes = self.elements.entry(normalise_symbol(symbol)).or_default();
        match isotopes.iter_mut().find(|i| i.mass_number == data.mass_number) {
            Some(existing) => *existing = data,
            None => isotopes.push(data),
        }
        Ok(())
    }

    /// Select isotope `mass_number` for `symbol` instead of the default.
    pub fn with_override(mut self, symbol: &str, mass_number: u16) -> Result<Self, IsotopeError> {
        let symbol = normalise_symbol(symbol);
        let isotopes = self
            .elements
            .get(&symbol)
            .ok_or_else(|| IsotopeError::UnknownElement(symbol.clone()))?;

        if !isotopes.iter().any(|i| i.mass_number == mass_number) {
            return Err(IsotopeError::UnknownIsotope { symbol, mass_number });
        }

        self.overrides.insert(symbol, mass_number);
        Ok(self)
    }

    /// All tabulated isotopes of `symbol`.
    pub fn isotopes(&self, symbol: &str) -> Option<&[IsotopeData]> {
        self.elements.get(&normalise_symbol(symbol)).map(Vec::as_slice)
    }
}

impl Default for IsotopeTable {
    fn default() -> Self {
        Self::natural()
    }
}

impl IsotopeProvider for IsotopeTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn isotope(&self, symbol: &str) -> Result<IsotopeData, IsotopeError> {
        let symbol = normalise_symbol(symbol);
        let isotopes = self
            .elements
            .get(&symbol)
            .ok_or_else(|| IsotopeError::UnknownElement(symbol.clone()))?;

        if let Some(&mass_number) = self.overrides.get(&symbol) {
            return isotopes
                .iter()
                .find(|i| i.mass_number == mass_number)
                .copied()
                .ok_or(IsotopeError::UnknownIsotope { symbol, mass_number });
        }

        isotopes
            .iter()
            .filter(|i| i.spin > 0.0)
            .max_by(|a, b| a.abundance.total_cmp(&b.abundance))
            .copied()
            .ok_or(IsotopeError::NoMagneticIsotope(symbol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_proton_gamma() {
        let table = IsotopeTable::natural();
        let gamma = table.gyromagnetic_ratio("H").unwrap();
        assert_relative_eq!(gamma, 2.675_221_28e8, max_relative = 1e-9);
    }

    #[test]
    fn test_default_is_most_abundant_magnetic_isotope() {
        let table = IsotopeTable::natural();
        assert_eq!(table.isotope("Cu").unwrap().mass_number, 63);
        assert_eq!(table.isotope("B").unwrap().mass_number, 11);
        // Only the rare 13C carries a nuclear moment
        assert_eq!(table.isotope("C").unwrap().mass_number, 13);
    }

    #[test]
    fn test_labels_are_normalised() {
        let table = IsotopeTable::natural();
        assert_eq!(
            table.gyromagnetic_ratio("Fe2").unwrap(),
            table.gyromagnetic_ratio("Fe").unwrap()
        );
    }

    #[test]
    fn test_unknown_element() {
        let table = IsotopeTable::natural();
        assert_eq!(
            table.gyromagnetic_ratio("Xx"),
            Err(IsotopeError::UnknownElement("Xx".into()))
        );
    }

    #[test]
    fn test_override_selects_other_isotope() {
        let table = IsotopeTable::natural().with_override("Cu", 65).unwrap();
        assert_eq!(table.isotope("Cu").unwrap().mass_number, 65);

        let err = IsotopeTable::natural().with_override("Cu", 64).unwrap_err();
        assert_eq!(
            err,
            IsotopeError::UnknownIsotope { symbol: "Cu".into(), mass_number: 64 }
        );
    }

    #[test]
    fn test_spinless_element_has_no_default() {
        let mut table = IsotopeTable::empty("custom");
        table
            .insert("Ce", IsotopeData { mass_number: 140, spin: 0.0, gamma: 0.0, abundance: 88.45 })
            .unwrap();
        assert_eq!(
            table.isotope("Ce"),
            Err(IsotopeError::NoMagneticIsotope("Ce".into()))
        );
    }

    #[test]
    fn test_insert_rejects_non_finite_gamma() {
        let mut table = IsotopeTable::empty("custom");
        let bad = IsotopeData { mass_number: 1, spin: 0.5, gamma: f64::NAN, abundance: 1.0 };
        assert!(matches!(table.insert("H", bad), Err(IsotopeError::InvalidData(_))));
    }
}
