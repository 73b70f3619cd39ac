//! Isotope data provider trait.
//!
//! The field engine only ever asks "what is the gyromagnetic ratio of this
//! species?". Everything else about isotope selection lives behind
//! [`IsotopeProvider`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from isotope providers.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum IsotopeError {
    #[error("No isotope data for element '{0}'")]
    UnknownElement(String),

    #[error("Isotope {mass_number}{symbol} is not tabulated")]
    UnknownIsotope { symbol: String, mass_number: u16 },

    #[error("Element '{0}' has no tabulated isotope with non-zero spin")]
    NoMagneticIsotope(String),

    #[error("Invalid isotope data: {0}")]
    InvalidData(String),
}

/// Properties of a single nuclear isotope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IsotopeData {
    /// Mass number A.
    pub mass_number: u16,
    /// Nuclear spin quantum number I.
    pub spin: f64,
    /// Gyromagnetic ratio γ (rad s⁻¹ T⁻¹).
    pub gamma: f64,
    /// Natural abundance (percent).
    pub abundance: f64,
}

/// Resolves chemical symbols to isotope data.
pub trait IsotopeProvider: Send + Sync {
    /// Human-readable name of this data source.
    fn name(&self) -> &str;

    /// The isotope selected for `symbol`.
    fn isotope(&self, symbol: &str) -> Result<IsotopeData, IsotopeError>;

    /// Gyromagnetic ratio (rad s⁻¹ T⁻¹) of the isotope selected for `symbol`.
    fn gyromagnetic_ratio(&self, symbol: &str) -> Result<f64, IsotopeError> {
        Ok(self.isotope(symbol)?.gamma)
    }
}

/// Reduce a species label to a bare element symbol.
///
/// Crystal files often label sites as `Fe1`, `O2-` or `FE`; the element is
/// the leading alphabetic run with conventional capitalisation.
pub fn normalise_symbol(label: &str) -> String {
    let letters: String = label
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();

    let mut chars = letters.chars();
    match chars.next() {
        Some(first) => first
            .to_ascii_uppercase()
            .to_string()
            + &chars.as_str().to_ascii_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_symbol() {
        assert_eq!(normalise_symbol("Fe1"), "Fe");
        assert_eq!(normalise_symbol("O2-"), "O");
        assert_eq!(normalise_symbol("CU"), "Cu");
        assert_eq!(normalise_symbol(" h "), "H");
        assert_eq!(normalise_symbol("12"), "");
    }
}
