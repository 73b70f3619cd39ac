//! # Muonfield Isotopes
//!
//! Nuclear isotope data for the Muonfield framework. All data sources
//! implement the [`IsotopeProvider`](provider::IsotopeProvider) trait, which
//! resolves a chemical symbol to the gyromagnetic ratio of the isotope used
//! for nuclear dipolar fields.
//!
//! ## Available data sources
//!
//! | Source | Module | Status |
//! |--------|--------|--------|
//! | Tabulated NMR isotopes | [`table`] | Implemented |
//!
//! By default each element resolves to its most abundant isotope with
//! non-zero nuclear spin. Individual elements can be switched to another
//! tabulated isotope with [`IsotopeTable::with_override`](table::IsotopeTable::with_override).

pub mod provider;
pub mod table;
