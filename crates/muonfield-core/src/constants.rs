//! Physical constants used by the dipolar engine.
//!
//! The engine never reaches for globals: every computation receives a
//! [`PhysicalConstants`] value, so alternative constant sets (older CODATA
//! releases, reduced units in tests) can be injected.

use serde::{Deserialize, Serialize};

/// Converts $1/|\mathbf{r}|^3$ from Å⁻³ to m⁻³.
pub const LENGTH_SCALE: f64 = 1e30;

/// SI physical constants entering the point-dipole prefactor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicalConstants {
    /// Vacuum permeability μ₀ (N A⁻²).
    pub mu0: f64,
    /// Reduced Planck constant ħ (J s).
    pub hbar: f64,
    /// Bohr magneton μ_B (J T⁻¹).
    pub bohr_magneton: f64,
    /// Electron g-factor (signed, negative).
    pub electron_g_factor: f64,
}

impl PhysicalConstants {
    /// CODATA 2018 recommended values.
    pub const CODATA_2018: Self = Self {
        mu0: 1.256_637_062_12e-6,
        hbar: 1.054_571_817e-34,
        bohr_magneton: 9.274_010_078_3e-24,
        electron_g_factor: -2.002_319_304_362_56,
    };

    /// Electron gyromagnetic ratio $\gamma_e = \mu_B g_e / \hbar$ (rad s⁻¹ T⁻¹).
    pub fn electron_gyromagnetic_ratio(&self) -> f64 {
        self.bohr_magneton * self.electron_g_factor / self.hbar
    }

    /// Scalar prefactor of the point-dipole tensor for a source with
    /// gyromagnetic ratio `gamma`, for displacements in Å:
    ///
    /// $$ C = -\frac{\mu_0 \hbar}{8\pi} \, \gamma \times 10^{30} $$
    ///
    /// Multiplied by $(3\hat{\mathbf{r}}\hat{\mathbf{r}} - \mathbf{I})/|\mathbf{r}|^3$
    /// this gives the tensor in T per unit spin.
    pub fn dipolar_prefactor(&self, gamma: f64) -> f64 {
        -self.mu0 * self.hbar / (8.0 * std::f64::consts::PI) * LENGTH_SCALE * gamma
    }
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self::CODATA_2018
    }
}
