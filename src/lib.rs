// Copyright 2023 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! # Truncated Electrostatic Interactions
//!
//! This library calculates short-ranged, truncated electrostatic interactions between
//! point charges and point dipoles, _e.g._ for use in molecular simulations.
//! Each truncation scheme is described by a _splitting function_, _S(q)_, of the reduced
//! distance _q = r / r✂_, and a common engine turns it into potentials, fields, forces,
//! and energies.
//! This includes:
//!
//! - Plain Coulomb with optional Yukawa screening.
//! - Real-space Ewald with optional screening and surrounding permittivity.
//! - Wolf summation.
//! - The _q_-potential built on the [q-Pochhammer symbol](qpochhammer).
//! - The Poisson family of moment cancelling polynomials, with optional screening.
//! - Fanourgakis.
//!
//! ## Interactions between Multipoles
//!
//! Please see the [`pairwise`] module. Here's the energy between two point charges
//! using a plain Coulomb scheme without cutoff:
//! ~~~
//! # use approx::assert_relative_eq;
//! use coulomb_galore::TO_CHEMISTRY_UNIT;
//! use coulomb_galore::pairwise::{Plain, MultipoleEnergy};
//!
//! let (z1, z2, r) = (2.0, -1.0, 5.0); // unit-less charge numbers, separation in angstrom
//! let relative_permittivity = 78.4;
//! let plain = Plain::without_cutoff();
//! let energy = plain.ion_ion_energy(z1, z2, r) * TO_CHEMISTRY_UNIT / relative_permittivity;
//! assert_relative_eq!(energy, -7.088543757366428, epsilon = 1e-9); // in kJ/mol
//! ~~~
//!
//! ## Choosing a Scheme at Runtime
//!
//! The [`Scheme`] sum type is constructed from a tag and a named parameter bundle,
//! [`SchemeConfig`], which can also be read from YAML:
//! ~~~
//! use coulomb_galore::{Scheme, SchemeConfig};
//! use coulomb_galore::pairwise::MultipolePotential;
//!
//! let config = SchemeConfig::from_yaml("{type: poisson, cutoff: 29.0, C: 3, D: 3}").unwrap();
//! let scheme = Scheme::new(&config).unwrap();
//! assert_eq!(scheme.ion_potential(1.0, 30.0), 0.0);
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;

mod error;
pub mod pairwise;
pub mod qpochhammer;
mod scheme;

pub use error::{Error, Result};
pub use scheme::{Scheme, SchemeBase, SchemeConfig, SchemeKind};

use physical_constants::{
    AVOGADRO_CONSTANT, ELEMENTARY_CHARGE, MOLAR_GAS_CONSTANT, VACUUM_ELECTRIC_PERMITTIVITY,
};
use std::f64::consts::PI;

const ANGSTROM_PER_METER: f64 = 1e10;

/// Electrostatic prefactor, e²/4πε₀ × 10⁷ × NA [Å × kJ / mol].
///
/// Scales potentials, energies, forces, and fields from the [`pairwise`] module to
/// `kJ`, `mol`, `Å`, and `elementary charge`. Divide by the relative permittivity of the
/// medium afterwards.
///
/// # Examples:
/// ```
/// # use approx::assert_relative_eq;
/// use coulomb_galore::TO_CHEMISTRY_UNIT;
/// let (z1, z2, r) = (1.0, -1.0, 7.0);
/// let energy = TO_CHEMISTRY_UNIT / 80.0 * z1 * z2 / r;
/// assert_relative_eq!(energy, -2.4809903150782495, epsilon = 1e-9); // kJ/mol
/// ```
pub const TO_CHEMISTRY_UNIT: f64 =
    ELEMENTARY_CHARGE * ELEMENTARY_CHARGE * ANGSTROM_PER_METER * AVOGADRO_CONSTANT * 1e-3
        / (4.0 * PI * VACUUM_ELECTRIC_PERMITTIVITY);

/// Bjerrum length in vacuum at 298.15 K, e²/4πε₀kT (Å).
pub const BJERRUM_LEN_VACUUM_298K: f64 = TO_CHEMISTRY_UNIT / (MOLAR_GAS_CONSTANT * 1e-3 * 298.15);

/// Defines information about a concept, like a short name, citation, url etc.
pub trait Info {
    /// Short name used as keyword in user input and output. Avoid spaces.
    fn short_name(&self) -> Option<&'static str> {
        None
    }
    /// Long name for the concept. Spaces are allowed.
    fn long_name(&self) -> Option<&'static str> {
        None
    }
    /// Citation string; either a DOI in the format `doi:...` or a URL.
    fn citation(&self) -> Option<&'static str> {
        None
    }
    /// Tries to extract a URL from the citation string
    fn url(&self) -> Option<String> {
        let citation = self.citation()?;
        match citation.strip_prefix("doi:") {
            Some(doi) => Some(format!("https://doi.org/{}", doi)),
            None if citation.starts_with("https://") || citation.starts_with("http://") => {
                Some(citation.to_string())
            }
            None => None,
        }
    }
}

/// Defines a cutoff distance
pub trait Cutoff {
    /// Squared cutoff distance
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff distance
    fn cutoff(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    struct Cited(&'static str);

    impl Info for Cited {
        fn citation(&self) -> Option<&'static str> {
            Some(self.0)
        }
    }

    #[test]
    fn test_url_from_citation() {
        assert_eq!(
            Cited("doi:10/c5fr").url().as_deref(),
            Some("https://doi.org/10/c5fr")
        );
        assert_eq!(
            Cited("https://example.org").url().as_deref(),
            Some("https://example.org")
        );
        assert_eq!(Cited("Some textbook").url(), None);
    }

    #[test]
    fn test_bjerrum_length() {
        assert_relative_eq!(BJERRUM_LEN_VACUUM_298K / 80.0, 7.0057415269733, epsilon = 1e-6);
    }
}
