// Copyright 2023 Björn Stenqvist and Mikael Lund
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

//! # Pairwise Electrostatic Interactions
//!
//! This module contains functions for computing the electrostatic potential;
//! fields; forces; and energies from and between point charges and point dipoles.
//! The starting point is a _splitting function_, $S(q)$,
//! of the reduced distance $q = r / r_c$,
//! where $r$ is the distance between the interacting particles and $r_c$ is the cutoff distance.
//! From this, all multipolar interactions can be derived, e.g. the monopole-monopole energy between two
//! point charges, $z_1$ and $z_2$:
//!
//! $$ u(r) \propto \frac{z_1 z_2}{r} \cdot e^{-\kappa r} \cdot S(q)$$
//!
//! where $\kappa$ is the inverse Debye screening length.
//! The generic Coulomb energy is recovered with
//! $S(q) = 1$, $r_c = \infty$, and $\kappa = 0$.
//!
//! Any type implementing [`ShortRangeFunction`] and [`Cutoff`](crate::Cutoff) automatically
//! implements [`MultipolePotential`], [`MultipoleField`], [`MultipoleEnergy`], and [`MultipoleForce`].
//! All interactions are exactly zero at and beyond the cutoff distance.
//!
//! ## Examples
//! ~~~
//! # use approx::assert_relative_eq;
//! use coulomb_galore::pairwise::*;
//! let (cutoff, debye_length) = (12.0, None);
//! let plain = Plain::new(cutoff, debye_length).unwrap();
//!
//! let (charge, distance) = (1.0, 9.0);
//! assert_relative_eq!(plain.ion_potential(charge, distance), charge / distance);
//! assert_eq!(plain.ion_potential(charge, 12.0), 0.0);
//! ~~~

mod ewald;
mod fanourgakis;
mod plain;
mod poisson;
mod qpotential;
mod wolf;

pub use ewald::RealSpaceEwald;
pub use fanourgakis::Fanourgakis;
pub use plain::Plain;
pub use poisson::{Poisson, PoissonSimple};
pub use qpotential::QPotential;
pub use wolf::Wolf;

use crate::{Cutoff, Error, Result, Vector3};

/// Short-range function for electrostatic interaction schemes
///
/// The short-range function, $S(q)$, is a function of the reduced distance $q = r/r_c$,
/// where $r$ is the distance between the interacting particles and $r_c$
/// is a spherical cutoff distance.
/// All _schemes_ implement this trait and is a requirement for the
/// [`MultipolePotential`];
/// [`MultipoleField`];
/// [`MultipoleForce`]; and
/// [`MultipoleEnergy`] traits.
/// In connection with Ewald summation schemes, the short-range function is also known as the
/// _splitting function_.
///
/// All derivatives are analytical and evaluated for $q \in [0, 1]$.
pub trait ShortRangeFunction {
    /// Inverse Debye screening length.
    ///
    /// The default implementation returns `None`.
    fn kappa(&self) -> Option<f64> {
        None
    }

    /// Debye screening length or `None` if unscreened
    fn debye_length(&self) -> Option<f64> {
        self.kappa().map(f64::recip)
    }

    /// Short-range function, 𝑆(𝑞)
    fn short_range_f0(&self, q: f64) -> f64;

    /// First derivative of the short-range function, 𝑑𝑆(𝑞)/𝑑𝑞.
    fn short_range_f1(&self, q: f64) -> f64;

    /// Second derivative of the short-range function, 𝑑²𝑆(𝑞)/𝑑𝑞².
    fn short_range_f2(&self, q: f64) -> f64;

    /// Third derivative of the short-range function, 𝑑³𝑆(𝑞)/𝑑𝑞³.
    fn short_range_f3(&self, q: f64) -> f64;

    /// The short-range function and its first three derivatives, `[𝑆, 𝑆', 𝑆'', 𝑆''']`.
    ///
    /// Schemes that obtain all derivatives from a single evaluation should override this.
    fn short_range_derivatives(&self, q: f64) -> [f64; 4] {
        [
            self.short_range_f0(q),
            self.short_range_f1(q),
            self.short_range_f2(q),
            self.short_range_f3(q),
        ]
    }

    /// Prefactors for the self-energy of monopoles and dipoles.
    ///
    /// Self-energies are normally important only when inserting or deleting particles
    /// in a system, _e.g._ in the Grand Canonical ensemble.
    /// The default implementation has all prefactors set to zero.
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        SelfEnergyPrefactors::default()
    }

    /// Zero-wave-vector limit, 𝑇₀, of the Fourier transformed interaction tensor.
    ///
    /// Used only for estimating the dielectric constant from dipole fluctuations.
    /// Most schemes use `S'(1) - S(1) + S(0)`, see [`t_zero_from_splitting`].
    fn t_zero(&self) -> f64;
}

/// Calculates 𝑇₀ = 𝑆'(1) - 𝑆(1) + 𝑆(0) for a short-range function
pub fn t_zero_from_splitting<T: ShortRangeFunction + ?Sized>(scheme: &T) -> f64 {
    scheme.short_range_f1(1.0) - scheme.short_range_f0(1.0) + scheme.short_range_f0(0.0)
}

/// Prefactors for calculating the self-energy of monopoles and dipoles
///
/// Some short-range functions warrant a self-energy on multipoles. This
/// is important for systems where the number of particles fluctuates, e.g.
/// in the Grand Canonical ensemble.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SelfEnergyPrefactors {
    /// Prefactor for the self-energy of monopoles, _c1_.
    monopole: f64,
    /// Prefactor for the self-energy of dipoles, _c2_.
    dipole: f64,
}

impl SelfEnergyPrefactors {
    /// Number of prefactors, one per multipole order
    pub const LEN: usize = 2;

    /// Prefactors from the monopole and dipole terms
    pub const fn new(monopole: f64, dipole: f64) -> Self {
        Self { monopole, dipole }
    }
    /// Prefactor multiplying the squared charge
    pub const fn monopole(&self) -> f64 {
        self.monopole
    }
    /// Prefactor multiplying the squared dipole moment
    pub const fn dipole(&self) -> f64 {
        self.dipole
    }
    /// Prefactors ordered by multipole order, `[monopole, dipole]`
    pub const fn to_array(&self) -> [f64; Self::LEN] {
        [self.monopole, self.dipole]
    }
}

/// Distance dependent quantities shared by all pair formulas
#[derive(Debug, Clone, Copy)]
struct Separation {
    /// |r|
    distance: f64,
    /// |r|²
    distance_squared: f64,
    /// Reduced distance, r / r✂
    q: f64,
    /// κr
    kr: f64,
    /// exp(-κr)
    screening: f64,
}

impl Separation {
    /// `None` if the separation is at or beyond the cutoff
    #[inline]
    fn from_distance<T: ShortRangeFunction + Cutoff + ?Sized>(
        scheme: &T,
        distance: f64,
    ) -> Option<Self> {
        if distance >= scheme.cutoff() {
            return None;
        }
        Some(Self::new(scheme, distance, distance * distance))
    }

    /// `None` if the separation is at or beyond the cutoff
    #[inline]
    fn from_vector<T: ShortRangeFunction + Cutoff + ?Sized>(
        scheme: &T,
        r: &Vector3,
    ) -> Option<Self> {
        let distance_squared = r.norm_squared();
        if distance_squared >= scheme.cutoff_squared() {
            return None;
        }
        Some(Self::new(scheme, distance_squared.sqrt(), distance_squared))
    }

    #[inline]
    fn new<T: ShortRangeFunction + Cutoff + ?Sized>(
        scheme: &T,
        distance: f64,
        distance_squared: f64,
    ) -> Self {
        let kr = scheme.kappa().map_or(0.0, |kappa| kappa * distance);
        Self {
            distance,
            distance_squared,
            q: distance / scheme.cutoff(),
            kr,
            screening: (-kr).exp(),
        }
    }
}

/// 𝑆(1+κr) - 𝑞𝑆', shared by the dipole potential and the ion field
#[inline]
fn radial_factor<T: ShortRangeFunction + ?Sized>(scheme: &T, sep: &Separation) -> f64 {
    scheme.short_range_f0(sep.q) * (1.0 + sep.kr) - sep.q * scheme.short_range_f1(sep.q)
}

/// Factors multiplying the traceless and isotropic parts of the dipole field tensor:
///
/// - 𝑆(1+κr+κ²r²/3) - 𝑞𝑆'(1+2κr/3) + 𝑞²𝑆''/3
/// - (𝑆κ²r² - 2κr𝑞𝑆' + 𝑞²𝑆'')/3
#[inline]
fn tensor_factors<T: ShortRangeFunction + ?Sized>(scheme: &T, sep: &Separation) -> (f64, f64) {
    let (q, kr) = (sep.q, sep.kr);
    let [s0, s1, s2, _] = scheme.short_range_derivatives(q);
    let traceless =
        s0 * (1.0 + kr + kr * kr / 3.0) - q * s1 * (1.0 + 2.0 / 3.0 * kr) + q * q / 3.0 * s2;
    let isotropic = (s0 * kr * kr - 2.0 * kr * q * s1 + q * q * s2) / 3.0;
    (traceless, isotropic)
}

/// Electric potential from point multipoles
///
/// The units of the returned potentials is [ ( input charge ) / ( input length ) ]
pub trait MultipolePotential: ShortRangeFunction + Cutoff {
    /// Electrostatic potential from a point charge.
    ///
    /// Φ(z, r) = z / r · 𝑆(𝑞) · exp(-κr)
    #[inline]
    fn ion_potential(&self, charge: f64, distance: f64) -> f64 {
        Separation::from_distance(self, distance).map_or(0.0, |sep| {
            charge / sep.distance * self.short_range_f0(sep.q) * sep.screening
        })
    }

    /// Electrostatic potential from a point dipole.
    ///
    /// Parameters:
    /// - `dipole`: Dipole moment, UNIT: [ ( input length ) x ( input charge ) ]
    /// - `r`: Distance vector from the dipole, UNIT: [ input length ]
    ///
    /// Returns:
    /// - Dipole potential, UNIT: [ ( input charge ) / ( input length ) ]
    ///
    /// The potential from a point dipole is described by the formula:
    /// Φ(μ, r) = (μ · r̂) / |r|² · [𝑆(𝑞)(1 + κr) - 𝑞𝑆'(𝑞)] · exp(-κr)
    fn dipole_potential(&self, dipole: &Vector3, r: &Vector3) -> f64 {
        Separation::from_vector(self, r).map_or(0.0, |sep| {
            dipole.dot(r) / (sep.distance_squared * sep.distance)
                * radial_factor(self, &sep)
                * sep.screening
        })
    }
}

/// # Field due to electric multipoles
pub trait MultipoleField: ShortRangeFunction + Cutoff {
    /// Electrostatic field from point charge.
    ///
    /// Parameters:
    /// - `charge`: Point charge [UNIT: input charge]
    /// - `r`: Distance vector from point charge [UNIT: input length]
    ///
    /// Returns:
    /// Field from charge [UNIT: (input charge) / (input length)^2]
    ///
    /// The field from a charge is described by the formula:
    /// E(z, r) = z · r̂ / |r|² · [𝑆(𝑞)(1 + κr) - 𝑞𝑆'(𝑞)] · exp(-κr)
    fn ion_field(&self, charge: f64, r: &Vector3) -> Vector3 {
        Separation::from_vector(self, r).map_or_else(Vector3::zeros, |sep| {
            charge * r / (sep.distance_squared * sep.distance)
                * radial_factor(self, &sep)
                * sep.screening
        })
    }

    /// Electrostatic field from point dipole.
    ///
    /// Parameters:
    /// - `dipole`: Point dipole [UNIT: (input length) x (input charge)]
    /// - `r`: Distance vector from point dipole [UNIT: input length]
    ///
    /// Returns:
    /// Field from dipole [UNIT: (input charge) / (input length)^2]
    ///
    /// The field from a point dipole is described by the formula:
    /// E(μ, r) = exp(-κr) · {
    ///     (3(μ · r̂)r̂ - μ) / r³ · [𝑆(1 + κr + κ²r²/3) - 𝑞𝑆'(1 + 2κr/3) + 𝑞²𝑆''/3] +
    ///     μ / r³ · [𝑆κ²r² - 2κr𝑞𝑆' + 𝑞²𝑆''] / 3 }
    fn dipole_field(&self, dipole: &Vector3, r: &Vector3) -> Vector3 {
        let Some(sep) = Separation::from_vector(self, r) else {
            return Vector3::zeros();
        };
        let r3_inv = (sep.distance * sep.distance_squared).recip();
        let (traceless, isotropic) = tensor_factors(self, &sep);
        let field = (3.0 * dipole.dot(r) * r / sep.distance_squared - dipole) * r3_inv * traceless;
        (field + dipole * r3_inv * isotropic) * sep.screening
    }
}

/// # Interaction energy between multipoles
pub trait MultipoleEnergy: MultipolePotential + MultipoleField {
    /// Self-energy of monopoles and dipoles
    ///
    /// The self-energy is described by:
    ///
    /// $$u_{self} = c_1 z^2 / R_c + c_2 \mu^2 / R_c^3$$
    ///
    /// where $c_1$ and $c_2$ are constants specific for the interaction scheme.
    /// `squared_moments` must be `[z², μ²]`, _i.e._ one value per
    /// [`SelfEnergyPrefactors`] entry, or an [`Error::DimensionMismatch`] is returned.
    fn self_energy(&self, squared_moments: &[f64]) -> Result<f64> {
        let prefactors = self.self_energy_prefactors().to_array();
        if squared_moments.len() != prefactors.len() {
            return Err(Error::DimensionMismatch {
                expected: prefactors.len(),
                found: squared_moments.len(),
            });
        }
        let inv_cutoff = self.cutoff().recip();
        Ok(prefactors
            .iter()
            .zip(squared_moments)
            .enumerate()
            .map(|(order, (prefactor, moment))| {
                prefactor * moment * inv_cutoff.powi(2 * order as i32 + 1)
            })
            .sum())
    }

    /// Self-energy summed over a set of point charges and point dipoles
    fn self_energy_of(&self, charges: &[f64], dipoles: &[Vector3]) -> f64 {
        let prefactors = self.self_energy_prefactors();
        let inv_cutoff = self.cutoff().recip();
        let charge_squared: f64 = charges.iter().map(|z| z * z).sum();
        let dipole_squared: f64 = dipoles.iter().map(|mu| mu.norm_squared()).sum();
        prefactors.monopole() * charge_squared * inv_cutoff
            + prefactors.dipole() * dipole_squared * inv_cutoff.powi(3)
    }

    /// Interaction energy between two point charges
    ///
    /// The interaction energy between two charges is described by:
    ///     u(z1, z2, r) = z2 * Φ(z1, r)
    /// where Φ(z1, r) is the potential from ion 1.
    fn ion_ion_energy(&self, charge1: f64, charge2: f64, r: f64) -> f64 {
        charge2 * self.ion_potential(charge1, r)
    }

    /// Interaction energy between a point charge and a point dipole
    ///
    /// - `charge`: Point charge, UNIT: [input charge]
    /// - `dipole`: Dipole moment, UNIT: [(input length) x (input charge)]
    /// - `r`: Distance-vector between dipole and charge, r = r_μ - r_z, UNIT: [input length]
    ///
    /// The interaction energy between an ion and a dipole is:
    ///
    /// $$u(z, \mu, r) = z \Phi(\mu, -r)$$
    ///
    /// where $\Phi(\mu, -r)$ is the potential from the dipole at the location of the ion.
    /// This equals $-\mu \cdot E(z, r)$ where $E(z, r)$ is the field from the ion at the location of the dipole.
    fn ion_dipole_energy(&self, charge: f64, dipole: &Vector3, r: &Vector3) -> f64 {
        charge * self.dipole_potential(dipole, &(-r))
    }

    /// Interaction energy between two point dipoles
    ///
    /// - `dipole1`: Dipole moment of particle 1, UNIT: [(input length) x (input charge)]
    /// - `dipole2`: Dipole moment of particle 2, UNIT: [(input length) x (input charge)]
    /// - `r`: Distance-vector between dipoles, r = r_μ2 - r_μ1, UNIT: [input length]
    ///
    /// The interaction energy between two dipoles is described by:
    ///     u(μ1, μ2, r) = -μ1 · E(μ2, r)
    fn dipole_dipole_energy(&self, dipole1: &Vector3, dipole2: &Vector3, r: &Vector3) -> f64 {
        -dipole1.dot(&self.dipole_field(dipole2, r))
    }

    /// Dielectric constant from the squared total dipole moment fluctuation, `M2V` = ⟨M²⟩/(3ε₀VkT).
    ///
    /// ε = (M2V·𝑇₀ + 2·M2V + 1) / (M2V·𝑇₀ - M2V + 1)
    fn dielectric_constant(&self, m2v: f64) -> f64 {
        let t_zero = self.t_zero();
        (m2v * t_zero + 2.0 * m2v + 1.0) / (m2v * t_zero - m2v + 1.0)
    }
}

/// # Force between multipoles
pub trait MultipoleForce: MultipoleField {
    /// Force between two point charges.
    ///
    /// The force between two point charges is described by the formula:
    /// F(z1, z2, r) = z2 * E(z1, r)
    ///
    /// where `E(z1, r)` is the field from ion 1 at the location of ion 2.
    fn ion_ion_force(&self, charge1: f64, charge2: f64, r: &Vector3) -> Vector3 {
        charge2 * self.ion_field(charge1, r)
    }

    /// Interaction force between a point charge and a point dipole.
    ///
    /// F(z, μ, r) = z * E(μ, r)
    ///
    /// where `E(μ, r)` is the field from the dipole at the location of the ion.
    fn ion_dipole_force(&self, charge: f64, dipole: &Vector3, r: &Vector3) -> Vector3 {
        charge * self.dipole_field(dipole, r)
    }

    /// Interaction force between two point dipoles.
    ///
    /// Parameters:
    /// - `mu1`: Dipole moment of particle 1 [UNIT: (input length) x (input charge)]
    /// - `mu2`: Dipole moment of particle 2 [UNIT: (input length) x (input charge)]
    /// - `r`: Distance vector between dipoles [UNIT: input length]
    ///
    /// Returns:
    /// Interaction force [UNIT: (input charge)^2 / (input length)^2]
    ///
    /// The force is a sum of a direct term, proportional to
    /// 3[(5(μ1 · r̂)(μ2 · r̂) - μ1 · μ2)r̂ - (μ2 · r̂)μ1 - (μ1 · r̂)μ2] / r⁴,
    /// and an indirect term, proportional to (μ1 · r̂)(μ2 · r̂)r̂ / r⁴.
    fn dipole_dipole_force(&self, mu1: &Vector3, mu2: &Vector3, r: &Vector3) -> Vector3 {
        let Some(sep) = Separation::from_vector(self, r) else {
            return Vector3::zeros();
        };
        let (q, kr) = (sep.q, sep.kr);
        let q2 = q * q;
        let rh = r / sep.distance;
        let r4 = sep.distance_squared * sep.distance_squared;
        let mu1_dot_rh = mu1.dot(&rh);
        let mu2_dot_rh = mu2.dot(&rh);
        let [s0, s1, s2, s3] = self.short_range_derivatives(q);
        let force_d = 3.0
            * ((5.0 * mu1_dot_rh * mu2_dot_rh - mu1.dot(mu2)) * rh
                - mu2_dot_rh * mu1
                - mu1_dot_rh * mu2)
            / r4
            * (s0 * (1.0 + kr + kr * kr / 3.0) - q * s1 * (1.0 + 2.0 / 3.0 * kr) + q2 / 3.0 * s2);
        let force_i = mu1_dot_rh * mu2_dot_rh * rh / r4
            * (s0 * (1.0 + kr) * kr * kr - q * s1 * (3.0 * kr + 2.0) * kr
                + s2 * (1.0 + 3.0 * kr) * q2
                - q2 * q * s3);
        (force_d + force_i) * sep.screening
    }

    /// Torque on a point dipole in an electric field, τ = μ × E
    fn dipole_torque(&self, dipole: &Vector3, field: &Vector3) -> Vector3 {
        dipole.cross(field)
    }
}

impl<T: ShortRangeFunction + Cutoff> MultipolePotential for T {}
impl<T: ShortRangeFunction + Cutoff> MultipoleField for T {}
impl<T: ShortRangeFunction + Cutoff> MultipoleEnergy for T {}
impl<T: ShortRangeFunction + Cutoff> MultipoleForce for T {}

/// Checks that a cutoff distance is positive and finite
pub(crate) fn validate_cutoff(cutoff: f64) -> Result<f64> {
    if cutoff > 0.0 && cutoff.is_finite() {
        Ok(cutoff)
    } else {
        Err(Error::InvalidParameter(format!(
            "cutoff must be positive and finite, got {}",
            cutoff
        )))
    }
}

/// Checks that a named parameter is positive and finite
pub(crate) fn validate_positive(name: &str, value: f64) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidParameter(format!(
            "{} must be positive, got {}",
            name, value
        )))
    }
}

/// Inverse of an optional Debye length where an infinite length means no screening
pub(crate) fn inverse_debye_length(debye_length: Option<f64>) -> Result<Option<f64>> {
    match debye_length {
        Some(length) if length.is_infinite() && length > 0.0 => Ok(None),
        Some(length) => validate_positive("Debye length", length).map(|l| Some(l.recip())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_electric_constant() {
        let bjerrum_length = 7.1; // angstrom
        let rel_dielectric_const = 80.0;
        assert_relative_eq!(
            crate::TO_CHEMISTRY_UNIT / rel_dielectric_const / bjerrum_length,
            2.4460467895137676, // In kJ/mol, roughly 1 KT at room temperature
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_parameter_validation() {
        assert!(validate_cutoff(10.0).is_ok());
        assert!(validate_cutoff(0.0).is_err());
        assert!(validate_cutoff(f64::INFINITY).is_err());
        assert!(validate_cutoff(f64::NAN).is_err());
        assert!(validate_positive("alpha", -0.1).is_err());
        assert_eq!(inverse_debye_length(Some(20.0)), Ok(Some(0.05)));
        assert_eq!(inverse_debye_length(Some(f64::INFINITY)), Ok(None));
        assert_eq!(inverse_debye_length(None), Ok(None));
        assert!(matches!(
            inverse_debye_length(Some(-1.0)),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_self_energy_prefactors() {
        let prefactors = SelfEnergyPrefactors::new(-1.0, -0.5);
        assert_eq!(prefactors.to_array(), [-1.0, -0.5]);
        assert_eq!(SelfEnergyPrefactors::default().to_array(), [0.0, 0.0]);
    }

    #[test]
    fn test_dipole_torque() {
        let plain = Plain::without_cutoff();
        let torque = plain.dipole_torque(&Vector3::new(1.0, 0.0, 0.0), &Vector3::new(0.0, 2.0, 0.0));
        assert_eq!(torque, Vector3::new(0.0, 0.0, 2.0));
    }
}
