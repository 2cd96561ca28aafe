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

use super::{
    inverse_debye_length, validate_cutoff, validate_positive, SelfEnergyPrefactors,
    ShortRangeFunction,
};
use crate::{Cutoff, Info, Result};
use statrs::function::erf::{erf, erfc};

/// Square root of pi
const SQRT_PI: f64 = 1.7724538509055159;

/// Scheme for real-space Ewald interactions
///
/// The splitting function with optional Yukawa screening is
///
/// $$ S(q) = \frac{1}{2} \left [ \text{erfc}(\eta q + \beta) e^{4\eta\beta q} + \text{erfc}(\eta q - \beta) \right ] $$
///
/// where $\eta = \alpha r_c$ and $\beta = \kappa / 2\alpha$.
/// The dielectric boundary condition of the reciprocal part is set by the
/// permittivity of the surrounding medium, which defaults to conducting (tin-foil) boundaries.
///
/// Further information, see original article by _P.P. Ewald_, <https://doi.org/fcjts8>.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RealSpaceEwald {
    /// Real space cutoff distance, 𝑟✂︎
    cutoff: f64,
    /// Damping parameter, 𝛼 (inverse length)
    alpha: f64,
    /// Reduced alpha, 𝜂 = 𝛼 × 𝑟✂︎ (dimensionless)
    eta: f64,
    /// Inverse Debye length
    kappa: Option<f64>,
    /// 𝛽 = 𝜅 / 2𝛼, zero if unscreened
    beta: f64,
    /// Relative permittivity of the surroundings; `None` if infinite
    surrounding_permittivity: Option<f64>,
}

impl core::fmt::Display for RealSpaceEwald {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Real-space Ewald: 𝑟✂ = {:.1} Å, 𝜂 = {:.1}",
            self.cutoff, self.eta,
        )?;
        if let Some(debye_length) = self.debye_length() {
            write!(f, ", λᴰ = {:.1} Å", debye_length)?;
        }
        if let Some(permittivity) = self.surrounding_permittivity {
            write!(f, ", εₛᵤᵣ = {:.1}", permittivity)?;
        }
        if let Some(url) = self.url() {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}

impl RealSpaceEwald {
    /// Construct a new Ewald scheme with given cutoff, alpha, (and debye length).
    ///
    /// The Debye length and cutoff should have the same unit of length and
    /// alpha the inverse unit. Boundaries are conducting, see
    /// [`RealSpaceEwald::with_surrounding_permittivity`].
    pub fn new(cutoff: f64, alpha: f64, debye_length: Option<f64>) -> Result<Self> {
        let cutoff = validate_cutoff(cutoff)?;
        let alpha = validate_positive("alpha", alpha)?;
        let kappa = inverse_debye_length(debye_length)?;
        Ok(Self {
            cutoff,
            alpha,
            eta: alpha * cutoff,
            kappa,
            beta: kappa.map_or(0.0, |kappa| kappa / (2.0 * alpha)),
            surrounding_permittivity: None,
        })
    }
    /// Construct a salt-free Ewald scheme with given cutoff and alpha.
    pub fn new_without_salt(cutoff: f64, alpha: f64) -> Result<Self> {
        Self::new(cutoff, alpha, None)
    }
    /// Set the relative permittivity of the surrounding medium.
    ///
    /// Infinity means conducting boundaries. Values below unity are unphysical
    /// and are replaced by infinity.
    pub fn with_surrounding_permittivity(mut self, permittivity: f64) -> Self {
        self.surrounding_permittivity = if permittivity < 1.0 {
            log::warn!(
                "surrounding permittivity {} is below unity; using conducting boundaries",
                permittivity
            );
            None
        } else {
            permittivity.is_finite().then_some(permittivity)
        };
        self
    }
    /// Damping parameter, 𝛼
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
    /// Relative permittivity of the surroundings or `None` for conducting boundaries
    pub const fn surrounding_permittivity(&self) -> Option<f64> {
        self.surrounding_permittivity
    }
    /// exp(-(𝜂q - 𝛽)²) and erfc(𝜂q + 𝛽)·exp(4𝜂𝛽q), common to all derivatives
    #[inline]
    fn gaussian_and_complement(&self, q: f64) -> (f64, f64) {
        let (eta, beta) = (self.eta, self.beta);
        (
            f64::exp(-(eta * q - beta).powi(2)),
            erfc(eta * q + beta) * f64::exp(4.0 * eta * beta * q),
        )
    }
}

impl Info for RealSpaceEwald {
    fn short_name(&self) -> Option<&'static str> {
        Some("ewald")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Real-space Ewald")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("doi:fcjts8")
    }
}

impl Cutoff for RealSpaceEwald {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for RealSpaceEwald {
    /// The inverse Debye length if salt is present, otherwise `None`.
    #[inline]
    fn kappa(&self) -> Option<f64> {
        self.kappa
    }
    #[inline]
    fn short_range_f0(&self, q: f64) -> f64 {
        let (_, complement) = self.gaussian_and_complement(q);
        0.5 * (complement + erfc(self.eta * q - self.beta))
    }
    fn short_range_f1(&self, q: f64) -> f64 {
        let (eta, beta) = (self.eta, self.beta);
        let (gaussian, complement) = self.gaussian_and_complement(q);
        -2.0 * eta / SQRT_PI * gaussian + 2.0 * eta * beta * complement
    }
    fn short_range_f2(&self, q: f64) -> f64 {
        let (eta, beta) = (self.eta, self.beta);
        let (gaussian, complement) = self.gaussian_and_complement(q);
        4.0 * eta.powi(2) / SQRT_PI * (eta * q - 2.0 * beta) * gaussian
            + 8.0 * (eta * beta).powi(2) * complement
    }
    fn short_range_f3(&self, q: f64) -> f64 {
        let (eta, beta) = (self.eta, self.beta);
        let (gaussian, complement) = self.gaussian_and_complement(q);
        4.0 * eta.powi(3) / SQRT_PI
            * (1.0 - 2.0 * (eta * q - 2.0 * beta) * (eta * q - beta) - 4.0 * beta * beta)
            * gaussian
            + 32.0 * (eta * beta).powi(3) * complement
    }

    /// Self-energy prefactors
    ///
    /// - monopole: -𝜂/√π (exp(-𝛽²) + √π𝛽 erf(𝛽))
    /// - dipole: -2𝜂³/3√π (2√π𝛽³ erfc(𝛽) + (1 - 2𝛽²) exp(-𝛽²))
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        let (eta, beta) = (self.eta, self.beta);
        let gaussian = f64::exp(-beta * beta);
        let complement = erfc(beta);
        let monopole = -eta / SQRT_PI * (gaussian + SQRT_PI * beta * erf(beta));
        let dipole = -eta.powi(3) * 2.0 / (3.0 * SQRT_PI)
            * (2.0 * SQRT_PI * beta.powi(3) * complement + (1.0 - 2.0 * beta * beta) * gaussian);
        SelfEnergyPrefactors::new(monopole, dipole)
    }

    /// 𝑇₀ from the surrounding permittivity, 2(εₛᵤᵣ - 1)/(2εₛᵤᵣ + 1), or unity for conducting boundaries
    fn t_zero(&self) -> f64 {
        self.surrounding_permittivity
            .map_or(1.0, |eps| 2.0 * (eps - 1.0) / (2.0 * eps + 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairwise::{MultipoleEnergy, MultipoleField, MultipoleForce, MultipolePotential};
    use crate::Vector3;
    use approx::assert_relative_eq;

    #[test]
    fn test_ewald() {
        let pot = RealSpaceEwald::new_without_salt(29.0, 0.1).unwrap();
        let eps = 1e-12;
        assert_relative_eq!(pot.short_range_f0(0.5), 0.04030497436254074, epsilon = eps);
        assert_relative_eq!(pot.short_range_f1(0.5), -0.39971358519150996, epsilon = eps);
        assert_relative_eq!(pot.short_range_f2(0.5), 3.3615912514605997, epsilon = eps);
        assert_relative_eq!(pot.short_range_f3(0.5), -21.54779992186245, epsilon = 1e-10);
        assert_relative_eq!(pot.short_range_f0(0.0), 1.0, epsilon = 1e-15);

        assert_relative_eq!(pot.self_energy(&[4.0, 0.0]).unwrap(), -0.22567583341910255, epsilon = eps);
        assert_relative_eq!(pot.self_energy(&[0.0, 2.0]).unwrap(), -0.0007522527780636755, epsilon = eps);
        assert_eq!(pot.t_zero(), 1.0);

        assert_eq!(
            pot.to_string(),
            "Real-space Ewald: 𝑟✂ = 29.0 Å, 𝜂 = 2.9 <https://doi.org/fcjts8>"
        );

        let (z1, z2) = (2.0, 3.0);
        let mu1 = Vector3::new(19.0, 7.0, 11.0);
        let mu2 = Vector3::new(13.0, 17.0, 5.0);
        let r = Vector3::new(23.0, 0.0, 0.0);
        let eps = 1e-12;
        assert_relative_eq!(pot.ion_potential(z1, r.norm()), 9.940666063970869e-05, epsilon = eps);
        assert_relative_eq!(pot.dipole_potential(&mu1, &r), 0.0005110215668206702, epsilon = eps);
        assert_relative_eq!(pot.ion_field(z1, &r)[0], 5.379174387586002e-05, epsilon = eps);
        let field = pot.dipole_field(&mu1, &r);
        assert_relative_eq!(field[0], 0.00026061931320036985, epsilon = eps);
        assert_relative_eq!(field[1], -8.185700155022176e-06, epsilon = eps);
        assert_relative_eq!(field[2], -1.2863243100749128e-05, epsilon = eps);
        assert_relative_eq!(pot.ion_ion_energy(z1, z2, r.norm()), 0.00029821998191912604, epsilon = eps);
        assert_relative_eq!(pot.ion_dipole_energy(z1, &mu2, &r), -0.0006992926703861802, epsilon = eps);
        assert_relative_eq!(pot.dipole_dipole_energy(&mu1, &mu2, &r), -0.003184577953465685, epsilon = eps);
        let force = pot.dipole_dipole_force(&mu1, &mu2, &r);
        assert_relative_eq!(force[0], 0.0014998845104606242, epsilon = eps);
        assert_relative_eq!(force[1], -0.0002679514504982269, epsilon = eps);
        assert_relative_eq!(force[2], -0.0001540397227501884, epsilon = eps);
    }

    #[test]
    fn test_screened_ewald() {
        let pot = RealSpaceEwald::new(29.0, 0.1, Some(23.0)).unwrap();
        let eps = 1e-12;
        assert_relative_eq!(pot.short_range_f0(0.5), 0.07306333589635242, epsilon = eps);
        assert_relative_eq!(pot.short_range_f1(0.5), -0.6344411909409592, epsilon = eps);
        assert_relative_eq!(pot.short_range_f2(0.5), 4.423133600527777, epsilon = 1e-11);
        assert_relative_eq!(pot.short_range_f3(0.5), -19.85937170914849, epsilon = 1e-10);
        assert_relative_eq!(pot.self_energy_prefactors().monopole(), -1.7128692370047012, epsilon = eps);
        assert_relative_eq!(pot.self_energy(&[4.0, 0.0]).unwrap(), -0.23625782579375187, epsilon = eps);
        assert_relative_eq!(pot.self_energy(&[0.0, 2.0]).unwrap(), -0.0006704901980273488, epsilon = eps);

        let mu1 = Vector3::new(19.0, 7.0, 11.0);
        let mu2 = Vector3::new(13.0, 17.0, 5.0);
        let r = Vector3::new(23.0, 0.0, 0.0);
        assert_relative_eq!(pot.ion_potential(2.0, r.norm()), 9.542191044341454e-05, epsilon = eps);
        assert_relative_eq!(pot.dipole_potential(&mu1, &r), 0.0004909062479882879, epsilon = eps);
        let force = pot.dipole_dipole_force(&mu1, &mu2, &r);
        assert_relative_eq!(force[0], 0.001444300781668379, epsilon = eps);
        assert_relative_eq!(force[1], -0.0002576355283438454, epsilon = eps);
        assert_relative_eq!(force[2], -0.0001481093133957372, epsilon = eps);
    }

    #[test]
    fn test_surrounding_permittivity() {
        let pot = RealSpaceEwald::new_without_salt(10.0, 0.2).unwrap();
        assert_eq!(pot.surrounding_permittivity(), None);

        let pot = pot.with_surrounding_permittivity(80.0);
        assert_eq!(pot.surrounding_permittivity(), Some(80.0));
        assert_relative_eq!(pot.t_zero(), 2.0 * 79.0 / 161.0);
        assert_relative_eq!(
            pot.dielectric_constant(0.1),
            (0.1 * pot.t_zero() + 1.2) / (0.1 * pot.t_zero() + 0.9),
            epsilon = 1e-12
        );

        // vacuum boundary
        assert_eq!(pot.with_surrounding_permittivity(1.0).t_zero(), 0.0);
        // below unity means conducting
        let pot = pot.with_surrounding_permittivity(0.5);
        assert_eq!(pot.surrounding_permittivity(), None);
        assert_eq!(pot.t_zero(), 1.0);
        assert_eq!(pot.with_surrounding_permittivity(f64::INFINITY).t_zero(), 1.0);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(RealSpaceEwald::new(29.0, 0.0, None).is_err());
        assert!(RealSpaceEwald::new(0.0, 0.1, None).is_err());
        assert!(RealSpaceEwald::new(f64::INFINITY, 0.1, None).is_err());
        assert!(RealSpaceEwald::new(29.0, 0.1, Some(-5.0)).is_err());
    }
}
