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

use super::{inverse_debye_length, validate_positive, ShortRangeFunction};
use crate::{Cutoff, Info, Result};

/// Scheme for vanilla Coulomb interactions, $S(q)=1$.
///
/// See _Premier mémoire sur l’électricité et le magnétisme_ by Charles-Augustin de Coulomb,
/// <https://doi.org/msxd>.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plain {
    /// Cut-off distance; infinite if unbounded
    cutoff: f64,
    /// Optional inverse Debye length
    kappa: Option<f64>,
}

impl Default for Plain {
    /// The default is infinite cutoff radius and no screening
    fn default() -> Self {
        Self {
            cutoff: f64::INFINITY,
            kappa: None,
        }
    }
}

impl core::fmt::Display for Plain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Plain Coulomb: 𝑟✂ = {:.1} Å", self.cutoff)?;
        if let Some(debye_length) = self.debye_length() {
            write!(f, ", λᴰ = {:.1} Å", debye_length)?;
        }
        if let Some(url) = self.url() {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}

impl Plain {
    /// Plain Coulomb with a cutoff, which may be infinite, and optional screening.
    pub fn new(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        let cutoff = if cutoff == f64::INFINITY {
            cutoff
        } else {
            validate_positive("cutoff", cutoff)?
        };
        Ok(Self {
            cutoff,
            kappa: inverse_debye_length(debye_length)?,
        })
    }
    /// Unscreened Coulomb without cutoff
    pub fn without_cutoff() -> Self {
        Self::default()
    }
    /// `None` if the cutoff is infinite
    pub fn finite_cutoff(&self) -> Option<f64> {
        self.cutoff.is_finite().then_some(self.cutoff)
    }
}

impl Info for Plain {
    fn short_name(&self) -> Option<&'static str> {
        Some("plain")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Plain Coulomb")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("doi:msxd")
    }
}

impl Cutoff for Plain {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for Plain {
    #[inline]
    fn kappa(&self) -> Option<f64> {
        self.kappa
    }
    #[inline]
    fn short_range_f0(&self, _q: f64) -> f64 {
        1.0
    }
    #[inline]
    fn short_range_f1(&self, _q: f64) -> f64 {
        0.0
    }
    #[inline]
    fn short_range_f2(&self, _q: f64) -> f64 {
        0.0
    }
    #[inline]
    fn short_range_f3(&self, _q: f64) -> f64 {
        0.0
    }
    fn t_zero(&self) -> f64 {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pairwise::{MultipoleEnergy, MultipoleField, MultipoleForce, MultipolePotential};
    use crate::{Error, Vector3};
    use approx::assert_relative_eq;

    #[test]
    fn test_coulomb() {
        let cutoff: f64 = 29.0; // cutoff distance
        let z1 = 2.0; // charge
        let z2 = 3.0; // charge
        let mu1 = Vector3::new(19.0, 7.0, 11.0); // dipole moment
        let mu2 = Vector3::new(13.0, 17.0, 5.0); // dipole moment
        let r = Vector3::new(23.0, 0.0, 0.0); // distance vector
        let rh = Vector3::new(1.0, 0.0, 0.0); // normalized distance vector
        let outside = (cutoff + 1.0) * rh;

        let pot = Plain::new(cutoff, None).unwrap();
        let eps = 1e-9;

        assert_eq!(
            pot.to_string(),
            "Plain Coulomb: 𝑟✂ = 29.0 Å <https://doi.org/msxd>"
        );

        assert_eq!(pot.short_range_f0(0.5), 1.0);
        assert_eq!(pot.short_range_f1(0.5), 0.0);
        assert_eq!(pot.short_range_f2(0.5), 0.0);
        assert_eq!(pot.short_range_f3(0.5), 0.0);
        assert_eq!(pot.self_energy(&[4.0, 2.0]), Ok(0.0));
        assert_eq!(pot.dielectric_constant(0.5), 4.0);

        // Potentials
        assert_eq!(pot.ion_potential(z1, cutoff + 1.0), 0.0);
        assert_eq!(pot.ion_potential(z1, cutoff), 0.0);
        assert_relative_eq!(pot.ion_potential(z1, r.norm()), 0.08695652173913043, epsilon = eps);
        assert_eq!(pot.dipole_potential(&mu1, &outside), 0.0);
        assert_relative_eq!(pot.dipole_potential(&mu1, &r), 0.035916824196597356, epsilon = eps);

        // Fields
        assert_eq!(pot.ion_field(z1, &outside).norm(), 0.0);
        let ion_field = pot.ion_field(z1, &r);
        assert_relative_eq!(ion_field[0], 0.003780718336, epsilon = eps);
        assert_relative_eq!(ion_field.norm(), 0.003780718336, epsilon = eps);
        assert_eq!(pot.dipole_field(&mu1, &outside).norm(), 0.0);
        let dip_field = pot.dipole_field(&mu1, &r);
        assert_relative_eq!(dip_field[0], 0.003123202104, epsilon = eps);
        assert_relative_eq!(dip_field[1], -0.0005753267034, epsilon = eps);
        assert_relative_eq!(dip_field[2], -0.0009040848196, epsilon = eps);

        // Energies
        assert_eq!(pot.ion_ion_energy(z1, z2, cutoff + 1.0), 0.0);
        assert_relative_eq!(pot.ion_ion_energy(z1, z2, r.norm()), z1 * z2 / r.norm(), epsilon = eps);
        assert_eq!(pot.ion_dipole_energy(z1, &mu2, &outside), 0.0);
        assert_relative_eq!(pot.ion_dipole_energy(z1, &mu2, &r), -0.04914933837, epsilon = eps);
        assert_eq!(pot.dipole_dipole_energy(&mu1, &mu2, &outside), 0.0);
        assert_relative_eq!(pot.dipole_dipole_energy(&mu1, &mu2, &r), -0.02630064930, epsilon = eps);

        // Forces
        assert_eq!(pot.ion_ion_force(z1, z2, &outside).norm(), 0.0);
        let force = pot.ion_ion_force(z1, z2, &r);
        assert_relative_eq!(force[0], 0.01134215501, epsilon = eps);
        assert_relative_eq!(force.norm(), 0.01134215501, epsilon = eps);
        assert_eq!(pot.ion_dipole_force(z2, &mu1, &outside).norm(), 0.0);
        let force = pot.ion_dipole_force(z2, &mu1, &r);
        assert_relative_eq!(force[0], 0.009369606312, epsilon = eps);
        assert_relative_eq!(force[1], -0.001725980110, epsilon = eps);
        assert_relative_eq!(force[2], -0.002712254459, epsilon = eps);
        assert_eq!(pot.dipole_dipole_force(&mu1, &mu2, &outside).norm(), 0.0);
        let force = pot.dipole_dipole_force(&mu1, &mu2, &r);
        assert_relative_eq!(force[0], 0.003430519474, epsilon = eps);
        assert_relative_eq!(force[1], -0.004438234569, epsilon = eps);
        assert_relative_eq!(force[2], -0.002551448858, epsilon = eps);
    }

    #[test]
    fn test_screened_coulomb() {
        let cutoff: f64 = 29.0;
        let z1 = 2.0;
        let mu1 = Vector3::new(19.0, 7.0, 11.0);
        let mu2 = Vector3::new(13.0, 17.0, 5.0);
        let r = Vector3::new(23.0, 0.0, 0.0);
        let outside = Vector3::new(cutoff + 1.0, 0.0, 0.0);
        let eps = 1e-9;

        let pot = Plain::new(cutoff, Some(23.0)).unwrap();
        assert_eq!(
            pot.to_string(),
            "Plain Coulomb: 𝑟✂ = 29.0 Å, λᴰ = 23.0 Å <https://doi.org/msxd>"
        );
        assert_relative_eq!(pot.debye_length().unwrap(), 23.0, epsilon = 1e-12);

        assert_eq!(pot.ion_potential(z1, cutoff + 1.0), 0.0);
        assert_relative_eq!(pot.ion_potential(z1, r.norm()), 0.03198951663, epsilon = eps);
        assert_eq!(pot.dipole_potential(&mu1, &outside), 0.0);
        assert_relative_eq!(pot.dipole_potential(&mu1, &r), 0.02642612243, epsilon = eps);

        let field = pot.ion_field(z1, &r);
        assert_relative_eq!(field[0], 0.002781697098, epsilon = eps);
        assert_relative_eq!(field.norm(), 0.002781697098, epsilon = eps);
        assert_eq!(pot.dipole_field(&mu1, &outside).norm(), 0.0);
        let field = pot.dipole_field(&mu1, &r);
        assert_relative_eq!(field[0], 0.002872404612, epsilon = eps);
        assert_relative_eq!(field[1], -0.0004233017324, epsilon = eps);
        assert_relative_eq!(field[2], -0.0006651884364, epsilon = eps);

        assert_relative_eq!(pot.ion_dipole_energy(z1, &mu2, &r), -0.03616206227, epsilon = eps);
        assert_relative_eq!(pot.dipole_dipole_energy(&mu1, &mu2, &r), -0.02681918832, epsilon = eps);

        let force = pot.dipole_dipole_force(&mu1, &mu2, &r);
        assert_relative_eq!(force[0], 0.003594120919, epsilon = eps);
        assert_relative_eq!(force[1], -0.003809715590, epsilon = eps);
        assert_relative_eq!(force[2], -0.002190126354, epsilon = eps);
    }

    #[test]
    fn test_without_cutoff() {
        let pot = Plain::without_cutoff();
        assert_eq!(pot.finite_cutoff(), None);
        assert_eq!(pot.ion_potential(3.0, 1000.0), 3.0 / 1000.0);
        assert_eq!(pot.self_energy(&[1.0, 1.0]), Ok(0.0));
        assert_eq!(
            pot.to_string(),
            "Plain Coulomb: 𝑟✂ = inf Å <https://doi.org/msxd>"
        );
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(Plain::new(-1.0, None), Err(Error::InvalidParameter(_))));
        assert!(matches!(Plain::new(10.0, Some(0.0)), Err(Error::InvalidParameter(_))));
        assert_eq!(Plain::new(f64::INFINITY, None), Ok(Plain::without_cutoff()));
    }
}
