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
    t_zero_from_splitting, validate_cutoff, validate_positive, SelfEnergyPrefactors,
    ShortRangeFunction,
};
use crate::{Cutoff, Info, Result};
use statrs::function::erf::erfc;

const SQRT_PI: f64 = 1.7724538509055159;

/// Scheme for damped, shifted Wolf summation
///
/// $$ S(q) = \text{erfc}(\eta q) - q \cdot \text{erfc}(\eta) $$
///
/// where $\eta = \alpha r_c$.
/// See _Wolf et al._, <https://doi.org/10.1063/1.478738>.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Wolf {
    cutoff: f64,
    alpha: f64,
    /// Reduced alpha, 𝜂 = 𝛼 × 𝑟✂︎
    eta: f64,
    /// erfc(𝜂)
    erfc_eta: f64,
    t_zero: f64,
}

impl Wolf {
    /// Wolf scheme with the given cutoff and damping parameter, 𝛼
    pub fn new(cutoff: f64, alpha: f64) -> Result<Self> {
        let cutoff = validate_cutoff(cutoff)?;
        let alpha = validate_positive("alpha", alpha)?;
        let eta = alpha * cutoff;
        let mut wolf = Self {
            cutoff,
            alpha,
            eta,
            erfc_eta: erfc(eta),
            t_zero: 0.0,
        };
        wolf.t_zero = t_zero_from_splitting(&wolf);
        Ok(wolf)
    }
    /// Damping parameter, 𝛼
    pub const fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl core::fmt::Display for Wolf {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Wolf: 𝑟✂ = {:.1} Å, 𝜂 = {:.1}", self.cutoff, self.eta)?;
        if let Some(url) = self.url() {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}

impl Info for Wolf {
    fn short_name(&self) -> Option<&'static str> {
        Some("wolf")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Wolf summation")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("doi:10.1063/1.478738")
    }
}

impl Cutoff for Wolf {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for Wolf {
    #[inline]
    fn short_range_f0(&self, q: f64) -> f64 {
        erfc(self.eta * q) - q * self.erfc_eta
    }
    fn short_range_f1(&self, q: f64) -> f64 {
        -2.0 * self.eta / SQRT_PI * f64::exp(-(self.eta * q).powi(2)) - self.erfc_eta
    }
    fn short_range_f2(&self, q: f64) -> f64 {
        4.0 * self.eta.powi(3) * q / SQRT_PI * f64::exp(-(self.eta * q).powi(2))
    }
    fn short_range_f3(&self, q: f64) -> f64 {
        let eta_q_squared = (self.eta * q).powi(2);
        -8.0 * self.eta.powi(3) * (eta_q_squared - 0.5) / SQRT_PI * f64::exp(-eta_q_squared)
    }
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        SelfEnergyPrefactors::new(
            -self.eta / SQRT_PI,
            -2.0 / 3.0 * self.eta.powi(3) / SQRT_PI,
        )
    }
    fn t_zero(&self) -> f64 {
        self.t_zero
    }
}
