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

use super::{validate_cutoff, SelfEnergyPrefactors, ShortRangeFunction};
use crate::{Cutoff, Info, Result};

/// Scheme by Fanourgakis
///
/// $$ S(q) = (1 - q)^4 (1 + \tfrac{9}{4}q + 3q^2 + \tfrac{5}{2}q^3) $$
///
/// This is a hard-coded polynomial identical to [`Poisson`](super::Poisson) with
/// $C = 4$ and $D = 3$, but without screening.
/// See _Fanourgakis et al._, <https://doi.org/10.1063/1.3216520>.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fanourgakis {
    cutoff: f64,
}

impl Fanourgakis {
    /// Fanourgakis scheme with the given cutoff
    pub fn new(cutoff: f64) -> Result<Self> {
        Ok(Self {
            cutoff: validate_cutoff(cutoff)?,
        })
    }
}

impl core::fmt::Display for Fanourgakis {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Fanourgakis: 𝑟✂ = {:.1} Å", self.cutoff)?;
        if let Some(url) = self.url() {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}

impl Info for Fanourgakis {
    fn short_name(&self) -> Option<&'static str> {
        Some("fanourgakis")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Fanourgakis")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("doi:10.1063/1.3216520")
    }
}

impl Cutoff for Fanourgakis {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for Fanourgakis {
    fn short_range_f0(&self, q: f64) -> f64 {
        (1.0 - q).powi(4) * (1.0 + q * (2.25 + q * (3.0 + 2.5 * q)))
    }
    fn short_range_f1(&self, q: f64) -> f64 {
        let q4 = q.powi(4);
        -1.75 + q4 * (26.25 + q * (-42.0 + 17.5 * q))
    }
    fn short_range_f2(&self, q: f64) -> f64 {
        105.0 * q.powi(3) * (q - 1.0).powi(2)
    }
    fn short_range_f3(&self, q: f64) -> f64 {
        525.0 * q * q * (q - 0.6) * (q - 1.0)
    }
    /// Both prefactors are 𝑆'(0) = -7/4, as for [`Poisson`](super::Poisson) with 𝐶 = 4 and 𝐷 = 3
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        SelfEnergyPrefactors::new(-1.75, -1.75)
    }
    /// 𝑆'(1) - 𝑆(1) + 𝑆(0)
    fn t_zero(&self) -> f64 {
        1.0
    }
}
