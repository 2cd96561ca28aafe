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

use super::{t_zero_from_splitting, validate_cutoff, SelfEnergyPrefactors, ShortRangeFunction};
use crate::qpochhammer::QPochhammer;
use crate::{Cutoff, Info, Result};

/// Scheme for the _q_-potential
///
/// The splitting function is the q-Pochhammer symbol, $S(q) = (q; q)\_P$,
/// which cancels the first _P_ - 1 electric moments inside the cutoff sphere.
/// Each evaluation costs _O(P²)_.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QPotential {
    cutoff: f64,
    /// Number of cancelled moments plus one, 𝑃
    order: u32,
    t_zero: f64,
}

impl QPotential {
    /// q-potential with the given cutoff and order, 𝑃
    pub fn new(cutoff: f64, order: u32) -> Result<Self> {
        let mut scheme = Self {
            cutoff: validate_cutoff(cutoff)?,
            order,
            t_zero: 0.0,
        };
        scheme.t_zero = t_zero_from_splitting(&scheme);
        Ok(scheme)
    }
    /// Order of the q-Pochhammer symbol, 𝑃
    pub const fn order(&self) -> u32 {
        self.order
    }
    #[inline]
    fn symbol(&self, q: f64) -> QPochhammer {
        QPochhammer::new(q, 0, self.order)
    }
}

impl core::fmt::Display for QPotential {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "q-potential: 𝑟✂ = {:.1} Å, 𝑃 = {}", self.cutoff, self.order)
    }
}

impl Info for QPotential {
    fn short_name(&self) -> Option<&'static str> {
        Some("qpotential")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("q-potential")
    }
}

impl Cutoff for QPotential {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for QPotential {
    fn short_range_f0(&self, q: f64) -> f64 {
        self.symbol(q).f0
    }
    fn short_range_f1(&self, q: f64) -> f64 {
        self.symbol(q).f1
    }
    fn short_range_f2(&self, q: f64) -> f64 {
        self.symbol(q).f2
    }
    fn short_range_f3(&self, q: f64) -> f64 {
        self.symbol(q).f3
    }
    /// All four values from a single q-Pochhammer evaluation
    fn short_range_derivatives(&self, q: f64) -> [f64; 4] {
        let symbol = self.symbol(q);
        [symbol.f0, symbol.f1, symbol.f2, symbol.f3]
    }
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        SelfEnergyPrefactors::new(-1.0, -1.0)
    }
    fn t_zero(&self) -> f64 {
        self.t_zero
    }
}
