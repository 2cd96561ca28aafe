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
    inverse_debye_length, t_zero_from_splitting, validate_cutoff, SelfEnergyPrefactors,
    ShortRangeFunction,
};
use crate::{Cutoff, Error, Info, Result};
use num::integer::binomial;

/// Binomial coefficient extended to negative `n` through (-1)ᵏ·binom(k - n - 1, k)
fn generalized_binomial(n: i32, k: i32) -> f64 {
    let (n, k) = (i64::from(n), i64::from(k));
    if n >= 0 {
        binomial(n, k) as f64
    } else {
        let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
        sign * binomial(k - n - 1, k) as f64
    }
}

/// Citation for the pair (C, D) of cancelled derivatives
fn citation(c: i32, d: i32) -> &'static str {
    match (c, d) {
        (1, -1) => "doi:msxd",              // plain
        (1, 0) => "doi:10.1063/1.478738",   // wolf
        (1, 1) => "doi:10/fp959p",          // fennell
        (1, 2) => "doi:10/csh8bg",          // kale
        (1, 3) => "doi:10.1021/ct300961",   // mccann
        (2, 1) => "doi:10.1063/1.3582791",  // fukuda
        (2, 2) => "doi:dbpbts",             // markland
        (4, 3) => "doi:10.1063/1.3216520",  // fanourgakis
        _ => "doi:10/c5fr",                 // stenqvist and generic poisson
    }
}

/// Moment cancelling polynomial of the Poisson family
///
/// $$ P(x) = (1 - x)^{D + 1} \sum_{c = 0}^{C - 1} \frac{C - c}{C} \binom{D - 1 + c}{c} x^c $$
///
/// Terms with a vanishing integer prefactor are skipped so that
/// negative powers of $x$ or $(1 - x)$ are never evaluated at the end points.
#[derive(Clone, Debug, PartialEq)]
struct CancellationPolynomial {
    c: i32,
    d: i32,
    /// Coefficients of the sum
    coefficients: Vec<f64>,
    /// binom(C + D, C) × D
    binom_cdc: f64,
}

impl CancellationPolynomial {
    fn new(c: i32, d: i32) -> Result<Self> {
        if c < 1 {
            return Err(Error::InvalidParameter(format!(
                "`C` must be larger than zero, got {}",
                c
            )));
        }
        if d < -1 {
            return Err(Error::InvalidParameter(format!(
                "`D` must be larger than or equal to negative one, got {}",
                d
            )));
        }
        let coefficients = (0..c)
            .map(|i| generalized_binomial(d - 1 + i, i) * f64::from(c - i) / f64::from(c))
            .collect();
        Ok(Self {
            c,
            d,
            coefficients,
            binom_cdc: generalized_binomial(c + d, c) * f64::from(d),
        })
    }

    fn sum(&self, x: f64) -> f64 {
        self.coefficients.iter().rev().fold(0.0, |acc, a| acc * x + a)
    }

    fn sum_derivative(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .enumerate()
            .skip(1)
            .rev()
            .fold(0.0, |acc, (i, a)| acc * x + i as f64 * a)
    }

    fn value(&self, x: f64) -> f64 {
        (1.0 - x).powi(self.d + 1) * self.sum(x)
    }

    fn first(&self, x: f64) -> f64 {
        let tail = (1.0 - x).powi(self.d + 1) * self.sum_derivative(x);
        if self.d == -1 {
            tail
        } else {
            tail - f64::from(self.d + 1) * (1.0 - x).powi(self.d) * self.sum(x)
        }
    }

    fn second(&self, x: f64) -> f64 {
        if self.binom_cdc == 0.0 {
            return 0.0;
        }
        self.binom_cdc * (1.0 - x).powi(self.d - 1) * x.powi(self.c - 1)
    }

    fn third(&self, x: f64) -> f64 {
        if self.binom_cdc == 0.0 {
            return 0.0;
        }
        let (c, d) = (self.c, self.d);
        let origin_term = if c == 1 {
            0.0
        } else {
            f64::from(c - 1) * (1.0 - x).powi(d - 1) * x.powi(c - 2)
        };
        let cutoff_term = if d == 1 {
            0.0
        } else {
            f64::from(d - 1) * (1.0 - x).powi(d - 2) * x.powi(c - 1)
        };
        self.binom_cdc * (origin_term - cutoff_term)
    }

    /// Self-energy prefactor before screening, -(C + D)/C, which equals P'(0)
    fn self_energy_prefactor(&self) -> f64 {
        -f64::from(self.c + self.d) / f64::from(self.c)
    }
}

/// Substitution q → (1 - exp(2κ'q)) / (1 - exp(2κ'))  where κ' = κ × 𝑟✂︎
#[derive(Clone, Copy, Debug, PartialEq)]
struct YukawaSubstitution {
    /// κ × 𝑟✂︎
    reduced_kappa: f64,
    /// 1 / (1 - exp(2κ'))
    denominator: f64,
}

impl YukawaSubstitution {
    /// Below this reduced kappa the substitution is numerically ill-conditioned
    const THRESHOLD: f64 = 1e-6;

    fn new(reduced_kappa: f64) -> Option<Self> {
        (reduced_kappa.abs() > Self::THRESHOLD).then(|| Self {
            reduced_kappa,
            denominator: 1.0 / (1.0 - (2.0 * reduced_kappa).exp()),
        })
    }

    /// Substituted distance and its first three derivatives
    #[inline]
    fn derivatives(&self, q: f64) -> [f64; 4] {
        let k = self.reduced_kappa;
        let exp_term = (2.0 * k * q).exp() * self.denominator;
        [
            (1.0 - (2.0 * k * q).exp()) * self.denominator,
            -2.0 * k * exp_term,
            -4.0 * k * k * exp_term,
            -8.0 * k.powi(3) * exp_term,
        ]
    }
}

/// # Scheme for the Poisson short-range function
///
/// This is a general scheme for the short-ranged part of the electrostatic interaction
/// which can be used to arbitrarily cancel derivatives at the origin and at the cut-off.
/// See _Stenqvist and Lund_, <https://doi.org/10/c5fr>, where the same derivation
/// is also made for the screened Poisson equation, _i.e._ for Yukawa potentials.
///
/// The general short-range function is:
/// $$
/// S(q) = (1 - q)^{D + 1} \sum_{c = 0}^{C - 1} \frac{C - c}{C} \binom{D - 1 + c}{c} q^c
/// $$
///
/// where $C$ is the number of cancelled derivatives at origin -2 (starting from the second derivative),
/// and $D$ is the number of cancelled derivatives at the cut-off (starting from the zeroth derivative).
/// With a Debye length, $q$ is replaced by
/// $\tilde{q} = (1 - e^{2\kappa r_c q}) / (1 - e^{2\kappa r_c})$.
///
/// For infinite Debye-length, $\kappa=0$, the [`Poisson`] scheme captures several
/// other truncation schemes by setting $C$ and $D$ according to this table:
///
/// | Constructor        | $C$ | $D$ | Reference / Comment
/// |--------------------|-----|-----|---------------------
/// | -                  | 1   | -1  | Vanilla Coulomb, same as [`Plain`](super::Plain)
/// | `undamped_wolf`    | 1   | 0   | [Undamped Wolf](https://doi.org/10.1063/1.478738)
/// | `undamped_fennell` | 1   | 1   | [Levitt/undamped Fennell](https://doi.org/10/fp959p). See also doi:10/bqgmv2.
/// | `kale`             | 1   | 2   | [Kale](https://doi.org/10/csh8bg)
/// | `mccann`           | 1   | 3   | [McCann](https://doi.org/10.1021/ct300961)
/// | `undamped_fukuda`  | 2   | 1   | [Undamped Fukuda](https://doi.org/10.1063/1.3582791)
/// | `markland`         | 2   | 2   | [Markland](https://doi.org/10.1016/j.cplett.2008.09.019)
/// | `stenqvist`        | 3   | 3   | [Stenqvist](https://doi.org/10/c5fr)
/// | `fanourgakis`      | 4   | 3   | [Fanourgakis](https://doi.org/10.1063/1.3216520)
///
/// # Examples
/// ~~~
/// # use approx::assert_relative_eq;
/// use coulomb_galore::pairwise::{Poisson, ShortRangeFunction};
/// let scheme = Poisson::stenqvist(29.0, None).unwrap();
/// assert_relative_eq!(scheme.short_range_f0(0.5), 0.15625);
/// assert_relative_eq!(scheme.short_range_f1(0.5), -1.0);
/// ~~~
#[derive(Clone, Debug, PartialEq)]
pub struct Poisson {
    cutoff: f64,
    polynomial: CancellationPolynomial,
    kappa: Option<f64>,
    yukawa: Option<YukawaSubstitution>,
    t_zero: f64,
}

impl Poisson {
    /// Poisson scheme with `c` and `d` cancelled derivatives and optional screening
    pub fn new(cutoff: f64, c: i32, d: i32, debye_length: Option<f64>) -> Result<Self> {
        let cutoff = validate_cutoff(cutoff)?;
        let polynomial = CancellationPolynomial::new(c, d)?;
        let kappa = inverse_debye_length(debye_length)?;
        let yukawa = kappa.and_then(|kappa| {
            let substitution = YukawaSubstitution::new(kappa * cutoff);
            if substitution.is_none() {
                log::warn!(
                    "Debye length {:.3e} is much longer than the cutoff; Yukawa substitution disabled",
                    kappa.recip()
                );
            }
            substitution
        });
        let mut scheme = Self {
            cutoff,
            polynomial,
            kappa,
            yukawa,
            t_zero: 0.0,
        };
        scheme.t_zero = t_zero_from_splitting(&scheme);
        Ok(scheme)
    }
    /// Scheme for [Stenqvist](https://doi.org/10/c5fr), (C, D) = (3, 3)
    pub fn stenqvist(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 3, 3, debye_length)
    }
    /// Scheme for [Fanourgakis](https://doi.org/10.1063/1.3216520), (C, D) = (4, 3)
    pub fn fanourgakis(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 4, 3, debye_length)
    }
    /// Scheme for [Undamped Wolf](https://doi.org/10.1063/1.478738), (C, D) = (1, 0)
    pub fn undamped_wolf(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 1, 0, debye_length)
    }
    /// Energy and force shifted Yukawa potential [Levitt/undamped Fennell](https://doi.org/10/fp959p), (C, D) = (1, 1)
    pub fn undamped_fennell(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 1, 1, debye_length)
    }
    /// Scheme for [Kale](https://doi.org/10/csh8bg), (C, D) = (1, 2)
    pub fn kale(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 1, 2, debye_length)
    }
    /// Scheme for [McCann](https://doi.org/10.1021/ct300961), (C, D) = (1, 3)
    pub fn mccann(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 1, 3, debye_length)
    }
    /// Scheme for [Undamped Fukuda](https://doi.org/10.1063/1.3582791), (C, D) = (2, 1)
    pub fn undamped_fukuda(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 2, 1, debye_length)
    }
    /// Scheme for [Markland](https://doi.org/10.1016/j.cplett.2008.09.019), (C, D) = (2, 2)
    pub fn markland(cutoff: f64, debye_length: Option<f64>) -> Result<Self> {
        Self::new(cutoff, 2, 2, debye_length)
    }
    /// Number of cancelled derivatives at the origin
    pub const fn c(&self) -> i32 {
        self.polynomial.c
    }
    /// Number of cancelled derivatives at the cutoff
    pub const fn d(&self) -> i32 {
        self.polynomial.d
    }
}

impl core::fmt::Display for Poisson {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Poisson: 𝐶 = {}, 𝐷 = {}, 𝑟✂ = {:.1} Å",
            self.c(),
            self.d(),
            self.cutoff
        )?;
        if let Some(debye_length) = self.debye_length() {
            write!(f, ", λᴰ = {:.1} Å", debye_length)?;
        }
        if let Some(url) = self.url() {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}

impl Info for Poisson {
    fn short_name(&self) -> Option<&'static str> {
        Some("poisson")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Poisson")
    }
    fn citation(&self) -> Option<&'static str> {
        Some(citation(self.c(), self.d()))
    }
}

impl Cutoff for Poisson {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for Poisson {
    #[inline]
    fn kappa(&self) -> Option<f64> {
        self.kappa
    }
    fn short_range_f0(&self, q: f64) -> f64 {
        let qp = self.yukawa.map_or(q, |yukawa| yukawa.derivatives(q)[0]);
        self.polynomial.value(qp)
    }
    fn short_range_f1(&self, q: f64) -> f64 {
        match self.yukawa {
            None => self.polynomial.first(q),
            Some(yukawa) => {
                let [qp, dqp, _, _] = yukawa.derivatives(q);
                self.polynomial.first(qp) * dqp
            }
        }
    }
    fn short_range_f2(&self, q: f64) -> f64 {
        match self.yukawa {
            None => self.polynomial.second(q),
            Some(yukawa) => {
                let [qp, dqp, ddqp, _] = yukawa.derivatives(q);
                self.polynomial.second(qp) * dqp * dqp + self.polynomial.first(qp) * ddqp
            }
        }
    }
    fn short_range_f3(&self, q: f64) -> f64 {
        match self.yukawa {
            None => self.polynomial.third(q),
            Some(yukawa) => {
                let [qp, dqp, ddqp, dddqp] = yukawa.derivatives(q);
                self.polynomial.third(qp) * dqp.powi(3)
                    + 3.0 * self.polynomial.second(qp) * dqp * ddqp
                    + self.polynomial.first(qp) * dddqp
            }
        }
    }
    /// Both prefactors are -(C + D)/C, scaled by -2κ'/(1 - exp(2κ')) with screening
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        let prefactor = self.polynomial.self_energy_prefactor();
        let prefactor = match self.yukawa {
            Some(yukawa) => prefactor * -2.0 * yukawa.reduced_kappa * yukawa.denominator,
            None => prefactor,
        };
        SelfEnergyPrefactors::new(prefactor, prefactor)
    }
    fn t_zero(&self) -> f64 {
        self.t_zero
    }
}

/// Unscreened Poisson scheme
///
/// Same splitting function as [`Poisson`] without a Debye length.
#[derive(Clone, Debug, PartialEq)]
pub struct PoissonSimple {
    cutoff: f64,
    polynomial: CancellationPolynomial,
    t_zero: f64,
}

impl PoissonSimple {
    /// Unscreened scheme with `c` and `d` cancelled derivatives
    pub fn new(cutoff: f64, c: i32, d: i32) -> Result<Self> {
        let mut scheme = Self {
            cutoff: validate_cutoff(cutoff)?,
            polynomial: CancellationPolynomial::new(c, d)?,
            t_zero: 0.0,
        };
        scheme.t_zero = t_zero_from_splitting(&scheme);
        Ok(scheme)
    }
    /// Number of cancelled derivatives at the origin
    pub const fn c(&self) -> i32 {
        self.polynomial.c
    }
    /// Number of cancelled derivatives at the cutoff
    pub const fn d(&self) -> i32 {
        self.polynomial.d
    }
}

impl core::fmt::Display for PoissonSimple {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Poisson (unscreened): 𝐶 = {}, 𝐷 = {}, 𝑟✂ = {:.1} Å",
            self.c(),
            self.d(),
            self.cutoff
        )?;
        if let Some(url) = self.url() {
            write!(f, " <{}>", url)?;
        }
        Ok(())
    }
}

impl Info for PoissonSimple {
    fn short_name(&self) -> Option<&'static str> {
        Some("poisson_simple")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Poisson (unscreened)")
    }
    fn citation(&self) -> Option<&'static str> {
        Some(citation(self.c(), self.d()))
    }
}

impl Cutoff for PoissonSimple {
    #[inline]
    fn cutoff(&self) -> f64 {
        self.cutoff
    }
}

impl ShortRangeFunction for PoissonSimple {
    fn short_range_f0(&self, q: f64) -> f64 {
        self.polynomial.value(q)
    }
    fn short_range_f1(&self, q: f64) -> f64 {
        self.polynomial.first(q)
    }
    fn short_range_f2(&self, q: f64) -> f64 {
        self.polynomial.second(q)
    }
    fn short_range_f3(&self, q: f64) -> f64 {
        self.polynomial.third(q)
    }
    /// Both prefactors are -(C + D)/C
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        let prefactor = self.polynomial.self_energy_prefactor();
        SelfEnergyPrefactors::new(prefactor, prefactor)
    }
    fn t_zero(&self) -> f64 {
        self.t_zero
    }
}
