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

//! # q-Pochhammer Symbol and its Derivatives
//!
//! The [q-Pochhammer symbol](https://en.wikipedia.org/wiki/Q-Pochhammer_symbol)
//!
//! $$ (q^{l+1}; q)\_P = \prod\_{n=1}^{P} \left(1 - q^{n+l}\right) $$
//!
//! is evaluated as $(1-q)^P \prod\_{n=1}^{P} g\_n(q)$ where $g\_n(q) = \sum\_{k=0}^{n+l-1} q^k$
//! is a finite geometric sum.
//! The product of geometric sums is differentiated through its logarithmic derivative and
//! combined with the derivatives of $(1-q)^P$ by the Leibniz rule, so that the value and the
//! first three derivatives come out of a single pass over the factors.
//!
//! For large _P_, the product of geometric sums alone grows like _P!_. Each $(1-q)$ factor is
//! therefore folded into the running product as it is accumulated, keeping all intermediates
//! bounded for $q \in [0, 1]$.

/// Value and first three derivatives, with respect to _q_, of the q-Pochhammer symbol $(q^{l+1}; q)\_P$
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QPochhammer {
    /// Value
    pub f0: f64,
    /// First derivative
    pub f1: f64,
    /// Second derivative
    pub f2: f64,
    /// Third derivative
    pub f3: f64,
}

impl QPochhammer {
    /// Evaluate the symbol for reduced distance `q`, offset `l`, and order `p`.
    ///
    /// # Examples
    /// ~~~
    /// use coulomb_galore::qpochhammer::QPochhammer;
    /// let symbol = QPochhammer::new(0.5, 0, 4);
    /// assert_eq!(symbol.f0, 0.3076171875);
    /// assert_eq!(QPochhammer::new(0.5, 0, 0).f0, 1.0);
    /// ~~~
    pub fn new(q: f64, l: u32, p: u32) -> Self {
        // `scaled[j]` is the product of geometric sums times (1-q)^(p-j)
        let mut scaled = [1.0; 4];
        // logarithmic derivative of the geometric sum product and its two derivatives
        let (mut ds, mut ds1, mut ds2) = (0.0, 0.0, 0.0);

        for n in 1..=p {
            let [g0, g1, g2, g3] = geometric_sum(q, n + l);
            for (j, product) in scaled.iter_mut().enumerate() {
                *product *= if n + (j as u32) <= p { g0 * (1.0 - q) } else { g0 };
            }
            ds += g1 / g0;
            ds1 += (g2 * g0 - g1 * g1) / (g0 * g0);
            ds2 += (g3 * g0 * g0 - 3.0 * g0 * g1 * g2 + 2.0 * g1.powi(3)) / g0.powi(3);
        }

        // derivatives of the geometric sum product relative to the product itself
        let logarithmic = [
            1.0,
            ds,
            ds * ds + ds1,
            ds.powi(3) + 3.0 * ds * ds1 + ds2,
        ];

        // d^j/dq^j (1-q)^p = falling[j] * (1-q)^(p-j)
        let mut falling = [0.0; 4];
        let mut coefficient = 1.0;
        for (j, slot) in falling.iter_mut().enumerate() {
            let j = j as u32;
            if j > p {
                break;
            }
            *slot = coefficient;
            coefficient *= -f64::from(p - j);
        }

        let leibniz = |order: usize| -> f64 {
            const BINOMIAL: [[f64; 4]; 4] = [
                [1.0, 0.0, 0.0, 0.0],
                [1.0, 1.0, 0.0, 0.0],
                [1.0, 2.0, 1.0, 0.0],
                [1.0, 3.0, 3.0, 1.0],
            ];
            (0..=order)
                .filter(|&j| falling[j] != 0.0)
                .map(|j| BINOMIAL[order][j] * logarithmic[order - j] * falling[j] * scaled[j])
                .sum()
        };

        Self {
            f0: leibniz(0),
            f1: leibniz(1),
            f2: leibniz(2),
            f3: leibniz(3),
        }
    }
}

/// Geometric sum, Σₖ qᵏ for k = 0..terms, and its first three derivatives
fn geometric_sum(q: f64, terms: u32) -> [f64; 4] {
    let mut sums = [0.0; 4];
    // q^(k-3), q^(k-2), q^(k-1), q^k
    let mut powers = [0.0, 0.0, 0.0, 1.0];
    for k in 0..terms {
        let k = f64::from(k);
        sums[0] += powers[3];
        sums[1] += k * powers[2];
        sums[2] += k * (k - 1.0) * powers[1];
        sums[3] += k * (k - 1.0) * (k - 2.0) * powers[0];
        powers = [powers[1], powers[2], powers[3], powers[3] * q];
    }
    sums
}

/// q-Pochhammer symbol, $(q^{l+1}; q)\_P$
pub fn q_pochhammer_symbol(q: f64, l: u32, p: u32) -> f64 {
    QPochhammer::new(q, l, p).f0
}

/// First derivative of the q-Pochhammer symbol with respect to `q`
pub fn q_pochhammer_symbol_derivative(q: f64, l: u32, p: u32) -> f64 {
    QPochhammer::new(q, l, p).f1
}

/// Second derivative of the q-Pochhammer symbol with respect to `q`
pub fn q_pochhammer_symbol_second_derivative(q: f64, l: u32, p: u32) -> f64 {
    QPochhammer::new(q, l, p).f2
}

/// Third derivative of the q-Pochhammer symbol with respect to `q`
pub fn q_pochhammer_symbol_third_derivative(q: f64, l: u32, p: u32) -> f64 {
    QPochhammer::new(q, l, p).f3
}
