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

//! Runtime selection of an interaction scheme from a tag and named parameters

use crate::pairwise::{
    Fanourgakis, MultipoleEnergy, MultipoleForce, Plain, Poisson, PoissonSimple, QPotential,
    RealSpaceEwald, SelfEnergyPrefactors, ShortRangeFunction, Wolf,
};
use crate::{Cutoff, Error, Info, Result};
use derive_getters::Getters;
use dyn_clone::DynClone;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Tag identifying an interaction scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemeKind {
    Plain,
    Ewald,
    Wolf,
    #[serde(rename = "qpotential")]
    QPotential,
    Poisson,
    PoissonSimple,
    Fanourgakis,
}

impl SchemeKind {
    /// All available schemes
    pub const ALL: [SchemeKind; 7] = [
        Self::Plain,
        Self::Ewald,
        Self::Wolf,
        Self::QPotential,
        Self::Poisson,
        Self::PoissonSimple,
        Self::Fanourgakis,
    ];

    /// Tag used in configuration files
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Ewald => "ewald",
            Self::Wolf => "wolf",
            Self::QPotential => "qpotential",
            Self::Poisson => "poisson",
            Self::PoissonSimple => "poisson_simple",
            Self::Fanourgakis => "fanourgakis",
        }
    }

    /// Configuration keys understood by the scheme
    const fn parameters(&self) -> &'static [&'static str] {
        match self {
            Self::Plain => &["cutoff", "debyelength"],
            Self::Ewald => &["cutoff", "alpha", "debyelength", "epss"],
            Self::Wolf => &["cutoff", "alpha"],
            Self::QPotential => &["cutoff", "order"],
            Self::Poisson => &["cutoff", "C", "D", "debyelength"],
            Self::PoissonSimple => &["cutoff", "C", "D"],
            Self::Fanourgakis => &["cutoff"],
        }
    }
}

impl std::str::FromStr for SchemeKind {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::UnknownScheme(s.to_string()))
    }
}

impl core::fmt::Display for SchemeKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Named parameters for building a [`Scheme`]
///
/// Parameters not used by the selected scheme are ignored with a warning.
///
/// # Examples
/// ~~~
/// use coulomb_galore::{SchemeConfig, SchemeKind};
/// let config = SchemeConfig::new(SchemeKind::Ewald)
///     .with_cutoff(29.0)
///     .with_alpha(0.1)
///     .with_debye_length(23.0);
/// assert_eq!(config.alpha(), &Some(0.1));
/// ~~~
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, Getters)]
#[serde(deny_unknown_fields)]
pub struct SchemeConfig {
    /// Scheme tag
    #[serde(rename = "type")]
    kind: SchemeKind,
    /// Spherical cutoff distance; plain Coulomb is unbounded if absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    cutoff: Option<f64>,
    /// Debye screening length
    #[serde(
        default,
        rename = "debyelength",
        alias = "debye_length",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(exclusive_min = 0.0))]
    debye_length: Option<f64>,
    /// Damping parameter for Ewald and Wolf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(exclusive_min = 0.0))]
    alpha: Option<f64>,
    /// Order of the q-potential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order: Option<u32>,
    /// Cancelled derivatives at the origin (Poisson)
    #[serde(default, rename = "C", skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    c: Option<i32>,
    /// Cancelled derivatives at the cutoff (Poisson)
    #[serde(default, rename = "D", skip_serializing_if = "Option::is_none")]
    d: Option<i32>,
    /// Relative permittivity of the surroundings (Ewald)
    #[serde(
        default,
        rename = "epss",
        alias = "eps_sur",
        skip_serializing_if = "Option::is_none"
    )]
    #[validate(range(min = 1.0))]
    eps_sur: Option<f64>,
}

impl SchemeConfig {
    /// Empty parameter set for the given scheme
    pub const fn new(kind: SchemeKind) -> Self {
        Self {
            kind,
            cutoff: None,
            debye_length: None,
            alpha: None,
            order: None,
            c: None,
            d: None,
            eps_sur: None,
        }
    }
    /// Set the spherical cutoff distance
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    /// Set the Debye screening length
    pub fn with_debye_length(mut self, debye_length: f64) -> Self {
        self.debye_length = Some(debye_length);
        self
    }
    /// Set the damping parameter, 𝛼
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }
    /// Set the order of the q-potential
    pub fn with_order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
    /// Set the number of cancelled derivatives at the origin, `C`, and at the cutoff, `D`
    pub fn with_cancelled_derivatives(mut self, c: i32, d: i32) -> Self {
        self.c = Some(c);
        self.d = Some(d);
        self
    }
    /// Set the relative permittivity of the surroundings
    pub fn with_surrounding_permittivity(mut self, eps_sur: f64) -> Self {
        self.eps_sur = Some(eps_sur);
        self
    }

    /// Parse and validate from a YAML string
    ///
    /// An unrecognised `type` gives [`Error::UnknownScheme`].
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let tag = value
            .get("type")
            .and_then(serde_yaml::Value::as_str)
            .ok_or_else(|| Error::Config("missing scheme `type`".to_string()))?;
        tag.parse::<SchemeKind>()?;
        let config: Self = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the given parameters to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Keys of all given parameters
    fn given_parameters(&self) -> impl Iterator<Item = &'static str> {
        [
            ("cutoff", self.cutoff.is_some()),
            ("debyelength", self.debye_length.is_some()),
            ("alpha", self.alpha.is_some()),
            ("order", self.order.is_some()),
            ("C", self.c.is_some()),
            ("D", self.d.is_some()),
            ("epss", self.eps_sur.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, given)| given.then_some(key))
    }

    fn required<T: Copy>(&self, key: &str, value: Option<T>) -> Result<T> {
        value.ok_or_else(|| {
            Error::InvalidParameter(format!("`{}` requires parameter `{}`", self.kind, key))
        })
    }
}

/// Interaction scheme selected at runtime
///
/// Implements the same traits as the concrete schemes by delegation.
///
/// # Examples
/// ~~~
/// # use approx::assert_relative_eq;
/// use coulomb_galore::{Scheme, SchemeConfig, SchemeKind, Info};
/// use coulomb_galore::pairwise::MultipoleEnergy;
/// let config = SchemeConfig::new(SchemeKind::QPotential).with_cutoff(29.0).with_order(4);
/// let scheme = Scheme::new(&config).unwrap();
/// assert_eq!(scheme.short_name(), Some("qpotential"));
/// assert_relative_eq!(scheme.self_energy(&[4.0, 0.0]).unwrap(), -4.0 / 29.0, epsilon = 1e-12);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
pub enum Scheme {
    Plain(Plain),
    Ewald(RealSpaceEwald),
    Wolf(Wolf),
    QPotential(QPotential),
    Poisson(Poisson),
    PoissonSimple(PoissonSimple),
    Fanourgakis(Fanourgakis),
}

/// Applies an expression to the scheme wrapped by any variant
macro_rules! each_scheme {
    ($self:expr, $scheme:ident => $body:expr) => {
        match $self {
            Scheme::Plain($scheme) => $body,
            Scheme::Ewald($scheme) => $body,
            Scheme::Wolf($scheme) => $body,
            Scheme::QPotential($scheme) => $body,
            Scheme::Poisson($scheme) => $body,
            Scheme::PoissonSimple($scheme) => $body,
            Scheme::Fanourgakis($scheme) => $body,
        }
    };
}

impl Scheme {
    /// Build a scheme from a tag and its named parameters
    pub fn new(config: &SchemeConfig) -> Result<Self> {
        config.validate()?;
        let kind = config.kind;
        for key in config
            .given_parameters()
            .filter(|key| !kind.parameters().contains(key))
        {
            log::warn!("ignoring parameter `{}` which is unused by `{}`", key, kind);
        }
        let scheme: Scheme = match kind {
            SchemeKind::Plain => {
                Plain::new(config.cutoff.unwrap_or(f64::INFINITY), config.debye_length)?.into()
            }
            SchemeKind::Ewald => {
                let ewald = RealSpaceEwald::new(
                    config.required("cutoff", config.cutoff)?,
                    config.required("alpha", config.alpha)?,
                    config.debye_length,
                )?;
                let ewald = match config.eps_sur {
                    Some(eps_sur) => ewald.with_surrounding_permittivity(eps_sur),
                    None => ewald,
                };
                ewald.into()
            }
            SchemeKind::Wolf => Wolf::new(
                config.required("cutoff", config.cutoff)?,
                config.required("alpha", config.alpha)?,
            )?
            .into(),
            SchemeKind::QPotential => QPotential::new(
                config.required("cutoff", config.cutoff)?,
                config.required("order", config.order)?,
            )?
            .into(),
            SchemeKind::Poisson => Poisson::new(
                config.required("cutoff", config.cutoff)?,
                config.required("C", config.c)?,
                config.required("D", config.d)?,
                config.debye_length,
            )?
            .into(),
            SchemeKind::PoissonSimple => PoissonSimple::new(
                config.required("cutoff", config.cutoff)?,
                config.required("C", config.c)?,
                config.required("D", config.d)?,
            )?
            .into(),
            SchemeKind::Fanourgakis => {
                Fanourgakis::new(config.required("cutoff", config.cutoff)?)?.into()
            }
        };
        log::debug!("built electrostatic scheme: {}", scheme);
        Ok(scheme)
    }

    pub const fn kind(&self) -> SchemeKind {
        match self {
            Self::Plain(_) => SchemeKind::Plain,
            Self::Ewald(_) => SchemeKind::Ewald,
            Self::Wolf(_) => SchemeKind::Wolf,
            Self::QPotential(_) => SchemeKind::QPotential,
            Self::Poisson(_) => SchemeKind::Poisson,
            Self::PoissonSimple(_) => SchemeKind::PoissonSimple,
            Self::Fanourgakis(_) => SchemeKind::Fanourgakis,
        }
    }

    /// Parameters that rebuild this scheme
    pub fn config(&self) -> SchemeConfig {
        let config = SchemeConfig::new(self.kind());
        match self {
            Self::Plain(plain) => {
                let config = match plain.finite_cutoff() {
                    Some(cutoff) => config.with_cutoff(cutoff),
                    None => config,
                };
                SchemeConfig {
                    debye_length: plain.debye_length(),
                    ..config
                }
            }
            Self::Ewald(ewald) => SchemeConfig {
                debye_length: ewald.debye_length(),
                eps_sur: ewald.surrounding_permittivity(),
                ..config.with_cutoff(ewald.cutoff()).with_alpha(ewald.alpha())
            },
            Self::Wolf(wolf) => config.with_cutoff(wolf.cutoff()).with_alpha(wolf.alpha()),
            Self::QPotential(qpot) => config.with_cutoff(qpot.cutoff()).with_order(qpot.order()),
            Self::Poisson(poisson) => SchemeConfig {
                debye_length: poisson.debye_length(),
                ..config
                    .with_cutoff(poisson.cutoff())
                    .with_cancelled_derivatives(poisson.c(), poisson.d())
            },
            Self::PoissonSimple(poisson) => config
                .with_cutoff(poisson.cutoff())
                .with_cancelled_derivatives(poisson.c(), poisson.d()),
            Self::Fanourgakis(fanourgakis) => config.with_cutoff(fanourgakis.cutoff()),
        }
    }

    /// Type-erased copy of the wrapped scheme for heterogeneous storage
    pub fn boxed(&self) -> Box<dyn SchemeBase> {
        each_scheme!(self, scheme => Box::new(scheme.clone()) as Box<dyn SchemeBase>)
    }
}

impl core::fmt::Display for Scheme {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        each_scheme!(self, scheme => core::fmt::Display::fmt(scheme, f))
    }
}

impl Info for Scheme {
    fn short_name(&self) -> Option<&'static str> {
        each_scheme!(self, scheme => scheme.short_name())
    }
    fn long_name(&self) -> Option<&'static str> {
        each_scheme!(self, scheme => scheme.long_name())
    }
    fn citation(&self) -> Option<&'static str> {
        each_scheme!(self, scheme => scheme.citation())
    }
}

impl Cutoff for Scheme {
    #[inline]
    fn cutoff(&self) -> f64 {
        each_scheme!(self, scheme => scheme.cutoff())
    }
}

impl ShortRangeFunction for Scheme {
    #[inline]
    fn kappa(&self) -> Option<f64> {
        each_scheme!(self, scheme => scheme.kappa())
    }
    #[inline]
    fn short_range_f0(&self, q: f64) -> f64 {
        each_scheme!(self, scheme => scheme.short_range_f0(q))
    }
    #[inline]
    fn short_range_f1(&self, q: f64) -> f64 {
        each_scheme!(self, scheme => scheme.short_range_f1(q))
    }
    #[inline]
    fn short_range_f2(&self, q: f64) -> f64 {
        each_scheme!(self, scheme => scheme.short_range_f2(q))
    }
    #[inline]
    fn short_range_f3(&self, q: f64) -> f64 {
        each_scheme!(self, scheme => scheme.short_range_f3(q))
    }
    #[inline]
    fn short_range_derivatives(&self, q: f64) -> [f64; 4] {
        each_scheme!(self, scheme => scheme.short_range_derivatives(q))
    }
    fn self_energy_prefactors(&self) -> SelfEnergyPrefactors {
        each_scheme!(self, scheme => scheme.self_energy_prefactors())
    }
    fn t_zero(&self) -> f64 {
        each_scheme!(self, scheme => scheme.t_zero())
    }
}

macro_rules! impl_from_scheme {
    ($($variant:ident($scheme:ty)),+ $(,)?) => {
        $(
            impl From<$scheme> for Scheme {
                fn from(scheme: $scheme) -> Self {
                    Self::$variant(scheme)
                }
            }
        )+
    };
}

impl_from_scheme!(
    Plain(Plain),
    Ewald(RealSpaceEwald),
    Wolf(Wolf),
    QPotential(QPotential),
    Poisson(Poisson),
    PoissonSimple(PoissonSimple),
    Fanourgakis(Fanourgakis),
);

/// Object safe interface shared by all schemes
///
/// Covers the full multipole engine together with naming and display, and can be
/// cloned and shared across threads as `Box<dyn SchemeBase>` or `Arc<dyn SchemeBase>`.
pub trait SchemeBase:
    MultipoleEnergy
    + MultipoleForce
    + Info
    + core::fmt::Display
    + DynClone
    + core::fmt::Debug
    + Send
    + Sync
{
}

impl<T> SchemeBase for T where
    T: MultipoleEnergy
        + MultipoleForce
        + Info
        + core::fmt::Display
        + Clone
        + core::fmt::Debug
        + Send
        + Sync
{
}

dyn_clone::clone_trait_object!(SchemeBase);
