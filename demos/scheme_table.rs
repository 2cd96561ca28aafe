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

//! Tabulates the splitting function and ion-ion energy for a set of schemes.
//!
//! Run with e.g. `cargo run --example scheme_table -- -i schemes.yaml`
//! where the input is a YAML list of scheme configurations.

use anyhow::{Context, Result};
use clap::Parser;
use coulomb_galore::pairwise::{MultipoleEnergy, ShortRangeFunction};
use coulomb_galore::{Info, Scheme, SchemeConfig, TO_CHEMISTRY_UNIT};
use pretty_env_logger::env_logger::DEFAULT_FILTER_ENV;
use std::path::PathBuf;

const DEFAULT_SCHEMES: &str = "
- {type: plain, cutoff: 29.0}
- {type: plain, cutoff: 29.0, debyelength: 23.0}
- {type: ewald, cutoff: 29.0, alpha: 0.1}
- {type: wolf, cutoff: 29.0, alpha: 0.1}
- {type: qpotential, cutoff: 29.0, order: 4}
- {type: poisson, cutoff: 29.0, C: 3, D: 3}
- {type: poisson, cutoff: 29.0, C: 3, D: 3, debyelength: 23.0}
- {type: poisson_simple, cutoff: 29.0, C: 1, D: 1}
- {type: fanourgakis, cutoff: 29.0}
";

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// YAML list of scheme configurations
    #[clap(long, short = 'i')]
    input: Option<PathBuf>,
    /// Ion-ion separation in angstrom
    #[clap(long, short = 'r', default_value_t = 7.0)]
    distance: f64,
    /// Relative permittivity of the medium
    #[clap(long, default_value_t = 80.0)]
    permittivity: f64,
    /// Verbose output. See more with e.g. RUST_LOG=Trace
    #[clap(long, short = 'v', action)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.verbose && std::env::var(DEFAULT_FILTER_ENV).is_err() {
        std::env::set_var(DEFAULT_FILTER_ENV, "Debug");
    }
    pretty_env_logger::init();

    let yaml = match &args.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?,
        None => DEFAULT_SCHEMES.to_string(),
    };
    let configs: Vec<serde_yaml::Value> = serde_yaml::from_str(&yaml)?;

    println!(
        "{:<16} {:>10} {:>10} {:>10} {:>14}  reference",
        "scheme", "S(0.25)", "S(0.5)", "S(0.75)", "u(r) kJ/mol"
    );
    for config in configs {
        let config = SchemeConfig::from_yaml(&serde_yaml::to_string(&config)?)?;
        let scheme = Scheme::new(&config)?;
        let energy =
            scheme.ion_ion_energy(1.0, -1.0, args.distance) * TO_CHEMISTRY_UNIT / args.permittivity;
        println!(
            "{:<16} {:>10.5} {:>10.5} {:>10.5} {:>14.5}  {}",
            scheme.short_name().unwrap_or_default(),
            scheme.short_range_f0(0.25),
            scheme.short_range_f0(0.5),
            scheme.short_range_f0(0.75),
            energy,
            scheme.url().unwrap_or_default()
        );
        log::debug!("{}", scheme);
    }
    Ok(())
}
