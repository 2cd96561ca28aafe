//! Building schemes from tags and YAML parameter bundles

use approx::assert_relative_eq;
use coulomb_galore::pairwise::{
    MultipoleEnergy, MultipolePotential, Poisson, RealSpaceEwald, ShortRangeFunction,
};
use coulomb_galore::{Cutoff, Error, Info, Scheme, SchemeBase, SchemeConfig, SchemeKind};

fn config_for(kind: SchemeKind) -> SchemeConfig {
    let config = SchemeConfig::new(kind).with_cutoff(29.0);
    match kind {
        SchemeKind::Plain | SchemeKind::Fanourgakis => config,
        SchemeKind::Ewald | SchemeKind::Wolf => config.with_alpha(0.1),
        SchemeKind::QPotential => config.with_order(4),
        SchemeKind::Poisson | SchemeKind::PoissonSimple => config.with_cancelled_derivatives(3, 3),
    }
}

#[test]
fn every_kind_builds() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(&config_for(kind)).unwrap();
        assert_eq!(scheme.kind(), kind);
        assert_eq!(scheme.short_name(), Some(kind.as_str()));
        assert_eq!(scheme.cutoff(), 29.0);
        assert!(scheme.long_name().is_some());
        assert!(scheme.to_string().contains("𝑟✂ = 29.0 Å"));
        assert_eq!(scheme.ion_potential(1.0, 29.0), 0.0);
        assert_eq!(Scheme::new(&scheme.config()).unwrap(), scheme);
    }
}

#[test]
fn yaml_configuration() {
    let yaml = "
type: poisson
cutoff: 29.0
C: 3
D: 3
debyelength: 23.0
";
    let config = SchemeConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.kind(), &SchemeKind::Poisson);
    assert_eq!(config.c(), &Some(3));
    assert_eq!(config.debye_length(), &Some(23.0));
    let scheme = Scheme::new(&config).unwrap();
    assert_eq!(scheme, Scheme::from(Poisson::stenqvist(29.0, Some(23.0)).unwrap()));

    let config = SchemeConfig::from_yaml("{type: ewald, cutoff: 29.0, alpha: 0.1, eps_sur: 80.0}").unwrap();
    assert_eq!(config.eps_sur(), &Some(80.0));
    let scheme = Scheme::new(&config).unwrap();
    let ewald = RealSpaceEwald::new(29.0, 0.1, None)
        .unwrap()
        .with_surrounding_permittivity(80.0);
    assert_relative_eq!(scheme.t_zero(), ewald.t_zero(), epsilon = 1e-15);

    let config = SchemeConfig::from_yaml("{type: plain}").unwrap();
    let scheme = Scheme::new(&config).unwrap();
    assert!(scheme.cutoff().is_infinite());
    assert_eq!(scheme.ion_potential(2.0, 1000.0), 0.002);
}

#[test]
fn yaml_round_trip() {
    let config = SchemeConfig::new(SchemeKind::Poisson)
        .with_cutoff(18.0)
        .with_cancelled_derivatives(4, 3)
        .with_debye_length(50.0);
    let yaml = config.to_yaml().unwrap();
    assert!(yaml.contains("type: poisson"));
    assert!(yaml.contains("debyelength: 50.0"));
    assert!(!yaml.contains("alpha"));
    assert_eq!(SchemeConfig::from_yaml(&yaml).unwrap(), config);
}

#[test]
fn unknown_scheme_fails() {
    assert_eq!(
        SchemeConfig::from_yaml("{type: reaction_field, cutoff: 10.0}"),
        Err(Error::UnknownScheme("reaction_field".to_string()))
    );
    assert!(matches!(
        SchemeConfig::from_yaml("{cutoff: 10.0}"),
        Err(Error::Config(_))
    ));
    assert!(matches!(
        SchemeConfig::from_yaml("{type: wolf, cutoff: 10.0, alpha: 0.1, beta: 2.0}"),
        Err(Error::Config(_))
    ));
}

#[test]
fn invalid_parameters_fail() {
    let missing = [
        "{type: ewald, cutoff: 10.0}",
        "{type: wolf, alpha: 0.1}",
        "{type: qpotential, cutoff: 10.0}",
        "{type: poisson, cutoff: 10.0, C: 3}",
        "{type: poisson_simple, cutoff: 10.0, D: 3}",
        "{type: fanourgakis}",
    ];
    for yaml in missing {
        let config = SchemeConfig::from_yaml(yaml).unwrap();
        assert!(matches!(Scheme::new(&config), Err(Error::InvalidParameter(_))), "{}", yaml);
    }
    let out_of_range = [
        "{type: wolf, cutoff: -10.0, alpha: 0.1}",
        "{type: plain, cutoff: 10.0, debyelength: 0.0}",
        "{type: poisson, cutoff: 10.0, C: 0, D: 3}",
        "{type: ewald, cutoff: 10.0, alpha: 0.1, epss: 0.5}",
    ];
    for yaml in out_of_range {
        assert!(matches!(SchemeConfig::from_yaml(yaml), Err(Error::InvalidParameter(_))), "{}", yaml);
    }
    let config = SchemeConfig::new(SchemeKind::Poisson)
        .with_cutoff(10.0)
        .with_cancelled_derivatives(3, -2);
    assert!(matches!(Scheme::new(&config), Err(Error::InvalidParameter(_))));
}

#[test]
fn heterogeneous_storage() {
    let schemes: Vec<Box<dyn SchemeBase>> = SchemeKind::ALL
        .into_iter()
        .map(|kind| Scheme::new(&config_for(kind)).unwrap().boxed())
        .collect();
    let copies = schemes.clone();
    for (scheme, copy) in schemes.iter().zip(&copies) {
        assert_eq!(scheme.short_name(), copy.short_name());
        assert_eq!(scheme.ion_potential(1.0, 10.0), copy.ion_potential(1.0, 10.0));
        assert!(scheme.self_energy(&[1.0, 1.0]).unwrap().is_finite());
    }
    let names: Vec<_> = schemes.iter().filter_map(|s| s.short_name()).collect();
    assert_eq!(
        names,
        ["plain", "ewald", "wolf", "qpotential", "poisson", "poisson_simple", "fanourgakis"]
    );
}

#[test]
fn fanourgakis_and_poisson_4_3_share_self_energy() {
    let fanourgakis = Scheme::new(&SchemeConfig::from_yaml("{type: fanourgakis, cutoff: 29.0}").unwrap()).unwrap();
    let poisson = Scheme::new(&SchemeConfig::from_yaml("{type: poisson, cutoff: 29.0, C: 4, D: 3}").unwrap()).unwrap();
    let simple =
        Scheme::new(&SchemeConfig::from_yaml("{type: poisson_simple, cutoff: 29.0, C: 4, D: 3}").unwrap()).unwrap();
    for moments in [[4.0, 0.0], [0.0, 2.0], [1.0, 9.0]] {
        let expected = fanourgakis.self_energy(&moments).unwrap();
        assert_eq!(poisson.self_energy(&moments).unwrap(), expected);
        assert_eq!(simple.self_energy(&moments).unwrap(), expected);
    }
    assert_relative_eq!(
        fanourgakis.self_energy(&[4.0, 0.0]).unwrap(),
        -0.2413793103448276,
        epsilon = 1e-12
    );
}

#[test]
fn truncated_self_energies_include_dipoles() {
    for kind in SchemeKind::ALL {
        let scheme = Scheme::new(&config_for(kind)).unwrap();
        let prefactors = scheme.self_energy_prefactors();
        match kind {
            SchemeKind::Plain => assert_eq!(prefactors.to_array(), [0.0, 0.0]),
            _ => assert!(prefactors.monopole() < 0.0 && prefactors.dipole() < 0.0, "{}", kind),
        }
    }
}
