use std::sync::Arc;

use backlight_arbiter::{
    config::{Config, IdentityConfig},
    detect::{
        BackendSelection, CapabilityFacts, FieldMatch, IdentityDescriptor, IdentityField,
        NoopChangeNotifier, QuirkResolverPort, QuirkRule, QuirkTable, Resolution,
        ResolutionEngine,
    },
};

fn rule(ident: &str, field: IdentityField, value: &str, outcome: BackendSelection) -> QuirkRule {
    QuirkRule {
        ident: ident.to_string(),
        matches: vec![FieldMatch {
            field,
            value: value.to_string(),
            exact: false,
        }],
        requires_pci: None,
        outcome,
    }
}

fn inline_config(descriptor: IdentityDescriptor) -> Config {
    Config {
        identity: IdentityConfig::Inline { descriptor },
        capabilities: CapabilityFacts {
            legacy_video: Some(true),
            ec_sourced: false,
        },
        ..Config::default()
    }
}

#[test]
fn given_overlapping_rules_when_matching_then_first_in_list_wins() {
    let table = QuirkTable::new(vec![
        rule("board", IdentityField::BoardName, "NL5x", BackendSelection::Native),
        rule("vendor", IdentityField::SysVendor, "TUXEDO", BackendSelection::Vendor),
    ])
    .expect("rules should validate");

    let identity = IdentityDescriptor {
        sys_vendor: "TUXEDO".to_string(),
        board_name: "NL5xRU".to_string(),
        ..IdentityDescriptor::default()
    };

    assert_eq!(table.forced_selection(&identity), BackendSelection::Native);
    assert_eq!(
        table.first_match(&identity).map(|rule| rule.ident.as_str()),
        Some("board")
    );
}

#[test]
fn given_builtin_quirk_machine_when_resolving_then_quirk_is_forced() {
    let config = inline_config(IdentityDescriptor {
        sys_vendor: "SAMSUNG ELECTRONICS CO., LTD.".to_string(),
        product_name: "X360".to_string(),
        board_name: "X360".to_string(),
        ..IdentityDescriptor::default()
    });
    let engine = ResolutionEngine::from_config(&config, Arc::new(NoopChangeNotifier))
        .expect("engine should build");

    assert_eq!(
        engine.resolve(false),
        Resolution::forced(BackendSelection::Vendor)
    );
}

#[test]
fn given_configured_quirk_when_builtin_also_matches_then_configured_wins() {
    let mut config = inline_config(IdentityDescriptor {
        sys_vendor: "LENOVO".to_string(),
        product_version: "ThinkPad T420".to_string(),
        ..IdentityDescriptor::default()
    });
    config.quirks = vec![rule(
        "local t420 fix",
        IdentityField::ProductVersion,
        "ThinkPad T420",
        BackendSelection::Native,
    )];

    let engine = ResolutionEngine::from_config(&config, Arc::new(NoopChangeNotifier))
        .expect("engine should build");

    assert_eq!(
        engine.resolve(false),
        Resolution::forced(BackendSelection::Native)
    );
}

#[test]
fn given_unknown_machine_when_resolving_then_autodetects() {
    let config = inline_config(IdentityDescriptor {
        sys_vendor: "Framework".to_string(),
        product_name: "Laptop 13".to_string(),
        ..IdentityDescriptor::default()
    });
    let engine = ResolutionEngine::from_config(&config, Arc::new(NoopChangeNotifier))
        .expect("engine should build");

    assert_eq!(
        engine.resolve(false),
        Resolution::detected(BackendSelection::Legacy)
    );
}

#[test]
fn given_invalid_configured_quirk_when_building_then_rejected() {
    let mut config = inline_config(IdentityDescriptor::default());
    config.quirks = vec![QuirkRule {
        ident: "empty".to_string(),
        matches: Vec::new(),
        requires_pci: None,
        outcome: BackendSelection::Native,
    }];

    let result = ResolutionEngine::from_config(&config, Arc::new(NoopChangeNotifier));
    assert!(result.is_err(), "rule without matches must be rejected");
}
