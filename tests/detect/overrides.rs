use std::sync::Arc;

use backlight_arbiter::detect::{
    BackendSelection, DetectErrorKind, InMemoryLegacyRegistry, Resolution, ResolutionEngine,
    global_resolver, install_global_resolver,
};

use super::{EngineSetup, legacy_present};

fn legacy_engine(registry: &Arc<InMemoryLegacyRegistry>) -> ResolutionEngine {
    EngineSetup {
        capabilities: legacy_present(),
        ..EngineSetup::default()
    }
    .build_with_notifier(registry.clone())
}

#[test]
fn given_several_overrides_when_resolving_then_last_one_wins() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = legacy_engine(&registry);

    engine.set_forced_selection(BackendSelection::Vendor);
    engine.set_forced_selection(BackendSelection::None);
    engine.set_forced_selection(BackendSelection::Native);

    assert_eq!(
        engine.resolve(false),
        Resolution::forced(BackendSelection::Native)
    );
    let state = engine.snapshot().expect("engine should be initialized");
    assert_eq!(state.dmi_choice(), BackendSelection::Native);
}

#[test]
fn given_registered_legacy_when_forcing_native_then_unregistered_once() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = legacy_engine(&registry);

    assert_eq!(engine.backlight_type(), BackendSelection::Legacy);
    registry
        .register("acpi_video0")
        .expect("legacy device should register");
    let registered_version = registry.version();

    let resolution = engine.set_forced_selection(BackendSelection::Native);
    assert_eq!(resolution, Resolution::forced(BackendSelection::Native));
    assert_eq!(registry.unregister_requests(), 1);
    assert!(!registry.is_registered());
    assert_eq!(registry.version(), registered_version + 1);

    let repeated = engine.set_forced_selection(BackendSelection::Native);
    assert_eq!(repeated, resolution);
    assert_eq!(registry.unregister_requests(), 2);
    assert!(!registry.is_registered());
    assert_eq!(
        registry.version(),
        registered_version + 1,
        "second unregister must not change the registry",
    );
}

#[test]
fn given_forced_legacy_when_overriding_then_no_unregister() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = legacy_engine(&registry);
    registry
        .register("acpi_video0")
        .expect("legacy device should register");

    let resolution = engine.set_forced_selection(BackendSelection::Legacy);

    assert_eq!(resolution, Resolution::forced(BackendSelection::Legacy));
    assert_eq!(registry.unregister_requests(), 0);
    assert!(registry.is_registered());
}

#[test]
fn given_nothing_registered_when_forcing_vendor_then_unregister_is_noop() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = EngineSetup::default().build_with_notifier(registry.clone());

    engine.set_forced_selection(BackendSelection::Vendor);

    assert_eq!(registry.unregister_requests(), 1);
    assert_eq!(registry.version(), 0);
}

#[test]
fn given_override_before_first_resolve_when_quirk_matches_then_override_kept() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = EngineSetup {
        quirk: BackendSelection::Vendor,
        ..EngineSetup::default()
    }
    .build_with_notifier(registry.clone());

    assert!(engine.snapshot().is_none());
    engine.set_forced_selection(BackendSelection::Native);

    assert_eq!(
        engine.resolve(false),
        Resolution::forced(BackendSelection::Native)
    );
}

#[test]
fn given_command_line_when_overriding_then_command_line_still_wins() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = EngineSetup {
        backlight: Some("video"),
        ..EngineSetup::default()
    }
    .build_with_notifier(registry.clone());

    let resolution = engine.set_forced_selection(BackendSelection::Native);

    assert_eq!(resolution, Resolution::forced(BackendSelection::Legacy));
    assert_eq!(registry.unregister_requests(), 0);
}

#[test]
fn given_override_cleared_when_resolving_then_autodetect_resumes() {
    let registry = Arc::new(InMemoryLegacyRegistry::new());
    let engine = legacy_engine(&registry);

    engine.set_forced_selection(BackendSelection::Native);
    let resolution = engine.set_forced_selection(BackendSelection::Undefined);

    assert_eq!(resolution, Resolution::detected(BackendSelection::Legacy));
    assert_eq!(registry.unregister_requests(), 1);
}

#[test]
fn given_installed_resolver_when_installing_again_then_rejected() {
    let first = Arc::new(EngineSetup::default().build());
    install_global_resolver(Arc::clone(&first)).expect("first install should succeed");

    let err = install_global_resolver(Arc::new(EngineSetup::default().build()))
        .expect_err("second install must fail");
    assert_eq!(err.kind, DetectErrorKind::AlreadyInstalled);

    let global = global_resolver().expect("resolver should be installed");
    assert!(Arc::ptr_eq(&global, &first));
}
