use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::{
    config::{Config, IdentityConfig},
    detect::{
        cascade,
        error::{DetectError, already_installed},
        heuristic::StaticPlatformHeuristic,
        identity::SysfsIdentitySource,
        noop::{NoQuirks, NoopChangeNotifier, StaticCapabilityProbe, StaticIdentitySource},
        ports::{
            CapabilityProbePort, ChangeNotifierPort, IdentitySourcePort, PlatformHeuristicPort,
            QuirkResolverPort,
        },
        quirks::QuirkTable,
        state::{InitialFacts, ResolutionState},
        types::{BackendSelection, CapabilityFacts, DetectEffect, IdentityDescriptor, Resolution},
    },
};

static GLOBAL_RESOLVER: OnceLock<Arc<ResolutionEngine>> = OnceLock::new();

/// Installs the process-wide engine. Only the first install succeeds.
pub fn install_global_resolver(engine: Arc<ResolutionEngine>) -> Result<(), DetectError> {
    GLOBAL_RESOLVER
        .set(engine)
        .map_err(|_| already_installed("backlight resolver is already installed"))
}

pub fn global_resolver() -> Option<Arc<ResolutionEngine>> {
    GLOBAL_RESOLVER.get().cloned()
}

pub struct ResolverPorts {
    pub identity_source: Arc<dyn IdentitySourcePort>,
    pub quirks: Arc<dyn QuirkResolverPort>,
    pub capability_probe: Arc<dyn CapabilityProbePort>,
    pub heuristic: Arc<dyn PlatformHeuristicPort>,
    pub notifier: Arc<dyn ChangeNotifierPort>,
}

impl Default for ResolverPorts {
    fn default() -> Self {
        Self {
            identity_source: Arc::new(StaticIdentitySource::default()),
            quirks: Arc::new(NoQuirks),
            capability_probe: Arc::new(StaticCapabilityProbe::default()),
            heuristic: Arc::new(StaticPlatformHeuristic::default()),
            notifier: Arc::new(NoopChangeNotifier),
        }
    }
}

/// Decides which backend owns display brightness.
///
/// The boot override, quirk lookup and capability probe run once, on the
/// first `resolve` or `set_forced_selection`; concurrent first callers wait
/// for that single initialization. A port that panics during initialization
/// leaves it undone and the next caller retries. Every later call only folds
/// in the native hint and reruns the cascade.
pub struct ResolutionEngine {
    backlight_override: Option<String>,
    ports: ResolverPorts,
    init: OnceLock<()>,
    state: Mutex<ResolutionState>,
}

impl Default for ResolutionEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ResolutionEngine {
    pub fn new(backlight_override: Option<String>, ports: ResolverPorts) -> Self {
        Self {
            backlight_override,
            ports,
            init: OnceLock::new(),
            state: Mutex::new(ResolutionState::default()),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(None, ResolverPorts::default())
    }

    /// Wires the engine from loaded configuration. Configured quirks run
    /// ahead of the built-in table.
    pub fn from_config(
        config: &Config,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Result<Self, DetectError> {
        let quirks = QuirkTable::builtin().with_extra_rules(config.quirks.clone())?;
        let identity_source: Arc<dyn IdentitySourcePort> = match &config.identity {
            IdentityConfig::Sysfs { dmi_dir, pci_dir } => Arc::new(SysfsIdentitySource::new(
                dmi_dir.clone(),
                pci_dir.clone(),
            )),
            IdentityConfig::Inline { descriptor } => {
                Arc::new(StaticIdentitySource::new(descriptor.clone()))
            }
        };

        Ok(Self::new(
            config.backlight.clone(),
            ResolverPorts {
                identity_source,
                quirks: Arc::new(quirks),
                capability_probe: Arc::new(StaticCapabilityProbe::new(config.capabilities)),
                heuristic: Arc::new(StaticPlatformHeuristic::new(config.platform)),
                notifier,
            },
        ))
    }

    pub fn resolve(&self, native_available: bool) -> Resolution {
        self.ensure_initialized();

        let resolution = {
            let mut state = self.lock_state();
            state.observe_native(native_available);
            cascade::decide(&state, self.ports.heuristic.as_ref())
        };

        tracing::debug!(
            target: "detect",
            native_available = native_available,
            selection = %resolution.selection,
            auto_detected = resolution.auto_detected,
            "backlight_type_resolved"
        );
        resolution
    }

    pub fn backlight_type(&self) -> BackendSelection {
        self.resolve(false).selection
    }

    /// Asked by GPU drivers before registering their own backlight device.
    pub fn use_native(&self) -> bool {
        self.resolve(true).selection == BackendSelection::Native
    }

    /// Replaces the quirk choice with one supplied by a more specific
    /// platform driver. When the outcome is no longer the legacy backend,
    /// the notifier is told to drop it, whether or not one is registered.
    pub fn set_forced_selection(&self, choice: BackendSelection) -> Resolution {
        self.ensure_initialized();

        let transition = {
            let mut state = self.lock_state();
            cascade::force_selection(&mut state, choice, self.ports.heuristic.as_ref())
        };

        tracing::info!(
            target: "detect",
            choice = %choice,
            selection = %transition.resolution.selection,
            auto_detected = transition.resolution.auto_detected,
            effects = transition.effects.len(),
            "forced_selection_applied"
        );

        for effect in &transition.effects {
            self.run_effect(*effect);
        }
        transition.resolution
    }

    /// Copy of the current state, or `None` before initialization.
    pub fn snapshot(&self) -> Option<ResolutionState> {
        let state = *self.lock_state();
        state.is_initialized().then_some(state)
    }

    fn run_effect(&self, effect: DetectEffect) {
        match effect {
            DetectEffect::UnregisterLegacy => self.ports.notifier.unregister_legacy(),
        }
    }

    fn ensure_initialized(&self) {
        self.init.get_or_init(|| {
            let facts = self.gather_initial_facts();
            let populated = self.lock_state().populate(facts);

            tracing::info!(
                target: "detect",
                populated = populated,
                command_line_choice = %facts.command_line_choice,
                dmi_choice = %facts.dmi_choice,
                legacy_capability = ?facts.legacy_capability,
                ec_sourced_present = facts.ec_sourced_present,
                "resolution_initialized"
            );
        });
    }

    fn gather_initial_facts(&self) -> InitialFacts {
        let command_line_choice = self
            .backlight_override
            .as_deref()
            .map(BackendSelection::from_override)
            .unwrap_or_default();
        if let Some(raw) = self.backlight_override.as_deref()
            && !raw.is_empty()
            && !command_line_choice.is_defined()
        {
            tracing::warn!(target: "detect", value = %raw, "backlight_override_ignored");
        }

        let identity = match self.ports.identity_source.read_identity() {
            Ok(identity) => identity,
            Err(err) => {
                tracing::warn!(
                    target: "detect",
                    kind = ?err.kind,
                    error = %err,
                    "identity_unavailable"
                );
                IdentityDescriptor::default()
            }
        };
        let dmi_choice = self.ports.quirks.forced_selection(&identity);

        let capabilities = match self.ports.capability_probe.probe() {
            Ok(facts) => facts,
            Err(err) => {
                tracing::warn!(
                    target: "detect",
                    kind = ?err.kind,
                    error = %err,
                    "capability_probe_failed"
                );
                CapabilityFacts::default()
            }
        };

        InitialFacts {
            command_line_choice,
            dmi_choice,
            legacy_capability: capabilities.legacy_video,
            ec_sourced_present: capabilities.ec_sourced,
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ResolutionState> {
        // Every write leaves the state consistent, so a poisoned lock is
        // still safe to read.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
