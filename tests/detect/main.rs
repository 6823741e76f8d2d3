mod overrides;
mod quirks;

use std::sync::Arc;

use backlight_arbiter::detect::{
    BackendSelection, CapabilityFacts, ChangeNotifierPort, IdentityDescriptor, NoopChangeNotifier,
    PlatformFacts, QuirkResolverPort, ResolutionEngine, ResolverPorts, StaticCapabilityProbe,
    StaticPlatformHeuristic,
};

/// Quirk resolver that forces the same answer for every machine.
pub struct FixedQuirk(pub BackendSelection);

impl QuirkResolverPort for FixedQuirk {
    fn forced_selection(&self, _identity: &IdentityDescriptor) -> BackendSelection {
        self.0
    }
}

#[derive(Default)]
pub struct EngineSetup {
    pub backlight: Option<&'static str>,
    pub quirk: BackendSelection,
    pub capabilities: CapabilityFacts,
    pub platform: PlatformFacts,
}

impl EngineSetup {
    pub fn build(self) -> ResolutionEngine {
        self.build_with_notifier(Arc::new(NoopChangeNotifier))
    }

    pub fn build_with_notifier(self, notifier: Arc<dyn ChangeNotifierPort>) -> ResolutionEngine {
        ResolutionEngine::new(
            self.backlight.map(str::to_string),
            ResolverPorts {
                quirks: Arc::new(FixedQuirk(self.quirk)),
                capability_probe: Arc::new(StaticCapabilityProbe::new(self.capabilities)),
                heuristic: Arc::new(StaticPlatformHeuristic::new(self.platform)),
                notifier,
                ..ResolverPorts::default()
            },
        )
    }
}

pub fn legacy_present() -> CapabilityFacts {
    CapabilityFacts {
        legacy_video: Some(true),
        ec_sourced: false,
    }
}

pub fn windows8() -> PlatformFacts {
    PlatformFacts {
        windows8_firmware: true,
        chrome_ec_present: false,
    }
}
