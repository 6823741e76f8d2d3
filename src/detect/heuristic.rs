use crate::detect::{ports::PlatformHeuristicPort, types::PlatformFacts};

/// Heuristics over platform markers gathered once at startup.
///
/// Windows 8 era firmware stopped exercising the legacy video interface, so
/// it often regresses there; ChromeOS devices always drive brightness from
/// the GPU driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticPlatformHeuristic {
    facts: PlatformFacts,
}

impl StaticPlatformHeuristic {
    pub fn new(facts: PlatformFacts) -> Self {
        Self { facts }
    }
}

impl PlatformHeuristicPort for StaticPlatformHeuristic {
    fn prefer_native_over_legacy(&self) -> bool {
        self.facts.windows8_firmware || self.facts.chrome_ec_present
    }

    fn is_modern_platform(&self) -> bool {
        self.facts.windows8_firmware
    }
}
