pub mod cascade;
pub mod engine;
pub mod error;
pub mod heuristic;
pub mod identity;
pub mod noop;
pub mod ports;
pub mod quirks;
pub mod registry;
pub mod state;
pub mod types;

pub use engine::{ResolutionEngine, ResolverPorts, global_resolver, install_global_resolver};
pub use error::{DetectError, DetectErrorKind};
pub use heuristic::StaticPlatformHeuristic;
pub use identity::SysfsIdentitySource;
pub use noop::{NoQuirks, NoopChangeNotifier, StaticCapabilityProbe, StaticIdentitySource};
pub use ports::{
    CapabilityProbePort, ChangeNotifierPort, IdentitySourcePort, PlatformHeuristicPort,
    QuirkResolverPort,
};
pub use quirks::{FieldMatch, QuirkRule, QuirkTable};
pub use registry::{InMemoryLegacyRegistry, LegacyBackend};
pub use state::{InitialFacts, ResolutionState};
pub use types::{
    BackendSelection, CapabilityFacts, DetectEffect, ForcedTransition, IdentityDescriptor,
    IdentityField, PciId, PlatformFacts, Resolution,
};
