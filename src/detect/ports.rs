use crate::detect::{
    error::DetectError,
    types::{BackendSelection, CapabilityFacts, IdentityDescriptor},
};

/// Reports whether the legacy firmware interface and an EC-sourced
/// brightness path exist. Called once per engine; must not block.
pub trait CapabilityProbePort: Send + Sync {
    fn probe(&self) -> Result<CapabilityFacts, DetectError>;
}

/// Supplies the identity descriptor that quirk lookup runs against.
pub trait IdentitySourcePort: Send + Sync {
    fn read_identity(&self) -> Result<IdentityDescriptor, DetectError>;
}

/// Maps an identity descriptor to a forced selection, or
/// `BackendSelection::Undefined` when no quirk applies.
pub trait QuirkResolverPort: Send + Sync {
    fn forced_selection(&self, identity: &IdentityDescriptor) -> BackendSelection;
}

pub trait PlatformHeuristicPort: Send + Sync {
    fn prefer_native_over_legacy(&self) -> bool;
    fn is_modern_platform(&self) -> bool;
}

/// Receives the request to drop a registered legacy backend. Implementations
/// must treat a call with nothing registered as a no-op.
pub trait ChangeNotifierPort: Send + Sync {
    fn unregister_legacy(&self);
}
