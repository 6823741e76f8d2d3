use crate::detect::{
    error::DetectError,
    ports::{CapabilityProbePort, ChangeNotifierPort, IdentitySourcePort, QuirkResolverPort},
    types::{BackendSelection, CapabilityFacts, IdentityDescriptor},
};

#[derive(Debug, Clone, Default)]
pub struct NoopChangeNotifier;

impl ChangeNotifierPort for NoopChangeNotifier {
    fn unregister_legacy(&self) {}
}

#[derive(Debug, Clone, Default)]
pub struct NoQuirks;

impl QuirkResolverPort for NoQuirks {
    fn forced_selection(&self, _identity: &IdentityDescriptor) -> BackendSelection {
        BackendSelection::Undefined
    }
}

/// Probe that answers with fixed facts; the default reports nothing present.
#[derive(Debug, Clone, Default)]
pub struct StaticCapabilityProbe {
    facts: CapabilityFacts,
}

impl StaticCapabilityProbe {
    pub fn new(facts: CapabilityFacts) -> Self {
        Self { facts }
    }
}

impl CapabilityProbePort for StaticCapabilityProbe {
    fn probe(&self) -> Result<CapabilityFacts, DetectError> {
        Ok(self.facts)
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticIdentitySource {
    identity: IdentityDescriptor,
}

impl StaticIdentitySource {
    pub fn new(identity: IdentityDescriptor) -> Self {
        Self { identity }
    }
}

impl IdentitySourcePort for StaticIdentitySource {
    fn read_identity(&self) -> Result<IdentityDescriptor, DetectError> {
        Ok(self.identity.clone())
    }
}
