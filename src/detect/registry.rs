use std::sync::{PoisonError, RwLock};

use crate::detect::{
    error::{DetectError, invalid_request},
    ports::ChangeNotifierPort,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyBackend {
    pub device_name: String,
}

#[derive(Debug, Default)]
struct RegistryState {
    version: u64,
    registered: Option<LegacyBackend>,
    unregister_requests: u64,
}

/// Tracks the legacy backlight device, if one is registered, and drops it
/// when the resolver asks. Version only moves when registration changes.
#[derive(Debug, Default)]
pub struct InMemoryLegacyRegistry {
    state: RwLock<RegistryState>,
}

impl InMemoryLegacyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, device_name: impl Into<String>) -> Result<(), DetectError> {
        let device_name = device_name.into();
        if device_name.trim().is_empty() {
            return Err(invalid_request("legacy device name cannot be empty"));
        }

        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = &guard.registered {
            return Err(invalid_request(format!(
                "legacy backend already registered: {}",
                existing.device_name
            )));
        }

        tracing::info!(target: "detect", device = %device_name, "legacy_backend_registered");
        guard.registered = Some(LegacyBackend { device_name });
        guard.version = guard.version.saturating_add(1);
        Ok(())
    }

    pub fn registered(&self) -> Option<LegacyBackend> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .registered
            .clone()
    }

    pub fn is_registered(&self) -> bool {
        self.registered().is_some()
    }

    pub fn version(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .version
    }

    pub fn unregister_requests(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .unregister_requests
    }
}

impl ChangeNotifierPort for InMemoryLegacyRegistry {
    fn unregister_legacy(&self) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard.unregister_requests = guard.unregister_requests.saturating_add(1);

        match guard.registered.take() {
            Some(removed) => {
                guard.version = guard.version.saturating_add(1);
                tracing::info!(
                    target: "detect",
                    device = %removed.device_name,
                    "legacy_backend_unregistered"
                );
            }
            None => {
                tracing::debug!(target: "detect", "legacy_unregister_noop");
            }
        }
    }
}
