use serde::{Deserialize, Serialize};

use crate::detect::types::BackendSelection;

/// Facts gathered by the one-time initialization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitialFacts {
    pub command_line_choice: BackendSelection,
    pub dmi_choice: BackendSelection,
    pub legacy_capability: Option<bool>,
    pub ec_sourced_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionState {
    command_line_choice: BackendSelection,
    dmi_choice: BackendSelection,
    legacy_capability: Option<bool>,
    ec_sourced_present: bool,
    native_ever_seen: bool,
    initialized: bool,
}

impl ResolutionState {
    /// Builds an already-initialized state; used where the facts are known
    /// up front instead of being probed.
    pub fn seeded(facts: InitialFacts) -> Self {
        let mut state = Self::default();
        state.populate(facts);
        state
    }

    /// Stores the initial facts. Returns `false` and leaves the state alone
    /// when it was populated before.
    pub fn populate(&mut self, facts: InitialFacts) -> bool {
        if self.initialized {
            return false;
        }

        self.command_line_choice = facts.command_line_choice;
        self.dmi_choice = facts.dmi_choice;
        self.legacy_capability = facts.legacy_capability;
        self.ec_sourced_present = facts.ec_sourced_present;
        self.initialized = true;
        true
    }

    pub fn observe_native(&mut self, native_available: bool) {
        self.native_ever_seen |= native_available;
    }

    pub fn force_dmi_choice(&mut self, choice: BackendSelection) {
        self.dmi_choice = choice;
    }

    pub fn command_line_choice(&self) -> BackendSelection {
        self.command_line_choice
    }

    pub fn dmi_choice(&self) -> BackendSelection {
        self.dmi_choice
    }

    pub fn legacy_capability(&self) -> Option<bool> {
        self.legacy_capability
    }

    pub fn ec_sourced_present(&self) -> bool {
        self.ec_sourced_present
    }

    pub fn native_ever_seen(&self) -> bool {
        self.native_ever_seen
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}
