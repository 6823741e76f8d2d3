use crate::detect::{
    ports::PlatformHeuristicPort,
    state::ResolutionState,
    types::{BackendSelection, DetectEffect, ForcedTransition, Resolution},
};

/// Runs the priority cascade over an initialized state. The first matching
/// branch wins: boot override, identity quirk, EC-sourced special case,
/// legacy interface (unless native is both seen and preferred), native,
/// then the two fallbacks.
pub fn decide(state: &ResolutionState, heuristic: &dyn PlatformHeuristicPort) -> Resolution {
    if state.command_line_choice().is_defined() {
        return Resolution::forced(state.command_line_choice());
    }

    if state.dmi_choice().is_defined() {
        return Resolution::forced(state.dmi_choice());
    }

    if state.ec_sourced_present() {
        return Resolution::detected(BackendSelection::NativeEcSourced);
    }

    let native_preferred = state.native_ever_seen() && heuristic.prefer_native_over_legacy();
    if state.legacy_capability() == Some(true) && !native_preferred {
        return Resolution::detected(BackendSelection::Legacy);
    }

    if state.native_ever_seen() {
        return Resolution::detected(BackendSelection::Native);
    }

    // Reaching this point on a modern platform usually means the GPU driver
    // has not loaded yet; a vendor interface registered now would not work.
    if heuristic.is_modern_platform() {
        return Resolution::detected(BackendSelection::None);
    }

    Resolution::detected(BackendSelection::Vendor)
}

/// Applies an external override of the quirk choice and reports which
/// effects the caller must run.
pub fn force_selection(
    state: &mut ResolutionState,
    choice: BackendSelection,
    heuristic: &dyn PlatformHeuristicPort,
) -> ForcedTransition {
    state.force_dmi_choice(choice);
    let resolution = decide(state, heuristic);

    let effects = if resolution.selection == BackendSelection::Legacy {
        Vec::new()
    } else {
        vec![DetectEffect::UnregisterLegacy]
    };

    ForcedTransition {
        resolution,
        effects,
    }
}
