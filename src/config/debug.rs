//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Most call sites are further gated by `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit cache hit/miss/expiry events for series fetches.
    pub print_cache_events: bool,
    /// Emit filter and selection changes coming from the UI.
    pub print_ui_interactions: bool,
    /// Emit forecast timings and row counts.
    pub print_forecast_events: bool,
    /// Emit details of UI state serialization/deserialization.
    pub print_state_serde: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_cache_events: false,
    print_ui_interactions: true,
    print_forecast_events: false,
    print_state_serde: false,
    print_shutdown: false,
};
