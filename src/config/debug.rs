//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet.

pub struct DebugFlags {
    /// Emit detailed serialization/deserialization logs (price cache).
    pub print_serde: bool,
    /// Emit one line per event with its row count and offset span.
    pub print_window_summary: bool,
    /// Emit bandwidth / sample size for every density curve.
    pub print_density_stats: bool,
    /// Emit shutdown app messages.
    pub print_shutdown: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_serde: false,
    print_window_summary: true,
    print_density_stats: false,
    print_shutdown: false,
};
