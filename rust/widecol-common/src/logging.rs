//! Structured logging helpers shared by the widecol crates.
//!
//! Records go through the `log` facade on a single target, formatted as
//! `event=<name> key=value ...`. Installing a logger is left to the application.

/// Single logging target for widecol.
pub const LOG_TARGET: &str = "widecol";

/// Emits a structured `event=...` record on the widecol target.
///
/// ```
/// use widecol_common::widecol_log;
///
/// widecol_log!(widecol_common::log::Level::Debug, "fanout_issued", "rows={} limit={}", 4, 1024);
/// ```
#[macro_export]
macro_rules! widecol_log {
    ($level:expr, $event:expr, $fmt:expr $(, $args:expr)* $(,)?) => {{
        if $crate::log::log_enabled!(target: $crate::logging::LOG_TARGET, $level) {
            $crate::log::log!(
                target: $crate::logging::LOG_TARGET,
                $level,
                "event={} {}",
                $event,
                format_args!($fmt $(, $args)*)
            );
        }
    }};
}
