//! Log subscriber setup.
//!
//! The crate logs through `tracing`. When a `log_level` is configured, the
//! controller installs a formatting subscriber with that maximum level unless
//! the process already installed one.

use tracing::{debug, level_filters::LevelFilter};

/// Installs a global `tracing-subscriber` formatter at `level`.
///
/// Returns `true` if the subscriber was installed and `false` if another
/// global subscriber was already in place, which is left unchanged.
pub fn init(level: LevelFilter) -> bool {
    match tracing_subscriber::fmt().with_max_level(level).try_init() {
        Ok(()) => {
            debug!(%level, "log subscriber installed");
            true
        }
        Err(err) => {
            debug!(%err, "keeping existing log subscriber");
            false
        }
    }
}
