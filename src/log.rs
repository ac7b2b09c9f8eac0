//! Logging macros, active only with the `tracing` feature.
//!
//! Registry lifecycle events log at `debug!`; every defensive fault logs a
//! `warn!` before the error is returned. Without the feature both macros
//! expand to nothing, so release embedders pay no logging cost.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
