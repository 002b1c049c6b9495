#![forbid(unsafe_code)]

//! Logging shims.
//!
//! With the `tracing` feature the usual macros are re-exported from
//! [`tracing`]. Without it, same-named macros expand to nothing so call sites
//! stay unconditional:
//!
//! ```ignore
//! #[cfg(feature = "tracing")]
//! use crate::logging::{debug, info};
//! #[cfg(not(feature = "tracing"))]
//! use crate::{debug, info};
//! ```

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, trace, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! trace {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
#[doc(hidden)]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}
