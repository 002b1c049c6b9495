#![forbid(unsafe_code)]

//! Headless replay harness for the dropzone engine.
//!
//! Reads a JSON gesture trace, drives [`dropzone_core::DragEngine`] through
//! it, and reports every dispatch plus the final scene.

pub mod cli;
pub mod error;
pub mod replay;
pub mod trace;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use replay::{DispatchRecord, ReplayOptions, ReplayReport, replay};
pub use trace::{ElementRef, Trace, TraceEvent};
