#![forbid(unsafe_code)]

//! Browser host for the dropzone drag engine.
//!
//! The crate is split the same way as the engine itself:
//! - [`dom_ops`] turns [`dropzone_core::SceneEffect`] journals into plain
//!   [`dom_ops::DomOp`] values. It has no browser dependency and is tested
//!   natively.
//! - `wasm` (only on `wasm32`) owns the `DropzoneApp` export: it installs the
//!   `dragstart`/`drop`/`dragend`/`touch*` listeners, forwards them to the
//!   engine, and applies the resulting DOM operations with `web-sys`.
//! - [`dispatch_log`] buffers accepted-dispatch log lines for `takeLogs()`,
//!   bounded so an undrained page does not grow without limit.
//!
//! Expected markup: three containers with ids `source-zone`, `grid-zone`, and
//! `free-zone`. Binding tags each with the `zone` class.

pub mod dispatch_log;
pub mod dom_ops;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::DropzoneApp;
