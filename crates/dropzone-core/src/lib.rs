// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: geometry, gestures, the zone scene, and the drag engine.
//!
//! # Role in dropzone
//! `dropzone-core` owns every decision the drag-and-drop surface makes. Hosts
//! (the browser binding in `dropzone-web`, the replay harness) translate their
//! native input into calls on [`engine::DragEngine`] and mirror the resulting
//! [`scene::SceneEffect`] journal into whatever view they own.
//!
//! # Primary responsibilities
//! - **Scene**: three zones (Source, Grid, Free) and the draggable elements
//!   they hold.
//! - **DragMachine**: the explicit `Idle -> Dragging -> Idle` lifecycle.
//! - **Placement**: single-zone resolution and the Grid/Free fit rules.
//! - **Replenisher**: keeps the Source pool at its configured floor.
//!
//! Nothing here blocks, spawns, or reads a clock; the host drives every step.

pub mod color;
pub mod config;
pub mod engine;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod machine;
pub mod placement;
pub mod replenish;
pub mod scene;

pub use config::{ConfigError, EngineConfig};
pub use engine::{DispatchOutcome, DragDispatch, DragEngine};
pub use event::{GesturePhase, IgnoredReason, InputSource};
pub use geometry::{Point, Rect, Size};
pub use placement::{DiscardReason, PlacementDecision};
pub use scene::{ElementId, Positioning, Scene, SceneEffect, ZoneLayout, ZoneRole};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};
