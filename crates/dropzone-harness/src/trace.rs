#![forbid(unsafe_code)]

//! Gesture trace format.
//!
//! ```json
//! {
//!   "layout": {
//!     "source": { "x": 20, "y": 80, "width": 60, "height": 400 },
//!     "grid":   { "x": 240, "y": 80, "width": 300, "height": 300 },
//!     "free":   { "x": 600, "y": 80, "width": 400, "height": 300 }
//!   },
//!   "config": { "min_source_pool": 5 },
//!   "events": [
//!     { "kind": "drag_start", "element": { "source": 2 }, "grab": { "x": 5, "y": 5 } },
//!     { "kind": "drop", "at": { "x": 280, "y": 100 } },
//!     { "kind": "drag_end" }
//!   ]
//! }
//! ```

use std::path::Path;

use dropzone_core::EngineConfig;
use dropzone_core::geometry::{Point, Rect};
use dropzone_core::scene::{ElementId, Scene, ZoneLayout, ZoneRole};
use serde::{Deserialize, Serialize};

use crate::error::{HarnessError, Result};

/// How a trace names the element a gesture starts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementRef {
    /// Child index in Source at the time of the gesture.
    Source(usize),
    /// Engine element id.
    Id(ElementId),
}

impl ElementRef {
    /// Resolve against the current scene.
    #[must_use]
    pub fn resolve(self, scene: &Scene) -> Option<ElementId> {
        match self {
            Self::Source(index) => scene.children(ZoneRole::Source).get(index).copied(),
            Self::Id(id) => scene.contains(id).then_some(id),
        }
    }
}

/// One recorded gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// `grab` is the press point relative to the element's top-left corner.
    DragStart {
        element: ElementRef,
        #[serde(default)]
        grab: Point,
    },
    Drop {
        at: Point,
    },
    DragEnd,
    TouchStart {
        element: ElementRef,
        #[serde(default)]
        grab: Point,
    },
    TouchMove {
        at: Point,
    },
    TouchEnd {
        at: Point,
    },
    Cancel,
}

impl TraceEvent {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::DragStart { .. } => "drag_start",
            Self::Drop { .. } => "drop",
            Self::DragEnd => "drag_end",
            Self::TouchStart { .. } => "touch_start",
            Self::TouchMove { .. } => "touch_move",
            Self::TouchEnd { .. } => "touch_end",
            Self::Cancel => "cancel",
        }
    }
}

/// A replayable gesture trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub layout: ZoneLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<EngineConfig>,
    #[serde(default)]
    pub events: Vec<TraceEvent>,
}

impl Trace {
    /// Parse and validate a trace document.
    pub fn from_json(text: &str) -> Result<Self> {
        let trace: Self = serde_json::from_str(text)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Read, parse, and validate a trace file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ReadTrace {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Zone rectangles must have non-negative extents.
    pub fn validate(&self) -> Result<()> {
        for role in ZoneRole::ALL {
            let rect = self.layout.rect(role);
            if !valid_rect(rect) {
                return Err(HarnessError::invalid_trace(format!(
                    "{} zone has an invalid rectangle: {rect:?}",
                    role.label()
                )));
            }
        }
        Ok(())
    }

    /// Starter trace printed by `dropzone-harness init`: one grid placement,
    /// one overflow, one free placement, and one touch drag out of bounds.
    #[must_use]
    pub fn skeleton() -> Self {
        let grab = Point::new(5.0, 5.0);
        let pointer = |at: Point| {
            [
                TraceEvent::DragStart {
                    element: ElementRef::Source(0),
                    grab,
                },
                TraceEvent::Drop { at },
                TraceEvent::DragEnd,
            ]
        };
        let mut events = Vec::new();
        events.extend(pointer(Point::new(280.0, 100.0)));
        events.extend(pointer(Point::new(535.0, 375.0)));
        events.extend(pointer(Point::new(700.0, 150.0)));
        events.extend([
            TraceEvent::TouchStart {
                element: ElementRef::Source(1),
                grab,
            },
            TraceEvent::TouchMove {
                at: Point::new(150.0, 500.0),
            },
            TraceEvent::TouchEnd {
                at: Point::new(150.0, 600.0),
            },
        ]);
        Self {
            layout: ZoneLayout {
                source: Rect::new(20.0, 80.0, 60.0, 400.0),
                grid: Rect::new(240.0, 80.0, 300.0, 300.0),
                free: Rect::new(600.0, 80.0, 400.0, 300.0),
            },
            config: Some(EngineConfig::default()),
            events,
        }
    }
}

fn valid_rect(rect: Rect) -> bool {
    [rect.x, rect.y, rect.width, rect.height]
        .iter()
        .all(|v| v.is_finite())
        && rect.width >= 0.0
        && rect.height >= 0.0
}
