#![forbid(unsafe_code)]

//! Drop resolution: which zone a release lands in, and whether the dragged
//! element fits there.
//!
//! Resolution is a pure function of the scene geometry, the release point,
//! the grab offset captured at drag start, and the element size. Applying the
//! decision is the engine's job.

use crate::geometry::{Point, Size};
use crate::scene::{Scene, ZoneRole};

/// Why a dropped element was destroyed instead of placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum DiscardReason {
    /// The release point is outside every zone.
    OutsideZones,
    /// The candidate offset would push the element past the zone bounds.
    Overflow,
}

impl DiscardReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutsideZones => "outside_zones",
            Self::Overflow => "overflow",
        }
    }
}

/// Outcome of resolving one release point.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "decision", rename_all = "snake_case")
)]
pub enum PlacementDecision {
    /// Released over a zone that is not a drop target; the element keeps its
    /// current container.
    Keep { zone: ZoneRole },
    /// Append to Grid in flow layout. `offset` is the validated candidate.
    Grid { offset: Point },
    /// Append to Free, absolutely positioned at `offset`.
    Free { offset: Point },
    /// Destroy the element.
    Discard {
        reason: DiscardReason,
        zone: Option<ZoneRole>,
        candidate: Option<Point>,
    },
}

impl PlacementDecision {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Keep { .. } => "keep",
            Self::Grid { .. } => "grid",
            Self::Free { .. } => "free",
            Self::Discard { .. } => "discard",
        }
    }
}

/// Top-left offset, relative to the zone, at which a released element would
/// land: `release - grab_offset - zone.origin`.
#[must_use]
pub fn candidate_offset(scene: &Scene, zone: ZoneRole, release: Point, grab_offset: Point) -> Point {
    scene.zone_rect(zone).to_local(release) - grab_offset
}

/// Resolve a release point to exactly one placement.
pub fn resolve_drop(
    scene: &Scene,
    release: Point,
    grab_offset: Point,
    element_size: Size,
) -> PlacementDecision {
    let Some(zone) = scene.zone_at(release) else {
        return PlacementDecision::Discard {
            reason: DiscardReason::OutsideZones,
            zone: None,
            candidate: None,
        };
    };
    if !zone.is_drop_target() {
        return PlacementDecision::Keep { zone };
    }

    let offset = candidate_offset(scene, zone, release, grab_offset);
    if !scene.zone_rect(zone).fits_at(offset, element_size) {
        return PlacementDecision::Discard {
            reason: DiscardReason::Overflow,
            zone: Some(zone),
            candidate: Some(offset),
        };
    }
    match zone {
        ZoneRole::Grid => PlacementDecision::Grid { offset },
        ZoneRole::Free => PlacementDecision::Free { offset },
        ZoneRole::Source => PlacementDecision::Keep { zone },
    }
}
