#![forbid(unsafe_code)]

//! Scene effect to DOM operation mapping.

use dropzone_core::scene::{ElementId, Positioning, SceneEffect, ZoneRole};

/// Class carried by every zone container.
pub const ZONE_CLASS: &str = "zone";
/// Class carried by every draggable element.
pub const DRAGGABLE_CLASS: &str = "draggable";
/// Attribute holding the engine id of a draggable element.
pub const ELEMENT_ID_ATTR: &str = "data-element-id";

/// DOM id of a zone container.
#[must_use]
pub const fn zone_dom_id(role: ZoneRole) -> &'static str {
    match role {
        ZoneRole::Source => "source-zone",
        ZoneRole::Grid => "grid-zone",
        ZoneRole::Free => "free-zone",
    }
}

/// Parse a `data-element-id` attribute value.
#[must_use]
pub fn parse_element_id(value: &str) -> Option<ElementId> {
    value.trim().parse::<u64>().ok().map(ElementId::new)
}

/// One DOM mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum DomOp {
    /// Create a detached `div.draggable[draggable=true]` with the given background.
    Create { id: ElementId, background: String },
    /// Append the node as the last child of a zone container.
    Append { id: ElementId, zone: ZoneRole },
    /// Detach the node and forget it.
    Remove { id: ElementId },
    SetStyle {
        id: ElementId,
        property: &'static str,
        value: String,
    },
    RemoveStyle {
        id: ElementId,
        property: &'static str,
    },
}

fn px(value: f64) -> String {
    format!("{value}px")
}

fn positioning_ops(id: ElementId, positioning: Positioning, ops: &mut Vec<DomOp>) {
    let (mode, at) = match positioning {
        Positioning::Flow => ("static", None),
        Positioning::Absolute { x, y } => ("absolute", Some((x, y))),
        // Touch-follow coordinates are viewport-relative.
        Positioning::Floating { x, y } => ("fixed", Some((x, y))),
    };
    ops.push(DomOp::SetStyle {
        id,
        property: "position",
        value: mode.to_owned(),
    });
    match at {
        Some((x, y)) => {
            ops.push(DomOp::SetStyle {
                id,
                property: "left",
                value: px(x),
            });
            ops.push(DomOp::SetStyle {
                id,
                property: "top",
                value: px(y),
            });
        }
        None => {
            ops.push(DomOp::RemoveStyle {
                id,
                property: "left",
            });
            ops.push(DomOp::RemoveStyle { id, property: "top" });
        }
    }
}

/// DOM operations reproducing one scene effect.
pub fn push_effect_ops(effect: &SceneEffect, ops: &mut Vec<DomOp>) {
    match effect {
        SceneEffect::Created { id, color, .. } => ops.push(DomOp::Create {
            id: *id,
            background: color.to_css(),
        }),
        SceneEffect::Appended { id, zone } => ops.push(DomOp::Append {
            id: *id,
            zone: *zone,
        }),
        SceneEffect::Removed { id } => ops.push(DomOp::Remove { id: *id }),
        SceneEffect::Restyled {
            id,
            positioning,
            opacity,
        } => {
            positioning_ops(*id, *positioning, ops);
            ops.push(DomOp::SetStyle {
                id: *id,
                property: "opacity",
                value: opacity.to_string(),
            });
        }
    }
}

/// DOM operations reproducing an effect journal, in order.
#[must_use]
pub fn effects_to_ops(effects: &[SceneEffect]) -> Vec<DomOp> {
    let mut ops = Vec::with_capacity(effects.len() * 2);
    for effect in effects {
        push_effect_ops(effect, &mut ops);
    }
    ops
}
