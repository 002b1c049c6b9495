#![forbid(unsafe_code)]

//! The zone scene: three containers and the draggable elements they hold.
//!
//! The scene is the engine's model of the visual tree. Every mutation is
//! journaled as a [`SceneEffect`] so a host can replay it onto its own view
//! (DOM nodes, a test log, a JSON report) after each dispatch.

use core::fmt;
use std::collections::BTreeMap;

use crate::color::Hsl;
use crate::geometry::{Point, Rect, Size};

/// Stable identifier of a draggable element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ElementId(u64);

impl ElementId {
    /// Wrap a raw id (as stored in a DOM `data-element-id` attribute).
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "el-{}", self.0)
    }
}

/// Role of a zone container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum ZoneRole {
    /// Replenished origin pool, flow layout.
    Source,
    /// Flow-layout drop target with a strict fit rule.
    Grid,
    /// Absolute-layout drop target.
    Free,
}

impl ZoneRole {
    pub const ALL: [Self; 3] = [Self::Source, Self::Grid, Self::Free];

    /// Zones checked when resolving a release point, highest priority first.
    pub const RESOLUTION_ORDER: [Self; 3] = [Self::Grid, Self::Free, Self::Source];

    /// Whether elements can be placed into this zone by dropping.
    #[must_use]
    pub const fn is_drop_target(self) -> bool {
        matches!(self, Self::Grid | Self::Free)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Grid => "grid",
            Self::Free => "free",
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Source => 0,
            Self::Grid => 1,
            Self::Free => 2,
        }
    }
}

/// How an element is positioned inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "mode", rename_all = "snake_case")
)]
pub enum Positioning {
    /// Static, laid out in document flow.
    #[default]
    Flow,
    /// Absolute, relative to the container's top-left corner.
    Absolute { x: f64, y: f64 },
    /// Following a touch, in viewport coordinates.
    Floating { x: f64, y: f64 },
}

impl Positioning {
    #[must_use]
    pub const fn absolute(at: Point) -> Self {
        Self::Absolute { x: at.x, y: at.y }
    }

    #[must_use]
    pub const fn floating(at: Point) -> Self {
        Self::Floating { x: at.x, y: at.y }
    }
}

/// A draggable element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Element {
    pub id: ElementId,
    pub color: Hsl,
    pub size: Size,
    pub positioning: Positioning,
    pub opacity: f64,
}

/// Journaled scene mutation, replayed by hosts onto their view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "effect", rename_all = "snake_case")
)]
pub enum SceneEffect {
    /// A detached element was created.
    Created { id: ElementId, color: Hsl, size: Size },
    /// The element was appended as the last child of `zone`.
    Appended { id: ElementId, zone: ZoneRole },
    /// The element was detached and destroyed.
    Removed { id: ElementId },
    /// Positioning or opacity changed.
    Restyled {
        id: ElementId,
        positioning: Positioning,
        opacity: f64,
    },
}

/// Viewport rectangles for the three zones.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneLayout {
    pub source: Rect,
    pub grid: Rect,
    pub free: Rect,
}

impl ZoneLayout {
    #[must_use]
    pub const fn rect(&self, role: ZoneRole) -> Rect {
        match role {
            ZoneRole::Source => self.source,
            ZoneRole::Grid => self.grid,
            ZoneRole::Free => self.free,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct Zone {
    rect: Rect,
    children: Vec<ElementId>,
}

/// Serializable view of the scene, zone by zone in child order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneSnapshot {
    pub zones: Vec<ZoneSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneSnapshot {
    pub role: ZoneRole,
    pub rect: Rect,
    pub elements: Vec<Element>,
}

/// Zones, elements, and the pending effect journal.
#[derive(Debug, Clone)]
pub struct Scene {
    zones: [Zone; 3],
    elements: BTreeMap<ElementId, Element>,
    next_id: u64,
    effects: Vec<SceneEffect>,
}

impl Scene {
    /// Empty scene with the given zone rectangles.
    #[must_use]
    pub fn new(layout: ZoneLayout) -> Self {
        let zone = |role| Zone {
            rect: layout.rect(role),
            children: Vec::new(),
        };
        Self {
            zones: [
                zone(ZoneRole::Source),
                zone(ZoneRole::Grid),
                zone(ZoneRole::Free),
            ],
            elements: BTreeMap::new(),
            next_id: 1,
            effects: Vec::new(),
        }
    }

    /// Current viewport rectangle of a zone.
    #[must_use]
    pub fn zone_rect(&self, role: ZoneRole) -> Rect {
        self.zones[role.index()].rect
    }

    /// Refresh a zone rectangle (hosts call this after scroll/resize).
    pub fn set_zone_rect(&mut self, role: ZoneRole, rect: Rect) {
        self.zones[role.index()].rect = rect;
    }

    /// Replace all zone rectangles at once.
    pub fn set_layout(&mut self, layout: ZoneLayout) {
        for role in ZoneRole::ALL {
            self.set_zone_rect(role, layout.rect(role));
        }
    }

    /// Children of a zone, in document order.
    #[must_use]
    pub fn children(&self, role: ZoneRole) -> &[ElementId] {
        &self.zones[role.index()].children
    }

    /// Number of children in a zone.
    #[must_use]
    pub fn len(&self, role: ZoneRole) -> usize {
        self.children(role).len()
    }

    /// Total number of live elements, attached or not.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Zone currently holding the element, if it is attached.
    #[must_use]
    pub fn container_of(&self, id: ElementId) -> Option<ZoneRole> {
        ZoneRole::ALL
            .into_iter()
            .find(|&role| self.children(role).contains(&id))
    }

    /// Create a detached element.
    pub fn create_element(&mut self, color: Hsl, size: Size) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.elements.insert(
            id,
            Element {
                id,
                color,
                size,
                positioning: Positioning::Flow,
                opacity: 1.0,
            },
        );
        self.effects.push(SceneEffect::Created { id, color, size });
        id
    }

    /// Move the element to the end of `zone`, detaching it from its current
    /// container. Returns `false` for unknown elements.
    pub fn append(&mut self, id: ElementId, zone: ZoneRole) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.detach(id);
        self.zones[zone.index()].children.push(id);
        self.effects.push(SceneEffect::Appended { id, zone });
        true
    }

    /// Detach and destroy the element.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(&id)?;
        self.detach(id);
        self.effects.push(SceneEffect::Removed { id });
        Some(element)
    }

    /// Change positioning; journals a restyle only when it differs.
    pub fn set_positioning(&mut self, id: ElementId, positioning: Positioning) -> bool {
        self.restyle(id, |element| element.positioning = positioning)
    }

    /// Change opacity; journals a restyle only when it differs.
    pub fn set_opacity(&mut self, id: ElementId, opacity: f64) -> bool {
        self.restyle(id, |element| element.opacity = opacity)
    }

    /// Record the element's rendered size. Hosts own sizing, so this is not
    /// journaled.
    pub fn set_size(&mut self, id: ElementId, size: Size) -> bool {
        match self.elements.get_mut(&id) {
            Some(element) => {
                element.size = size;
                true
            }
            None => false,
        }
    }

    /// Resolve the single zone under a viewport point.
    ///
    /// Zones are tested in [`ZoneRole::RESOLUTION_ORDER`], so overlapping
    /// zones never both claim a point.
    #[must_use]
    pub fn zone_at(&self, point: Point) -> Option<ZoneRole> {
        ZoneRole::RESOLUTION_ORDER
            .into_iter()
            .find(|&role| self.zone_rect(role).contains(point))
    }

    /// Viewport rectangle the element occupies.
    ///
    /// Flow children are laid out in rows, as many per row as fit the zone
    /// width (at least one). Absolute children sit at zone origin plus offset.
    #[must_use]
    pub fn element_rect(&self, id: ElementId) -> Option<Rect> {
        let element = self.element(id)?;
        match element.positioning {
            Positioning::Floating { x, y } => {
                return Some(Rect::from_origin_size(Point::new(x, y), element.size));
            }
            Positioning::Absolute { x, y } => {
                let origin = self
                    .container_of(id)
                    .map_or(Point::ZERO, |role| self.zone_rect(role).origin());
                return Some(Rect::from_origin_size(
                    origin + Point::new(x, y),
                    element.size,
                ));
            }
            Positioning::Flow => {}
        }

        let Some(role) = self.container_of(id) else {
            return Some(Rect::from_origin_size(Point::ZERO, element.size));
        };
        let zone = self.zone_rect(role);
        let mut cursor = Point::ZERO;
        let mut row_height: f64 = 0.0;
        for &child in self.children(role) {
            let Some(sibling) = self.element(child) else {
                continue;
            };
            if sibling.positioning != Positioning::Flow {
                continue;
            }
            if cursor.x > 0.0 && cursor.x + sibling.size.width > zone.width {
                cursor = Point::new(0.0, cursor.y + row_height);
                row_height = 0.0;
            }
            if child == id {
                return Some(Rect::from_origin_size(zone.origin() + cursor, sibling.size));
            }
            cursor.x += sibling.size.width;
            row_height = row_height.max(sibling.size.height);
        }
        None
    }

    /// Pending effects since the last drain.
    #[must_use]
    pub fn effects(&self) -> &[SceneEffect] {
        &self.effects
    }

    /// Take the pending effect journal.
    pub fn drain_effects(&mut self) -> Vec<SceneEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Zone-by-zone view of attached elements.
    #[must_use]
    pub fn snapshot(&self) -> SceneSnapshot {
        let zones = ZoneRole::ALL
            .into_iter()
            .map(|role| ZoneSnapshot {
                role,
                rect: self.zone_rect(role),
                elements: self
                    .children(role)
                    .iter()
                    .filter_map(|&id| self.element(id).cloned())
                    .collect(),
            })
            .collect();
        SceneSnapshot { zones }
    }

    fn detach(&mut self, id: ElementId) {
        for zone in &mut self.zones {
            zone.children.retain(|&child| child != id);
        }
    }

    fn restyle(&mut self, id: ElementId, apply: impl FnOnce(&mut Element)) -> bool {
        let Some(element) = self.elements.get_mut(&id) else {
            return false;
        };
        let before = (element.positioning, element.opacity);
        apply(element);
        if before != (element.positioning, element.opacity) {
            self.effects.push(SceneEffect::Restyled {
                id,
                positioning: element.positioning,
                opacity: element.opacity,
            });
        }
        true
    }
}
