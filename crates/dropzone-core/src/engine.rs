#![forbid(unsafe_code)]

//! The drag engine.
//!
//! [`DragEngine`] turns host gesture callbacks into scene mutations while
//! enforcing:
//! - one drag session at a time (re-entrant starts are ignored),
//! - a single zone resolution per release point, and
//! - the Source pool floor after every completed or abandoned drag.
//!
//! Every call returns a [`DragDispatch`] describing what happened, including
//! ignored gestures, so hosts can log decisions without re-deriving them.

use core::fmt::Write as _;

use crate::config::{ConfigError, EngineConfig};
use crate::event::{GesturePhase, IgnoredReason, InputSource};
use crate::geometry::{Point, Rect};
use crate::machine::{DragMachine, DragSession, DragState, DragTransition};
use crate::placement::{PlacementDecision, resolve_drop};
use crate::replenish::Replenisher;
use crate::scene::{ElementId, Positioning, Scene, SceneEffect, ZoneLayout, ZoneRole};

#[cfg(feature = "tracing")]
use crate::logging::{debug, info};
#[cfg(not(feature = "tracing"))]
use crate::{debug, info};

/// What one dispatch did.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A session began.
    Started { grab_offset: Point },
    /// A touch session moved its element.
    Followed { at: Point },
    /// The session ended with a placement decision applied.
    Dropped {
        decision: PlacementDecision,
        replenished: usize,
    },
    /// The session ended without a drop; the element stays put.
    Abandoned { replenished: usize },
    Ignored(IgnoredReason),
}

impl DispatchOutcome {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::Followed { .. } => "followed",
            Self::Dropped { .. } => "dropped",
            Self::Abandoned { .. } => "abandoned",
            Self::Ignored(_) => "ignored",
        }
    }
}

/// Result of one gesture dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct DragDispatch {
    pub phase: GesturePhase,
    /// Assigned to accepted dispatches only.
    pub sequence: Option<u64>,
    pub element: Option<ElementId>,
    pub position: Option<Point>,
    pub transition: Option<DragTransition>,
    pub outcome: DispatchOutcome,
}

impl DragDispatch {
    fn ignored(
        phase: GesturePhase,
        reason: IgnoredReason,
        element: Option<ElementId>,
        position: Option<Point>,
    ) -> Self {
        debug!(
            phase = phase.label(),
            reason = reason.label(),
            "drag gesture ignored"
        );
        Self {
            phase,
            sequence: None,
            element,
            position,
            transition: None,
            outcome: DispatchOutcome::Ignored(reason),
        }
    }

    /// Whether the engine acted on the gesture.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        !matches!(self.outcome, DispatchOutcome::Ignored(_))
    }

    /// Single-line `key=value` summary for host consoles.
    #[must_use]
    pub fn log_line(&self) -> String {
        let mut line = format!("drag phase={}", self.phase.label());
        if let Some(sequence) = self.sequence {
            let _ = write!(line, " seq={sequence}");
        }
        if let Some(element) = self.element {
            let _ = write!(line, " element={element}");
        }
        if let Some(position) = self.position {
            let _ = write!(line, " at={},{}", position.x, position.y);
        }
        let _ = write!(line, " outcome={}", self.outcome.label());
        match &self.outcome {
            DispatchOutcome::Dropped {
                decision,
                replenished,
            } => {
                let _ = write!(
                    line,
                    " decision={} replenished={replenished}",
                    decision.label()
                );
            }
            DispatchOutcome::Ignored(reason) => {
                let _ = write!(line, " reason={}", reason.label());
            }
            _ => {}
        }
        line
    }
}

/// Drag-and-drop engine over a three-zone [`Scene`].
#[derive(Debug, Clone)]
pub struct DragEngine {
    config: EngineConfig,
    scene: Scene,
    machine: DragMachine,
    replenisher: Replenisher,
    next_sequence: u64,
}

impl DragEngine {
    /// Validate the config, build the scene, and fill Source to its floor.
    pub fn new(config: EngineConfig, layout: ZoneLayout) -> Result<Self, ConfigError> {
        config.validate()?;
        let replenisher = Replenisher::new(&config);
        let mut engine = Self {
            config,
            scene: Scene::new(layout),
            machine: DragMachine::new(),
            replenisher,
            next_sequence: 1,
        };
        engine.replenish();
        Ok(engine)
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for hosts refreshing zone rectangles or sizes.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.machine.state()
    }

    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        self.machine.session()
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.machine.is_active()
    }

    /// Take the scene effect journal.
    pub fn drain_effects(&mut self) -> Vec<SceneEffect> {
        self.scene.drain_effects()
    }

    /// Refill Source to its floor; returns the ids created.
    pub fn replenish(&mut self) -> Vec<ElementId> {
        self.replenisher.replenish(&mut self.scene)
    }

    /// Native `dragstart` on `target`. `element_rect` is the element's
    /// viewport rectangle at the moment of the gesture.
    pub fn drag_start(
        &mut self,
        target: Option<ElementId>,
        position: Point,
        element_rect: Rect,
    ) -> DragDispatch {
        self.begin(
            GesturePhase::DragStart,
            InputSource::Pointer,
            target,
            position,
            element_rect,
        )
    }

    /// `touchstart` on `target`.
    pub fn touch_start(
        &mut self,
        target: Option<ElementId>,
        position: Point,
        element_rect: Rect,
    ) -> DragDispatch {
        self.begin(
            GesturePhase::TouchStart,
            InputSource::Touch,
            target,
            position,
            element_rect,
        )
    }

    /// `touchmove`: the element follows the finger.
    pub fn touch_move(&mut self, position: Point) -> DragDispatch {
        let phase = GesturePhase::TouchMove;
        if !position.is_finite() {
            return DragDispatch::ignored(phase, IgnoredReason::InvalidPosition, None, None);
        }
        let session = match self.machine.track(InputSource::Touch, position) {
            Ok(session) => session,
            Err(reason) => {
                let element = self.session().map(|session| session.element);
                return DragDispatch::ignored(phase, reason, element, Some(position));
            }
        };
        let at = position - session.grab_offset;
        self.scene
            .set_positioning(session.element, Positioning::floating(at));
        DragDispatch {
            phase,
            sequence: Some(self.next_sequence()),
            element: Some(session.element),
            position: Some(position),
            transition: None,
            outcome: DispatchOutcome::Followed { at },
        }
    }

    /// Native `drop` at the release point.
    pub fn drop(&mut self, position: Point) -> DragDispatch {
        self.complete(GesturePhase::Drop, position)
    }

    /// `touchend` at the release point.
    pub fn touch_end(&mut self, position: Point) -> DragDispatch {
        self.complete(GesturePhase::TouchEnd, position)
    }

    /// Native `dragend`. Ends a pointer session that never saw a `drop`;
    /// after a completed drop this is an ignored no-op.
    pub fn drag_end(&mut self) -> DragDispatch {
        self.abandon(GesturePhase::DragEnd)
    }

    /// Host-driven cancellation (`touchcancel`, blur, teardown) for either
    /// input family.
    pub fn cancel(&mut self) -> DragDispatch {
        self.abandon(GesturePhase::Cancel)
    }

    fn begin(
        &mut self,
        phase: GesturePhase,
        input: InputSource,
        target: Option<ElementId>,
        position: Point,
        element_rect: Rect,
    ) -> DragDispatch {
        if !position.is_finite() {
            return DragDispatch::ignored(phase, IgnoredReason::InvalidPosition, target, None);
        }
        let Some((element, origin_positioning)) = target.and_then(|id| {
            self.scene
                .element(id)
                .map(|element| (id, element.positioning))
        }) else {
            return DragDispatch::ignored(
                phase,
                IgnoredReason::NotDraggable,
                target,
                Some(position),
            );
        };
        if self.machine.is_active() {
            return DragDispatch::ignored(
                phase,
                IgnoredReason::SessionAlreadyActive,
                Some(element),
                Some(position),
            );
        }

        let sequence = self.next_sequence();
        let grab_offset = position - element_rect.origin();
        let session = DragSession {
            element,
            grab_offset,
            input,
            origin_positioning,
            last_position: position,
        };
        let transition = match self.machine.begin(session) {
            Ok(transition) => transition,
            Err(reason) => {
                return DragDispatch::ignored(phase, reason, Some(element), Some(position));
            }
        };

        let size = element_rect.size();
        if !size.is_empty() && size.width.is_finite() && size.height.is_finite() {
            self.scene.set_size(element, size);
        }
        self.scene
            .set_opacity(element, self.config.dragging_opacity);
        debug!(
            element = %element,
            input = input.label(),
            grab_x = grab_offset.x,
            grab_y = grab_offset.y,
            "drag session started"
        );
        DragDispatch {
            phase,
            sequence: Some(sequence),
            element: Some(element),
            position: Some(position),
            transition: Some(transition),
            outcome: DispatchOutcome::Started { grab_offset },
        }
    }

    /// Release for the phase's input family.
    fn complete(&mut self, phase: GesturePhase, position: Point) -> DragDispatch {
        let (session, transition) = match self.machine.finish(phase.input()) {
            Ok(finished) => finished,
            Err(reason) => {
                let element = self.session().map(|session| session.element);
                return DragDispatch::ignored(phase, reason, element, Some(position));
            }
        };
        let element = session.element;
        let sequence = self.next_sequence();

        // A release the host cannot locate cannot be placed; keep the element.
        let size = self.scene.element(element).map(|element| element.size);
        let (Some(size), true) = (size, position.is_finite()) else {
            let replenished = self.settle(&session);
            return DragDispatch {
                phase,
                sequence: Some(sequence),
                element: Some(element),
                position: Some(position),
                transition: Some(transition),
                outcome: DispatchOutcome::Abandoned { replenished },
            };
        };

        let decision = resolve_drop(&self.scene, position, session.grab_offset, size);
        match decision {
            PlacementDecision::Keep { .. } => {}
            PlacementDecision::Grid { .. } => {
                self.scene.set_positioning(element, Positioning::Flow);
                self.scene.append(element, ZoneRole::Grid);
            }
            PlacementDecision::Free { offset } => {
                self.scene.append(element, ZoneRole::Free);
                self.scene
                    .set_positioning(element, Positioning::absolute(offset));
            }
            PlacementDecision::Discard { .. } => {
                self.scene.remove(element);
            }
        }

        let mut replenished = 0;
        if self.scene.container_of(element) != Some(ZoneRole::Source) {
            replenished = self.replenish().len();
        }
        replenished += self.settle(&session);

        info!(
            element = %element,
            decision = decision.label(),
            replenished,
            "drag dropped"
        );
        DragDispatch {
            phase,
            sequence: Some(sequence),
            element: Some(element),
            position: Some(position),
            transition: Some(transition),
            outcome: DispatchOutcome::Dropped {
                decision,
                replenished,
            },
        }
    }

    /// End without a drop. `Cancel` has no input family and ends either kind.
    fn abandon(&mut self, phase: GesturePhase) -> DragDispatch {
        let (session, transition) = match self.machine.finish(phase.input()) {
            Ok(finished) => finished,
            Err(reason) => {
                let element = self.session().map(|session| session.element);
                return DragDispatch::ignored(phase, reason, element, None);
            }
        };
        let replenished = self.settle(&session);
        debug!(element = %session.element, phase = phase.label(), "drag abandoned");
        DragDispatch {
            phase,
            sequence: Some(self.next_sequence()),
            element: Some(session.element),
            position: Some(session.last_position),
            transition: Some(transition),
            outcome: DispatchOutcome::Abandoned { replenished },
        }
    }

    /// Post-session cleanup: opacity back to 1, Source members back to flow,
    /// a touch-floated element outside Source back to where it came from, and
    /// the Source floor restored.
    fn settle(&mut self, session: &DragSession) -> usize {
        let element = session.element;
        if let Some(current) = self.scene.element(element).map(|element| element.positioning) {
            self.scene.set_opacity(element, 1.0);
            match self.scene.container_of(element) {
                Some(ZoneRole::Source) => {
                    self.scene.set_positioning(element, Positioning::Flow);
                }
                _ if matches!(current, Positioning::Floating { .. }) => {
                    self.scene
                        .set_positioning(element, session.origin_positioning);
                }
                _ => {}
            }
        }
        self.replenish().len()
    }

    fn next_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.saturating_add(1);
        sequence
    }
}
