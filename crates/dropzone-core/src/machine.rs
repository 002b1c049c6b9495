#![forbid(unsafe_code)]

//! Drag session lifecycle.
//!
//! ```text
//! Idle --start--> Dragging --drop/end/cancel--> Idle
//! ```
//!
//! The machine owns the only session. Starts while Dragging are rejected, so
//! overlapping gestures cannot leak state across sessions.

use crate::event::{IgnoredReason, InputSource};
use crate::geometry::Point;
use crate::scene::{ElementId, Positioning};

/// Record of the element being moved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub element: ElementId,
    /// Pointer position minus the element's top-left corner at start.
    pub grab_offset: Point,
    pub input: InputSource,
    /// Positioning before the drag began, restored when a touch drag is
    /// abandoned outside Source.
    pub origin_positioning: Positioning,
    /// Last known pointer position: the start point, then each tracked move.
    pub last_position: Point,
}

/// Lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// Transition record, numbered for log correlation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
}

/// Explicit two-state drag machine.
#[derive(Debug, Clone, Default)]
pub struct DragMachine {
    state: DragState,
    transition_counter: u64,
}

impl DragMachine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }

    /// `Idle -> Dragging`.
    pub fn begin(&mut self, session: DragSession) -> Result<DragTransition, IgnoredReason> {
        if self.is_active() {
            return Err(IgnoredReason::SessionAlreadyActive);
        }
        Ok(self.transition(DragState::Dragging(session)))
    }

    /// Record a move for the active session of the given input family.
    pub fn track(
        &mut self,
        input: InputSource,
        position: Point,
    ) -> Result<DragSession, IgnoredReason> {
        let DragState::Dragging(session) = &mut self.state else {
            return Err(IgnoredReason::NoActiveSession);
        };
        if session.input != input {
            return Err(IgnoredReason::InputMismatch);
        }
        session.last_position = position;
        Ok(*session)
    }

    /// `Dragging -> Idle` for the given input family; `None` accepts either.
    pub fn finish(
        &mut self,
        input: Option<InputSource>,
    ) -> Result<(DragSession, DragTransition), IgnoredReason> {
        let DragState::Dragging(session) = self.state else {
            return Err(IgnoredReason::NoActiveSession);
        };
        if input.is_some_and(|input| input != session.input) {
            return Err(IgnoredReason::InputMismatch);
        }
        Ok((session, self.transition(DragState::Idle)))
    }

    fn transition(&mut self, to: DragState) -> DragTransition {
        let from = self.state;
        self.state = to;
        self.transition_counter = self.transition_counter.saturating_add(1);
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DragMachine, DragSession, DragState};
    use crate::event::{IgnoredReason, InputSource};
    use crate::geometry::Point;
    use crate::scene::{ElementId, Positioning};

    fn session(input: InputSource) -> DragSession {
        DragSession {
            element: ElementId::new(3),
            grab_offset: Point::new(5.0, 5.0),
            input,
            origin_positioning: Positioning::Flow,
            last_position: Point::new(10.0, 10.0),
        }
    }

    #[test]
    fn begin_then_finish_round_trips_to_idle() {
        let mut machine = DragMachine::new();
        let start = machine
            .begin(session(InputSource::Pointer))
            .expect("idle machine accepts a start");
        assert_eq!(start.from, DragState::Idle);
        assert!(machine.is_active());

        let (finished, end) = machine
            .finish(Some(InputSource::Pointer))
            .expect("active pointer session finishes");
        assert_eq!(finished.element, ElementId::new(3));
        assert_eq!(end.to, DragState::Idle);
        assert_eq!(end.transition_id, 2);
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn reentrant_start_is_rejected_without_replacing_session() {
        let mut machine = DragMachine::new();
        machine
            .begin(session(InputSource::Touch))
            .expect("first start accepted");
        let mut other = session(InputSource::Pointer);
        other.element = ElementId::new(9);
        assert_eq!(
            machine.begin(other),
            Err(IgnoredReason::SessionAlreadyActive)
        );
        assert_eq!(
            machine.session().map(|active| active.element),
            Some(ElementId::new(3))
        );
    }

    #[test]
    fn track_requires_matching_input() {
        let mut machine = DragMachine::new();
        assert_eq!(
            machine.track(InputSource::Touch, Point::ZERO),
            Err(IgnoredReason::NoActiveSession)
        );
        machine
            .begin(session(InputSource::Pointer))
            .expect("start accepted");
        assert_eq!(
            machine.track(InputSource::Touch, Point::ZERO),
            Err(IgnoredReason::InputMismatch)
        );
    }

    #[test]
    fn track_updates_last_position() {
        let mut machine = DragMachine::new();
        machine
            .begin(session(InputSource::Touch))
            .expect("start accepted");
        let tracked = machine
            .track(InputSource::Touch, Point::new(42.0, 7.0))
            .expect("touch session tracks touch moves");
        assert_eq!(tracked.last_position, Point::new(42.0, 7.0));
    }

    #[test]
    fn finish_with_wrong_input_keeps_session() {
        let mut machine = DragMachine::new();
        machine
            .begin(session(InputSource::Touch))
            .expect("start accepted");
        assert_eq!(
            machine.finish(Some(InputSource::Pointer)).map(|_| ()),
            Err(IgnoredReason::InputMismatch)
        );
        assert!(machine.is_active());
        assert!(machine.finish(None).is_ok());
    }
}
