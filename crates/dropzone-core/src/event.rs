#![forbid(unsafe_code)]

//! Gesture vocabulary shared by the engine and its hosts.

/// Which input family drives a drag session.
///
/// Pointer sessions follow native drag semantics (`dragstart` / `drop` /
/// `dragend`) and have no move step. Touch sessions are driven manually
/// (`touchstart` / `touchmove` / `touchend`) and follow the finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum InputSource {
    Pointer,
    Touch,
}

impl InputSource {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pointer => "pointer",
            Self::Touch => "touch",
        }
    }
}

/// Lifecycle phase recorded for one engine dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum GesturePhase {
    DragStart,
    Drop,
    DragEnd,
    TouchStart,
    TouchMove,
    TouchEnd,
    Cancel,
}

impl GesturePhase {
    /// Input family the phase belongs to, if it is specific to one.
    #[must_use]
    pub const fn input(self) -> Option<InputSource> {
        match self {
            Self::DragStart | Self::Drop | Self::DragEnd => Some(InputSource::Pointer),
            Self::TouchStart | Self::TouchMove | Self::TouchEnd => Some(InputSource::Touch),
            Self::Cancel => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DragStart => "drag_start",
            Self::Drop => "drop",
            Self::DragEnd => "drag_end",
            Self::TouchStart => "touch_start",
            Self::TouchMove => "touch_move",
            Self::TouchEnd => "touch_end",
            Self::Cancel => "cancel",
        }
    }
}

/// Deterministic reason why an incoming gesture was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum IgnoredReason {
    /// The gesture target is not a draggable element of the scene.
    NotDraggable,
    /// A start arrived while another session is still active.
    SessionAlreadyActive,
    /// A move/drop/end arrived with no active session.
    NoActiveSession,
    /// The gesture belongs to a different input family than the session.
    InputMismatch,
    /// The host reported a non-finite coordinate.
    InvalidPosition,
}

impl IgnoredReason {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotDraggable => "not_draggable",
            Self::SessionAlreadyActive => "session_already_active",
            Self::NoActiveSession => "no_active_session",
            Self::InputMismatch => "input_mismatch",
            Self::InvalidPosition => "invalid_position",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GesturePhase, InputSource};

    #[test]
    fn phases_map_to_their_input_family() {
        assert_eq!(GesturePhase::Drop.input(), Some(InputSource::Pointer));
        assert_eq!(GesturePhase::TouchMove.input(), Some(InputSource::Touch));
        assert_eq!(GesturePhase::Cancel.input(), None);
    }
}
