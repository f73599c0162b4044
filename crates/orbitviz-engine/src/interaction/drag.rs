use crate::input::MouseButton;

/// The camera operation a drag drives.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum DragMode {
    /// Primary button: orbit around the focus.
    Rotate,
    /// Secondary button: pan the focus in the world XY plane.
    TranslateXy,
    /// Middle button: move the focus along world Z.
    TranslateZ,
}

impl DragMode {
    pub const ALL: [DragMode; 3] = [DragMode::Rotate, DragMode::TranslateXy, DragMode::TranslateZ];

    /// Button binding; other buttons drive nothing.
    pub fn for_button(button: MouseButton) -> Option<Self> {
        match button {
            MouseButton::Left => Some(DragMode::Rotate),
            MouseButton::Right => Some(DragMode::TranslateXy),
            MouseButton::Middle => Some(DragMode::TranslateZ),
            _ => None,
        }
    }

    /// Whether ending this drag moves the focus point.
    pub fn moves_focus(self) -> bool {
        matches!(self, DragMode::TranslateXy | DragMode::TranslateZ)
    }
}

/// State of one drag mode.
///
/// The last pointer position only exists while the drag is active, so a
/// stale snapshot can never leak into the next press. An active drag with no
/// snapshot yet (pressed before any cursor position was known) takes its
/// first one from the next move and yields no delta for it.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Active { last: Option<(f32, f32)> },
}

impl DragState {
    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Active { .. })
    }

    /// Starts (or restarts) the drag at `pos`, if known.
    pub fn press(&mut self, pos: Option<(f32, f32)>) {
        *self = DragState::Active { last: pos };
    }

    /// Ends the drag. Returns whether it was active.
    pub fn release(&mut self) -> bool {
        let was_active = self.is_active();
        *self = DragState::Idle;
        was_active
    }

    /// Advances the snapshot to `(x, y)` and returns the incremental delta.
    ///
    /// `None` while idle, and for the move that seeds a snapshot-less drag.
    pub fn advance(&mut self, x: f32, y: f32) -> Option<(f32, f32)> {
        let DragState::Active { last } = self else {
            return None;
        };
        let delta = last.map(|(lx, ly)| (x - lx, y - ly));
        *last = Some((x, y));
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_advance_yields_nothing() {
        let mut st = DragState::Idle;
        assert_eq!(st.advance(10.0, 10.0), None);
        assert_eq!(st, DragState::Idle);
    }

    #[test]
    fn deltas_are_incremental() {
        let mut st = DragState::Idle;
        st.press(Some((100.0, 50.0)));
        assert_eq!(st.advance(103.0, 48.0), Some((3.0, -2.0)));
        assert_eq!(st.advance(103.0, 48.0), Some((0.0, 0.0)));
        assert_eq!(st.advance(90.0, 60.0), Some((-13.0, 12.0)));
    }

    #[test]
    fn unknown_press_position_is_seeded_by_first_move() {
        let mut st = DragState::Idle;
        st.press(None);
        assert!(st.is_active());
        assert_eq!(st.advance(700.0, 400.0), None);
        assert_eq!(st.advance(705.0, 398.0), Some((5.0, -2.0)));
    }

    #[test]
    fn release_reports_previous_activity() {
        let mut st = DragState::Idle;
        assert!(!st.release());
        st.press(Some((1.0, 1.0)));
        assert!(st.release());
        assert_eq!(st, DragState::Idle);
    }

    #[test]
    fn button_bindings() {
        assert_eq!(DragMode::for_button(MouseButton::Left), Some(DragMode::Rotate));
        assert_eq!(DragMode::for_button(MouseButton::Right), Some(DragMode::TranslateXy));
        assert_eq!(DragMode::for_button(MouseButton::Middle), Some(DragMode::TranslateZ));
        assert_eq!(DragMode::for_button(MouseButton::Back), None);
        assert!(!DragMode::Rotate.moves_focus());
    }
}
