use std::collections::VecDeque;
use std::collections::vec_deque::Drain;

use glam::Vec3;

use crate::camera::OrbitCamera;
use crate::input::{
    InputEvent, Key, KeyState, MouseButton, MouseButtonState, PointerButtonEvent, PointerMoveEvent,
};

use super::drag::{DragMode, DragState};

/// Something the owner of the interaction layer may want to react to.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InteractionNotice {
    /// A translate drag ended; the camera now orbits around `focus`.
    FocusChanged { focus: Vec3 },
    /// Escape was pressed.
    CloseRequested,
}

/// Mouse/keyboard interaction layer for one window.
///
/// Three independent drag machines, one per button, each gating a distinct
/// camera mutation. They are not mutually exclusive: with two buttons held,
/// a single move event applies both deltas.
///
/// The camera is passed in by the caller on every event; this type holds no
/// reference to it.
#[derive(Debug, Default)]
pub struct Interaction {
    rotate: DragState,
    translate_xy: DragState,
    translate_z: DragState,

    keypresses: VecDeque<Key>,
    close_requested: bool,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatches a platform-agnostic input event.
    pub fn handle_event(
        &mut self,
        camera: &mut OrbitCamera,
        event: &InputEvent,
    ) -> Option<InteractionNotice> {
        match event {
            InputEvent::PointerButton(PointerButtonEvent { button, state, pos, .. }) => {
                self.on_button(camera, *button, *state, *pos)
            }
            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.on_pointer_moved(camera, *x, *y);
                None
            }
            InputEvent::MouseWheel { delta, .. } => {
                camera.scroll(delta.vertical());
                None
            }
            InputEvent::Key { key, state, repeat, .. } => self.on_key(*key, *state, *repeat),
            InputEvent::Focused(false) => {
                self.cancel_drags();
                None
            }
            _ => None,
        }
    }

    /// Starts or ends the drag bound to `button`.
    ///
    /// Ending a translate drag reports the new focus. A release without a
    /// matching press changes nothing. A press at an unknown position starts
    /// the drag at the next pointer move.
    pub fn on_button(
        &mut self,
        camera: &OrbitCamera,
        button: MouseButton,
        state: MouseButtonState,
        pos: Option<(f32, f32)>,
    ) -> Option<InteractionNotice> {
        let mode = DragMode::for_button(button)?;
        let drag = self.drag_mut(mode);

        match state {
            MouseButtonState::Pressed => {
                drag.press(pos);
                None
            }
            MouseButtonState::Released => {
                let was_active = drag.release();
                if was_active && mode.moves_focus() {
                    let focus = camera.center();
                    log::info!(
                        "camera focus moved to {{{:.1}, {:.1}, {:.1}}}",
                        focus.x,
                        focus.y,
                        focus.z
                    );
                    Some(InteractionNotice::FocusChanged { focus })
                } else {
                    None
                }
            }
        }
    }

    /// Applies incremental deltas for every active drag.
    pub fn on_pointer_moved(&mut self, camera: &mut OrbitCamera, x: f32, y: f32) {
        if let Some((dx, dy)) = self.rotate.advance(x, y) {
            camera.rotate(dx, dy);
        }
        if let Some((dx, dy)) = self.translate_xy.advance(x, y) {
            camera.translate_xy(dx, dy);
        }
        if let Some((dx, dy)) = self.translate_z.advance(x, y) {
            camera.translate_z(dx, dy);
        }
    }

    /// Escape requests close; any other fresh press is queued for the app.
    pub fn on_key(&mut self, key: Key, state: KeyState, repeat: bool) -> Option<InteractionNotice> {
        if state != KeyState::Pressed || repeat {
            return None;
        }

        if key == Key::Escape {
            self.close_requested = true;
            return Some(InteractionNotice::CloseRequested);
        }

        log::debug!("key press {key}");
        self.keypresses.push_back(key);
        None
    }

    /// Returns every drag to idle without notifications.
    pub fn cancel_drags(&mut self) {
        for mode in DragMode::ALL {
            self.drag_mut(mode).release();
        }
    }

    /// True iff any drag mode is active.
    pub fn is_interacting(&self) -> bool {
        self.rotate.is_active() || self.translate_xy.is_active() || self.translate_z.is_active()
    }

    pub fn drag_state(&self, mode: DragMode) -> DragState {
        match mode {
            DragMode::Rotate => self.rotate,
            DragMode::TranslateXy => self.translate_xy,
            DragMode::TranslateZ => self.translate_z,
        }
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    pub fn pending_keypresses(&self) -> usize {
        self.keypresses.len()
    }

    /// Hands queued keypresses over in arrival order.
    pub fn drain_keypresses(&mut self) -> Drain<'_, Key> {
        self.keypresses.drain(..)
    }

    fn drag_mut(&mut self, mode: DragMode) -> &mut DragState {
        match mode {
            DragMode::Rotate => &mut self.rotate,
            DragMode::TranslateXy => &mut self.translate_xy,
            DragMode::TranslateZ => &mut self.translate_z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{Modifiers, MouseWheelDelta};

    fn press(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: MouseButtonState::Pressed,
            pos: Some((x, y)),
            modifiers: Modifiers::default(),
        })
    }

    fn release(button: MouseButton, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state: MouseButtonState::Released,
            pos: Some((x, y)),
            modifiers: Modifiers::default(),
        })
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent { x, y })
    }

    fn key(key: Key, state: KeyState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat }
    }

    // ── rotate ────────────────────────────────────────────────────────────

    #[test]
    fn left_drag_rotates_by_incremental_deltas() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        ix.handle_event(&mut cam, &press(MouseButton::Left, 100.0, 100.0));
        ix.handle_event(&mut cam, &moved(110.0, 105.0));
        ix.handle_event(&mut cam, &moved(115.0, 105.0));

        let mut expected = OrbitCamera::default();
        expected.rotate(10.0, 5.0);
        expected.rotate(5.0, 0.0);
        assert_eq!(cam, expected);
    }

    #[test]
    fn moves_without_a_drag_do_nothing() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        ix.handle_event(&mut cam, &moved(300.0, 20.0));
        ix.handle_event(&mut cam, &moved(-40.0, 900.0));
        assert_eq!(cam, OrbitCamera::default());
        assert!(!ix.is_interacting());
    }

    #[test]
    fn resumed_drag_starts_from_new_press_position() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        ix.handle_event(&mut cam, &press(MouseButton::Left, 0.0, 0.0));
        ix.handle_event(&mut cam, &moved(10.0, 0.0));
        ix.handle_event(&mut cam, &release(MouseButton::Left, 10.0, 0.0));
        let after_first = cam;

        // Pointer travels far while idle, then a new drag begins there.
        ix.handle_event(&mut cam, &moved(500.0, 500.0));
        ix.handle_event(&mut cam, &press(MouseButton::Left, 500.0, 500.0));
        ix.handle_event(&mut cam, &moved(502.0, 500.0));

        let mut expected = after_first;
        expected.rotate(2.0, 0.0);
        assert_eq!(cam, expected);
    }

    #[test]
    fn press_before_any_cursor_position_does_not_jump() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        let unknown = |button| {
            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state: MouseButtonState::Pressed,
                pos: None,
                modifiers: Modifiers::default(),
            })
        };
        ix.handle_event(&mut cam, &unknown(MouseButton::Left));
        ix.handle_event(&mut cam, &unknown(MouseButton::Right));
        assert!(ix.is_interacting());

        // The first move only seeds the drags.
        ix.handle_event(&mut cam, &moved(700.0, 400.0));
        assert_eq!(cam, OrbitCamera::default());

        ix.handle_event(&mut cam, &moved(703.0, 401.0));
        let mut expected = OrbitCamera::default();
        expected.rotate(3.0, 1.0);
        expected.translate_xy(3.0, 1.0);
        assert_eq!(cam, expected);
    }

    // ── translate ─────────────────────────────────────────────────────────

    #[test]
    fn translate_release_reports_new_focus() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        ix.handle_event(&mut cam, &press(MouseButton::Right, 0.0, 0.0));
        ix.handle_event(&mut cam, &moved(20.0, 10.0));
        let notice = ix.handle_event(&mut cam, &release(MouseButton::Right, 20.0, 10.0));

        assert_ne!(cam.center(), OrbitCamera::default().center());
        assert_eq!(notice, Some(InteractionNotice::FocusChanged { focus: cam.center() }));
    }

    #[test]
    fn middle_drag_moves_focus_along_z_only() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        ix.handle_event(&mut cam, &press(MouseButton::Middle, 0.0, 0.0));
        ix.handle_event(&mut cam, &moved(50.0, 10.0));
        let notice = ix.handle_event(&mut cam, &release(MouseButton::Middle, 50.0, 10.0));

        let mut expected = OrbitCamera::default();
        expected.translate_z(50.0, 10.0);
        assert_eq!(cam, expected);
        assert!(matches!(notice, Some(InteractionNotice::FocusChanged { .. })));
    }

    #[test]
    fn rotate_release_reports_nothing() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        ix.handle_event(&mut cam, &press(MouseButton::Left, 0.0, 0.0));
        assert_eq!(ix.handle_event(&mut cam, &release(MouseButton::Left, 0.0, 0.0)), None);
    }

    // ── concurrency of modes ──────────────────────────────────────────────

    #[test]
    fn simultaneous_drags_apply_additively() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        ix.handle_event(&mut cam, &press(MouseButton::Left, 10.0, 10.0));
        ix.handle_event(&mut cam, &press(MouseButton::Middle, 10.0, 10.0));
        assert!(ix.drag_state(DragMode::Rotate).is_active());
        assert!(ix.drag_state(DragMode::TranslateZ).is_active());

        ix.handle_event(&mut cam, &moved(14.0, 13.0));

        let mut expected = OrbitCamera::default();
        expected.rotate(4.0, 3.0);
        expected.translate_z(4.0, 3.0);
        assert_eq!(cam, expected);
    }

    #[test]
    fn is_interacting_tracks_any_active_mode() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        assert!(!ix.is_interacting());

        ix.handle_event(&mut cam, &press(MouseButton::Right, 0.0, 0.0));
        ix.handle_event(&mut cam, &press(MouseButton::Left, 0.0, 0.0));
        assert!(ix.is_interacting());

        ix.handle_event(&mut cam, &release(MouseButton::Right, 0.0, 0.0));
        assert!(ix.is_interacting());

        ix.handle_event(&mut cam, &release(MouseButton::Left, 0.0, 0.0));
        assert!(!ix.is_interacting());
    }

    // ── idempotence ───────────────────────────────────────────────────────

    #[test]
    fn release_without_press_is_ignored() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        let notice = ix.handle_event(&mut cam, &release(MouseButton::Right, 77.0, 88.0));
        assert_eq!(notice, None);
        for mode in DragMode::ALL {
            assert_eq!(ix.drag_state(mode), DragState::Idle);
        }

        // The next press starts cleanly from its own position.
        ix.handle_event(&mut cam, &press(MouseButton::Right, 5.0, 5.0));
        ix.handle_event(&mut cam, &moved(6.0, 5.0));
        let mut expected = OrbitCamera::default();
        expected.translate_xy(1.0, 0.0);
        assert_eq!(cam, expected);
    }

    #[test]
    fn unbound_buttons_are_ignored() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        ix.handle_event(&mut cam, &press(MouseButton::Back, 0.0, 0.0));
        ix.handle_event(&mut cam, &moved(10.0, 10.0));
        assert!(!ix.is_interacting());
        assert_eq!(cam, OrbitCamera::default());
    }

    #[test]
    fn focus_loss_cancels_drags_silently() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        ix.handle_event(&mut cam, &press(MouseButton::Right, 0.0, 0.0));
        ix.handle_event(&mut cam, &press(MouseButton::Left, 0.0, 0.0));

        assert_eq!(ix.handle_event(&mut cam, &InputEvent::Focused(false)), None);
        assert!(!ix.is_interacting());

        ix.handle_event(&mut cam, &moved(40.0, 40.0));
        assert_eq!(cam, OrbitCamera::default());
    }

    // ── scroll ────────────────────────────────────────────────────────────

    #[test]
    fn wheel_notches_zoom_the_camera() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        let wheel = |y| InputEvent::MouseWheel {
            delta: MouseWheelDelta::Line { x: 0.0, y },
            modifiers: Modifiers::default(),
        };

        ix.handle_event(&mut cam, &wheel(1.0));
        ix.handle_event(&mut cam, &wheel(-1.0));
        ix.handle_event(&mut cam, &wheel(-1.0));

        let mut expected = OrbitCamera::default();
        expected.scroll(1.0);
        expected.scroll(-1.0);
        expected.scroll(-1.0);
        assert_eq!(cam, expected);
    }

    // ── keyboard ──────────────────────────────────────────────────────────

    #[test]
    fn keypresses_queue_in_arrival_order() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();

        for k in [Key::B, Key::A, Key::B, Key::Digit1] {
            ix.handle_event(&mut cam, &key(k, KeyState::Pressed, false));
        }
        assert_eq!(ix.pending_keypresses(), 4);

        let drained: Vec<Key> = ix.drain_keypresses().collect();
        assert_eq!(drained, vec![Key::B, Key::A, Key::B, Key::Digit1]);
        assert_eq!(ix.pending_keypresses(), 0);
    }

    #[test]
    fn releases_and_repeats_are_not_queued() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        ix.handle_event(&mut cam, &key(Key::Q, KeyState::Released, false));
        ix.handle_event(&mut cam, &key(Key::Q, KeyState::Pressed, true));
        assert_eq!(ix.pending_keypresses(), 0);
    }

    #[test]
    fn escape_requests_close_without_queueing() {
        let mut cam = OrbitCamera::default();
        let mut ix = Interaction::new();
        ix.handle_event(&mut cam, &press(MouseButton::Left, 0.0, 0.0));

        let notice = ix.handle_event(&mut cam, &key(Key::Escape, KeyState::Pressed, false));
        assert_eq!(notice, Some(InteractionNotice::CloseRequested));
        assert!(ix.close_requested());
        assert_eq!(ix.pending_keypresses(), 0);
        // Drag state is untouched by the close request.
        assert!(ix.is_interacting());
    }
}
