use std::collections::HashSet;

use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Tracks what is held down and where the pointer is. Winit does not report a
/// position with button events, so the runtime reads `pointer_pos` from here
/// when it builds a [`PointerButtonEvent`].
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels; `None` while outside the window.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, ev: &InputEvent) {
        match ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered after focus loss.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;
                match state {
                    KeyState::Pressed => {
                        self.keys_down.insert(*key);
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, pos, modifiers }) => {
                if pos.is_some() {
                    self.pointer_pos = *pos;
                }
                self.modifiers = *modifiers;
                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        self.buttons_down.remove(button);
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => self.modifiers = *modifiers,
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(button: MouseButton, state: MouseButtonState, x: f32, y: f32) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            pos: Some((x, y)),
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn button_events_update_pointer_and_held_set() {
        let mut st = InputState::default();
        st.apply_event(&button(MouseButton::Right, MouseButtonState::Pressed, 4.0, 9.0));
        assert!(st.button_down(MouseButton::Right));
        assert_eq!(st.pointer_pos, Some((4.0, 9.0)));

        st.apply_event(&button(MouseButton::Right, MouseButtonState::Released, 5.0, 9.0));
        assert!(!st.button_down(MouseButton::Right));
    }

    #[test]
    fn focus_loss_clears_held_state() {
        let mut st = InputState::default();
        st.apply_event(&button(MouseButton::Left, MouseButtonState::Pressed, 0.0, 0.0));
        st.apply_event(&InputEvent::Key {
            key: Key::A,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            repeat: false,
        });
        st.apply_event(&InputEvent::Focused(false));
        assert!(st.buttons_down.is_empty());
        assert!(!st.key_down(Key::A));
    }

    #[test]
    fn button_without_position_keeps_last_known_pointer() {
        let mut st = InputState::default();
        st.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 3.0, y: 4.0 }));
        st.apply_event(&InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state: MouseButtonState::Pressed,
            pos: None,
            modifiers: Modifiers::default(),
        }));
        assert_eq!(st.pointer_pos, Some((3.0, 4.0)));
        assert!(st.button_down(MouseButton::Left));
    }

    #[test]
    fn pointer_left_forgets_position() {
        let mut st = InputState::default();
        st.apply_event(&InputEvent::PointerMoved(PointerMoveEvent { x: 1.0, y: 2.0 }));
        st.apply_event(&InputEvent::PointerLeft);
        assert_eq!(st.pointer_pos, None);
    }
}
