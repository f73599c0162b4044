use crate::camera::OrbitCamera;
use crate::input::Key;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by visualizations.
///
/// Per frame the runtime first drains queued key presses into
/// [`App::on_keypress`], then calls [`App::on_frame`].
pub trait App {
    /// Called once per queued key press (fresh presses only, never Escape).
    fn on_keypress(&mut self, key: Key, camera: &mut OrbitCamera) {
        let _ = (key, camera);
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
