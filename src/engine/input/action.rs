// Game control definitions and key mappings

use winit::keyboard::KeyCode;

/// Controls the host forwards into the game core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Rotate counter-clockwise while held
    RotateLeft,
    /// Rotate clockwise while held
    RotateRight,
    /// Burn the main engine while held
    Thrust,
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, Control)> {
    vec![
        (KeyCode::ArrowLeft, Control::RotateLeft),
        (KeyCode::KeyA, Control::RotateLeft),
        (KeyCode::ArrowRight, Control::RotateRight),
        (KeyCode::KeyD, Control::RotateRight),
        (KeyCode::ArrowUp, Control::Thrust),
        (KeyCode::KeyW, Control::Thrust),
        (KeyCode::Space, Control::Thrust),
    ]
}

/// Look up the control bound to a key, if any
pub fn control_for_key(code: KeyCode) -> Option<Control> {
    default_bindings()
        .iter()
        .find(|(key, _)| *key == code)
        .map(|(_, control)| *control)
}
