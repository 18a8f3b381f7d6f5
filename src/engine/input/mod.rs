// Input bindings: keyboard keys to game controls

pub mod action;

pub use action::{control_for_key, default_bindings, Control};
