//! Rusted Lander - a lunar-lander arcade game core
//!
//! Core modules:
//! - `game`: simulation state, per-frame physics, landing evaluation, save bundles
//! - `engine`: render-loop worker, drawing-surface seam, input bindings
//! - `core`: small math helpers
//!
//! Rendering, asset decoding, and window management belong to the embedding
//! host. The crate talks to the host through two seams: `DrawSurface` (the
//! host hands out something to draw on) and `StatusSink` (the core asks the
//! host to show or hide the status label).

pub mod core;
pub mod engine;
pub mod game;

pub use engine::input::Control;
pub use engine::render_loop::RenderLoop;
pub use engine::surface::{Canvas, DrawSurface, HeadlessSurface};
pub use game::save::SavedGame;
pub use game::state::{Difficulty, GameState, Mode, StatusSink};
pub use game::view::LanderView;
