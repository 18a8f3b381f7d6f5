// Collaborator facade: the surface/input/lifecycle contract the host drives

use anyhow::Result;
use log::warn;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use crate::engine::input::Control;
use crate::engine::render_loop::RenderLoop;
use crate::engine::surface::DrawSurface;
use crate::game::save::SavedGame;
use crate::game::state::{messages, Difficulty, GameState, Mode, Rotation, StatusSink};

/// One lander game as seen by the embedding host.
///
/// Owns the shared game state and, while a surface is attached, the render
/// loop drawing it. The host forwards surface lifecycle events, resize
/// notifications, and key events; everything else happens inside.
pub struct LanderView {
    state: Arc<Mutex<GameState>>,
    render_loop: Option<RenderLoop>,
}

impl LanderView {
    /// Create a view in `Ready` mode, greeting the player through the sink.
    ///
    /// The lander sprite extent comes from the host, which owns the assets.
    pub fn new(sink: Box<dyn StatusSink>, lander_width: u32, lander_height: u32) -> Self {
        let view = Self::from_state(GameState::new(sink, lander_width, lander_height));
        view.lock().set_mode(Mode::Ready, None);
        view
    }

    pub(crate) fn from_state(state: GameState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            render_loop: None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().expect("game state lock poisoned")
    }

    /// The surface exists and may be drawn: start the render loop
    pub fn on_surface_ready<S>(&mut self, surface: S) -> Result<()>
    where
        S: DrawSurface + 'static,
    {
        if self.render_loop.is_some() {
            warn!("surface ready while the render loop is already running");
            return Ok(());
        }
        self.render_loop = Some(RenderLoop::start(Arc::clone(&self.state), surface)?);
        Ok(())
    }

    /// The surface is about to go away: stop the loop and wait for it.
    /// After this returns the surface is no longer touched.
    pub fn on_surface_destroyed(&mut self) {
        if let Some(mut render_loop) = self.render_loop.take() {
            render_loop.stop();
        }
    }

    /// The surface changed size
    pub fn on_surface_resized(&mut self, width: u32, height: u32) {
        self.lock().set_canvas_size(width, height);
    }

    /// A bound key went down. Returns whether the event was consumed.
    ///
    /// Outside a running game any control is a "go" button: it starts a new
    /// attempt from Ready/Lose/Win and resumes from Paused. During a game it
    /// drives the engine and rotation.
    pub fn on_key_down(&mut self, control: Control) -> bool {
        let now = Instant::now();
        let mut state = self.lock();
        match state.mode() {
            Mode::Ready | Mode::Lose | Mode::Win => {
                state.start_game(now);
                true
            }
            Mode::Paused => {
                state.unpause(now);
                true
            }
            Mode::Running => {
                match control {
                    Control::Thrust => state.set_firing(true),
                    Control::RotateLeft => state.set_rotation(Rotation::Left),
                    Control::RotateRight => state.set_rotation(Rotation::Right),
                }
                true
            }
        }
    }

    /// A bound key went up. Returns whether the event was consumed.
    pub fn on_key_up(&mut self, control: Control) -> bool {
        let mut state = self.lock();
        if state.mode() != Mode::Running {
            return false;
        }
        match control {
            Control::Thrust => state.set_firing(false),
            Control::RotateLeft | Control::RotateRight => state.set_rotation(Rotation::None),
        }
        true
    }

    /// Difficulty for the next game
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.lock().set_difficulty(difficulty);
    }

    /// Start a fresh attempt (menu Start)
    pub fn start_game(&mut self) {
        self.lock().start_game(Instant::now());
    }

    /// Freeze a running game (menu Pause, host losing focus)
    pub fn pause(&mut self) {
        self.lock().pause();
    }

    /// Resume a paused game (menu Resume)
    pub fn resume(&mut self) {
        self.lock().unpause(Instant::now());
    }

    /// Abandon the current game (menu Stop)
    pub fn stop_game(&mut self) {
        self.lock().set_mode(Mode::Lose, Some(messages::STOPPED));
    }

    /// Current game mode
    pub fn mode(&self) -> Mode {
        self.lock().mode()
    }

    /// Snapshot for the host's suspension bundle
    pub fn save_state(&self) -> SavedGame {
        self.lock().save_state()
    }

    /// Resume from a suspension bundle
    pub fn restore_state(&self, saved: &SavedGame) {
        self.lock().restore_state(saved);
    }
}

impl Drop for LanderView {
    fn drop(&mut self) {
        self.on_surface_destroyed();
    }
}
