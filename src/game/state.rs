// Game state: simulation variables, mode transitions, game lifecycle

use glam::DVec2;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::game::consts::*;

/// Built-in status strings relayed to the host's label widget.
/// Localization is the host's concern; these are the defaults.
pub mod messages {
    pub const READY: &str = "Thrust to start";
    pub const PAUSED: &str = "Paused";
    pub const LOSE: &str = "Game over";
    pub const WIN_PREFIX: &str = "Touchdown! Wins in a row: ";
    pub const OFF_PAD: &str = "Missed the pad";
    pub const BAD_ANGLE: &str = "Bad angle";
    pub const TOO_FAST: &str = "Too fast";
    pub const STOPPED: &str = "Stopped";
}

/// Coarse game state, gating physics and selecting the status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Waiting for the player to start a game
    Ready,
    /// Physics advances every frame
    Running,
    /// Game in progress but frozen; resuming re-arms the physics clock
    Paused,
    /// Crashed or stopped
    Lose,
    /// Landed within the goal tolerances
    Win,
}

/// Difficulty, chosen before a game starts; fixes the goal parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// Scale applied to the initial fuel load
    pub fn fuel_factor(&self) -> f64 {
        match self {
            Self::Easy => 3.0 / 2.0,
            Self::Medium => 1.0,
            Self::Hard => 7.0 / 8.0,
        }
    }

    /// Scale applied to the landing pad width
    pub fn goal_width_factor(&self) -> f64 {
        match self {
            Self::Easy => 4.0 / 3.0,
            Self::Medium => 1.0,
            Self::Hard => 3.0 / 4.0,
        }
    }

    /// Scale applied to the allowed landing speed
    pub fn goal_speed_factor(&self) -> f64 {
        match self {
            Self::Easy => 3.0 / 2.0,
            Self::Medium => 1.0,
            Self::Hard => 7.0 / 8.0,
        }
    }

    /// Scale applied to the allowed landing angle
    pub fn goal_angle_factor(&self) -> f64 {
        match self {
            Self::Easy => 4.0 / 3.0,
            Self::Medium | Self::Hard => 1.0,
        }
    }

    /// Scale applied to the random initial speed
    pub fn init_speed_factor(&self) -> f64 {
        match self {
            Self::Easy => 3.0 / 4.0,
            Self::Medium => 1.0,
            Self::Hard => 4.0 / 3.0,
        }
    }
}

/// Active rotation input: left, none, or right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    Left,
    #[default]
    None,
    Right,
}

impl Rotation {
    /// Sign applied to the slew rate: -1, 0, or +1
    pub fn as_sign(&self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::None => 0.0,
            Self::Right => 1.0,
        }
    }
}

/// Callback seam for the externally-owned status label.
///
/// Invoked while the game-state lock is held, so implementations must not
/// call back into the game.
pub trait StatusSink: Send {
    /// Show (`visible`) or hide the status label with the given text
    fn status_text(&mut self, text: &str, visible: bool);
}

/// A sink that discards all status updates
pub struct NullSink;

impl StatusSink for NullSink {
    fn status_text(&mut self, _text: &str, _visible: bool) {}
}

/// All simulation variables for one lander game.
///
/// Owned behind a single mutex shared by the render-loop worker and the
/// host's input thread; every read or write happens under that lock.
/// Positions are in canvas pixels with y growing upward from the bottom.
pub struct GameState {
    /// Lander center position
    pub pos: DVec2,
    /// Lander velocity (px/s)
    pub vel: DVec2,
    /// Heading in degrees, 0 up, 90 right; always in [0, 360)
    pub heading: f64,
    /// Fuel remaining; never negative, never above `FUEL_MAX`
    pub fuel: f64,
    /// Is the main engine burning?
    pub engine_firing: bool,
    /// Active rotation input
    pub rotation: Rotation,
    /// Difficulty for the next `start_game`
    pub difficulty: Difficulty,

    /// Left edge of the landing pad
    pub goal_x: f64,
    /// Width of the landing pad
    pub goal_width: f64,
    /// Maximum speed for a clean landing
    pub goal_speed: f64,
    /// Maximum angle off vertical for a clean landing
    pub goal_angle: f64,

    /// Consecutive wins; resets to zero on any loss
    pub wins_in_a_row: u32,

    /// Canvas extent, updated by the host on surface resize
    pub canvas_width: u32,
    pub canvas_height: u32,

    /// Lander sprite extent, supplied by the host (asset decoding is external)
    pub lander_width: f64,
    pub lander_height: f64,

    /// Physics clock; frames whose `now` precedes this are ignored
    pub(crate) last_update: Instant,

    mode: Mode,
    rng: Pcg32,
    sink: Box<dyn StatusSink>,
}

impl GameState {
    /// Create a state with an entropy-derived RNG seed
    pub fn new(sink: Box<dyn StatusSink>, lander_width: u32, lander_height: u32) -> Self {
        Self::with_seed(sink, lander_width, lander_height, rand::random())
    }

    /// Create a state with a fixed RNG seed (deterministic starts)
    pub fn with_seed(
        sink: Box<dyn StatusSink>,
        lander_width: u32,
        lander_height: u32,
        seed: u64,
    ) -> Self {
        let lander_width = f64::from(lander_width);
        let lander_height = f64::from(lander_height);
        Self {
            // Show-up position before the first game; roughly top-left
            pos: DVec2::new(lander_width, lander_height * 2.0),
            vel: DVec2::ZERO,
            heading: 0.0,
            fuel: FUEL_INIT,
            engine_firing: false,
            rotation: Rotation::None,
            difficulty: Difficulty::default(),
            goal_x: 0.0,
            goal_width: lander_width * GOAL_WIDTH_FACTOR,
            goal_speed: GOAL_SPEED,
            goal_angle: GOAL_ANGLE,
            wins_in_a_row: 0,
            canvas_width: 1,
            canvas_height: 1,
            lander_width,
            lander_height,
            last_update: Instant::now(),
            mode: Mode::Ready,
            rng: Pcg32::seed_from_u64(seed),
            sink,
        }
    }

    /// Current game mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current speed (magnitude of velocity)
    pub fn speed(&self) -> f64 {
        self.vel.length()
    }

    /// Select the difficulty for the next game
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        info!("difficulty set to {difficulty:?} (takes effect next game)");
        self.difficulty = difficulty;
    }

    /// Engine on/off, from the host's fire key
    pub fn set_firing(&mut self, firing: bool) {
        self.engine_firing = firing;
    }

    /// Rotation input, from the host's directional keys
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Record the drawing surface extent; called by the host on every resize
    pub fn set_canvas_size(&mut self, width: u32, height: u32) {
        self.canvas_width = width.max(1);
        self.canvas_height = height.max(1);
        debug!(
            "canvas resized to {}x{}",
            self.canvas_width, self.canvas_height
        );
    }

    /// Switch modes and relay the matching status text to the host.
    ///
    /// Entering `Running` hides the label. Any other mode clears the control
    /// inputs, composes the mode's message (prefixed by `message` when given),
    /// and shows it; a loss resets the win streak.
    pub fn set_mode(&mut self, mode: Mode, message: Option<&str>) {
        debug!("mode -> {mode:?}");
        self.mode = mode;

        if mode == Mode::Running {
            self.sink.status_text("", false);
            return;
        }

        self.rotation = Rotation::None;
        self.engine_firing = false;

        let status = match mode {
            Mode::Ready => messages::READY.to_owned(),
            Mode::Paused => messages::PAUSED.to_owned(),
            Mode::Lose => messages::LOSE.to_owned(),
            Mode::Win => format!("{}{}", messages::WIN_PREFIX, self.wins_in_a_row),
            Mode::Running => unreachable!(),
        };
        let text = match message {
            Some(extra) => format!("{extra}\n{status}"),
            None => status,
        };

        if mode == Mode::Lose {
            self.wins_in_a_row = 0;
        }

        self.sink.status_text(&text, true);
    }

    /// Start a fresh attempt: reload fuel, apply the difficulty table, place
    /// the lander at the top center with a little random motion, pick a pad
    /// position away from the drop point, and enter `Running` with the
    /// physics clock held back by `START_DELAY`.
    pub fn start_game(&mut self, now: Instant) {
        let difficulty = self.difficulty;
        self.fuel = FUEL_INIT * difficulty.fuel_factor();
        self.engine_firing = false;
        self.goal_width =
            self.lander_width * GOAL_WIDTH_FACTOR * difficulty.goal_width_factor();
        self.goal_speed = GOAL_SPEED * difficulty.goal_speed_factor();
        self.goal_angle = GOAL_ANGLE * difficulty.goal_angle_factor();
        let init_speed = INIT_SPEED * difficulty.init_speed_factor();

        self.pos = DVec2::new(
            f64::from(self.canvas_width) / 2.0,
            f64::from(self.canvas_height) - self.lander_height / 2.0,
        );
        self.vel = DVec2::new(
            self.rng.random::<f64>() * 2.0 * init_speed - init_speed,
            self.rng.random::<f64>() * -init_speed,
        );
        self.heading = 0.0;

        self.goal_x = self.place_goal();

        self.last_update = now + START_DELAY;
        info!(
            "game started: {difficulty:?}, pad at {:.0}..{:.0}",
            self.goal_x,
            self.goal_x + self.goal_width
        );
        self.set_mode(Mode::Running, None);
    }

    /// Freeze a running game
    pub fn pause(&mut self) {
        if self.mode == Mode::Running {
            self.set_mode(Mode::Paused, None);
        }
    }

    /// Resume a paused game without integrating the paused wall time
    pub fn unpause(&mut self, now: Instant) {
        if self.mode == Mode::Paused {
            self.last_update = now + START_DELAY;
            self.set_mode(Mode::Running, None);
        }
    }

    /// Pick a pad position whose distance from the lander's left edge exceeds
    /// one sixth of the canvas height.
    ///
    /// Rejection sampling is bounded; on a canvas too narrow for the sampler
    /// to succeed quickly we fall back to whichever extreme of the valid
    /// range is farther from the lander, which satisfies the separation
    /// whenever the canvas admits any valid position at all.
    fn place_goal(&mut self) -> f64 {
        let span = (f64::from(self.canvas_width) - self.goal_width).max(0.0);
        let lander_left = self.pos.x - self.lander_width / 2.0;
        let min_separation = f64::from(self.canvas_height) / 6.0;

        for _ in 0..GOAL_PLACEMENT_RETRIES {
            let candidate = self.rng.random::<f64>() * span;
            if (candidate - lander_left).abs() > min_separation {
                return candidate;
            }
        }

        debug!("pad placement fell back to the far edge");
        if lander_left < span / 2.0 {
            span
        } else {
            0.0
        }
    }
}
