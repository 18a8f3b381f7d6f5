// Save/restore bundles for process suspension

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::math::normalize_heading;
use crate::game::consts::FUEL_MAX;
use crate::game::state::{Difficulty, GameState, Mode};

/// Errors produced while encoding or decoding a save bundle
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("malformed save bundle: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Flat snapshot of everything needed to resume a game.
///
/// This is the whole persistence surface: a key-value bundle the host stows
/// across process suspension and hands back on restore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub heading: f64,
    pub fuel: f64,
    pub mode: Mode,
    pub difficulty: Difficulty,
    pub goal_x: f64,
    pub goal_width: f64,
    pub goal_speed: f64,
    pub goal_angle: f64,
    pub wins_in_a_row: u32,
}

impl SavedGame {
    /// Encode as a flat JSON object
    pub fn to_bundle(&self) -> Result<Value, BundleError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Decode from a bundle produced by [`to_bundle`](Self::to_bundle)
    pub fn from_bundle(bundle: &Value) -> Result<Self, BundleError> {
        Ok(serde_json::from_value(bundle.clone())?)
    }
}

impl GameState {
    /// Snapshot the resumable field set
    pub fn save_state(&self) -> SavedGame {
        SavedGame {
            x: self.pos.x,
            y: self.pos.y,
            dx: self.vel.x,
            dy: self.vel.y,
            heading: self.heading,
            fuel: self.fuel,
            mode: self.mode(),
            difficulty: self.difficulty,
            goal_x: self.goal_x,
            goal_width: self.goal_width,
            goal_speed: self.goal_speed,
            goal_angle: self.goal_angle,
            wins_in_a_row: self.wins_in_a_row,
        }
    }

    /// Resume from a snapshot.
    ///
    /// Numeric fields are pulled back inside their invariants in case the
    /// bundle was tampered with. A game saved while running resumes paused,
    /// so the physics clock cannot integrate the suspended wall time.
    pub fn restore_state(&mut self, saved: &SavedGame) {
        self.pos = DVec2::new(saved.x, saved.y);
        self.vel = DVec2::new(saved.dx, saved.dy);
        self.heading = normalize_heading(saved.heading);
        self.fuel = saved.fuel.clamp(0.0, FUEL_MAX);
        self.difficulty = saved.difficulty;
        self.goal_x = saved.goal_x;
        self.goal_width = saved.goal_width;
        self.goal_speed = saved.goal_speed;
        self.goal_angle = saved.goal_angle;
        self.wins_in_a_row = saved.wins_in_a_row;

        let mode = if saved.mode == Mode::Running {
            Mode::Paused
        } else {
            saved.mode
        };
        self.set_mode(mode, None);
    }
}
