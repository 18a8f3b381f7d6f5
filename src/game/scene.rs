// Per-frame scene composition: game state to abstract draw calls

use crate::engine::surface::{Canvas, Color, SpriteKind};
use crate::game::consts::*;
use crate::game::state::{GameState, Mode};

/// Gauge inset from the canvas edges
const GAUGE_MARGIN: f64 = 4.0;

/// Emit one frame of draw calls for the current state.
///
/// The simulation keeps y growing upward from the canvas bottom; canvases
/// are top-origin, so everything vertical is flipped here.
pub fn draw_scene(state: &GameState, canvas: &mut impl Canvas) {
    canvas.clear_background();

    let canvas_height = f64::from(state.canvas_height);

    // Fuel gauge
    let fuel_width = GAUGE_BAR * state.fuel / FUEL_MAX;
    canvas.fill_rect(
        GAUGE_MARGIN,
        GAUGE_MARGIN,
        fuel_width,
        GAUGE_BAR_HEIGHT,
        Color::GAUGE_GOOD,
    );

    // Speed gauge, two-tone when over the landing limit: the full reading in
    // the bad color with the allowed portion overlaid in the good one
    let speed = state.speed();
    let speed_x = GAUGE_MARGIN + GAUGE_BAR + GAUGE_MARGIN;
    let speed_width = GAUGE_BAR * speed / SPEED_GAUGE_MAX;
    if speed <= state.goal_speed {
        canvas.fill_rect(
            speed_x,
            GAUGE_MARGIN,
            speed_width,
            GAUGE_BAR_HEIGHT,
            Color::GAUGE_GOOD,
        );
    } else {
        canvas.fill_rect(
            speed_x,
            GAUGE_MARGIN,
            speed_width,
            GAUGE_BAR_HEIGHT,
            Color::GAUGE_BAD,
        );
        let allowed_width = GAUGE_BAR * state.goal_speed / SPEED_GAUGE_MAX;
        canvas.fill_rect(
            speed_x,
            GAUGE_MARGIN,
            allowed_width,
            GAUGE_BAR_HEIGHT,
            Color::GAUGE_GOOD,
        );
    }

    // Landing pad
    let pad_y = 1.0 + canvas_height - PAD_HEIGHT;
    canvas.draw_line(
        state.goal_x,
        pad_y,
        state.goal_x + state.goal_width,
        pad_y,
        Color::GAUGE_GOOD,
    );

    // Lander sprite, rotated by heading about its center
    let kind = if state.mode() == Mode::Lose {
        SpriteKind::LanderCrashed
    } else if state.engine_firing {
        SpriteKind::LanderFiring
    } else {
        SpriteKind::Lander
    };
    let x_left = state.pos.x - state.lander_width / 2.0;
    let y_top = canvas_height - (state.pos.y + state.lander_height / 2.0);
    canvas.draw_sprite(
        kind,
        x_left,
        y_top,
        state.lander_width,
        state.lander_height,
        state.heading,
    );
}
