// Per-frame physics step and landing evaluation

use glam::DVec2;
use log::info;
use std::time::Instant;

use crate::core::math::normalize_heading;
use crate::game::consts::*;
use crate::game::state::{messages, GameState, Mode};

impl GameState {
    /// Advance the simulation to `now`.
    ///
    /// Callers gate this on `Mode::Running`. Frames whose `now` precedes the
    /// physics clock are ignored, which is what makes the start/resume delay
    /// work and shields against wall-clock adjustments.
    pub fn advance(&mut self, now: Instant) {
        if now < self.last_update {
            return;
        }
        let elapsed = (now - self.last_update).as_secs_f64();

        self.heading = normalize_heading(
            self.heading + self.rotation.as_sign() * SLEW_DEG_PER_SEC * elapsed,
        );

        let mut accel = DVec2::new(0.0, -GRAVITY_ACCEL * elapsed);

        if self.engine_firing {
            let mut firing_time = elapsed;
            let mut fuel_used = firing_time * FUEL_BURN_RATE;

            // Ran dry partway through the frame: thrust only acts for the
            // fraction of the frame the remaining fuel covers.
            if fuel_used > self.fuel {
                firing_time = self.fuel / FUEL_BURN_RATE;
                fuel_used = self.fuel;
                self.engine_firing = false;
            }
            self.fuel -= fuel_used;

            let thrust = FIRE_ACCEL * firing_time;
            let radians = self.heading.to_radians();
            accel.x += radians.sin() * thrust;
            accel.y += radians.cos() * thrust;
        }

        // Trapezoidal integration: position moves at the average of the old
        // and new velocity over the full frame.
        let old_vel = self.vel;
        self.vel += accel;
        self.pos += (self.vel + old_vel) * (elapsed / 2.0);

        self.last_update = now;

        let floor = PAD_HEIGHT + self.lander_height / 2.0 - BOTTOM_PADDING;
        if self.pos.y <= floor {
            self.pos.y = floor;
            self.evaluate_landing(now);
        }
    }

    /// Decide the outcome of a touchdown and either end the attempt or, for
    /// a hyperspace landing, roll straight into a fresh one.
    fn evaluate_landing(&mut self, now: Instant) {
        let speed = self.speed();
        let on_goal = self.goal_x <= self.pos.x - self.lander_width / 2.0
            && self.pos.x + self.lander_width / 2.0 <= self.goal_x + self.goal_width;

        // Hyperspace: upside down and fast, on the pad. Counts as a win and
        // warps back to the top without ever leaving Running.
        if on_goal && (self.heading - 180.0).abs() < self.goal_angle && speed > HYPERSPACE_SPEED {
            self.wins_in_a_row += 1;
            info!("hyperspace landing at {speed:.0} px/s");
            self.start_game(now);
            return;
        }

        let (result, message) = if !on_goal {
            (Mode::Lose, Some(messages::OFF_PAD))
        } else if !(self.heading <= self.goal_angle || self.heading >= 360.0 - self.goal_angle) {
            (Mode::Lose, Some(messages::BAD_ANGLE))
        } else if speed > self.goal_speed {
            (Mode::Lose, Some(messages::TOO_FAST))
        } else {
            self.wins_in_a_row += 1;
            (Mode::Win, None)
        };

        self.set_mode(result, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::Rotation;
    use crate::game::test_support::recording_state;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use std::time::Duration;

    /// A running state high above the floor, with deterministic motion
    fn airborne_state(seed: u64) -> (GameState, Instant) {
        let (mut state, _events) = recording_state(seed);
        state.set_canvas_size(800, 4000);
        let start = Instant::now();
        state.start_game(start);
        let now = start + START_DELAY;
        state.vel = DVec2::ZERO;
        (state, now)
    }

    /// A state one frame away from touching down at the pad center
    fn landing_state(seed: u64) -> (GameState, Instant) {
        let (mut state, now) = airborne_state(seed);
        state.pos.x = state.goal_x + state.goal_width / 2.0;
        state.pos.y = PAD_HEIGHT + state.lander_height / 2.0 - BOTTOM_PADDING - 0.5;
        (state, now)
    }

    #[test]
    fn test_gravity_pulls_down() {
        let (mut state, now) = airborne_state(1);
        let y0 = state.pos.y;
        state.advance(now + Duration::from_millis(100));
        assert!(state.vel.y < 0.0);
        assert!(state.pos.y < y0);
    }

    #[test]
    fn test_trapezoidal_integration() {
        let (mut state, now) = airborne_state(1);
        let y0 = state.pos.y;
        state.advance(now + Duration::from_secs(1));
        // From rest: dy goes to -g, y moves by the average of 0 and -g
        assert_relative_eq!(state.vel.y, -GRAVITY_ACCEL);
        assert_relative_eq!(state.pos.y, y0 - GRAVITY_ACCEL / 2.0);
    }

    #[test]
    fn test_zero_elapsed_is_identity() {
        let (mut state, now) = airborne_state(1);
        state.advance(now);
        let (pos, vel, heading, fuel) = (state.pos, state.vel, state.heading, state.fuel);

        state.advance(now);
        assert_eq!(state.pos, pos);
        assert_eq!(state.vel, vel);
        assert_eq!(state.heading, heading);
        assert_eq!(state.fuel, fuel);
        assert_eq!(state.last_update, now);
    }

    #[test]
    fn test_stale_frame_ignored() {
        let (mut state, now) = airborne_state(1);
        state.advance(now + Duration::from_millis(50));
        let pos = state.pos;

        // A frame from before the clock must be a complete no-op
        state.advance(now);
        assert_eq!(state.pos, pos);
        assert_eq!(state.last_update, now + Duration::from_millis(50));
    }

    #[test]
    fn test_rotation_slews_heading() {
        let (mut state, now) = airborne_state(1);
        state.set_rotation(Rotation::Right);
        state.advance(now + Duration::from_millis(500));
        assert_relative_eq!(state.heading, SLEW_DEG_PER_SEC / 2.0);

        state.set_rotation(Rotation::Left);
        state.advance(now + Duration::from_secs(1));
        assert_relative_eq!(state.heading, 0.0);
    }

    #[test]
    fn test_heading_wraps_left() {
        let (mut state, now) = airborne_state(1);
        state.set_rotation(Rotation::Left);
        state.advance(now + Duration::from_millis(250));
        assert_relative_eq!(state.heading, 360.0 - SLEW_DEG_PER_SEC / 4.0);
    }

    #[test]
    fn test_thrust_counters_gravity() {
        let (mut state, now) = airborne_state(1);
        state.set_firing(true);
        state.advance(now + Duration::from_millis(500));
        // heading 0: thrust is straight up and stronger than gravity
        assert!(state.vel.y > 0.0);
        assert_eq!(state.vel.x, 0.0);
    }

    #[test]
    fn test_thrust_decomposes_by_heading() {
        let (mut state, now) = airborne_state(1);
        state.heading = 90.0;
        state.set_firing(true);
        state.advance(now + Duration::from_millis(500));
        // heading 90: thrust is horizontal, gravity keeps pulling down
        assert!(state.vel.x > 0.0);
        assert!(state.vel.y < 0.0);
    }

    #[test]
    fn test_fuel_burn() {
        let (mut state, now) = airborne_state(1);
        let fuel0 = state.fuel;
        state.set_firing(true);
        state.advance(now + Duration::from_secs(1));
        assert_relative_eq!(state.fuel, fuel0 - FUEL_BURN_RATE);
        assert!(state.engine_firing);
    }

    #[test]
    fn test_fuel_exhaustion_clamps_thrust() {
        let (mut state, now) = airborne_state(1);
        state.fuel = 1.0; // covers 0.1s of burn
        state.set_firing(true);
        state.advance(now + Duration::from_secs(1));

        assert_eq!(state.fuel, 0.0);
        assert!(!state.engine_firing, "engine must cut out when dry");
        // Thrust only acted for the covered window: weaker than a full burn
        assert!(state.vel.y < FIRE_ACCEL * 0.1 - GRAVITY_ACCEL + 1e-9);
        assert!(state.vel.y > -GRAVITY_ACCEL);
    }

    #[test]
    fn test_firing_with_empty_tank() {
        let (mut state, now) = airborne_state(1);
        state.fuel = 0.0;
        state.set_firing(true);
        state.advance(now + Duration::from_millis(200));
        assert_eq!(state.fuel, 0.0);
        assert_relative_eq!(state.vel.y, -GRAVITY_ACCEL * 0.2);
    }

    #[test]
    fn test_clean_landing_wins() {
        let (mut state, now) = landing_state(7);
        state.advance(now + Duration::from_millis(20));
        assert_eq!(state.mode(), Mode::Win);
        assert_eq!(state.wins_in_a_row, 1);
    }

    #[test]
    fn test_landing_clamps_to_floor() {
        let (mut state, now) = landing_state(7);
        state.advance(now + Duration::from_millis(20));
        let floor = PAD_HEIGHT + state.lander_height / 2.0 - BOTTOM_PADDING;
        assert_relative_eq!(state.pos.y, floor);
    }

    #[test]
    fn test_landing_off_pad_loses() {
        let (mut state, now) = landing_state(7);
        state.wins_in_a_row = 4;
        state.pos.x = state.goal_x + state.goal_width + state.lander_width;
        state.advance(now + Duration::from_millis(20));

        assert_eq!(state.mode(), Mode::Lose);
        assert_eq!(state.wins_in_a_row, 0, "streak resets on any loss");
    }

    #[test]
    fn test_landing_bad_angle_loses() {
        let (mut state, now) = landing_state(7);
        state.heading = 90.0;
        state.advance(now + Duration::from_millis(20));
        assert_eq!(state.mode(), Mode::Lose);
    }

    #[test]
    fn test_landing_too_fast_loses() {
        let (mut state, now) = landing_state(7);
        state.vel = DVec2::new(0.0, -100.0);
        // Move up enough that one 20ms frame still ends below the floor
        state.pos.y += 1.0;
        state.advance(now + Duration::from_millis(20));
        assert_eq!(state.mode(), Mode::Lose);
    }

    #[test]
    fn test_angle_tolerance_edges() {
        // Just inside the tolerance on the left wrap side still wins
        let (mut state, now) = landing_state(8);
        state.heading = 360.0 - state.goal_angle + 0.5;
        state.advance(now + Duration::from_millis(20));
        assert_eq!(state.mode(), Mode::Win);
    }

    #[test]
    fn test_hyperspace_restarts_without_result() {
        let (mut state, now) = landing_state(9);
        state.heading = 180.0;
        state.vel = DVec2::new(0.0, -(HYPERSPACE_SPEED + 40.0));
        state.pos.y += 1.0;
        let streak = state.wins_in_a_row;

        state.advance(now + Duration::from_millis(20));

        // Still running, streak credited, lander warped back to the top
        assert_eq!(state.mode(), Mode::Running);
        assert_eq!(state.wins_in_a_row, streak + 1);
        assert_relative_eq!(
            state.pos.y,
            f64::from(state.canvas_height) - state.lander_height / 2.0
        );
        assert_eq!(state.heading, 0.0);
    }

    #[test]
    fn test_hyperspace_shows_no_message() {
        let (mut state, events) = recording_state(9);
        state.set_canvas_size(800, 4000);
        let start = Instant::now();
        state.start_game(start);
        let now = start + START_DELAY;
        state.pos.x = state.goal_x + state.goal_width / 2.0;
        state.pos.y = PAD_HEIGHT + state.lander_height / 2.0 - BOTTOM_PADDING + 1.0;
        state.heading = 180.0;
        state.vel = DVec2::new(0.0, -(HYPERSPACE_SPEED + 40.0));

        state.advance(now + Duration::from_millis(20));

        // Only hide-status events from entering Running; nothing visible
        assert!(events.lock().unwrap().iter().all(|(_, visible)| !visible));
    }

    proptest! {
        #[test]
        fn heading_stays_normalized(
            steps in prop::collection::vec((0i8..=1, 0.0f64..0.5), 1..32)
        ) {
            let (mut state, mut now) = airborne_state(11);
            for (dir, elapsed) in steps {
                state.set_rotation(if dir == 0 { Rotation::Left } else { Rotation::Right });
                now += Duration::from_secs_f64(elapsed);
                state.advance(now);
                prop_assert!((0.0..360.0).contains(&state.heading));
            }
        }

        #[test]
        fn fuel_stays_bounded(
            steps in prop::collection::vec((proptest::bool::ANY, 0.0f64..0.5), 1..32)
        ) {
            let (mut state, mut now) = airborne_state(12);
            for (firing, elapsed) in steps {
                state.set_firing(firing);
                now += Duration::from_secs_f64(elapsed);
                state.advance(now);
                prop_assert!(state.fuel >= 0.0);
                prop_assert!(state.fuel <= FUEL_MAX);
            }
        }
    }
}
