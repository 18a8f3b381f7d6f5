// Physics, goal, and gauge constants (pixels, seconds, degrees)

use std::time::Duration;

/// Downward gravitational acceleration (px/s²)
pub const GRAVITY_ACCEL: f64 = 35.0;

/// Main engine acceleration at full burn (px/s²)
pub const FIRE_ACCEL: f64 = 80.0;

/// Fuel loaded at game start, before difficulty scaling
pub const FUEL_INIT: f64 = 60.0;

/// Fuel tank capacity
pub const FUEL_MAX: f64 = 100.0;

/// Fuel consumed per second while the engine fires
pub const FUEL_BURN_RATE: f64 = 10.0;

/// Rotation slew rate (degrees/s)
pub const SLEW_DEG_PER_SEC: f64 = 120.0;

/// Hitting the pad upside down above this speed warps back to the top
pub const HYPERSPACE_SPEED: f64 = 180.0;

/// Upper bound on the random initial speed, before difficulty scaling
pub const INIT_SPEED: f64 = 30.0;

/// Full-scale reading of the speed gauge
pub const SPEED_GAUGE_MAX: f64 = 120.0;

/// Maximum landing angle in degrees off vertical, before difficulty scaling
pub const GOAL_ANGLE: f64 = 18.0;

/// Maximum landing speed, before difficulty scaling
pub const GOAL_SPEED: f64 = 28.0;

/// Pad width as a multiple of the lander sprite width
pub const GOAL_WIDTH_FACTOR: f64 = 1.6;

/// Height of the landing pad line above the canvas bottom
pub const PAD_HEIGHT: f64 = 8.0;

/// Pixels the landing gear sinks below the pad line at touchdown
pub const BOTTOM_PADDING: f64 = 17.0;

/// Width of the fuel and speed gauge bars
pub const GAUGE_BAR: f64 = 100.0;

/// Height of the gauge bars
pub const GAUGE_BAR_HEIGHT: f64 = 10.0;

/// Physics-clock delay applied when a game starts or resumes
pub const START_DELAY: Duration = Duration::from_millis(100);

/// Random pad placement attempts before the deterministic fallback
pub const GOAL_PLACEMENT_RETRIES: u32 = 32;
