// Core utilities shared across the engine and game

pub mod math;
