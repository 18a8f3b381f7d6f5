// Game modules: simulation state, physics, scene composition, persistence

pub mod consts;
pub mod physics;
pub mod save;
pub mod scene;
pub mod state;
pub mod view;
