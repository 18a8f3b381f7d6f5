// Engine modules: render loop, drawing-surface seam, input bindings

pub mod input;
pub mod render_loop;
pub mod surface;
