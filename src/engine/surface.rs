// Drawing-surface seam between the render loop and the host

use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Solid RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Gauge and pad line color
    pub const GAUGE_GOOD: Color = Color { r: 0, g: 255, b: 0, a: 255 };
    /// Backing color of the speed gauge when over the landing limit
    pub const GAUGE_BAD: Color = Color { r: 120, g: 180, b: 0, a: 255 };
}

/// Which lander sprite to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteKind {
    /// Normal flight
    Lander,
    /// Engine burning
    LanderFiring,
    /// After a crash
    LanderCrashed,
}

/// One frame's drawing target.
///
/// Coordinates are canvas pixels with the origin at the top-left, matching
/// what hosts hand out; the game converts from its bottom-origin space.
pub trait Canvas {
    /// Paint the cached background over the whole frame
    fn clear_background(&mut self);

    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    /// Draw a one-pixel line
    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color);

    /// Draw a sprite into the given bounds, rotated about its center
    fn draw_sprite(
        &mut self,
        kind: SpriteKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation_deg: f64,
    );
}

/// The host's presentation pipeline, owned by the render-loop worker.
///
/// `acquire` may fail while the pipeline is not ready; the loop then skips
/// the frame. Every acquired canvas is presented, even when drawing goes
/// wrong, so the surface is never left in an inconsistent state.
pub trait DrawSurface: Send {
    type Canvas: Canvas;

    /// Borrow a canvas for one frame, or `None` if the surface is unavailable
    fn acquire(&mut self) -> Option<Self::Canvas>;

    /// Hand the finished frame back to the host
    fn present(&mut self, canvas: Self::Canvas);

    /// Rescale the cached background to a new surface extent
    fn resize_background(&mut self, width: u32, height: u32);
}

/// A recorded draw call, for tests and headless runs
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Background,
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        color: Color,
    },
    Sprite {
        kind: SpriteKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation_deg: f64,
    },
}

/// Canvas that records its draw calls instead of rasterizing
#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    pub calls: Vec<DrawCall>,
}

impl Canvas for HeadlessCanvas {
    fn clear_background(&mut self) {
        self.calls.push(DrawCall::Background);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.calls.push(DrawCall::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: Color) {
        self.calls.push(DrawCall::Line { x0, y0, x1, y1, color });
    }

    fn draw_sprite(
        &mut self,
        kind: SpriteKind,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        rotation_deg: f64,
    ) {
        self.calls.push(DrawCall::Sprite {
            kind,
            x,
            y,
            width,
            height,
            rotation_deg,
        });
    }
}

/// Surface with no display attached: paces frames, counts presents.
///
/// Used by the demo binary and by render-loop tests.
pub struct HeadlessSurface {
    frame_interval: Duration,
    frames_presented: Arc<AtomicU64>,
    background_size: (u32, u32),
}

impl HeadlessSurface {
    /// `frame_interval` emulates the host's presentation cadence
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            frame_interval,
            frames_presented: Arc::new(AtomicU64::new(0)),
            background_size: (0, 0),
        }
    }

    /// Shared counter of presented frames
    pub fn frame_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.frames_presented)
    }

    /// Current background extent
    pub fn background_size(&self) -> (u32, u32) {
        self.background_size
    }
}

impl DrawSurface for HeadlessSurface {
    type Canvas = HeadlessCanvas;

    fn acquire(&mut self) -> Option<HeadlessCanvas> {
        // Emulates blocking on the host's presentation pipeline
        thread::sleep(self.frame_interval);
        Some(HeadlessCanvas::default())
    }

    fn present(&mut self, _canvas: HeadlessCanvas) {
        self.frames_presented.fetch_add(1, Ordering::Relaxed);
    }

    fn resize_background(&mut self, width: u32, height: u32) {
        debug!("background rescaled to {width}x{height}");
        self.background_size = (width, height);
    }
}
