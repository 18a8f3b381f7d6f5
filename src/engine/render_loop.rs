// Render-loop worker: advances the game and draws, one frame at a time

use log::{debug, error};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::engine::surface::DrawSurface;
use crate::game::scene::draw_scene;
use crate::game::state::{GameState, Mode};

/// Backoff while the surface refuses to hand out a canvas
const ACQUIRE_RETRY_DELAY: Duration = Duration::from_millis(5);

/// Shutdown waits this long, in 1ms polls, for the in-flight frame
const SHUTDOWN_POLL_LIMIT: u32 = 2000;

/// Worker thread that owns the draw surface and continuously renders the
/// shared game state.
///
/// Each iteration: check the run flag, acquire a canvas (skip the frame if
/// the surface is unavailable), advance physics under the state lock when
/// the game is running, emit the scene's draw calls, release the lock, and
/// present. The surface must not be touched after shutdown, so the host
/// calls [`stop`](Self::stop) (or drops the loop) before tearing it down.
pub struct RenderLoop {
    run: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RenderLoop {
    /// Spawn the worker. The surface moves onto the worker thread; the game
    /// state stays shared with the host's input side through the mutex.
    pub fn start<S>(state: Arc<Mutex<GameState>>, mut surface: S) -> io::Result<Self>
    where
        S: DrawSurface + 'static,
    {
        let run = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&run);

        let handle = thread::Builder::new()
            .name("render-loop".to_owned())
            .spawn(move || {
                debug!("render loop started");
                let mut background_size = (0u32, 0u32);

                while flag.load(Ordering::Acquire) {
                    let Some(mut canvas) = surface.acquire() else {
                        thread::sleep(ACQUIRE_RETRY_DELAY);
                        continue;
                    };

                    {
                        let mut game = state.lock().expect("game state lock poisoned");

                        let size = (game.canvas_width, game.canvas_height);
                        if size != background_size {
                            surface.resize_background(size.0, size.1);
                            background_size = size;
                        }

                        if game.mode() == Mode::Running {
                            game.advance(Instant::now());
                        }
                        draw_scene(&game, &mut canvas);
                    }

                    // Present outside the lock so a slow host cannot stall
                    // the input side.
                    surface.present(canvas);
                }
                debug!("render loop exited");
            })?;

        Ok(Self {
            run,
            handle: Some(handle),
        })
    }

    /// Is the worker still attached?
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Signal shutdown and wait for the worker to finish its in-flight
    /// frame. Must complete before the host tears the surface down.
    pub fn stop(&mut self) {
        self.run.store(false, Ordering::Release);
        let Some(handle) = self.handle.take() else {
            return;
        };

        // Bounded wait for the frame in progress; the join below blocks
        // regardless, this just puts a floor under typical shutdown latency.
        let mut polls = 0;
        while !handle.is_finished() && polls < SHUTDOWN_POLL_LIMIT {
            thread::sleep(Duration::from_millis(1));
            polls += 1;
        }

        if handle.join().is_err() {
            error!("render loop thread panicked");
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::surface::{Canvas, HeadlessCanvas, HeadlessSurface};
    use crate::game::test_support::recording_state;
    use std::sync::atomic::AtomicU64;

    /// Surface whose acquisition always fails
    struct UnavailableSurface {
        attempts: Arc<AtomicU64>,
        presents: Arc<AtomicU64>,
    }

    impl DrawSurface for UnavailableSurface {
        type Canvas = HeadlessCanvas;

        fn acquire(&mut self) -> Option<HeadlessCanvas> {
            self.attempts.fetch_add(1, Ordering::Relaxed);
            None
        }

        fn present(&mut self, _canvas: HeadlessCanvas) {
            self.presents.fetch_add(1, Ordering::Relaxed);
        }

        fn resize_background(&mut self, _width: u32, _height: u32) {}
    }

    fn shared_state(seed: u64) -> Arc<Mutex<GameState>> {
        let (state, _events) = recording_state(seed);
        Arc::new(Mutex::new(state))
    }

    #[test]
    fn test_start_and_stop() {
        let state = shared_state(1);
        let surface = HeadlessSurface::new(Duration::from_millis(1));
        let frames = surface.frame_counter();

        let mut render_loop = RenderLoop::start(state, surface).unwrap();
        assert!(render_loop.is_running());
        thread::sleep(Duration::from_millis(50));
        render_loop.stop();

        assert!(!render_loop.is_running());
        assert!(frames.load(Ordering::Relaxed) > 0, "loop never presented");
    }

    #[test]
    fn test_stop_is_idempotent() {
        let state = shared_state(1);
        let surface = HeadlessSurface::new(Duration::from_millis(1));
        let mut render_loop = RenderLoop::start(state, surface).unwrap();
        render_loop.stop();
        render_loop.stop();
        assert!(!render_loop.is_running());
    }

    #[test]
    fn test_no_physics_outside_running() {
        let state = shared_state(2);
        {
            let mut game = state.lock().unwrap();
            game.set_canvas_size(800, 480);
        }
        let pos = state.lock().unwrap().pos;

        let surface = HeadlessSurface::new(Duration::from_millis(1));
        let mut render_loop = RenderLoop::start(Arc::clone(&state), surface).unwrap();
        thread::sleep(Duration::from_millis(50));
        render_loop.stop();

        // Still in Ready: the loop drew frames but never advanced physics
        assert_eq!(state.lock().unwrap().pos, pos);
    }

    #[test]
    fn test_advances_while_running() {
        let state = shared_state(3);
        {
            let mut game = state.lock().unwrap();
            game.set_canvas_size(800, 4000);
            game.start_game(Instant::now());
        }
        let y0 = state.lock().unwrap().pos.y;

        let surface = HeadlessSurface::new(Duration::from_millis(1));
        let mut render_loop = RenderLoop::start(Arc::clone(&state), surface).unwrap();
        thread::sleep(Duration::from_millis(300));
        render_loop.stop();

        assert_ne!(state.lock().unwrap().pos.y, y0, "physics never advanced");
    }

    #[test]
    fn test_acquire_failure_skips_frame() {
        let state = shared_state(4);
        let attempts = Arc::new(AtomicU64::new(0));
        let presents = Arc::new(AtomicU64::new(0));
        let surface = UnavailableSurface {
            attempts: Arc::clone(&attempts),
            presents: Arc::clone(&presents),
        };

        let mut render_loop = RenderLoop::start(state, surface).unwrap();
        thread::sleep(Duration::from_millis(50));
        render_loop.stop();

        assert!(attempts.load(Ordering::Relaxed) > 0);
        assert_eq!(presents.load(Ordering::Relaxed), 0, "nothing to present");
    }

    #[test]
    fn test_resize_reaches_surface() {
        let state = shared_state(5);
        state.lock().unwrap().set_canvas_size(640, 360);

        let surface = HeadlessSurface::new(Duration::from_millis(1));
        // Background size is tracked on the worker side; verify via a probe
        // canvas that frames keep flowing after the resize propagates.
        let frames = surface.frame_counter();
        let mut render_loop = RenderLoop::start(Arc::clone(&state), surface).unwrap();
        thread::sleep(Duration::from_millis(30));
        state.lock().unwrap().set_canvas_size(1280, 720);
        thread::sleep(Duration::from_millis(30));
        render_loop.stop();

        assert!(frames.load(Ordering::Relaxed) > 1);
    }

    #[test]
    fn test_drop_stops_loop() {
        let state = shared_state(6);
        let surface = HeadlessSurface::new(Duration::from_millis(1));
        let frames = surface.frame_counter();

        {
            let _render_loop = RenderLoop::start(state, surface).unwrap();
            thread::sleep(Duration::from_millis(20));
        }
        let settled = frames.load(Ordering::Relaxed);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(frames.load(Ordering::Relaxed), settled);
    }

    #[test]
    fn test_canvas_trait_object_safety() {
        // The scene draws through &mut impl Canvas; make sure the trait also
        // works boxed, which hosts with dynamic pipelines rely on.
        let mut canvas: Box<dyn Canvas> = Box::<HeadlessCanvas>::default();
        canvas.clear_background();
    }
}
