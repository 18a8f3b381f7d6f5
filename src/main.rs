use anyhow::Result;
use log::info;
use std::thread;
use std::time::Duration;

use rusted_lander::{Control, HeadlessSurface, LanderView, Mode, StatusSink};

/// Routes the status label to the log, standing in for a real host's UI
struct LogSink;

impl StatusSink for LogSink {
    fn status_text(&mut self, text: &str, visible: bool) {
        if visible {
            for line in text.lines() {
                info!("status: {line}");
            }
        }
    }
}

/// Headless demo: flies one descent with a crude autopilot that fires the
/// engine whenever the lander falls too fast.
fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Lander...");

    let mut view = LanderView::new(Box::new(LogSink), 48, 48);
    view.on_surface_resized(800, 480);
    view.on_surface_ready(HeadlessSurface::new(Duration::from_millis(16)))?;

    // The first press is the "go" button; release it so the tank is full
    // when the descent begins
    view.on_key_down(Control::Thrust);
    view.on_key_up(Control::Thrust);

    let mut burning = false;
    while view.mode() == Mode::Running {
        let snapshot = view.save_state();
        let braking = snapshot.dy < -40.0;
        if braking != burning {
            if braking {
                view.on_key_down(Control::Thrust);
            } else {
                view.on_key_up(Control::Thrust);
            }
            burning = braking;
        }
        thread::sleep(Duration::from_millis(16));
    }

    let landed = view.save_state();
    info!(
        "Descent over: {:?} at x={:.1} with {:.1} fuel left",
        view.mode(),
        landed.x,
        landed.fuel
    );

    view.on_surface_destroyed();
    Ok(())
}
