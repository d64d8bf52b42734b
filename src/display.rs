use std::path::Path;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

use anyhow::Result;
use raylib::core::window::{get_monitor_count, get_monitor_height, get_monitor_position, get_monitor_width};
use raylib::core::text::measure_text;
use raylib::prelude::*;

use crate::constants::*;

/// Number of connected monitors. Needs an open raylib window.
pub fn monitor_count() -> usize {
    get_monitor_count().max(1) as usize
}

/// Cover monitor `display` with the (undecorated) window, falling back to
/// the first monitor when the index is gone.
pub fn place_on_monitor(rl: &mut RaylibHandle, display: usize) {
    let display = if display < monitor_count() { display as i32 } else { 0 };
    let position = get_monitor_position(display);
    rl.set_window_monitor(display);
    rl.set_window_position(position.x as i32, position.y as i32);
    rl.set_window_size(get_monitor_width(display), get_monitor_height(display));
}

/// Short-lived label windows, one per monitor, spawned by "Test Output".
#[derive(Default)]
pub struct DisplayTest {
    windows: Vec<Child>,
}

impl DisplayTest {
    pub fn start(&mut self, program: &Path, count: usize) {
        self.reap();
        for display in 0..count {
            let label = format!("DISPLAY {} - TEST VISUAL", display + 1);
            let spawned = Command::new(program)
                .args(["identify", "--display", &display.to_string(), "--label", &label])
                .spawn();
            match spawned {
                Ok(child) => self.windows.push(child),
                Err(e) => tracing::error!("Failed to open test window on display {}: {}", display + 1, e),
            }
        }
    }

    /// Collect windows that already closed.
    pub fn reap(&mut self) {
        self.windows.retain_mut(|child| !matches!(child.try_wait(), Ok(Some(_))));
    }
}

impl Drop for DisplayTest {
    fn drop(&mut self) {
        for child in self.windows.iter_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Body of the `identify` child: a labelled window that closes itself.
pub fn run_identify(display: usize, label: &str) -> Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(640, 360)
        .title(label)
        .undecorated()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    place_on_monitor(&mut rl, display);

    let deadline = Instant::now() + Duration::from_secs_f32(IDENTIFY_DURATION);
    // Escape stays the exit key here
    while !rl.window_should_close() && Instant::now() < deadline {
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(IDENTIFY_BACKGROUND);
        let (sw, sh) = (d.get_screen_width(), d.get_screen_height());
        let text_width = measure_text(label, IDENTIFY_FONT);
        d.draw_text(label, (sw - text_width) / 2, (sh - IDENTIFY_FONT) / 2, IDENTIFY_FONT, Color::WHITE);
    }

    tracing::debug!("Test window on display {} closed", display + 1);
    Ok(())
}
