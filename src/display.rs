use std::time::{Duration, Instant};

use crate::audio::features::BandTriple;
use crate::color::{Rgb, ANSI_RESET};

/// Loop iterations per second, refreshed once a second.
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
    fps: f32,
}

impl FpsCounter {
    pub fn starting_at(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            fps: 0.0,
        }
    }

    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.frames = 0;
            self.window_start = now;
        }
        self.fps
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// `width`-character bar filled in proportion to `value` (0.0-1.0).
pub fn level_bar(value: f32, width: usize) -> String {
    let filled = ((value.clamp(0.0, 1.0) * width as f32) as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub fn color_swatch(rgb: Rgb, width: usize) -> String {
    format!("{}{}{}", rgb.ansi_background(), " ".repeat(width), ANSI_RESET)
}

pub fn band_status(fps: f32, bands: &BandTriple, rgb: Rgb) -> String {
    format!(
        "FPS: {:5.1} | RGB: {} {} | Bass: {} {:4.2} | Mids: {} {:4.2} | Highs: {} {:4.2}",
        fps,
        rgb,
        color_swatch(rgb, 20),
        level_bar(bands.bass, 20),
        bands.bass,
        level_bar(bands.mids, 20),
        bands.mids,
        level_bar(bands.highs, 20),
        bands.highs,
    )
}
