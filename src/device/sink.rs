use std::time::{Duration, Instant};

use super::{DeviceError, DeviceSink};
use crate::color::Rgb;

/// 60 Hz.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_micros(16_667);

/// Forwards colors to a device at most once per `min_interval`.
///
/// Updates arriving too early are dropped, never queued.
pub struct RateLimitedSink<D> {
    device: D,
    min_interval: Duration,
    last_emit: Option<Instant>,
    accepted: u64,
    dropped: u64,
}

impl<D: DeviceSink> RateLimitedSink<D> {
    pub fn new(device: D, min_interval: Duration) -> Self {
        Self {
            device,
            min_interval,
            last_emit: None,
            accepted: 0,
            dropped: 0,
        }
    }

    pub fn with_default_interval(device: D) -> Self {
        Self::new(device, DEFAULT_MIN_INTERVAL)
    }

    /// Submit a color now. `Ok(false)` means it was dropped by the rate limit.
    pub fn submit(&mut self, rgb: Rgb) -> Result<bool, DeviceError> {
        self.submit_at(rgb, Instant::now())
    }

    /// Submit a color as of `now`.
    ///
    /// An accepted update moves the emit clock even if the device write
    /// then fails.
    pub fn submit_at(&mut self, rgb: Rgb, now: Instant) -> Result<bool, DeviceError> {
        if let Some(last) = self.last_emit {
            if now.saturating_duration_since(last) < self.min_interval {
                self.dropped += 1;
                return Ok(false);
            }
        }

        self.last_emit = Some(now);
        self.accepted += 1;
        self.device.write_color(rgb)?;
        Ok(true)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_emit(&self) -> Option<Instant> {
        self.last_emit
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn into_inner(self) -> D {
        self.device
    }
}
