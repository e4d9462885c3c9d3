use super::{DeviceError, DeviceSink};
use crate::color::Rgb;

/// Stands in for a real light; remembers what it was told.
#[derive(Debug, Default)]
pub struct SimulatedDevice {
    last: Option<Rgb>,
    writes: u64,
}

impl SimulatedDevice {
    pub fn new() -> Self {
        log::info!("Running in simulate mode - no device will be written");
        Self::default()
    }

    pub fn last_color(&self) -> Option<Rgb> {
        self.last
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl DeviceSink for SimulatedDevice {
    fn name(&self) -> &str {
        "simulated"
    }

    fn write_color(&mut self, rgb: Rgb) -> Result<(), DeviceError> {
        log::trace!("simulated light -> {}", rgb);
        self.last = Some(rgb);
        self.writes += 1;
        Ok(())
    }
}
