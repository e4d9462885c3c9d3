pub mod raw;
pub mod simulated;
pub mod sink;

use thiserror::Error;

use crate::color::Rgb;

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("device I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("short write to device: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },
}

/// A light that can be set to a color.
pub trait DeviceSink {
    fn name(&self) -> &str;
    fn write_color(&mut self, rgb: Rgb) -> Result<(), DeviceError>;
}

impl<D: DeviceSink + ?Sized> DeviceSink for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn write_color(&mut self, rgb: Rgb) -> Result<(), DeviceError> {
        (**self).write_color(rgb)
    }
}
