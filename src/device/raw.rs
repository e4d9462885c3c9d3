use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{DeviceError, DeviceSink};
use crate::color::Rgb;

/// Writes `[report_id, r, g, b]` reports to a device node such as a hidraw file.
pub struct RawDevice<W: Write = File> {
    writer: W,
    name: String,
    report_id: u8,
}

impl RawDevice<File> {
    pub fn open(path: &Path, report_id: u8) -> Result<Self, DeviceError> {
        let file = OpenOptions::new().write(true).open(path)?;
        log::info!("Opened light device {} (report id 0x{:02x})", path.display(), report_id);
        Ok(Self::from_writer(file, path.display().to_string(), report_id))
    }
}

impl<W: Write> RawDevice<W> {
    pub fn from_writer(writer: W, name: impl Into<String>, report_id: u8) -> Self {
        Self {
            writer,
            name: name.into(),
            report_id,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

pub fn report(report_id: u8, rgb: Rgb) -> [u8; 4] {
    [report_id, rgb.r, rgb.g, rgb.b]
}

impl<W: Write> DeviceSink for RawDevice<W> {
    fn name(&self) -> &str {
        &self.name
    }

    fn write_color(&mut self, rgb: Rgb) -> Result<(), DeviceError> {
        let report = report(self.report_id, rgb);
        let written = self.writer.write(&report)?;
        if written != report.len() {
            return Err(DeviceError::ShortWrite {
                written,
                expected: report.len(),
            });
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Default location of a hidraw node, used only for help text.
pub fn default_device_path() -> PathBuf {
    PathBuf::from("/dev/hidraw0")
}
