use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::audio::features::{BandLayout, BandRange};

pub const CONFIG_FILE_NAME: &str = "lumisync.toml";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub colors: ColorsConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub descriptors: DescriptorsConfig,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AudioConfig {
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Audio file to play through the analyzer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Synthetic test tone used when no input file is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_hz: Option<f32>,
    #[serde(default = "default_tone_amplitude")]
    pub tone_amplitude: f32,
    #[serde(default)]
    pub loop_playback: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_bass_range")]
    pub bass_range: [usize; 2],
    #[serde(default = "default_mids_range")]
    pub mids_range: [usize; 2],
    #[serde(default = "default_highs_range")]
    pub highs_range: [usize; 2],
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ColorsConfig {
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_brightness")]
    pub brightness: f32,
    #[serde(default = "default_band_mode")]
    pub mode: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DeviceConfig {
    #[serde(default = "default_simulate")]
    pub simulate: bool,
    /// Device node receiving raw color reports, e.g. /dev/hidraw0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub report_id: u8,
    /// Seconds between device updates.
    #[serde(default = "default_min_update_interval")]
    pub min_update_interval: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DescriptorsConfig {
    /// Playlist JSON path or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default = "default_descriptor_mode")]
    pub color_mode: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval: f32,
    #[serde(default = "default_hold_secs")]
    pub hold_secs: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: default_sample_rate(),
            block_size: default_block_size(),
            input: None,
            tone_hz: None,
            tone_amplitude: default_tone_amplitude(),
            loop_playback: false,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bass_range: default_bass_range(),
            mids_range: default_mids_range(),
            highs_range: default_highs_range(),
            smoothing_window: default_smoothing_window(),
        }
    }
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            brightness: default_brightness(),
            mode: default_band_mode(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            simulate: default_simulate(),
            path: None,
            report_id: 0,
            min_update_interval: default_min_update_interval(),
        }
    }
}

impl Default for DescriptorsConfig {
    fn default() -> Self {
        Self {
            source: None,
            color_mode: default_descriptor_mode(),
            poll_interval: default_poll_interval(),
            hold_secs: default_hold_secs(),
        }
    }
}

impl AnalysisConfig {
    pub fn band_layout(&self) -> BandLayout {
        BandLayout {
            bass: BandRange::from(self.bass_range),
            mids: BandRange::from(self.mids_range),
            highs: BandRange::from(self.highs_range),
        }
    }
}

impl DeviceConfig {
    /// Negative or NaN intervals disable rate limiting; huge ones saturate.
    pub fn min_interval(&self) -> Duration {
        let secs = self.min_update_interval;
        if secs > 0.0 {
            Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
        } else {
            Duration::ZERO
        }
    }
}

impl DescriptorsConfig {
    pub fn poll_interval(&self) -> Duration {
        seconds(self.poll_interval)
    }

    pub fn hold(&self) -> Duration {
        seconds(self.hold_secs)
    }
}

/// Non-positive and NaN become zero, anything too large for a `Duration` saturates.
pub fn seconds(value: f32) -> Duration {
    if value > 0.0 {
        Duration::try_from_secs_f32(value).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

fn default_sample_rate() -> u32 { 44100 }
fn default_block_size() -> usize { 2048 }
fn default_tone_amplitude() -> f32 { 0.5 }
fn default_bass_range() -> [usize; 2] { [0, 50] }
fn default_mids_range() -> [usize; 2] { [50, 150] }
fn default_highs_range() -> [usize; 2] { [150, 300] }
fn default_smoothing_window() -> usize { 5 }
fn default_sensitivity() -> f32 { 1.0 }
fn default_brightness() -> f32 { 1.0 }
fn default_band_mode() -> String { "balanced".into() }
fn default_simulate() -> bool { true }
fn default_min_update_interval() -> f64 { 1.0 / 60.0 }
fn default_descriptor_mode() -> String { "mood".into() }
fn default_poll_interval() -> f32 { 3.0 }
fn default_hold_secs() -> f32 { 30.0 }

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("Ignoring malformed config {}: {}", path.display(), err);
            None
        }
    }
}

/// Explicit path first, then ./lumisync.toml, then the user config directories.
pub fn discover_config_path(explicit: Option<PathBuf>) -> Option<PathBuf> {
    explicit.or_else(|| {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Some(local);
        }
        if let Some(home) = dirs::home_dir() {
            let xdg = home.join(".config").join("lumisync").join("config.toml");
            if xdg.exists() {
                return Some(xdg);
            }
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("lumisync").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    })
}

pub fn write_default_config(path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(&Config::default()).context("Failed to serialize default config")?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.audio.block_size, 2048);
        assert_eq!(config.analysis.mids_range, [50, 150]);
        assert_eq!(config.colors.mode, "balanced");
        assert!(config.device.simulate);
        assert_eq!(config.descriptors.color_mode, "mood");
        assert_eq!(config.device.min_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            bass_range = [2, 40]
            smoothing_window = 8

            [colors]
            sensitivity = 2.5
            mode = "bass_heavy"

            [device]
            simulate = false
            path = "/dev/hidraw3"
            report_id = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.bass_range, [2, 40]);
        assert_eq!(config.analysis.highs_range, [150, 300]);
        assert_eq!(config.analysis.smoothing_window, 8);
        assert_eq!(config.colors.sensitivity, 2.5);
        assert_eq!(config.colors.brightness, 1.0);
        assert_eq!(config.device.path, Some(PathBuf::from("/dev/hidraw3")));
        assert_eq!(config.device.report_id, 2);
    }

    #[test]
    fn band_layout_from_ranges() {
        let analysis = AnalysisConfig {
            bass_range: [0, 10],
            mids_range: [30, 20],
            ..Default::default()
        };
        let layout = analysis.band_layout();
        assert_eq!(layout.bass, BandRange::new(0, 10));
        assert!(layout.mids.clamp_to(1024).is_none());
    }

    #[test]
    fn negative_intervals_become_zero() {
        let device = DeviceConfig {
            min_update_interval: -1.0,
            ..Default::default()
        };
        assert_eq!(device.min_interval(), Duration::ZERO);
    }

    #[test]
    fn huge_intervals_saturate() {
        let config: Config = toml::from_str(
            r#"
            [device]
            min_update_interval = 1e300

            [descriptors]
            hold_secs = 1e30
            poll_interval = inf
            "#,
        )
        .unwrap();
        assert_eq!(config.device.min_interval(), Duration::MAX);
        assert_eq!(config.descriptors.hold(), Duration::MAX);
        assert_eq!(config.descriptors.poll_interval(), Duration::MAX);
        assert_eq!(seconds(f32::NAN), Duration::ZERO);
        assert_eq!(seconds(0.25), Duration::from_millis(250));
    }

    #[test]
    fn default_config_serializes_to_loadable_toml() {
        let text = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.audio.sample_rate, 44100);
        assert_eq!(parsed.colors.mode, "balanced");
        assert!(parsed.descriptors.source.is_none());
    }

    #[test]
    fn missing_file_loads_nothing() {
        assert!(load_config(Path::new("/nonexistent/lumisync.toml")).is_none());
    }
}
