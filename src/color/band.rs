use std::fmt;
use std::str::FromStr;

use super::Rgb;
use crate::audio::features::BandTriple;

pub const MIN_SENSITIVITY: f32 = 0.1;
pub const MAX_SENSITIVITY: f32 = 5.0;

/// Per-band gain applied before sensitivity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BandWeights {
    pub bass: f32,
    pub mids: f32,
    pub highs: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BandMode {
    #[default]
    Balanced,
    BassHeavy,
    TrebleFocus,
}

const BAND_MODES: [(BandMode, &str, BandWeights); 3] = [
    (BandMode::Balanced, "balanced", BandWeights { bass: 1.0, mids: 1.0, highs: 1.0 }),
    (BandMode::BassHeavy, "bass_heavy", BandWeights { bass: 1.5, mids: 0.8, highs: 0.6 }),
    (BandMode::TrebleFocus, "treble_focus", BandWeights { bass: 0.6, mids: 0.8, highs: 1.5 }),
];

impl BandMode {
    pub const ALL: [BandMode; 3] = [BandMode::Balanced, BandMode::BassHeavy, BandMode::TrebleFocus];

    fn entry(self) -> &'static (BandMode, &'static str, BandWeights) {
        // The table is indexed in declaration order.
        &BAND_MODES[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn weights(self) -> BandWeights {
        self.entry().2
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BAND_MODES
            .iter()
            .find(|(_, n, _)| *n == name)
            .map(|(mode, _, _)| *mode)
    }
}

impl FromStr for BandMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| format!("unknown band color mode '{}'", s))
    }
}

impl fmt::Display for BandMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps bass/mids/highs amplitudes straight onto red/green/blue.
#[derive(Clone, Debug)]
pub struct BandColorMapper {
    mode: BandMode,
    sensitivity: f32,
    brightness: f32,
}

impl BandColorMapper {
    /// Unknown mode names fall back to `balanced`; numeric settings are clamped.
    pub fn new(sensitivity: f32, brightness: f32, mode: &str) -> Self {
        let mode = BandMode::from_name(mode).unwrap_or_else(|| {
            log::warn!("Unknown color mode '{}', using '{}'", mode, BandMode::default());
            BandMode::default()
        });
        Self {
            mode,
            sensitivity: clamp_sensitivity(sensitivity),
            brightness: clamp_brightness(brightness),
        }
    }

    pub fn mode(&self) -> BandMode {
        self.mode
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Switch modes by name. Returns `false` and keeps the current mode
    /// when the name is unknown.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match BandMode::from_name(name) {
            Some(mode) => {
                self.mode = mode;
                true
            }
            None => {
                log::debug!("Ignoring unknown color mode '{}'", name);
                false
            }
        }
    }

    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = clamp_sensitivity(sensitivity);
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = clamp_brightness(brightness);
    }

    pub fn map(&self, bass: f32, mids: f32, highs: f32) -> Rgb {
        let weights = self.mode.weights();
        Rgb {
            r: self.channel(bass * weights.bass),
            g: self.channel(mids * weights.mids),
            b: self.channel(highs * weights.highs),
        }
    }

    pub fn map_triple(&self, bands: BandTriple) -> Rgb {
        self.map(bands.bass, bands.mids, bands.highs)
    }

    // Only the upper bound is clamped; a negative level saturates to 0 in the cast.
    fn channel(&self, weighted: f32) -> u8 {
        let level = (weighted * self.sensitivity).min(1.0);
        (level * 255.0 * self.brightness) as u8
    }
}

impl Default for BandColorMapper {
    fn default() -> Self {
        Self::new(1.0, 1.0, BandMode::default().name())
    }
}

fn clamp_sensitivity(value: f32) -> f32 {
    value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}

fn clamp_brightness(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
